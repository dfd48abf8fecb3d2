pub mod celebration;
pub mod confetti;
pub mod progress_bar;
pub mod result_view;
