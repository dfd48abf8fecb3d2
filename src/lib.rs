pub mod app;
pub mod config;
pub mod event;
pub mod feedback;
pub mod logging;
pub mod session;
pub mod ui;
