pub mod character;
pub mod descriptor;
pub mod navigation;
pub mod presenter;
