pub mod art;
pub mod components;
pub mod layout;
pub mod theme;
