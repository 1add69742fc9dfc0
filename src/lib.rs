pub mod config;
pub mod layout;
pub mod model;
pub mod slot;
pub mod store;
pub mod views;
