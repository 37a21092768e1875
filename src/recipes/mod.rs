pub mod ingredients;
pub mod models;
pub mod services;
pub mod views;
