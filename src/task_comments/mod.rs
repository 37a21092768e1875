pub mod models;
pub mod services;
#[cfg(test)]
mod tests;
pub mod views;
