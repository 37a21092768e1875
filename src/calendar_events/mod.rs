pub mod models;
pub mod participants;
pub mod services;
#[cfg(test)]
mod tests;
pub mod views;
