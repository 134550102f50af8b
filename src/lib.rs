// Social feed server - posts, likes and retweets over CSV-backed storage

pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

// Re-exports for convenience
pub use error::{AppError, AppResult};
