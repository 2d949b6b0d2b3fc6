pub mod config;
pub mod domain;
pub mod error;
pub mod health;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod utils;
pub mod ws;

pub use error::AppError;
