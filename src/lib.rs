pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;

pub use config::AppConfig;
pub use router::app;
pub use state::AppState;
