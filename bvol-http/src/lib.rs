#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod payload;

pub use app::{AppState, router};
pub use config::ServerConfig;
pub use error::ApiError;
