pub mod config;
pub mod error;
pub mod models;

pub use config::AppConfig;
pub use error::{StatusPageError, StatusPageResult};
