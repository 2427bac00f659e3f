pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod telemetry;

pub use config::DemoConfig;
pub use error::{DemoError, IntegrityViolation};
