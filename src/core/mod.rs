//! Configuration, errors, logging, and user-facing texts

pub mod config;
pub mod error;
pub mod logging;
pub mod messages;
pub mod validation;

pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_configuration};
