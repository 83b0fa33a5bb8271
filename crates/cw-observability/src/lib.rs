//! # cw-observability
//!
//! Logging infrastructure for Compliance Warden.

pub mod logging;

pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
