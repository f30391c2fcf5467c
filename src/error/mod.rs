//! Error types for validation failures and configuration faults.
//!
//! Validation failures are data problems: they carry a field path and are
//! aggregated into an [`AggregatedValidationError`]. Configuration faults
//! ([`ConfigError`]) are setup defects and never travel through the
//! aggregation path.

mod config_error;
mod log;
mod validation_error;

pub use config_error::ConfigError;
pub use validation_error::{
    AggregatedValidationError, Cause, ErrorInfo, GroupedErrors, Message, ValidationError,
};
pub(crate) use log::ErrorLog;
