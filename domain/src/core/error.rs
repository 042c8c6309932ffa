//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown specialty: {0}")]
    UnknownSpecialty(String),

    #[error("Invalid complexity bounds: simple={simple}, medium={medium}")]
    InvalidBounds { simple: f64, medium: f64 },

    #[error("Value out of range for {field}: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}
