//! Error types for the fallible edges of the crate.
//!
//! The selection pipeline itself never fails. Errors only arise when parsing
//! sexagesimal coordinate strings or reading and writing settings files.

use thiserror::Error;

/// Errors raised while parsing coordinates or handling settings files.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed sexagesimal value '{0}': expected three ':'-separated fields")]
    MalformedSexagesimal(String),
    #[error("Invalid number '{field}' in '{input}'")]
    InvalidNumber { field: String, input: String },
    #[error("{name} value {value} is outside the range {min} to {max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
