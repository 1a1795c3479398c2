// ================================================================
// File: redfinger-common/src/error.rs
// ================================================================

use thiserror::Error;

/// Example shown to users whenever a redeem code fails the format check.
pub const REDEEM_CODE_EXAMPLE: &str = "APY3-GP9Z-KVC4";

/// Rejections produced by input validation, before any storage access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required (missing: {0})")]
    MissingField(&'static str),

    /// Present but not a JSON string, e.g. `"server": 5`.
    #[error("Field {0} must be a string")]
    NotAString(&'static str),

    #[error("Invalid value for {field}: '{value}'")]
    InvalidChoice { field: &'static str, value: String },

    #[error("Invalid redeem code format! Use format: XXXX-XXXX-XXXX (example: APY3-GP9Z-KVC4)")]
    MalformedCode(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The redeem code was already consumed by an earlier submission.
    #[error("Redeem code already used: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}
