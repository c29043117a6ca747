//! Error types for the lockranger CLI.
//!
//! Uses thiserror for derive macros. Every variant maps to an exit code;
//! per-line problems (parse errors, recoverable lock failures) never reach
//! this type and are reported by the session instead.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for lockranger operations.
#[derive(Error, Debug)]
pub enum RangerError {
    /// Invalid configuration or other operator mistake.
    #[error("{0}")]
    UserError(String),

    /// The data file or command file could not be opened.
    #[error("{0}")]
    OpenError(String),

    /// The lock primitive failed in a way that ends the session.
    #[error("Lock operation failed: {0}")]
    LockError(String),

    /// Reading commands or writing output failed.
    #[error("I/O failure: {0}")]
    IoError(String),
}

impl RangerError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RangerError::UserError(_) => exit_codes::USER_ERROR,
            RangerError::OpenError(_) => exit_codes::OPEN_FAILURE,
            RangerError::LockError(_) => exit_codes::LOCK_FAILURE,
            RangerError::IoError(_) => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for lockranger operations.
pub type Result<T> = std::result::Result<T, RangerError>;
