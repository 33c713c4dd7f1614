//! Error types.
//!
//! - `WaccError` is what the library returns from a WACC computation. Each
//!   variant carries the key that failed (activity, field, table) so the host
//!   can diagnose it without re-running anything.
//! - `AppError` is the binary boundary: a message plus the process exit code.

use thiserror::Error;

use crate::domain::{MacroField, TableId};

/// Failure of a WACC computation. No partial result accompanies any variant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaccError {
    /// Missing or unparseable activity/revenue on the request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("activity not found: {0}")]
    ActivityNotFound(String),

    #[error("parameter {0} not found in the parameter table")]
    ParameterMissing(MacroField),

    #[error("incomplete IPCA series, missing: {}", .missing.join(", "))]
    IpcaIncomplete { missing: Vec<String> },

    /// Backing table unreadable, or one of its values malformed.
    #[error("failed to read {table} table: {message}")]
    SourceReadError { table: TableId, message: String },

    #[error("internal computation error: {0}")]
    InternalComputationError(String),
}

impl WaccError {
    pub fn source_read(table: TableId, message: impl Into<String>) -> Self {
        WaccError::SourceReadError {
            table,
            message: message.into(),
        }
    }

    /// Exit code used by the `wacc` binary for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            WaccError::InvalidInput(_) => 2,
            WaccError::ActivityNotFound(_)
            | WaccError::ParameterMissing(_)
            | WaccError::IpcaIncomplete { .. } => 3,
            WaccError::SourceReadError { .. } => 4,
            WaccError::InternalComputationError(_) => 5,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<WaccError> for AppError {
    fn from(err: WaccError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let cases = [
            (WaccError::InvalidInput("x".into()), 2),
            (WaccError::ActivityNotFound("x".into()), 3),
            (WaccError::ParameterMissing(MacroField::Ct), 3),
            (WaccError::IpcaIncomplete { missing: vec!["IPCAano3".into()] }, 3),
            (WaccError::source_read(TableId::SizePremium, "boom"), 4),
            (WaccError::InternalComputationError("nan".into()), 5),
        ];
        for (err, code) in cases {
            assert_eq!(AppError::from(err).exit_code(), code);
        }
    }

    #[test]
    fn messages_name_the_offending_key() {
        let err = WaccError::ParameterMissing(MacroField::Rf);
        assert_eq!(err.to_string(), "parameter RF not found in the parameter table");

        let err = WaccError::IpcaIncomplete {
            missing: vec!["IPCAano2".into(), "IPCAano5".into()],
        };
        assert_eq!(err.to_string(), "incomplete IPCA series, missing: IPCAano2, IPCAano5");
    }
}
