//! Migration-specific error types

use crate::executor::CanopyError;

/// Migration-specific errors
#[derive(Debug)]
pub enum MigrationError {
    /// Database execution error
    Database(CanopyError),
    /// Two registered migrations share a version
    DuplicateVersion(i64),
    /// Migration failed during execution
    ExecutionFailed {
        version: i64,
        name: String,
        error: String,
    },
    /// A state-table row references a version missing from the registry
    UnknownApplied { version: i64, name: String },
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::Database(e) => write!(f, "Database error: {e}"),
            MigrationError::DuplicateVersion(version) => {
                write!(f, "Duplicate migration version: {version}")
            }
            MigrationError::ExecutionFailed {
                version,
                name,
                error,
            } => {
                write!(
                    f,
                    "Migration '{name}' (version {version}) failed during execution: {error}"
                )
            }
            MigrationError::UnknownApplied { version, name } => {
                write!(
                    f,
                    "Applied migration '{name}' (version {version}) is not in the registry.\n\
                     Suggestion: ensure all shipped migrations are registered before running"
                )
            }
        }
    }
}

impl std::error::Error for MigrationError {}

impl From<CanopyError> for MigrationError {
    fn from(error: CanopyError) -> Self {
        MigrationError::Database(error)
    }
}

impl From<crate::transaction::TransactionError> for MigrationError {
    fn from(error: crate::transaction::TransactionError) -> Self {
        MigrationError::Database(CanopyError::from(error))
    }
}
