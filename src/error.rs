//! Catalog error taxonomy.
//!
//! Structural violations (missing target, missing parent, re-parent into own
//! subtree) are detected before any write and never touch storage. Storage
//! failures are classified from the driver error so callers can distinguish
//! uniqueness violations and dangling references from unexpected failures.

use crate::executor::CanopyError;
use crate::transaction::TransactionError;
use std::fmt;

/// Result alias for hierarchy operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced by the hierarchy manager and stores.
#[derive(Debug)]
pub enum CatalogError {
    /// The referenced category id does not exist.
    NotFound,
    /// The supplied parent_id does not reference an existing category.
    ParentNotFound(i32),
    /// A uniqueness constraint was violated (duplicate closure row, duplicate
    /// unique field).
    DuplicateEntry(String),
    /// A foreign-key constraint failed (dangling reference).
    ReferentialIntegrity(String),
    /// A re-parent that would make a category its own ancestor.
    HierarchyCycle { id: i32, parent_id: i32 },
    /// Any other storage failure.
    Database(CanopyError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound => write!(f, "Category not found"),
            CatalogError::ParentNotFound(id) => {
                write!(f, "Parent category {id} not found")
            }
            CatalogError::DuplicateEntry(detail) => {
                write!(f, "Duplicate entry: {detail}")
            }
            CatalogError::ReferentialIntegrity(detail) => {
                write!(f, "Referential integrity violation: {detail}")
            }
            CatalogError::HierarchyCycle { id, parent_id } => {
                write!(
                    f,
                    "Cannot re-parent category {id} under {parent_id}: target is inside its own subtree"
                )
            }
            CatalogError::Database(e) => write!(f, "Database error: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {}

// PostgreSQL server message fragments, stable across versions. The driver
// does not expose SQLSTATE codes on its rendered errors, so classification
// matches on the message text.
const UNIQUE_VIOLATION_PATTERN: &str = "duplicate key value violates unique constraint";
const FOREIGN_KEY_PATTERN: &str = "violates foreign key constraint";

impl From<CanopyError> for CatalogError {
    fn from(err: CanopyError) -> Self {
        let message = err.to_string();
        if message.contains(UNIQUE_VIOLATION_PATTERN) {
            return CatalogError::DuplicateEntry(message);
        }
        if message.contains(FOREIGN_KEY_PATTERN) {
            return CatalogError::ReferentialIntegrity(message);
        }
        CatalogError::Database(err)
    }
}

impl From<TransactionError> for CatalogError {
    fn from(err: TransactionError) -> Self {
        CatalogError::from(CanopyError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_entry_classification() {
        let err = CanopyError::QueryError(
            "db error: ERROR: duplicate key value violates unique constraint \
             \"category_closure_pkey\""
                .to_string(),
        );
        match CatalogError::from(err) {
            CatalogError::DuplicateEntry(detail) => {
                assert!(detail.contains("category_closure_pkey"));
            }
            other => panic!("expected DuplicateEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_foreign_key_classification() {
        let err = CanopyError::QueryError(
            "db error: ERROR: insert or update on table \"categories\" violates \
             foreign key constraint \"categories_parent_id_fkey\""
                .to_string(),
        );
        match CatalogError::from(err) {
            CatalogError::ReferentialIntegrity(detail) => {
                assert!(detail.contains("categories_parent_id_fkey"));
            }
            other => panic!("expected ReferentialIntegrity, got {other:?}"),
        }
    }

    #[test]
    fn test_unclassified_falls_through_to_database() {
        let err = CanopyError::Other("connection reset by peer".to_string());
        assert!(matches!(
            CatalogError::from(err),
            CatalogError::Database(_)
        ));
    }

    #[test]
    fn test_display_variants() {
        assert!(CatalogError::NotFound.to_string().contains("not found"));
        assert!(CatalogError::ParentNotFound(7).to_string().contains('7'));
        let cycle = CatalogError::HierarchyCycle { id: 2, parent_id: 5 };
        assert!(cycle.to_string().contains("own subtree"));
    }
}
