//! Migration trait definition

use super::schema_manager::SchemaManager;
use crate::executor::CanopyError;

/// Trait that all migrations must implement
///
/// Each migration defines a struct implementing this trait with `up()` and
/// `down()` methods for applying and rolling back the migration.
pub trait Migration: Send + Sync {
    /// Get the migration name (human-readable identifier)
    fn name(&self) -> &str;

    /// Get the migration version (timestamp: YYYYMMDDHHMMSS)
    fn version(&self) -> i64;

    /// Apply the migration (forward migration)
    ///
    /// Note: the `may` runtime schedules coroutines around blocking calls, so
    /// this is synchronous, not async.
    fn up(&self, manager: &SchemaManager<'_>) -> Result<(), CanopyError>;

    /// Rollback the migration (reverse migration)
    ///
    /// Note: the `may` runtime schedules coroutines around blocking calls, so
    /// this is synchronous, not async.
    fn down(&self, manager: &SchemaManager<'_>) -> Result<(), CanopyError>;
}
