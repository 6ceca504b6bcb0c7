//! Test database helper (feature `test-helpers`).
//!
//! Integration tests point `CANOPY_TEST_DATABASE_URL` at a disposable
//! PostgreSQL database. When the variable is unset the helper yields `None`
//! and tests skip, so the suite passes on machines without a database.

use crate::connection::{connect, ConnectionError};
use crate::executor::{CanopyExecutor, MayPostgresExecutor};
use crate::migration::{MigrationError, Migrator};
use crate::migrations;

/// Environment variable naming the throwaway test database.
pub const TEST_DATABASE_URL_VAR: &str = "CANOPY_TEST_DATABASE_URL";

/// Handle to the configured test database.
pub struct TestDatabase {
    url: String,
}

impl TestDatabase {
    /// Read the test database URL from the environment.
    ///
    /// Returns `None` when `CANOPY_TEST_DATABASE_URL` is unset or empty;
    /// callers should treat that as "skip this test".
    pub fn from_env() -> Option<Self> {
        match std::env::var(TEST_DATABASE_URL_VAR) {
            Ok(url) if !url.is_empty() => Some(Self { url }),
            _ => None,
        }
    }

    /// The configured connection string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connect and wrap the client in an executor.
    pub fn executor(&self) -> Result<MayPostgresExecutor, ConnectionError> {
        let client = connect(&self.url)?;
        Ok(MayPostgresExecutor::new(client))
    }

    /// Drop and recreate the catalog schema, leaving an empty, migrated
    /// database. Each integration test starts from this.
    pub fn reset(&self, executor: &MayPostgresExecutor) -> Result<(), MigrationError> {
        executor.execute("DROP TABLE IF EXISTS category_closure", &[])?;
        executor.execute("DROP TABLE IF EXISTS categories", &[])?;
        executor.execute("DROP TABLE IF EXISTS canopy_migrations", &[])?;
        Migrator::new(migrations::registry()).apply_all(executor)?;
        Ok(())
    }
}
