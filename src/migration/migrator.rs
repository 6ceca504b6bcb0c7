//! Migrator - migration execution engine
//!
//! Orchestrates registry validation, state tracking, and execution. Each
//! pending migration runs inside its own transaction together with its
//! state-table row, so a failed migration leaves no partial schema behind.

use crate::executor::{CanopyError, CanopyExecutor, MayPostgresExecutor};
use crate::migration::{Migration, MigrationError, SchemaManager};
use std::collections::HashSet;
use std::time::Instant;

/// One applied-migration row from the state table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
}

/// Applied vs pending migrations.
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub applied: Vec<MigrationRecord>,
    pub pending: Vec<MigrationRecord>,
}

impl MigrationStatus {
    /// Whether everything registered has been applied.
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Initialize the migration state table
///
/// Creates the `canopy_migrations` table if it doesn't exist. Raw SQL with
/// `IF NOT EXISTS` keeps this callable on every startup.
pub fn initialize_state_table(executor: &dyn CanopyExecutor) -> Result<(), CanopyError> {
    let sql = r#"
        CREATE TABLE IF NOT EXISTS canopy_migrations (
            version BIGINT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            execution_time_ms INTEGER
        )
    "#;
    executor.execute(sql, &[])?;
    Ok(())
}

/// Migration execution engine over a registry of in-code migrations.
pub struct Migrator {
    migrations: Vec<Box<dyn Migration>>,
}

impl Migrator {
    /// Create a Migrator from a registry, sorted by version.
    pub fn new(mut migrations: Vec<Box<dyn Migration>>) -> Self {
        migrations.sort_by_key(|m| m.version());
        Self { migrations }
    }

    /// Registered versions, ascending.
    pub fn versions(&self) -> Vec<i64> {
        self.migrations.iter().map(|m| m.version()).collect()
    }

    /// Reject registries where two migrations share a version.
    fn validate(&self) -> Result<(), MigrationError> {
        let mut seen = HashSet::new();
        for migration in &self.migrations {
            if !seen.insert(migration.version()) {
                return Err(MigrationError::DuplicateVersion(migration.version()));
            }
        }
        Ok(())
    }

    /// Get migration status (applied vs pending)
    pub fn status(&self, executor: &dyn CanopyExecutor) -> Result<MigrationStatus, MigrationError> {
        self.validate()?;
        initialize_state_table(executor)?;

        let applied = Self::query_applied(executor)?;
        let applied_versions: HashSet<i64> = applied.iter().map(|r| r.version).collect();
        let registered_versions: HashSet<i64> =
            self.migrations.iter().map(|m| m.version()).collect();

        // A state row with no registered migration means the binary is older
        // than the database.
        for record in &applied {
            if !registered_versions.contains(&record.version) {
                return Err(MigrationError::UnknownApplied {
                    version: record.version,
                    name: record.name.clone(),
                });
            }
        }

        let pending = self
            .migrations
            .iter()
            .filter(|m| !applied_versions.contains(&m.version()))
            .map(|m| MigrationRecord {
                version: m.version(),
                name: m.name().to_string(),
            })
            .collect();

        Ok(MigrationStatus { applied, pending })
    }

    /// Apply all pending migrations in version order.
    ///
    /// Returns the number of migrations applied. Each migration and its
    /// state-table row commit in one transaction.
    pub fn apply_all(&self, executor: &MayPostgresExecutor) -> Result<u32, MigrationError> {
        let status = self.status(executor)?;
        let pending_versions: HashSet<i64> =
            status.pending.iter().map(|r| r.version).collect();

        let mut applied_count = 0u32;
        for migration in &self.migrations {
            if !pending_versions.contains(&migration.version()) {
                continue;
            }
            self.run_one(executor, migration.as_ref())?;
            applied_count += 1;
        }
        Ok(applied_count)
    }

    /// Roll back the most recently applied migration, if any.
    ///
    /// Returns the reverted version.
    pub fn revert_last(
        &self,
        executor: &MayPostgresExecutor,
    ) -> Result<Option<i64>, MigrationError> {
        let status = self.status(executor)?;
        let Some(last) = status.applied.iter().max_by_key(|r| r.version) else {
            return Ok(None);
        };
        let migration = self
            .migrations
            .iter()
            .find(|m| m.version() == last.version)
            .ok_or_else(|| MigrationError::UnknownApplied {
                version: last.version,
                name: last.name.clone(),
            })?;

        let txn = executor.begin()?;
        let result = (|| -> Result<(), MigrationError> {
            let manager = SchemaManager::new(&txn);
            migration.down(&manager)?;
            txn.execute(
                "DELETE FROM canopy_migrations WHERE version = $1",
                &[&migration.version()],
            )?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                txn.commit()?;
                log::info!(
                    "reverted migration {} ({})",
                    migration.version(),
                    migration.name()
                );
                Ok(Some(migration.version()))
            }
            Err(err) => {
                let _ = txn.rollback();
                Err(err)
            }
        }
    }

    fn run_one(
        &self,
        executor: &MayPostgresExecutor,
        migration: &dyn Migration,
    ) -> Result<(), MigrationError> {
        let start = Instant::now();
        let txn = executor.begin()?;

        let result = (|| -> Result<(), MigrationError> {
            let manager = SchemaManager::new(&txn);
            migration.up(&manager)?;
            let elapsed_ms = i32::try_from(start.elapsed().as_millis()).unwrap_or(i32::MAX);
            txn.execute(
                "INSERT INTO canopy_migrations (version, name, execution_time_ms) \
                 VALUES ($1, $2, $3)",
                &[&migration.version(), &migration.name(), &elapsed_ms],
            )?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                txn.commit()?;
                log::info!(
                    "applied migration {} ({}) in {:?}",
                    migration.version(),
                    migration.name(),
                    start.elapsed()
                );
                Ok(())
            }
            Err(err) => {
                let _ = txn.rollback();
                Err(MigrationError::ExecutionFailed {
                    version: migration.version(),
                    name: migration.name().to_string(),
                    error: err.to_string(),
                })
            }
        }
    }

    fn query_applied(
        executor: &dyn CanopyExecutor,
    ) -> Result<Vec<MigrationRecord>, MigrationError> {
        let rows = executor.query_all(
            "SELECT version, name FROM canopy_migrations ORDER BY version",
            &[],
        )?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(MigrationRecord {
                version: row.try_get(0).map_err(CanopyError::PostgresError)?,
                name: row.try_get(1).map_err(CanopyError::PostgresError)?,
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop {
        version: i64,
        name: &'static str,
    }

    impl Migration for Noop {
        fn name(&self) -> &str {
            self.name
        }
        fn version(&self) -> i64 {
            self.version
        }
        fn up(&self, _manager: &SchemaManager<'_>) -> Result<(), CanopyError> {
            Ok(())
        }
        fn down(&self, _manager: &SchemaManager<'_>) -> Result<(), CanopyError> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_sorted_by_version() {
        let migrator = Migrator::new(vec![
            Box::new(Noop {
                version: 20250502000000,
                name: "second",
            }),
            Box::new(Noop {
                version: 20250501000000,
                name: "first",
            }),
        ]);
        assert_eq!(
            migrator.versions(),
            vec![20250501000000, 20250502000000]
        );
    }

    #[test]
    fn test_duplicate_versions_rejected() {
        let migrator = Migrator::new(vec![
            Box::new(Noop {
                version: 1,
                name: "a",
            }),
            Box::new(Noop {
                version: 1,
                name: "b",
            }),
        ]);
        assert!(matches!(
            migrator.validate(),
            Err(MigrationError::DuplicateVersion(1))
        ));
    }

    #[test]
    fn test_status_up_to_date_helper() {
        let status = MigrationStatus {
            applied: vec![],
            pending: vec![],
        };
        assert!(status.is_up_to_date());

        let status = MigrationStatus {
            applied: vec![],
            pending: vec![MigrationRecord {
                version: 1,
                name: "x".to_string(),
            }],
        };
        assert!(!status.is_up_to_date());
    }
}
