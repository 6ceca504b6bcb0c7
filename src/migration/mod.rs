//! Migration system.
//!
//! This module provides the infrastructure for database migrations:
//! - Migration trait definition
//! - SchemaManager for schema operations
//! - Migration state tracking and execution
//!
//! The shipped catalog migrations live in [`crate::migrations`].
//!
//! # Example
//!
//! ```rust,no_run
//! use canopy::migration::{Migration, SchemaManager};
//! use sea_query::{Table, ColumnDef};
//!
//! pub struct CreateUnitsTable;
//!
//! impl Migration for CreateUnitsTable {
//!     fn name(&self) -> &str {
//!         "create_units_table"
//!     }
//!
//!     fn version(&self) -> i64 {
//!         20250501130000
//!     }
//!
//!     fn up(&self, manager: &SchemaManager<'_>) -> Result<(), canopy::CanopyError> {
//!         let table = Table::create()
//!             .table("units")
//!             .col(ColumnDef::new("unit_id").integer().not_null().auto_increment().primary_key())
//!             .col(ColumnDef::new("unit_name").string().string_len(255).not_null())
//!             .to_owned();
//!         manager.create_table(table)
//!     }
//!
//!     fn down(&self, manager: &SchemaManager<'_>) -> Result<(), canopy::CanopyError> {
//!         let table = Table::drop().table("units").to_owned();
//!         manager.drop_table(table)
//!     }
//! }
//! ```

pub mod error;
pub mod migration;
pub mod migrator;
pub mod schema_manager;

pub use error::MigrationError;
pub use migration::Migration;
pub use migrator::{initialize_state_table, MigrationRecord, MigrationStatus, Migrator};
pub use schema_manager::SchemaManager;

// Re-export for convenience
pub use crate::executor::CanopyError;
