//! Shipped catalog migrations.
//!
//! `registry()` is the full ordered set handed to
//! [`Migrator`](crate::migration::Migrator) on startup.

mod m20250501120000_create_category_tables;

pub use m20250501120000_create_category_tables::CreateCategoryTables;

use crate::migration::Migration;

/// All migrations shipped with this crate, in registration order.
pub fn registry() -> Vec<Box<dyn Migration>> {
    vec![Box::new(CreateCategoryTables)]
}
