//! SchemaManager - schema operations available inside migrations

use crate::executor::{CanopyError, CanopyExecutor};
use sea_query::{
    IndexCreateStatement, IndexDropStatement, PostgresQueryBuilder, TableCreateStatement,
    TableDropStatement,
};

/// SchemaManager provides methods for performing schema operations in
/// migrations.
///
/// It borrows a `CanopyExecutor` (usually the transaction the migration runs
/// in) and renders `sea-query` statements with the PostgreSQL builder.
pub struct SchemaManager<'a> {
    executor: &'a dyn CanopyExecutor,
}

impl<'a> SchemaManager<'a> {
    /// Create a new SchemaManager over the given executor
    pub fn new(executor: &'a dyn CanopyExecutor) -> Self {
        Self { executor }
    }

    /// Create a table
    ///
    /// # Example
    /// ```rust,no_run
    /// use sea_query::{Table, ColumnDef};
    /// # use canopy::migration::SchemaManager;
    /// # fn demo(manager: &SchemaManager<'_>) -> Result<(), canopy::CanopyError> {
    /// let table = Table::create()
    ///     .table("units")
    ///     .col(ColumnDef::new("unit_id").integer().not_null().primary_key())
    ///     .col(ColumnDef::new("unit_name").string().not_null())
    ///     .to_owned();
    /// manager.create_table(table)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn create_table(&self, table: TableCreateStatement) -> Result<(), CanopyError> {
        let sql = table.build(PostgresQueryBuilder);
        // DDL statements carry no parameters
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Drop a table
    pub fn drop_table(&self, table: TableDropStatement) -> Result<(), CanopyError> {
        let sql = table.build(PostgresQueryBuilder);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Create an index
    ///
    /// # Example
    /// ```rust,no_run
    /// use sea_query::{Index, Expr};
    /// # use canopy::migration::SchemaManager;
    /// # fn demo(manager: &SchemaManager<'_>) -> Result<(), canopy::CanopyError> {
    /// let index = Index::create()
    ///     .name("idx_categories_parent_id")
    ///     .table("categories")
    ///     .col(Expr::col("parent_id"))
    ///     .to_owned();
    /// manager.create_index(index)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn create_index(&self, index: IndexCreateStatement) -> Result<(), CanopyError> {
        let sql = index.build(PostgresQueryBuilder);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Drop an index
    pub fn drop_index(&self, index: IndexDropStatement) -> Result<(), CanopyError> {
        let sql = index.build(PostgresQueryBuilder);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Execute raw SQL
    ///
    /// # Example
    /// ```rust,no_run
    /// # use canopy::migration::SchemaManager;
    /// # fn demo(manager: &SchemaManager<'_>) -> Result<(), canopy::CanopyError> {
    /// manager.execute("CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\"", &[])?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn execute(
        &self,
        sql: &str,
        params: &[&dyn may_postgres::types::ToSql],
    ) -> Result<(), CanopyError> {
        self.executor.execute(sql, params).map(|_| ())
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &dyn CanopyExecutor {
        self.executor
    }
}
