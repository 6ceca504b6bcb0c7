//! Migration: Create category tables
//! Version: 20250501120000
//! Description: Creates the category adjacency table and its closure index

use crate::executor::CanopyError;
use crate::migration::{Migration, SchemaManager};
use sea_query::{Expr, Index, Table};

pub struct CreateCategoryTables;

impl Migration for CreateCategoryTables {
    fn name(&self) -> &str {
        "create_category_tables"
    }

    fn version(&self) -> i64 {
        20250501120000
    }

    fn up(&self, manager: &SchemaManager<'_>) -> Result<(), CanopyError> {
        // Categories: adjacency list, parent_id is the source of truth for
        // tree shape. Subtree removal cascades through parent_id.
        manager.execute(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                category_id SERIAL PRIMARY KEY,
                category_name VARCHAR(255) NOT NULL,
                category_description TEXT,
                category_image TEXT,
                category_url TEXT,
                parent_id INTEGER REFERENCES categories(category_id)
                    ON DELETE CASCADE ON UPDATE CASCADE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            &[],
        )?;

        // Category closure: derived ancestor/descendant materialization with
        // depth. Rows vanish with either endpoint.
        manager.execute(
            r#"
            CREATE TABLE IF NOT EXISTS category_closure (
                ancestor_id INTEGER NOT NULL REFERENCES categories(category_id)
                    ON DELETE CASCADE ON UPDATE CASCADE,
                descendant_id INTEGER NOT NULL REFERENCES categories(category_id)
                    ON DELETE CASCADE ON UPDATE CASCADE,
                depth INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (ancestor_id, descendant_id)
            )
            "#,
            &[],
        )?;

        let parent_index = Index::create()
            .if_not_exists()
            .name("idx_categories_parent_id")
            .table("categories")
            .col(Expr::col("parent_id"))
            .to_owned();
        manager.create_index(parent_index)?;

        // The ancestor side is covered by the primary key prefix; descendant
        // lookups (ancestors_of, re-link deletes) need their own index.
        let descendant_index = Index::create()
            .if_not_exists()
            .name("idx_category_closure_descendant_id")
            .table("category_closure")
            .col(Expr::col("descendant_id"))
            .to_owned();
        manager.create_index(descendant_index)?;

        Ok(())
    }

    fn down(&self, manager: &SchemaManager<'_>) -> Result<(), CanopyError> {
        // Drop in reverse order of dependencies
        let closure = Table::drop()
            .table("category_closure")
            .if_exists()
            .to_owned();
        manager.drop_table(closure)?;

        let categories = Table::drop().table("categories").if_exists().to_owned();
        manager.drop_table(categories)?;

        Ok(())
    }
}
