//! Durable storage of category rows.
//!
//! No business logic lives here beyond field constraints: the store never
//! touches the closure index, and callers that change tree shape must go
//! through [`crate::hierarchy::HierarchyManager`].

use crate::category::model::{Category, CategoryFields};
use crate::executor::{CanopyError, CanopyExecutor, FromRow};
use sea_query::{Order, PostgresQueryBuilder, Query};

const CATEGORY_COLUMNS: [&str; 8] = [
    "category_id",
    "category_name",
    "category_description",
    "category_image",
    "category_url",
    "parent_id",
    "created_at",
    "updated_at",
];

/// Category store over any executor (direct client or transaction).
pub struct CategoryStore<'a> {
    executor: &'a dyn CanopyExecutor,
}

impl<'a> CategoryStore<'a> {
    pub fn new(executor: &'a dyn CanopyExecutor) -> Self {
        Self { executor }
    }

    /// Insert a category row and return the generated identifier.
    pub fn insert(&self, fields: &CategoryFields) -> Result<i32, CanopyError> {
        let row = self.executor.query_one(
            "INSERT INTO categories \
             (category_name, category_description, category_image, category_url, parent_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING category_id",
            &[
                &fields.category_name,
                &fields.category_description,
                &fields.category_image,
                &fields.category_url,
                &fields.parent_id,
            ],
        )?;
        Ok(row.get(0))
    }

    /// Update all writable fields of a row, including `parent_id`.
    ///
    /// Returns `false` when the id does not reference an existing row.
    pub fn update(&self, id: i32, fields: &CategoryFields) -> Result<bool, CanopyError> {
        let affected = self.executor.execute(
            "UPDATE categories SET \
             category_name = $1, category_description = $2, category_image = $3, \
             category_url = $4, parent_id = $5, updated_at = CURRENT_TIMESTAMP \
             WHERE category_id = $6",
            &[
                &fields.category_name,
                &fields.category_description,
                &fields.category_image,
                &fields.category_url,
                &fields.parent_id,
                &id,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Delete one row. Returns `false` when the id is absent.
    pub fn delete(&self, id: i32) -> Result<bool, CanopyError> {
        let affected = self
            .executor
            .execute("DELETE FROM categories WHERE category_id = $1", &[&id])?;
        Ok(affected > 0)
    }

    /// Delete a set of rows in one statement; returns the number removed.
    pub fn delete_many(&self, ids: &[i32]) -> Result<u64, CanopyError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<i32> = ids.to_vec();
        self.executor
            .execute("DELETE FROM categories WHERE category_id = ANY($1)", &[&ids])
    }

    /// Fetch one category, or `None` when the id is absent.
    pub fn fetch(&self, id: i32) -> Result<Option<Category>, CanopyError> {
        let rows = self.executor.query_all(
            "SELECT category_id, category_name, category_description, category_image, \
             category_url, parent_id, created_at, updated_at \
             FROM categories WHERE category_id = $1",
            &[&id],
        )?;
        match rows.first() {
            Some(row) => Ok(Some(Category::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Read only the parent reference of a row.
    ///
    /// The outer `None` means the row is absent; `Some(None)` is a root.
    pub fn parent_id(&self, id: i32) -> Result<Option<Option<i32>>, CanopyError> {
        let rows = self.executor.query_all(
            "SELECT parent_id FROM categories WHERE category_id = $1",
            &[&id],
        )?;
        match rows.first() {
            Some(row) => Ok(Some(row.try_get(0).map_err(CanopyError::PostgresError)?)),
            None => Ok(None),
        }
    }

    /// Whether a row with this id exists.
    pub fn exists(&self, id: i32) -> Result<bool, CanopyError> {
        let rows = self.executor.query_all(
            "SELECT 1 FROM categories WHERE category_id = $1",
            &[&id],
        )?;
        Ok(!rows.is_empty())
    }

    /// All categories, ordered by id for stable output.
    pub fn list(&self) -> Result<Vec<Category>, CanopyError> {
        let rows = self.executor.query_all(
            "SELECT category_id, category_name, category_description, category_image, \
             category_url, parent_id, created_at, updated_at \
             FROM categories ORDER BY category_id",
            &[],
        )?;
        rows.iter()
            .map(|row| Category::from_row(row).map_err(CanopyError::PostgresError))
            .collect()
    }

    /// Total row count.
    pub fn count(&self) -> Result<i64, CanopyError> {
        let row = self
            .executor
            .query_one("SELECT COUNT(*) FROM categories", &[])?;
        Ok(row.get(0))
    }

    /// One page of categories plus the total row count.
    ///
    /// `page` is 1-based; a zero page or limit falls back to the first page of
    /// ten, matching the boundary's query-string defaults.
    pub fn page(&self, page: u64, limit: u64) -> Result<(Vec<Category>, i64), CanopyError> {
        let limit = if limit == 0 { 10 } else { limit };
        let page = if page == 0 { 1 } else { page };
        let row_count = self.count()?;
        let rows = self
            .executor
            .query_all(&page_sql(limit, (page - 1) * limit), &[])?;
        let categories = rows
            .iter()
            .map(|row| Category::from_row(row).map_err(CanopyError::PostgresError))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((categories, row_count))
    }
}

/// Build the paginated SELECT. Limit and offset are computed integers, so the
/// statement is rendered directly instead of going through bind parameters.
fn page_sql(limit: u64, offset: u64) -> String {
    Query::select()
        .columns(CATEGORY_COLUMNS)
        .from("categories")
        .order_by("category_id", Order::Asc)
        .limit(limit)
        .offset(offset)
        .to_string(PostgresQueryBuilder)
}
