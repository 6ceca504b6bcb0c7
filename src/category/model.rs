//! Category row types and the write payload.

use crate::executor::FromRow;
use chrono::NaiveDateTime;
use may_postgres::{Error as PostgresError, Row};
use serde::{Deserialize, Serialize};

/// A persisted category row.
///
/// Serializes with the wire field names consumed by the admin client
/// (`category_id`, `category_name`, ..., `parent_id`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub category_id: i32,
    pub category_name: String,
    pub category_description: Option<String>,
    pub category_image: Option<String>,
    pub category_url: Option<String>,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromRow for Category {
    fn from_row(row: &Row) -> Result<Self, PostgresError> {
        Ok(Self {
            category_id: row.try_get("category_id")?,
            category_name: row.try_get("category_name")?,
            category_description: row.try_get("category_description")?,
            category_image: row.try_get("category_image")?,
            category_url: row.try_get("category_url")?,
            parent_id: row.try_get("parent_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Write payload for create/update operations.
///
/// Mirrors the request body shape:
/// `{category_name, category_description?, category_image?, category_url?, parent_id?}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFields {
    pub category_name: String,
    #[serde(default)]
    pub category_description: Option<String>,
    #[serde(default)]
    pub category_image: Option<String>,
    #[serde(default)]
    pub category_url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

impl CategoryFields {
    /// Payload with only a name set; the usual starting point in tests.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            category_name: name.into(),
            ..Self::default()
        }
    }

    /// Same payload re-parented under `parent_id` (`None` makes it a root).
    pub fn under(mut self, parent_id: Option<i32>) -> Self {
        self.parent_id = parent_id;
        self
    }
}

/// Table-UI projection of a category.
///
/// Generic table widgets key rows on `id`, so this projection carries `id`
/// as an alias of `category_id` alongside the domain fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category_id: i32,
    pub category_name: String,
    pub category_description: Option<String>,
    pub category_image: Option<String>,
    pub category_url: Option<String>,
    pub parent_id: Option<i32>,
    pub id: i32,
}

impl From<Category> for CategoryRow {
    fn from(category: Category) -> Self {
        Self {
            id: category.category_id,
            category_id: category.category_id,
            category_name: category.category_name,
            category_description: category.category_description,
            category_image: category.category_image,
            category_url: category.category_url,
            parent_id: category.parent_id,
        }
    }
}
