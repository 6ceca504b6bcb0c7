//! Boundary models for the REST presentation layer.
//!
//! The HTTP service itself lives outside this crate; what is fixed here is
//! the wire contract it consumes: request payload shape, response envelopes,
//! and the mapping from the error taxonomy to transport status codes.

use crate::category::model::{Category, CategoryRow};
use crate::error::CatalogError;
use serde::Serialize;

pub use crate::category::model::CategoryFields as CategoryPayload;

/// Paginated result envelope: `{ "rows": [...], "rowCount": n }`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    #[serde(rename = "rowCount")]
    pub row_count: i64,
}

impl From<(Vec<Category>, i64)> for Page<CategoryRow> {
    fn from((categories, row_count): (Vec<Category>, i64)) -> Self {
        Self {
            rows: categories.into_iter().map(CategoryRow::from).collect(),
            row_count,
        }
    }
}

/// Plain message envelope: `{ "message": "..." }`.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Map a catalog error to the HTTP status the presentation layer responds
/// with. Missing targets and parents are 404; constraint and shape
/// violations are 400; anything else is a 500.
pub fn http_status(err: &CatalogError) -> u16 {
    match err {
        CatalogError::NotFound | CatalogError::ParentNotFound(_) => 404,
        CatalogError::DuplicateEntry(_)
        | CatalogError::ReferentialIntegrity(_)
        | CatalogError::HierarchyCycle { .. } => 400,
        CatalogError::Database(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CanopyError;
    use chrono::NaiveDate;

    fn sample_category(id: i32) -> Category {
        let stamp = NaiveDate::from_ymd_opt(2025, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Category {
            category_id: id,
            category_name: format!("cat-{id}"),
            category_description: None,
            category_image: None,
            category_url: None,
            parent_id: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_page_serializes_row_count_camel_case() {
        let page = Page::from((vec![sample_category(1), sample_category(2)], 17));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["rowCount"], 17);
        assert_eq!(json["rows"].as_array().unwrap().len(), 2);
        assert_eq!(json["rows"][0]["id"], 1);
    }

    #[test]
    fn test_message_envelope() {
        let json = serde_json::to_value(Message::new("Category created successfully!")).unwrap();
        assert_eq!(json["message"], "Category created successfully!");
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(http_status(&CatalogError::NotFound), 404);
        assert_eq!(http_status(&CatalogError::ParentNotFound(3)), 404);
        assert_eq!(
            http_status(&CatalogError::DuplicateEntry("dup".to_string())),
            400
        );
        assert_eq!(
            http_status(&CatalogError::ReferentialIntegrity("fk".to_string())),
            400
        );
        assert_eq!(
            http_status(&CatalogError::HierarchyCycle { id: 1, parent_id: 2 }),
            400
        );
        assert_eq!(
            http_status(&CatalogError::Database(CanopyError::Other("x".to_string()))),
            500
        );
    }
}
