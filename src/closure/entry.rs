//! Row types read out of the closure table.

use crate::executor::FromRow;
use may_postgres::{Error as PostgresError, Row};
use serde::Serialize;

/// One raw closure row: `ancestor_id` reaches `descendant_id` in `depth`
/// parent edges. Depth 0 rows are the self links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClosureEntry {
    pub ancestor_id: i32,
    pub descendant_id: i32,
    pub depth: i32,
}

impl FromRow for ClosureEntry {
    fn from_row(row: &Row) -> Result<Self, PostgresError> {
        Ok(Self {
            ancestor_id: row.try_get("ancestor_id")?,
            descendant_id: row.try_get("descendant_id")?,
            depth: row.try_get("depth")?,
        })
    }
}

/// One step on a path: a category id at a given depth from the query anchor.
///
/// Produced by the ancestor/descendant step reads that drive re-linking;
/// the anchor itself appears at depth 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub id: i32,
    pub depth: i32,
}

/// Boundary projection for ancestor/descendant reads: the related category
/// joined with its distance, nearest-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepthRow {
    pub category_id: i32,
    pub category_name: String,
    pub depth: i32,
}

impl FromRow for DepthRow {
    fn from_row(row: &Row) -> Result<Self, PostgresError> {
        Ok(Self {
            category_id: row.try_get("category_id")?,
            category_name: row.try_get("category_name")?,
            depth: row.try_get("depth")?,
        })
    }
}
