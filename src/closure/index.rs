//! Closure table reads and writes.
//!
//! All operations are single statements. Orchestration — when to insert
//! which rows, and inside which transaction — belongs to the hierarchy
//! manager; this type never decides on its own.

use crate::closure::entry::{DepthRow, PathStep};
use crate::executor::{CanopyError, CanopyExecutor, FromRow};

/// Closure index over any executor (direct client or transaction).
pub struct ClosureIndex<'a> {
    executor: &'a dyn CanopyExecutor,
}

impl<'a> ClosureIndex<'a> {
    pub fn new(executor: &'a dyn CanopyExecutor) -> Self {
        Self { executor }
    }

    /// Insert the mandatory `(id, id, 0)` self row.
    ///
    /// Must run exactly once per category creation; a second insertion
    /// violates the primary key and surfaces as a duplicate-entry error.
    pub fn insert_self_link(&self, id: i32) -> Result<(), CanopyError> {
        self.executor
            .execute(
                "INSERT INTO category_closure (ancestor_id, descendant_id, depth) \
                 VALUES ($1, $1, 0)",
                &[&id],
            )
            .map(|_| ())
    }

    /// Insert one closure row.
    ///
    /// A duplicate `(ancestor, descendant)` pair is an error, not a no-op:
    /// it signals a logic bug upstream, never a benign race.
    pub fn insert_path(
        &self,
        ancestor_id: i32,
        descendant_id: i32,
        depth: i32,
    ) -> Result<(), CanopyError> {
        self.executor
            .execute(
                "INSERT INTO category_closure (ancestor_id, descendant_id, depth) \
                 VALUES ($1, $2, $3)",
                &[&ancestor_id, &descendant_id, &depth],
            )
            .map(|_| ())
    }

    /// Ancestor chain of `id` including itself at depth 0, nearest-first.
    ///
    /// During creation and re-linking this is read for the *parent*, giving
    /// every ancestor the new child must link to.
    pub fn ancestor_steps(&self, id: i32) -> Result<Vec<PathStep>, CanopyError> {
        let rows = self.executor.query_all(
            "SELECT ancestor_id, depth FROM category_closure \
             WHERE descendant_id = $1 ORDER BY depth",
            &[&id],
        )?;
        rows.iter()
            .map(|row| {
                Ok(PathStep {
                    id: row.try_get(0).map_err(CanopyError::PostgresError)?,
                    depth: row.try_get(1).map_err(CanopyError::PostgresError)?,
                })
            })
            .collect()
    }

    /// Subtree of `id` including itself at depth 0, nearest-first.
    ///
    /// This is the set S of the re-parent algorithm: each member paired with
    /// its depth below the subtree root.
    pub fn descendant_steps(&self, id: i32) -> Result<Vec<PathStep>, CanopyError> {
        let rows = self.executor.query_all(
            "SELECT descendant_id, depth FROM category_closure \
             WHERE ancestor_id = $1 ORDER BY depth",
            &[&id],
        )?;
        rows.iter()
            .map(|row| {
                Ok(PathStep {
                    id: row.try_get(0).map_err(CanopyError::PostgresError)?,
                    depth: row.try_get(1).map_err(CanopyError::PostgresError)?,
                })
            })
            .collect()
    }

    /// Strip a subtree's external ancestor links.
    ///
    /// Removes every row whose descendant is in `subtree` and whose ancestor
    /// is not. Rows internal to the subtree (both endpoints in the set) are
    /// depth-invariant under re-parenting and must survive untouched.
    pub fn delete_entries_not_rooted(&self, subtree: &[i32]) -> Result<u64, CanopyError> {
        if subtree.is_empty() {
            return Ok(0);
        }
        let subtree: Vec<i32> = subtree.to_vec();
        self.executor.execute(
            "DELETE FROM category_closure \
             WHERE descendant_id = ANY($1) AND NOT (ancestor_id = ANY($1))",
            &[&subtree],
        )
    }

    /// Proper ancestors of `id` joined with category names, nearest-first.
    /// The depth-0 self row is excluded.
    pub fn ancestors_joined(&self, id: i32) -> Result<Vec<DepthRow>, CanopyError> {
        let rows = self.executor.query_all(
            "SELECT c.category_id, c.category_name, cc.depth \
             FROM category_closure cc \
             INNER JOIN categories c ON cc.ancestor_id = c.category_id \
             WHERE cc.descendant_id = $1 AND cc.ancestor_id <> $1 \
             ORDER BY cc.depth",
            &[&id],
        )?;
        rows.iter()
            .map(|row| DepthRow::from_row(row).map_err(CanopyError::PostgresError))
            .collect()
    }

    /// Proper descendants of `id` joined with category names, nearest-first.
    /// The depth-0 self row is excluded.
    pub fn descendants_joined(&self, id: i32) -> Result<Vec<DepthRow>, CanopyError> {
        let rows = self.executor.query_all(
            "SELECT c.category_id, c.category_name, cc.depth \
             FROM category_closure cc \
             INNER JOIN categories c ON cc.descendant_id = c.category_id \
             WHERE cc.ancestor_id = $1 AND cc.descendant_id <> $1 \
             ORDER BY cc.depth",
            &[&id],
        )?;
        rows.iter()
            .map(|row| DepthRow::from_row(row).map_err(CanopyError::PostgresError))
            .collect()
    }

}
