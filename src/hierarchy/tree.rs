//! Nested tree assembly from the flat adjacency list.
//!
//! One pass groups rows by parent, a second links each group under its
//! parent node: O(n) in the number of categories. Children are ordered by
//! `category_id` so repeated assemblies of the same rows are structurally
//! identical.

use crate::category::model::Category;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A category with its nested children. Roots have `parent_id` null (or a
/// dangling parent; see [`build_tree`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<TreeNode>,
}

/// Assemble the nested tree from a flat category list.
///
/// Rows whose `parent_id` does not reference a row in the input (stale data,
/// partial exports) are promoted to roots rather than dropped, matching the
/// tolerance of the map-then-link pass over a live table.
pub fn build_tree(mut rows: Vec<Category>) -> Vec<TreeNode> {
    rows.sort_by_key(|c| c.category_id);

    let ids: HashSet<i32> = rows.iter().map(|c| c.category_id).collect();
    let mut by_parent: HashMap<Option<i32>, Vec<Category>> = HashMap::new();
    for category in rows {
        let key = match category.parent_id {
            Some(p) if p != category.category_id && ids.contains(&p) => Some(p),
            _ => None,
        };
        by_parent.entry(key).or_default().push(category);
    }

    attach(None, &mut by_parent)
}

fn attach(
    parent: Option<i32>,
    by_parent: &mut HashMap<Option<i32>, Vec<Category>>,
) -> Vec<TreeNode> {
    let Some(categories) = by_parent.remove(&parent) else {
        return Vec::new();
    };
    categories
        .into_iter()
        .map(|category| {
            let children = attach(Some(category.category_id), by_parent);
            TreeNode { category, children }
        })
        .collect()
}
