//! The hierarchy subsystem: the only place where category rows and closure
//! rows are mutated together.
//!
//! [`manager`] carries the transactional create/re-parent/delete algorithms;
//! [`tree`] is the pure map-then-link assembly of the nested tree.

pub mod manager;
pub mod tree;

pub use manager::HierarchyManager;
pub use tree::{build_tree, TreeNode};
