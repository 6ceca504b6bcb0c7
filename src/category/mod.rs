//! Category persistence: the adjacency side of the hierarchy.
//!
//! [`model`] holds the row types and write payload; [`store`] is the durable
//! storage unit. Tree-shape orchestration lives in
//! [`crate::hierarchy`] — nothing here decides when closure rows change.

pub mod model;
pub mod store;

pub use model::{Category, CategoryFields, CategoryRow};
pub use store::CategoryStore;
