//! The hierarchy manager: transactional mutation of the category store and
//! closure index together.
//!
//! This is the only component allowed to write the closure table. Every
//! mutating operation runs inside one [`Transaction`]; a failure at any step
//! rolls the whole operation back, so the adjacency list and the closure
//! never diverge outside an in-flight transaction.

use crate::category::model::{Category, CategoryFields};
use crate::category::store::CategoryStore;
use crate::closure::entry::DepthRow;
use crate::closure::index::ClosureIndex;
use crate::config::DatabaseConfig;
use crate::connection::{connect, ConnectionError};
use crate::error::{CatalogError, CatalogResult};
use crate::executor::MayPostgresExecutor;
use crate::hierarchy::tree::{build_tree, TreeNode};
use crate::transaction::Transaction;

/// Hierarchy manager owning the injected database handle.
///
/// # Examples
///
/// ```no_run
/// use canopy::{CategoryFields, DatabaseConfig, HierarchyManager};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig::load()?;
/// let manager = HierarchyManager::connect(&config)?;
///
/// let shoes = manager.create(&CategoryFields::named("Shoes"))?;
/// let boots = manager.create(&CategoryFields::named("Boots").under(Some(shoes)))?;
///
/// let descendants = manager.descendants(shoes)?;
/// assert_eq!(descendants[0].category_id, boots);
/// # Ok(())
/// # }
/// ```
pub struct HierarchyManager {
    executor: MayPostgresExecutor,
}

impl HierarchyManager {
    /// Build a manager over an already-connected executor.
    pub fn new(executor: MayPostgresExecutor) -> Self {
        Self { executor }
    }

    /// Connect using the configured database URL.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, ConnectionError> {
        let client = connect(&config.url)?;
        Ok(Self::new(MayPostgresExecutor::new(client)))
    }

    /// The underlying executor, for callers that need raw statements
    /// (migrations, test setup).
    pub fn executor(&self) -> &MayPostgresExecutor {
        &self.executor
    }

    /// Create a category, linking it into the closure index.
    ///
    /// Steps, all inside one transaction: insert the row, insert the
    /// `(id, id, 0)` self link, then link every ancestor of the parent
    /// (parent included at depth 0) to the new id at `depth + 1`.
    ///
    /// # Errors
    ///
    /// `ParentNotFound` when `fields.parent_id` names no existing category;
    /// detected before any write.
    pub fn create(&self, fields: &CategoryFields) -> CatalogResult<i32> {
        if let Some(parent_id) = fields.parent_id {
            if !CategoryStore::new(&self.executor).exists(parent_id)? {
                return Err(CatalogError::ParentNotFound(parent_id));
            }
        }

        let txn = self.executor.begin()?;
        match Self::create_in(&txn, fields) {
            Ok(id) => {
                txn.commit()?;
                Ok(id)
            }
            Err(err) => {
                // Rollback failure is secondary; the original error wins.
                let _ = txn.rollback();
                log::error!("category create rolled back: {err}");
                Err(err)
            }
        }
    }

    fn create_in(txn: &Transaction, fields: &CategoryFields) -> CatalogResult<i32> {
        let store = CategoryStore::new(txn);
        let closure = ClosureIndex::new(txn);

        let id = store.insert(fields)?;
        closure.insert_self_link(id)?;

        if let Some(parent_id) = fields.parent_id {
            for step in closure.ancestor_steps(parent_id)? {
                closure.insert_path(step.id, id, step.depth + 1)?;
            }
        }
        Ok(id)
    }

    /// Update a category's fields, re-linking its subtree when the parent
    /// changes.
    ///
    /// A same-parent update is a pure field edit and leaves the closure
    /// untouched. A re-parent carries the whole subtree: rows internal to the
    /// subtree are depth-invariant and preserved; only the subtree's external
    /// ancestor links are deleted and rebuilt against the new parent's chain.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is absent, `ParentNotFound` when the new parent
    /// does not exist, `HierarchyCycle` when the new parent lies inside the
    /// subtree being moved. All three are detected before any write.
    pub fn update(&self, id: i32, fields: &CategoryFields) -> CatalogResult<()> {
        let store = CategoryStore::new(&self.executor);
        let old_parent = store.parent_id(id)?.ok_or(CatalogError::NotFound)?;

        if let Some(parent_id) = fields.parent_id {
            if !store.exists(parent_id)? {
                return Err(CatalogError::ParentNotFound(parent_id));
            }
        }

        let reparenting = fields.parent_id != old_parent;
        if reparenting {
            if let Some(parent_id) = fields.parent_id {
                let closure = ClosureIndex::new(&self.executor);
                let inside = closure
                    .descendant_steps(id)?
                    .iter()
                    .any(|step| step.id == parent_id);
                if inside {
                    return Err(CatalogError::HierarchyCycle {
                        id,
                        parent_id,
                    });
                }
            }
        }

        let txn = self.executor.begin()?;
        match Self::update_in(&txn, id, fields, reparenting) {
            Ok(()) => {
                txn.commit()?;
                Ok(())
            }
            Err(err) => {
                let _ = txn.rollback();
                log::error!("category {id} update rolled back: {err}");
                Err(err)
            }
        }
    }

    fn update_in(
        txn: &Transaction,
        id: i32,
        fields: &CategoryFields,
        reparenting: bool,
    ) -> CatalogResult<()> {
        let store = CategoryStore::new(txn);
        let closure = ClosureIndex::new(txn);

        if !store.update(id, fields)? {
            return Err(CatalogError::NotFound);
        }
        if !reparenting {
            return Ok(());
        }

        // S: the subtree rooted at id, each member with its depth below id.
        let subtree = closure.descendant_steps(id)?;
        let member_ids: Vec<i32> = subtree.iter().map(|step| step.id).collect();

        closure.delete_entries_not_rooted(&member_ids)?;

        if let Some(parent_id) = fields.parent_id {
            for ancestor in closure.ancestor_steps(parent_id)? {
                for member in &subtree {
                    closure.insert_path(
                        ancestor.id,
                        member.id,
                        ancestor.depth + 1 + member.depth,
                    )?;
                }
            }
        }
        // A null parent makes the subtree a new root: no external links.
        Ok(())
    }

    /// Delete a category and its entire subtree.
    ///
    /// The descendant set is collected from the closure index and the
    /// category rows removed in one statement; closure rows follow through
    /// the declared `ON DELETE CASCADE` actions. Returns the number of
    /// categories removed.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is absent.
    pub fn delete(&self, id: i32) -> CatalogResult<u64> {
        if !CategoryStore::new(&self.executor).exists(id)? {
            return Err(CatalogError::NotFound);
        }

        let txn = self.executor.begin()?;
        match Self::delete_in(&txn, id) {
            Ok(removed) => {
                txn.commit()?;
                Ok(removed)
            }
            Err(err) => {
                let _ = txn.rollback();
                log::error!("category {id} delete rolled back: {err}");
                Err(err)
            }
        }
    }

    fn delete_in(txn: &Transaction, id: i32) -> CatalogResult<u64> {
        let store = CategoryStore::new(txn);
        let closure = ClosureIndex::new(txn);

        let subtree: Vec<i32> = closure
            .descendant_steps(id)?
            .iter()
            .map(|step| step.id)
            .collect();
        Ok(store.delete_many(&subtree)?)
    }

    /// Fetch one category.
    pub fn get(&self, id: i32) -> CatalogResult<Category> {
        CategoryStore::new(&self.executor)
            .fetch(id)?
            .ok_or(CatalogError::NotFound)
    }

    /// All categories, flat, ordered by id.
    pub fn list(&self) -> CatalogResult<Vec<Category>> {
        Ok(CategoryStore::new(&self.executor).list()?)
    }

    /// One page of categories plus the total row count. `page` is 1-based.
    pub fn page(&self, page: u64, limit: u64) -> CatalogResult<(Vec<Category>, i64)> {
        Ok(CategoryStore::new(&self.executor).page(page, limit)?)
    }

    /// The full nested tree, roots at top level, children ordered by id.
    pub fn tree(&self) -> CatalogResult<Vec<TreeNode>> {
        let rows = CategoryStore::new(&self.executor).list()?;
        Ok(build_tree(rows))
    }

    /// Proper ancestors of `id`, nearest-first with depth.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is absent.
    pub fn ancestors(&self, id: i32) -> CatalogResult<Vec<DepthRow>> {
        if !CategoryStore::new(&self.executor).exists(id)? {
            return Err(CatalogError::NotFound);
        }
        Ok(ClosureIndex::new(&self.executor).ancestors_joined(id)?)
    }

    /// Proper descendants of `id`, nearest-first with depth.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is absent.
    pub fn descendants(&self, id: i32) -> CatalogResult<Vec<DepthRow>> {
        if !CategoryStore::new(&self.executor).exists(id)? {
            return Err(CatalogError::NotFound);
        }
        Ok(ClosureIndex::new(&self.executor).descendants_joined(id)?)
    }
}
