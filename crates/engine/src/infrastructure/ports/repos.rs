//! Repository port traits for the category attribute store.

use async_trait::async_trait;
use catalog_domain::*;
use chrono::{DateTime, Utc};

use super::error::RepoError;

// =============================================================================
// Pool-level access
// =============================================================================

/// Reads that need no transaction, plus the entry point for one.
///
/// Listing operations are allowed to observe intermediate states left by
/// concurrent writers; anything that validates before writing must go through
/// [`TaxonomyRepo::begin`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxonomyRepo: Send + Sync {
    /// Open a transaction. Dropping the handle without committing rolls back.
    async fn begin(&self) -> Result<Box<dyn TaxonomyTx>, RepoError>;

    // Categories
    async fn create_category(
        &self,
        name: &CategoryName,
        created_at: DateTime<Utc>,
    ) -> Result<Category, RepoError>;
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError>;

    // Attribute nodes
    async fn get_attribute(&self, id: AttributeId) -> Result<Option<CategoryAttribute>, RepoError>;
    async fn list_root_attributes(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<CategoryAttribute>, RepoError>;
    /// Immediate children ordered by creation.
    async fn list_children(&self, id: AttributeId) -> Result<Vec<CategoryAttribute>, RepoError>;
}

// =============================================================================
// Transaction-scoped access
// =============================================================================

/// Reads and writes inside one store transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxonomyTx: Send {
    async fn get_attribute(
        &mut self,
        id: AttributeId,
    ) -> Result<Option<CategoryAttribute>, RepoError>;
    async fn get_category(&mut self, id: CategoryId) -> Result<Option<Category>, RepoError>;

    /// Id of the node under `parent_id` (or at level 0 when `None`) with this description.
    async fn find_sibling(
        &mut self,
        category_id: CategoryId,
        parent_id: Option<AttributeId>,
        description: &str,
    ) -> Result<Option<AttributeId>, RepoError>;
    async fn count_children(&mut self, id: AttributeId) -> Result<u64, RepoError>;
    async fn count_attributes_in_category(&mut self, id: CategoryId) -> Result<u64, RepoError>;

    async fn insert_attribute(
        &mut self,
        attribute: &NewCategoryAttribute,
    ) -> Result<CategoryAttribute, RepoError>;
    async fn delete_attribute(&mut self, id: AttributeId) -> Result<(), RepoError>;
    async fn delete_category(&mut self, id: CategoryId) -> Result<(), RepoError>;

    async fn commit(&mut self) -> Result<(), RepoError>;
}
