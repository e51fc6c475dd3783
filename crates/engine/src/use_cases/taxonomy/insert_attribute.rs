//! Insert attribute use case.
//!
//! Adds one node under a validated ancestor path.

use std::sync::Arc;

use catalog_domain::{
    AncestorPath, AttributeDescription, AttributeId, CategoryId, NewCategoryAttribute,
    NodeCreated, PathViolation, ResolvedChain,
};

use crate::infrastructure::ports::{ClockPort, RepoError, TaxonomyRepo};

use super::error::TaxonomyError;
use super::path_validator::validate_path;

/// Insert attribute use case.
///
/// Orchestrates: path validation, sibling uniqueness, category existence, write.
pub struct InsertAttribute {
    repo: Arc<dyn TaxonomyRepo>,
    clock: Arc<dyn ClockPort>,
}

impl InsertAttribute {
    pub fn new(repo: Arc<dyn TaxonomyRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    /// Execute the insert attribute use case.
    ///
    /// # Arguments
    /// * `category_id` - The category that owns the tree
    /// * `description` - Label of the new node
    /// * `ancestor_path` - Ids from a level-0 node down to the new node's parent;
    ///   empty to insert at level 0
    ///
    /// # Returns
    /// * `Ok(NodeCreated)` - Node committed
    /// * `Err(TaxonomyError)` - `InvalidPath`, `DuplicateSibling`, `UnknownCategory`,
    ///   or a store failure. Nothing is written on error.
    pub async fn execute(
        &self,
        category_id: CategoryId,
        description: String,
        ancestor_path: Vec<AttributeId>,
    ) -> Result<NodeCreated, TaxonomyError> {
        let description = AttributeDescription::new(description)?;
        let path = AncestorPath::new(ancestor_path)?;

        let mut tx = self.repo.begin().await?;

        let chain = validate_path(&mut *tx, category_id, &path).await?;

        if tx
            .find_sibling(category_id, chain.parent_id(), description.as_str())
            .await?
            .is_some()
        {
            tracing::warn!(
                category_id = %category_id,
                description = %description,
                "Rejected insert: sibling with same description exists"
            );
            return Err(TaxonomyError::DuplicateSibling {
                description: description.into(),
            });
        }

        if tx.get_category(category_id).await?.is_none() {
            return Err(TaxonomyError::UnknownCategory(category_id));
        }

        let new = NewCategoryAttribute::under(&chain, description, self.clock.now());
        let node = tx
            .insert_attribute(&new)
            .await
            .map_err(|e| write_conflict(e, &chain, &new))?;
        tx.commit()
            .await
            .map_err(|e| write_conflict(e, &chain, &new))?;

        tracing::info!(
            attribute_id = %node.id,
            category_id = %node.category_id,
            level = node.level,
            "Inserted category attribute"
        );
        Ok(NodeCreated::from(&node))
    }
}

/// Constraint failures that slipped past the checks above lost a race with a
/// concurrent writer; report them as the business conflict they stand for.
fn write_conflict(
    err: RepoError,
    chain: &ResolvedChain,
    new: &NewCategoryAttribute,
) -> TaxonomyError {
    match err {
        RepoError::UniqueViolation(_) => TaxonomyError::DuplicateSibling {
            description: new.description.as_str().to_string(),
        },
        RepoError::ForeignKeyViolation(_) => match chain.parent_id() {
            Some(parent) => PathViolation::UnknownNode(parent).into(),
            None => TaxonomyError::UnknownCategory(new.category_id),
        },
        other => other.into(),
    }
}
