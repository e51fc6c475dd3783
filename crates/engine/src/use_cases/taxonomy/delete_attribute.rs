//! Delete attribute use case.
//!
//! Removes one childless node, addressed either directly or through a
//! sub-path below a level-0 node.

use std::sync::Arc;

use catalog_domain::{AttributeId, CategoryAttribute};

use crate::infrastructure::ports::{RepoError, TaxonomyRepo};

use super::error::TaxonomyError;
use super::path_validator::resolve_descendant;

pub struct DeleteAttribute {
    repo: Arc<dyn TaxonomyRepo>,
}

impl DeleteAttribute {
    pub fn new(repo: Arc<dyn TaxonomyRepo>) -> Self {
        Self { repo }
    }

    /// Delete a node that has no children.
    ///
    /// With an empty `sub_path` the target is `id` itself. Otherwise `id` must
    /// be a level-0 node and `sub_path` its descendant chain; the target is the
    /// last element of that chain.
    ///
    /// Returns the deleted node.
    pub async fn execute(
        &self,
        id: AttributeId,
        sub_path: Vec<AttributeId>,
    ) -> Result<CategoryAttribute, TaxonomyError> {
        let mut tx = self.repo.begin().await?;

        let target = if sub_path.is_empty() {
            tx.get_attribute(id)
                .await?
                .ok_or_else(|| TaxonomyError::attribute_not_found(id))?
        } else {
            resolve_descendant(&mut *tx, id, &sub_path)
                .await?
                .last()
                .cloned()
                .ok_or_else(|| TaxonomyError::attribute_not_found(id))?
        };

        // Checked here rather than left to the store's RESTRICT so the caller
        // gets the business rule, not a constraint name.
        let children = tx.count_children(target.id).await?;
        if children > 0 {
            tracing::warn!(
                attribute_id = %target.id,
                children,
                "Rejected delete: attribute has children"
            );
            return Err(TaxonomyError::HasChildren(target.id));
        }

        let target_id = target.id;
        let delete_conflict = |e: RepoError| match e {
            RepoError::ForeignKeyViolation(_) => TaxonomyError::HasChildren(target_id),
            RepoError::NotFound { .. } => TaxonomyError::attribute_not_found(target_id),
            other => other.into(),
        };
        tx.delete_attribute(target_id).await.map_err(delete_conflict)?;
        tx.commit().await.map_err(delete_conflict)?;

        tracing::info!(
            attribute_id = %target.id,
            category_id = %target.category_id,
            "Deleted category attribute"
        );
        Ok(target)
    }
}
