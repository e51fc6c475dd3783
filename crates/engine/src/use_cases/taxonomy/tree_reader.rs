//! Read-side queries over the attribute tree.

use std::collections::HashSet;
use std::sync::Arc;

use catalog_domain::{AttributeId, CategoryAttribute, CategoryId, NodeSummary, RootAttribute};

use crate::infrastructure::ports::TaxonomyRepo;

use super::error::TaxonomyError;

pub struct TreeReader {
    repo: Arc<dyn TaxonomyRepo>,
}

impl TreeReader {
    pub fn new(repo: Arc<dyn TaxonomyRepo>) -> Self {
        Self { repo }
    }

    /// Level-0 nodes in insertion order, optionally for one category.
    pub async fn list_roots(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<RootAttribute>, TaxonomyError> {
        let roots = self.repo.list_root_attributes(category_id).await?;
        tracing::debug!(count = roots.len(), "Listed root attributes");
        Ok(roots.iter().map(CategoryAttribute::root_summary).collect())
    }

    /// Every node below `id`, excluding `id` itself.
    ///
    /// An empty result is reported as `NotFound`, so a childless node and a
    /// missing node look the same here. Use [`TreeReader::subtree`] to tell
    /// them apart.
    pub async fn list_descendants(
        &self,
        id: AttributeId,
    ) -> Result<Vec<NodeSummary>, TaxonomyError> {
        let nodes = self.subtree(id).await?;
        if nodes.is_empty() {
            return Err(TaxonomyError::attribute_not_found(id));
        }
        Ok(nodes)
    }

    /// Every node below `id`, breadth-first by level, ties in creation order.
    ///
    /// Fails with `NotFound` only when `id` does not exist.
    pub async fn subtree(&self, id: AttributeId) -> Result<Vec<NodeSummary>, TaxonomyError> {
        let root = self
            .repo
            .get_attribute(id)
            .await?
            .ok_or_else(|| TaxonomyError::attribute_not_found(id))?;

        let mut seen = HashSet::from([root.id]);
        let mut summaries = Vec::new();
        let mut frontier = vec![root];

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for parent in &frontier {
                for child in self.repo.list_children(parent.id).await? {
                    check_link(parent, &child)?;
                    if !seen.insert(child.id) {
                        return Err(TaxonomyError::MalformedTree(format!(
                            "node {} is reachable more than once below {}",
                            child.id, id
                        )));
                    }
                    next.push(child);
                }
            }
            // Store ids are assigned in creation order.
            next.sort_by_key(|node| node.id);
            summaries.extend(next.iter().map(CategoryAttribute::summary));
            frontier = next;
        }

        tracing::debug!(attribute_id = %id, count = summaries.len(), "Walked subtree");
        Ok(summaries)
    }

    pub async fn attribute_exists(&self, id: AttributeId) -> Result<bool, TaxonomyError> {
        Ok(self.repo.get_attribute(id).await?.is_some())
    }
}

fn check_link(parent: &CategoryAttribute, child: &CategoryAttribute) -> Result<(), TaxonomyError> {
    let expected_level = parent.level.checked_add(1);
    if child.category_id != parent.category_id
        || Some(child.level) != expected_level
        || child.level != child.ancestor_path.level()
        || child.ancestor_path.last() != Some(parent.id)
    {
        return Err(TaxonomyError::MalformedTree(format!(
            "node {} (level {}) does not extend parent {} (level {})",
            child.id, child.level, parent.id, parent.level
        )));
    }
    Ok(())
}
