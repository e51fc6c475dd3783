//! Ancestor path validation.
//!
//! Both functions read through the caller's transaction so the chain they
//! return is the one the caller's write will see.

use catalog_domain::{AncestorPath, AttributeId, CategoryId, PathViolation, ResolvedChain};

use crate::infrastructure::ports::TaxonomyTx;

use super::error::TaxonomyError;

/// Resolve `path` inside `category_id`.
///
/// An empty path is always valid and resolves to the level-0 slot. Otherwise
/// every element must exist in the category, the first must be a level-0 node,
/// and each element must be the parent of the next.
pub async fn validate_path(
    tx: &mut dyn TaxonomyTx,
    category_id: CategoryId,
    path: &AncestorPath,
) -> Result<ResolvedChain, TaxonomyError> {
    let mut chain = ResolvedChain::new(category_id);
    for id in path.iter() {
        let node = tx
            .get_attribute(id)
            .await?
            .ok_or(PathViolation::UnknownNode(id))?;
        chain.extend(node)?;
    }
    Ok(chain)
}

/// Resolve `sub_path` as a descendant chain of the level-0 node `root_id`.
///
/// The returned chain starts at `root_id`; its last node is the addressed
/// descendant (or `root_id` itself when `sub_path` is empty).
pub async fn resolve_descendant(
    tx: &mut dyn TaxonomyTx,
    root_id: AttributeId,
    sub_path: &[AttributeId],
) -> Result<ResolvedChain, TaxonomyError> {
    let path = AncestorPath::anchored_at(root_id, sub_path)?;

    let root = tx
        .get_attribute(root_id)
        .await?
        .ok_or(PathViolation::UnknownNode(root_id))?;

    let mut chain = ResolvedChain::new(root.category_id);
    chain.extend(root)?;
    for id in path.iter().skip(1) {
        let node = tx
            .get_attribute(id)
            .await?
            .ok_or(PathViolation::UnknownNode(id))?;
        chain.extend(node)?;
    }
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockTaxonomyTx;
    use crate::use_cases::taxonomy::test_support::attribute;

    fn ids(raw: &[i64]) -> Vec<AttributeId> {
        raw.iter().copied().map(AttributeId::from_raw).collect()
    }

    /// Tx whose `get_attribute` serves a fixed set of nodes.
    fn tx_with(nodes: Vec<catalog_domain::CategoryAttribute>) -> MockTaxonomyTx {
        let mut tx = MockTaxonomyTx::new();
        tx.expect_get_attribute().returning(move |id| {
            Ok(nodes.iter().find(|node| node.id == id).cloned())
        });
        tx
    }

    #[tokio::test]
    async fn empty_path_needs_no_lookups() {
        let mut tx = MockTaxonomyTx::new();
        tx.expect_get_attribute().never();

        let chain = validate_path(&mut tx, CategoryId::from_raw(1), &AncestorPath::default())
            .await
            .expect("empty path is valid");

        assert_eq!(chain.level(), 0);
        assert_eq!(chain.parent_id(), None);
    }

    #[tokio::test]
    async fn contiguous_path_resolves_parent_description() {
        let mut tx = tx_with(vec![
            attribute(1, 1, "Helmets", &[]),
            attribute(2, 1, "Industrial", &[1]),
        ]);
        let path = AncestorPath::new(ids(&[1, 2])).expect("path");

        let chain = validate_path(&mut tx, CategoryId::from_raw(1), &path)
            .await
            .expect("valid path");

        assert_eq!(chain.level(), 2);
        assert_eq!(chain.parent_attribute(), Some("Industrial"));
    }

    #[tokio::test]
    async fn unknown_node_is_reported() {
        let mut tx = tx_with(vec![attribute(1, 1, "Helmets", &[])]);
        let path = AncestorPath::new(ids(&[1, 7])).expect("path");

        let err = validate_path(&mut tx, CategoryId::from_raw(1), &path)
            .await
            .expect_err("unknown node");

        assert!(matches!(
            err,
            TaxonomyError::InvalidPath(PathViolation::UnknownNode(id)) if id == AttributeId::from_raw(7)
        ));
    }

    #[tokio::test]
    async fn node_from_other_category_is_reported() {
        let mut tx = tx_with(vec![attribute(1, 2, "Gloves", &[])]);
        let path = AncestorPath::new(ids(&[1])).expect("path");

        let err = validate_path(&mut tx, CategoryId::from_raw(1), &path)
            .await
            .expect_err("wrong category");

        assert!(matches!(
            err,
            TaxonomyError::InvalidPath(PathViolation::WrongCategory { .. })
        ));
    }

    #[tokio::test]
    async fn skipped_generation_is_non_contiguous() {
        let mut tx = tx_with(vec![
            attribute(1, 1, "Helmets", &[]),
            attribute(2, 1, "Industrial", &[1]),
            attribute(3, 1, "Full-face", &[1, 2]),
        ]);
        let path = AncestorPath::new(ids(&[1, 3])).expect("path");

        let err = validate_path(&mut tx, CategoryId::from_raw(1), &path)
            .await
            .expect_err("gap");

        assert!(matches!(
            err,
            TaxonomyError::InvalidPath(PathViolation::NonContiguous { .. })
        ));
    }

    #[tokio::test]
    async fn path_starting_below_level_zero_is_rejected() {
        let mut tx = tx_with(vec![
            attribute(1, 1, "Helmets", &[]),
            attribute(2, 1, "Industrial", &[1]),
        ]);
        let path = AncestorPath::new(ids(&[2])).expect("path");

        let err = validate_path(&mut tx, CategoryId::from_raw(1), &path)
            .await
            .expect_err("not anchored");

        assert!(matches!(
            err,
            TaxonomyError::InvalidPath(PathViolation::NotATreeRoot(id)) if id == AttributeId::from_raw(2)
        ));
    }

    #[tokio::test]
    async fn descendant_chain_ends_at_target() {
        let mut tx = tx_with(vec![
            attribute(1, 1, "Helmets", &[]),
            attribute(2, 1, "Industrial", &[1]),
            attribute(3, 1, "Full-face", &[1, 2]),
        ]);

        let chain = resolve_descendant(&mut tx, AttributeId::from_raw(1), &ids(&[2, 3]))
            .await
            .expect("valid sub-path");

        let target = chain.last().expect("target");
        assert_eq!(target.id, AttributeId::from_raw(3));
        assert_eq!(chain.category_id(), CategoryId::from_raw(1));
    }

    #[tokio::test]
    async fn descendant_chain_requires_existing_root() {
        let mut tx = tx_with(vec![]);

        let err = resolve_descendant(&mut tx, AttributeId::from_raw(5), &ids(&[6]))
            .await
            .expect_err("missing root");

        assert!(matches!(
            err,
            TaxonomyError::InvalidPath(PathViolation::UnknownNode(id)) if id == AttributeId::from_raw(5)
        ));
    }

    #[tokio::test]
    async fn descendant_chain_requires_level_zero_root() {
        let mut tx = tx_with(vec![
            attribute(1, 1, "Helmets", &[]),
            attribute(2, 1, "Industrial", &[1]),
        ]);

        let err = resolve_descendant(&mut tx, AttributeId::from_raw(2), &ids(&[9]))
            .await
            .expect_err("not a root");

        assert!(matches!(
            err,
            TaxonomyError::InvalidPath(PathViolation::NotATreeRoot(_))
        ));
    }

    #[tokio::test]
    async fn descendant_chain_rejects_repeated_node() {
        let mut tx = MockTaxonomyTx::new();
        tx.expect_get_attribute().never();

        let err = resolve_descendant(&mut tx, AttributeId::from_raw(1), &ids(&[1]))
            .await
            .expect_err("repeat");

        assert!(matches!(err, TaxonomyError::Validation(_)));
    }
}
