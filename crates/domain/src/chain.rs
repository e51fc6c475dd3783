//! Ancestor chain resolution rules.
//!
//! A `ResolvedChain` is built one stored node at a time. Each step checks the
//! node against the chain so far, so a chain that exists is always well formed:
//! every node shares the chain's category, the first node sits at level 0, and
//! each later node is a direct child of the one before it.

use thiserror::Error;

use catalog_domain::{AttributeId, CategoryId};

use crate::entities::CategoryAttribute;
use crate::value_objects::AncestorPath;

/// Why an ancestor path was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathViolation {
    #[error("unknown node {0}")]
    UnknownNode(AttributeId),

    #[error("node {node} belongs to category {actual}, not {expected}")]
    WrongCategory {
        node: AttributeId,
        expected: CategoryId,
        actual: CategoryId,
    },

    #[error("non-contiguous ancestry: node {node} is not a child of {expected_parent}")]
    NonContiguous {
        node: AttributeId,
        expected_parent: AttributeId,
    },

    #[error("node {0} is not a tree root for this operation")]
    NotATreeRoot(AttributeId),
}

/// A validated ancestor chain, outermost node first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChain {
    category_id: CategoryId,
    nodes: Vec<CategoryAttribute>,
}

impl ResolvedChain {
    /// An empty chain; denotes the level-0 slot of `category_id`.
    pub fn new(category_id: CategoryId) -> Self {
        Self {
            category_id,
            nodes: Vec::new(),
        }
    }

    /// Append the next stored node of the path.
    pub fn extend(&mut self, node: CategoryAttribute) -> Result<(), PathViolation> {
        if node.category_id != self.category_id {
            return Err(PathViolation::WrongCategory {
                node: node.id,
                expected: self.category_id,
                actual: node.category_id,
            });
        }

        match self.nodes.last() {
            None if node.parent_id.is_some() => {
                return Err(PathViolation::NotATreeRoot(node.id));
            }
            Some(previous) if node.parent_id != Some(previous.id) => {
                return Err(PathViolation::NonContiguous {
                    node: node.id,
                    expected_parent: previous.id,
                });
            }
            _ => {}
        }

        self.nodes.push(node);
        Ok(())
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Last node of the chain: the parent of an insert, the target of a delete.
    pub fn last(&self) -> Option<&CategoryAttribute> {
        self.nodes.last()
    }

    pub fn parent_id(&self) -> Option<AttributeId> {
        self.last().map(|node| node.id)
    }

    pub fn parent_attribute(&self) -> Option<&str> {
        self.last().map(|node| node.description.as_str())
    }

    pub fn level(&self) -> u32 {
        u32::try_from(self.nodes.len()).unwrap_or(u32::MAX)
    }

    /// The chain as an ancestor path.
    pub fn path(&self) -> AncestorPath {
        // Contiguous parent links cannot repeat a node.
        AncestorPath::from_distinct(self.nodes.iter().map(|node| node.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn node(id: i64, category: i64, parent: Option<i64>) -> CategoryAttribute {
        CategoryAttribute {
            id: AttributeId::from_raw(id),
            category_id: CategoryId::from_raw(category),
            parent_id: parent.map(AttributeId::from_raw),
            description: format!("node-{}", id),
            level: u32::from(parent.is_some()),
            ancestor_path: AncestorPath::new(parent.into_iter().map(AttributeId::from_raw).collect())
                .expect("valid path"),
            parent_attribute: parent.map(|p| format!("node-{}", p)),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn empty_chain_addresses_level_zero() {
        let chain = ResolvedChain::new(CategoryId::from_raw(1));
        assert_eq!(chain.level(), 0);
        assert_eq!(chain.parent_id(), None);
        assert_eq!(chain.parent_attribute(), None);
        assert_eq!(chain.path(), AncestorPath::default());
    }

    #[test]
    fn contiguous_chain_resolves_parent() {
        let mut chain = ResolvedChain::new(CategoryId::from_raw(1));
        chain.extend(node(1, 1, None)).expect("root");
        chain.extend(node(2, 1, Some(1))).expect("child");

        assert_eq!(chain.level(), 2);
        assert_eq!(chain.parent_id(), Some(AttributeId::from_raw(2)));
        assert_eq!(chain.parent_attribute(), Some("node-2"));
        assert_eq!(chain.path().level(), chain.level());
        assert_eq!(
            chain.path().iter().collect::<Vec<_>>(),
            vec![AttributeId::from_raw(1), AttributeId::from_raw(2)]
        );
    }

    #[test]
    fn node_from_other_category_is_rejected() {
        let mut chain = ResolvedChain::new(CategoryId::from_raw(1));
        let err = chain.extend(node(1, 2, None)).expect_err("wrong category");
        assert_eq!(
            err,
            PathViolation::WrongCategory {
                node: AttributeId::from_raw(1),
                expected: CategoryId::from_raw(1),
                actual: CategoryId::from_raw(2),
            }
        );
    }

    #[test]
    fn path_must_start_at_level_zero() {
        let mut chain = ResolvedChain::new(CategoryId::from_raw(1));
        let err = chain.extend(node(2, 1, Some(1))).expect_err("not a root");
        assert_eq!(err, PathViolation::NotATreeRoot(AttributeId::from_raw(2)));
    }

    #[test]
    fn gap_in_ancestry_is_rejected() {
        let mut chain = ResolvedChain::new(CategoryId::from_raw(1));
        chain.extend(node(1, 1, None)).expect("root");
        let err = chain.extend(node(3, 1, Some(2))).expect_err("gap");
        assert_eq!(
            err,
            PathViolation::NonContiguous {
                node: AttributeId::from_raw(3),
                expected_parent: AttributeId::from_raw(1),
            }
        );
        assert_eq!(chain.level(), 1);
    }

    #[test]
    fn violation_messages_name_the_node() {
        let err = PathViolation::UnknownNode(AttributeId::from_raw(99));
        assert_eq!(err.to_string(), "unknown node 99");
    }
}
