//! Category attribute entity - one node in a category's classification tree
//!
//! Nodes are never updated in place. Renaming or moving a node is a delete
//! followed by an insert, so every field here is fixed at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_domain::{AttributeId, CategoryId};

use crate::chain::ResolvedChain;
use crate::value_objects::{AncestorPath, AttributeDescription};

/// A stored attribute node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAttribute {
    pub id: AttributeId,
    pub category_id: CategoryId,
    /// Immediate parent; `None` at level 0
    pub parent_id: Option<AttributeId>,
    pub description: String,
    /// Always `ancestor_path.level()`
    pub level: u32,
    pub ancestor_path: AncestorPath,
    /// Description of the immediate parent; `None` at level 0
    pub parent_attribute: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CategoryAttribute {
    /// Listing shape used when walking a subtree.
    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            id: self.id,
            description: self.description.clone(),
            level: self.level,
            parent_attribute: self.parent_attribute.clone(),
        }
    }

    /// Listing shape used for level-0 nodes.
    pub fn root_summary(&self) -> RootAttribute {
        RootAttribute {
            id: self.id,
            category_id: self.category_id,
            description: self.description.clone(),
        }
    }
}

/// A node that has passed path validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategoryAttribute {
    pub category_id: CategoryId,
    pub parent_id: Option<AttributeId>,
    pub description: AttributeDescription,
    pub level: u32,
    pub ancestor_path: AncestorPath,
    pub parent_attribute: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewCategoryAttribute {
    /// Derive the structural fields of a new node from its validated lineage.
    pub fn under(
        chain: &ResolvedChain,
        description: AttributeDescription,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            category_id: chain.category_id(),
            parent_id: chain.parent_id(),
            description,
            level: chain.level(),
            ancestor_path: chain.path(),
            parent_attribute: chain.parent_attribute().map(str::to_string),
            created_at,
        }
    }
}

/// One entry of a descendant listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: AttributeId,
    pub description: String,
    pub level: u32,
    pub parent_attribute: Option<String>,
}

/// One entry of the level-0 listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootAttribute {
    pub id: AttributeId,
    pub category_id: CategoryId,
    pub description: String,
}

/// Result of a successful insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCreated {
    pub id: AttributeId,
    pub category_id: CategoryId,
    pub description: String,
    pub level: u32,
    pub parent_attribute: Option<String>,
}

impl From<&CategoryAttribute> for NodeCreated {
    fn from(node: &CategoryAttribute) -> Self {
        Self {
            id: node.id,
            category_id: node.category_id,
            description: node.description.clone(),
            level: node.level,
            parent_attribute: node.parent_attribute.clone(),
        }
    }
}
