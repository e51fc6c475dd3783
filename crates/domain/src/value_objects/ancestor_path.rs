//! Ordered lineage of a node, from a level-0 node down to its immediate parent.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::AttributeId;

/// Ancestor path of an attribute node.
///
/// An empty path addresses the level-0 slot directly under a category. A path
/// never names the same node twice; a repeated id could only describe a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<AttributeId>", into = "Vec<AttributeId>")]
pub struct AncestorPath(Vec<AttributeId>);

impl AncestorPath {
    /// Build a path from caller-supplied ids.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Constraint` if an id appears more than once.
    pub fn new(ids: Vec<AttributeId>) -> Result<Self, DomainError> {
        for (index, id) in ids.iter().enumerate() {
            if ids[..index].contains(id) {
                return Err(DomainError::constraint(format!(
                    "Ancestor path repeats node {}",
                    id
                )));
            }
        }
        Ok(Self(ids))
    }

    /// Path that starts at `anchor` and continues through `rest`.
    ///
    /// Used to scope a sub-path to the subtree under a known node.
    pub fn anchored_at(anchor: AttributeId, rest: &[AttributeId]) -> Result<Self, DomainError> {
        let mut ids = Vec::with_capacity(rest.len() + 1);
        ids.push(anchor);
        ids.extend_from_slice(rest);
        Self::new(ids)
    }

    /// Path whose ids are already known to be distinct.
    pub(crate) fn from_distinct(ids: Vec<AttributeId>) -> Self {
        Self(ids)
    }

    /// Depth of a node whose lineage is this path.
    pub fn level(&self) -> u32 {
        u32::try_from(self.0.len()).unwrap_or(u32::MAX)
    }

    pub fn last(&self) -> Option<AttributeId> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = AttributeId> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<AttributeId>> for AncestorPath {
    type Error = DomainError;

    fn try_from(ids: Vec<AttributeId>) -> Result<Self, Self::Error> {
        Self::new(ids)
    }
}

impl From<AncestorPath> for Vec<AttributeId> {
    fn from(path: AncestorPath) -> Self {
        path.0
    }
}
