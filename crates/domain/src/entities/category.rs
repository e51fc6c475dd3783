//! Category entity - the root of one classification tree
//!
//! A category (e.g. "Safety Helmets") owns every attribute node whose
//! `category_id` points at it. It can only be removed once that tree is empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_domain::CategoryId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Unique across all categories
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at,
        }
    }
}
