//! Fixtures shared by the taxonomy use case tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use catalog_domain::{AncestorPath, AttributeId, CategoryAttribute, CategoryId};

use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::ports::ClockPort;

pub fn fixed_clock() -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(Utc.timestamp_opt(1_700_000_000, 0).unwrap()))
}

/// A stored node whose lineage is `path` (ids of level-0 node down to parent).
///
/// The parent's description is not known here, so `parent_attribute` is
/// `"node-<parent id>"`.
pub fn attribute(id: i64, category: i64, description: &str, path: &[i64]) -> CategoryAttribute {
    let ancestor_path =
        AncestorPath::new(path.iter().copied().map(AttributeId::from_raw).collect())
            .expect("fixture path");
    CategoryAttribute {
        id: AttributeId::from_raw(id),
        category_id: CategoryId::from_raw(category),
        parent_id: ancestor_path.last(),
        description: description.to_string(),
        level: ancestor_path.level(),
        parent_attribute: ancestor_path.last().map(|p| format!("node-{}", p)),
        ancestor_path,
        created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}
