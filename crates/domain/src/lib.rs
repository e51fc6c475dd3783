extern crate self as catalog_domain;

pub mod chain;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    Category, CategoryAttribute, NewCategoryAttribute, NodeCreated, NodeSummary, RootAttribute,
};

pub use chain::{PathViolation, ResolvedChain};
pub use error::DomainError;

// Re-export ID types
pub use ids::{AttributeId, CategoryId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{AncestorPath, AttributeDescription, CategoryName};
