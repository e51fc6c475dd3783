//! Value objects - immutable, validated on construction.

mod ancestor_path;
mod names;

pub use ancestor_path::AncestorPath;
pub use names::{AttributeDescription, CategoryName};
