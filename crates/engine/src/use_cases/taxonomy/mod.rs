//! Category attribute hierarchy use cases.
//!
//! Writes go through a store transaction so that path validation, sibling
//! checks, and the write itself see one consistent snapshot.

use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, TaxonomyRepo};

mod categories;
mod delete_attribute;
mod error;
mod insert_attribute;
mod path_validator;
mod tree_reader;

#[cfg(test)]
mod test_support;

pub use categories::CategoryOps;
pub use delete_attribute::DeleteAttribute;
pub use error::{ErrorKind, TaxonomyError};
pub use insert_attribute::InsertAttribute;
pub use path_validator::{resolve_descendant, validate_path};
pub use tree_reader::TreeReader;

/// Container for taxonomy use cases.
pub struct TaxonomyUseCases {
    pub insert_attribute: Arc<InsertAttribute>,
    pub delete_attribute: Arc<DeleteAttribute>,
    pub reader: Arc<TreeReader>,
    pub categories: Arc<CategoryOps>,
}

impl TaxonomyUseCases {
    pub fn new(repo: Arc<dyn TaxonomyRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            insert_attribute: Arc::new(InsertAttribute::new(repo.clone(), clock.clone())),
            delete_attribute: Arc::new(DeleteAttribute::new(repo.clone())),
            reader: Arc::new(TreeReader::new(repo.clone())),
            categories: Arc::new(CategoryOps::new(repo, clock)),
        }
    }
}
