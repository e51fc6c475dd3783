//! Category tree operation errors.

use catalog_domain::{AttributeId, CategoryId, DomainError, PathViolation};

use crate::infrastructure::ports::RepoError;

/// Coarse classification for callers that map failures to a response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or path; retrying the same request fails the same way.
    Validation,
    /// Request collides with current state (duplicates, dependents).
    Conflict,
    NotFound,
    /// Store unavailable, transaction aborted, or stored data inconsistent.
    Infrastructure,
}

/// Errors that can occur during category tree operations.
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathViolation),
    #[error("An attribute named '{description}' already exists under this parent")]
    DuplicateSibling { description: String },
    #[error("Category not found: {0}")]
    UnknownCategory(CategoryId),
    #[error("A category named '{0}' already exists")]
    DuplicateName(String),
    #[error("Cannot delete attribute {0}: it has existing children")]
    HasChildren(AttributeId),
    #[error("Cannot delete category {0}: attributes still belong to it")]
    HasDependents(CategoryId),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Malformed tree: {0}")]
    MalformedTree(String),
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl TaxonomyError {
    pub fn attribute_not_found(id: AttributeId) -> Self {
        Self::NotFound {
            entity_type: "CategoryAttribute",
            id: id.to_string(),
        }
    }

    pub fn category_not_found(id: CategoryId) -> Self {
        Self::NotFound {
            entity_type: "Category",
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPath(_) | Self::Validation(_) => ErrorKind::Validation,
            Self::DuplicateSibling { .. }
            | Self::DuplicateName(_)
            | Self::HasChildren(_)
            | Self::HasDependents(_) => ErrorKind::Conflict,
            Self::NotFound { .. } | Self::UnknownCategory(_) => ErrorKind::NotFound,
            Self::Repo(RepoError::NotFound { .. }) => ErrorKind::NotFound,
            Self::MalformedTree(_) | Self::Repo(_) => ErrorKind::Infrastructure,
        }
    }

    /// Whether repeating the same request could succeed without any other change.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Repo(RepoError::Database { .. }))
    }
}
