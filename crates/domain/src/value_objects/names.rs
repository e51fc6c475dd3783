//! Validated text newtypes for the category tree
//!
//! These newtypes ensure that labels are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for category names
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for attribute descriptions
const MAX_DESCRIPTION_LENGTH: usize = 255;

fn trimmed_label(value: String, label: &str, max: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", label)));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            label, max
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// CategoryName
// ============================================================================

/// A validated root category name (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a new validated category name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 200 characters after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_label(name.into(), "Category name", MAX_NAME_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CategoryName> for String {
    fn from(name: CategoryName) -> String {
        name.0
    }
}

// ============================================================================
// AttributeDescription
// ============================================================================

/// The label of one attribute node (non-empty, <=255 chars, trimmed).
///
/// Sibling uniqueness compares the trimmed form, so "Full-face" and
/// " Full-face " collide under the same parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeDescription(String);

impl AttributeDescription {
    /// Create a new validated attribute description.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the description is empty after
    /// trimming or longer than 255 characters.
    pub fn new(description: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_label(description.into(), "Attribute description", MAX_DESCRIPTION_LENGTH)
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AttributeDescription {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AttributeDescription> for String {
    fn from(description: AttributeDescription) -> String {
        description.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_name_is_trimmed() {
        let name = CategoryName::new("  Safety Helmets ").expect("valid name");
        assert_eq!(name.as_str(), "Safety Helmets");
    }

    #[test]
    fn category_name_rejects_blank() {
        let err = CategoryName::new("   ").expect_err("blank name");
        assert_eq!(
            err,
            DomainError::validation("Category name cannot be empty")
        );
    }

    #[test]
    fn description_rejects_overlong_text() {
        let long = "x".repeat(MAX_DESCRIPTION_LENGTH + 1);
        let err = AttributeDescription::new(long).expect_err("too long");
        assert!(err.to_string().contains("cannot exceed 255"));
    }

    #[test]
    fn description_counts_characters_not_bytes() {
        let accented = "é".repeat(MAX_DESCRIPTION_LENGTH);
        assert!(AttributeDescription::new(accented).is_ok());
    }

    #[test]
    fn description_deserialization_validates() {
        let parsed: Result<AttributeDescription, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());

        let parsed: AttributeDescription =
            serde_json::from_str("\" Full-face \"").expect("valid description");
        assert_eq!(parsed.as_str(), "Full-face");
    }
}
