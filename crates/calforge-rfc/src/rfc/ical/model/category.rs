//! Event categories (`CATEGORIES`).

use serde::{Deserialize, Serialize};

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::build::escape;

/// Serializable category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryData {
    pub name: String,
}

impl From<&str> for CategoryData {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// A single event category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
}

impl Category {
    /// ## Summary
    /// Creates a category from its record.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if the name is empty.
    pub fn new(data: impl Into<CategoryData>) -> RfcResult<Self> {
        let mut category = Self {
            name: String::new(),
        };
        category.set_name(data.into().name)?;
        Ok(category)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// ## Summary
    /// Replaces the category name.
    ///
    /// ## Errors
    /// Returns `RfcError::InvalidArgument` if the name is empty.
    pub fn set_name(&mut self, name: impl Into<String>) -> RfcResult<&mut Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RfcError::invalid("category.name", "must not be empty"));
        }
        self.name = name;
        Ok(self)
    }

    #[must_use]
    pub fn to_json(&self) -> CategoryData {
        CategoryData {
            name: self.name.clone(),
        }
    }

    /// Escaped name, as listed in the `CATEGORIES` value.
    #[must_use]
    pub fn render(&self) -> String {
        escape(&self.name, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_a_name() {
        assert!(Category::new("").is_err());
        assert!(Category::new("   ").is_err());

        let mut category = Category::new("Work").unwrap();
        assert!(category.set_name("").is_err());
        assert_eq!(category.name(), "Work");
    }

    #[test]
    fn renders_escaped_name() {
        let category = Category::new("Meetings, internal").unwrap();
        assert_eq!(category.render(), "Meetings\\, internal");
        assert_eq!(category.to_json(), CategoryData::from("Meetings, internal"));
    }
}
