//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// A category for grouping transactions in summaries and charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name.
    pub name: CategoryName,
    /// An emoji or icon name shown next to the category.
    pub icon: Option<String>,
    /// A colour token used for charts, e.g. "amber".
    pub color: Option<String>,
    /// Whether spending in this category is usually for a pet.
    pub is_pet_related: bool,
}

impl Category {
    /// Create a new category.
    ///
    /// Shortcut for [CategoryBuilder] for discoverability.
    pub fn build(name: CategoryName) -> CategoryBuilder {
        CategoryBuilder {
            name,
            icon: None,
            color: None,
            is_pet_related: true,
        }
    }
}

/// A category that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBuilder {
    /// The display name.
    pub name: CategoryName,
    /// An emoji or icon name.
    pub icon: Option<String>,
    /// A colour token.
    pub color: Option<String>,
    /// Whether spending in this category is usually for a pet.
    pub is_pet_related: bool,
}

impl CategoryBuilder {
    /// Set the icon.
    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_owned());
        self
    }

    /// Set the colour token.
    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_owned());
        self
    }

    /// Set whether the category is pet related.
    pub fn is_pet_related(mut self, is_pet_related: bool) -> Self {
        self.is_pet_related = is_pet_related;
        self
    }
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CategoryName::new(""), Err(Error::EmptyName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(CategoryName::new("\n\t \r"), Err(Error::EmptyName));
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let name = CategoryName::new("  Grooming ").unwrap();

        assert_eq!(name.as_ref(), "Grooming");
    }
}
