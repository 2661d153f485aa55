//! Core pet domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// A validated, non-empty pet name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct PetName(String);

impl PetName {
    /// Create a pet name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyName] if `name` is blank.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a pet name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for PetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a pet.
pub type PetId = DatabaseId;

/// A pet owned by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// The ID of the pet.
    pub id: PetId,
    /// What the pet is called.
    pub name: PetName,
    /// The kind of animal, lower case, e.g. "dog".
    pub species: String,
    /// The breed, if known.
    pub breed: Option<String>,
    /// Age in years. Values below one are months expressed as a fraction.
    pub age: Option<f64>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Known medical conditions.
    pub medical_conditions: Vec<String>,
    /// Dietary requirements.
    pub dietary_requirements: Vec<String>,
}

impl Pet {
    /// Create a new pet.
    ///
    /// Shortcut for [PetBuilder] for discoverability.
    pub fn build(name: PetName, species: &str) -> PetBuilder {
        PetBuilder {
            name,
            species: species.trim().to_lowercase(),
            breed: None,
            age: None,
            weight: None,
            medical_conditions: Vec::new(),
            dietary_requirements: Vec::new(),
        }
    }

    /// A human readable age, e.g. "6 months" or "3 years".
    pub fn age_label(&self) -> String {
        match self.age {
            None => "Unknown".to_owned(),
            Some(age) if age <= 0.0 => "Unknown".to_owned(),
            Some(age) if age < 1.0 => format!("{} months", (age * 12.0).round()),
            Some(age) if age == 1.0 => "1 year".to_owned(),
            Some(age) => format!("{age} years"),
        }
    }
}

/// A pet that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PetBuilder {
    /// What the pet is called.
    pub name: PetName,
    /// The kind of animal, lower case.
    pub species: String,
    /// The breed, if known.
    pub breed: Option<String>,
    /// Age in years.
    pub age: Option<f64>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Known medical conditions.
    pub medical_conditions: Vec<String>,
    /// Dietary requirements.
    pub dietary_requirements: Vec<String>,
}

impl PetBuilder {
    /// Set the breed.
    pub fn breed(mut self, breed: Option<String>) -> Self {
        self.breed = breed;
        self
    }

    /// Set the age in years.
    pub fn age(mut self, age: Option<f64>) -> Self {
        self.age = age;
        self
    }

    /// Set the weight in kilograms.
    pub fn weight(mut self, weight: Option<f64>) -> Self {
        self.weight = weight;
        self
    }

    /// Set the medical conditions.
    pub fn medical_conditions(mut self, conditions: Vec<String>) -> Self {
        self.medical_conditions = conditions;
        self
    }

    /// Set the dietary requirements.
    pub fn dietary_requirements(mut self, requirements: Vec<String>) -> Self {
        self.dietary_requirements = requirements;
        self
    }
}

/// Split comma separated text into trimmed, non-empty items.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::pet::{Pet, PetName, parse_list};

    #[test]
    fn parse_list_drops_blank_items() {
        assert_eq!(
            parse_list(" arthritis, ,allergies ,"),
            vec!["arthritis".to_owned(), "allergies".to_owned()]
        );
    }

    #[test]
    fn parse_list_of_empty_text_is_empty() {
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn build_normalises_species() {
        let builder = Pet::build(PetName::new_unchecked("Max"), " Dog ");

        assert_eq!(builder.species, "dog");
    }

    #[test]
    fn age_label_uses_months_for_young_pets() {
        let pet = Pet {
            id: 1,
            name: PetName::new_unchecked("Luna"),
            species: "cat".to_owned(),
            breed: None,
            age: Some(0.5),
            weight: None,
            medical_conditions: Vec::new(),
            dietary_requirements: Vec::new(),
        };

        assert_eq!(pet.age_label(), "6 months");
    }
}
