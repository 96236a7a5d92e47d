//! In-memory family tree: individuals keyed by name, parents referenced by name.
use std::collections::BTreeMap;
use thiserror::Error;

pub type Individuals = BTreeMap<String, Individual>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    name: String,
    mother: Option<String>,
    father: Option<String>,
    has_trait: Option<bool>,
}

impl Individual {
    /// Constructs an `Individual` from raw fields.
    ///
    /// No relationship checks happen here; a record with a single parent is
    /// representable so that it can be rejected by `Population::validate()` or
    /// by the engine.
    pub fn new(name: &str, mother: Option<&str>, father: Option<&str>) -> Self {
        Self {
            name: name.into(),
            mother: mother.map(Into::into),
            father: father.map(Into::into),
            has_trait: None,
        }
    }

    /// An individual with no recorded parents.
    pub fn founder(name: &str) -> Self {
        Self::new(name, None, None)
    }

    pub fn child(name: &str, mother: &str, father: &str) -> Self {
        Self::new(name, Some(mother), Some(father))
    }

    /// Sets the observed trait: `Some(true)` shows it, `Some(false)` does not,
    /// `None` is unobserved.
    pub fn with_trait(mut self, has_trait: Option<bool>) -> Self {
        self.has_trait = has_trait;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mother(&self) -> Option<&str> {
        self.mother.as_deref()
    }

    pub fn father(&self) -> Option<&str> {
        self.father.as_deref()
    }

    pub fn has_trait(&self) -> Option<bool> {
        self.has_trait
    }
}

/// Everyone taking part in one inference run, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    individuals: Individuals,
}

impl Population {
    pub fn new() -> Self {
        Self {
            individuals: Individuals::new(),
        }
    }

    /// Adds an individual. Names must be non-empty and unique.
    pub fn insert(&mut self, individual: Individual) -> Result<(), FamilyError> {
        if individual.name.is_empty() {
            return Err(FamilyError::EmptyName);
        }
        if self.individuals.contains_key(&individual.name) {
            return Err(FamilyError::DuplicateName(individual.name));
        }
        self.individuals.insert(individual.name.clone(), individual);
        Ok(())
    }

    /// Builds a population from individuals, rejecting empty or repeated names.
    pub fn from_individuals<I>(individuals: I) -> Result<Self, FamilyError>
    where
        I: IntoIterator<Item = Individual>,
    {
        let mut population = Self::new();
        for individual in individuals {
            population.insert(individual)?;
        }
        Ok(population)
    }

    pub fn get(&self, name: &str) -> Option<&Individual> {
        self.individuals.get(name)
    }

    /// Position of `name` in iteration order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.individuals.keys().position(|key| key == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.individuals.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Checks that parents are given in pairs and name other members of the
    /// population.
    pub fn validate(&self) -> Result<(), FamilyError> {
        for individual in self.iter() {
            let (mother, father) = match (individual.mother(), individual.father()) {
                (None, None) => continue,
                (Some(mother), Some(father)) => (mother, father),
                _ => return Err(FamilyError::SingleParent(individual.name.clone())),
            };
            for parent in [mother, father].iter() {
                if *parent == individual.name {
                    return Err(FamilyError::SelfParent(individual.name.clone()));
                }
                if !self.individuals.contains_key(*parent) {
                    return Err(FamilyError::UnknownParent {
                        name: individual.name.clone(),
                        parent: parent.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum FamilyError {
    #[error("individual with an empty name")]
    EmptyName,
    #[error("individual '{0}' is listed more than once")]
    DuplicateName(String),
    #[error("individual '{0}' has exactly one parent; give both or neither")]
    SingleParent(String),
    #[error("individual '{0}' is listed as their own parent")]
    SelfParent(String),
    #[error("parent '{parent}' of '{name}' is not in the family")]
    UnknownParent { name: String, parent: String },
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: unrecognized trait marker '{marker}'")]
    UnknownTraitMarker { row: usize, marker: String },
    #[error("failed to read family data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}
