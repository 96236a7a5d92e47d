//! Probability tables for gene inheritance and trait expression.
use crate::GeneCount;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SUM_TOLERANCE: f64 = 1e-9;

/// One value per gene count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneTable<T> {
    pub zero: T,
    pub one: T,
    pub two: T,
}

impl<T> GeneTable<T> {
    pub fn new(zero: T, one: T, two: T) -> Self {
        Self { zero, one, two }
    }

    pub fn get(&self, count: GeneCount) -> &T {
        match count {
            GeneCount::Zero => &self.zero,
            GeneCount::One => &self.one,
            GeneCount::Two => &self.two,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GeneCount, &T)> {
        GeneCount::ALL.iter().map(move |&count| (count, self.get(count)))
    }
}

/// One value for showing the trait and one for not showing it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TraitTable<T> {
    pub present: T,
    pub absent: T,
}

impl<T> TraitTable<T> {
    pub fn new(present: T, absent: T) -> Self {
        Self { present, absent }
    }

    pub fn get(&self, has_trait: bool) -> &T {
        if has_trait {
            &self.present
        } else {
            &self.absent
        }
    }
}

/// Parameters of the inheritance network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Model {
    /// Gene count distribution for individuals with no recorded parents.
    pub gene_prior: GeneTable<f64>,
    /// Trait expression given an individual's own gene count.
    pub trait_given_gene: GeneTable<TraitTable<f64>>,
    /// Chance that a parent passes on the opposite of what their copies dictate.
    pub mutation: f64,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            gene_prior: GeneTable::new(0.96, 0.03, 0.01),
            trait_given_gene: GeneTable::new(
                TraitTable::new(0.01, 0.99),
                TraitTable::new(0.56, 0.44),
                TraitTable::new(0.65, 0.35),
            ),
            mutation: 0.01,
        }
    }
}

impl Model {
    /// Load a model from a YAML file on disk. Missing fields take the default model's values.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ModelError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let model: Model = serde_yaml::from_reader(BufReader::new(file)).map_err(|source| {
            ModelError::Parse {
                source,
                path: path_buf.clone(),
            }
        })?;
        model.validate().map_err(|source| ModelError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(model)
    }

    /// Validate the model without performing I/O.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_probability("mutation", self.mutation)?;
        validate_distribution(
            "gene_prior",
            &[self.gene_prior.zero, self.gene_prior.one, self.gene_prior.two],
        )?;
        for (count, table) in self.trait_given_gene.iter() {
            validate_distribution(
                &format!("trait_given_gene.{}", field_name(count)),
                &[table.present, table.absent],
            )?;
        }
        Ok(())
    }

    /// Probability that a parent with `count` copies passes the gene to a child.
    pub fn transmission(&self, count: GeneCount) -> f64 {
        match count {
            GeneCount::Zero => self.mutation,
            GeneCount::One => 0.5,
            GeneCount::Two => 1.0 - self.mutation,
        }
    }

    pub fn prior(&self, count: GeneCount) -> f64 {
        *self.gene_prior.get(count)
    }

    pub fn trait_probability(&self, count: GeneCount, has_trait: bool) -> f64 {
        *self.trait_given_gene.get(count).get(has_trait)
    }
}

/// Child gene count distribution given each parent's transmission probability.
pub fn child_gene_distribution(p_mother: f64, p_father: f64) -> GeneTable<f64> {
    GeneTable {
        zero: (1.0 - p_mother) * (1.0 - p_father),
        one: (1.0 - p_mother) * p_father + p_mother * (1.0 - p_father),
        two: p_mother * p_father,
    }
}

fn field_name(count: GeneCount) -> &'static str {
    match count {
        GeneCount::Zero => "zero",
        GeneCount::One => "one",
        GeneCount::Two => "two",
    }
}

fn validate_probability(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: format!("{} is not a probability in [0, 1]", value),
        });
    }
    Ok(())
}

fn validate_distribution(field: &str, values: &[f64]) -> Result<(), ValidationError> {
    for value in values {
        validate_probability(field, *value)?;
    }
    let total: f64 = values.iter().sum();
    if (total - 1.0).abs() > SUM_TOLERANCE {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: format!("entries sum to {} instead of 1", total),
        });
    }
    Ok(())
}

/// Errors surfaced when loading model files.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse model {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid model in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;

    #[test]
    fn default_model_is_valid() {
        Model::default().validate().expect("reference model validates");
    }

    #[test]
    fn transmission_follows_parent_copies() {
        let model = Model::default();
        assert_eq!(model.transmission(GeneCount::Zero), 0.01);
        assert_eq!(model.transmission(GeneCount::One), 0.5);
        assert_eq!(model.transmission(GeneCount::Two), 0.99);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let model: Model = serde_yaml::from_str("mutation: 0.05\n").expect("parse yaml");
        assert_eq!(model.mutation, 0.05);
        assert_eq!(model.gene_prior, Model::default().gene_prior);
        model.validate().expect("valid");
    }

    #[test]
    fn rejects_prior_not_summing_to_one() {
        let yaml = "gene_prior: { zero: 0.5, one: 0.3, two: 0.1 }\n";
        let model: Model = serde_yaml::from_str(yaml).expect("parse yaml");
        let err = model.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "gene_prior"
        ));
    }

    #[test]
    fn rejects_out_of_range_penetrance() {
        let mut model = Model::default();
        model.trait_given_gene.two = TraitTable::new(1.2, -0.2);
        let err = model.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "trait_given_gene.two"
        ));
    }

    #[test]
    fn from_path_reports_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "mutation: 1.5").expect("write");
        let err = Model::from_path(file.path()).expect_err("invalid mutation");
        assert!(matches!(err, ModelError::Invalid { .. }));

        let err = Model::from_path("/nonexistent/model.yaml").expect_err("missing file");
        assert!(matches!(err, ModelError::Read { .. }));
    }

    proptest! {
        #[test]
        fn child_distribution_sums_to_one(p_mother in 0.0f64..=1.0, p_father in 0.0f64..=1.0) {
            let child = child_gene_distribution(p_mother, p_father);
            prop_assert!(child.iter().all(|(_, &p)| p >= 0.0));
            prop_assert!((child.zero + child.one + child.two - 1.0).abs() < 1e-12);
        }
    }
}
