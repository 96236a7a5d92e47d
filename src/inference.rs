//! Drives enumeration, joint probability, accumulation and normalization.
use crate::belief::{Beliefs, Posterior};
use crate::family::Population;
use crate::hypothesis::Enumerator;
use crate::joint::JointProbability;
use crate::model::{Model, ValidationError};
use crate::partition::Partitions;
use crate::GeneCount;
use std::fmt;
use thiserror::Error;
use tracing::{debug, event, warn, Level};

/// Largest population enumerated by default. Work grows as `6^n`.
pub const DEFAULT_MAX_POPULATION: usize = 9;

/// Exact inference over a population under one model.
#[derive(Debug, Clone)]
pub struct Engine<'m> {
    model: &'m Model,
    max_population: usize,
}

impl<'m> Engine<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            max_population: DEFAULT_MAX_POPULATION,
        }
    }

    /// Refuse populations larger than `max_population` instead of enumerating them.
    pub fn max_population(&mut self, max_population: usize) -> &mut Self {
        self.max_population = max_population;
        self
    }

    /// Sums the joint probability of every admissible hypothesis into raw beliefs.
    pub fn accumulate(&self, population: &Population) -> Result<Beliefs, InferenceError> {
        self.model.validate()?;
        if population.len() > self.max_population {
            return Err(InferenceError::PopulationTooLarge {
                size: population.len(),
                limit: self.max_population,
            });
        }

        let joint = JointProbability::new(population, self.model)?;
        let enumerator = Enumerator::new(population);
        let mut beliefs = Beliefs::new(population);

        // Each individual independently takes one of three gene counts and one of two trait states.
        let candidates = Partitions::count_total(population.len(), 2 * GeneCount::ALL.len());
        debug!(
            individuals = population.len(),
            ?candidates,
            observed = population.iter().filter(|i| i.has_trait().is_some()).count(),
            "enumerating hypotheses"
        );

        for hypothesis in enumerator.hypotheses() {
            let probability = joint.probability(&hypothesis);
            beliefs.accumulate(&hypothesis, probability);
        }

        event!(
            Level::DEBUG,
            hypotheses = beliefs.hypotheses(),
            mass = beliefs.total_mass(),
            "enumeration complete"
        );
        Ok(beliefs)
    }

    /// Posterior gene count and trait distributions for every individual.
    pub fn run(&self, population: &Population) -> Result<Posterior, InferenceError> {
        let beliefs = self.accumulate(population)?;
        beliefs.normalize().map_err(|err| {
            warn!(%err, "evidence admits no hypothesis with positive probability");
            err
        })
    }
}

/// Runs inference with the default population ceiling.
pub fn infer(population: &Population, model: &Model) -> Result<Posterior, InferenceError> {
    Engine::new(model).run(population)
}

/// Why a parent link cannot be followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipFault {
    SingleParent,
    SelfParent,
    UnknownParent(String),
}

impl fmt::Display for RelationshipFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipFault::SingleParent => write!(f, "exactly one parent is recorded"),
            RelationshipFault::SelfParent => write!(f, "listed as their own parent"),
            RelationshipFault::UnknownParent(parent) => {
                write!(f, "parent '{}' is not in the population", parent)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("malformed relationship for '{name}': {reason}")]
    MalformedRelationship {
        name: String,
        reason: RelationshipFault,
    },
    #[error("no consistent hypothesis: {hypotheses} admissible hypotheses carry zero total probability")]
    NoConsistentHypothesis { hypotheses: usize },
    #[error("population of {size} exceeds the enumeration limit of {limit}")]
    PopulationTooLarge { size: usize, limit: usize },
    #[error("invalid model: {0}")]
    InvalidModel(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Individual;
    use crate::model::TraitTable;

    fn founders(count: usize) -> Population {
        Population::from_individuals((0..count).map(|i| Individual::founder(&format!("p{}", i))))
            .unwrap()
    }

    #[test]
    fn unobserved_founders_match_prior() {
        let model = Model::default();
        let posterior = infer(&founders(3), &model).unwrap();
        for (_, marginals) in posterior.iter() {
            for (count, &p) in marginals.gene.iter() {
                assert!((p - model.prior(count)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn raw_mass_sums_to_one_without_evidence() {
        let model = Model::default();
        let population = Population::from_individuals(vec![
            Individual::founder("a"),
            Individual::founder("b"),
            Individual::child("c", "a", "b"),
        ])
        .unwrap();
        let beliefs = Engine::new(&model).accumulate(&population).unwrap();
        assert!((beliefs.total_mass() - 1.0).abs() < 1e-12);
        assert_eq!(Some(beliefs.hypotheses()), Partitions::count_total(3, 6));
    }

    #[test]
    fn population_ceiling_is_enforced() {
        let model = Model::default();
        let mut engine = Engine::new(&model);
        engine.max_population(2);
        assert!(matches!(
            engine.run(&founders(3)),
            Err(InferenceError::PopulationTooLarge { size: 3, limit: 2 })
        ));
    }

    #[test]
    fn default_ceiling_refuses_large_families() {
        let model = Model::default();
        assert!(matches!(
            infer(&founders(DEFAULT_MAX_POPULATION + 1), &model),
            Err(InferenceError::PopulationTooLarge { size: 10, limit: 9 })
        ));
    }

    #[test]
    fn invalid_model_is_rejected() {
        let model = Model {
            mutation: 1.5,
            ..Model::default()
        };
        let population = Population::from_individuals(vec![
            Individual::founder("A"),
            Individual::founder("B"),
            Individual::child("C", "A", "B").with_trait(Some(true)),
        ])
        .unwrap();
        let err = infer(&population, &model).expect_err("mutation outside [0, 1]");
        assert!(matches!(
            err,
            InferenceError::InvalidModel(ValidationError::InvalidField { field, .. })
                if field == "mutation"
        ));
    }

    #[test]
    fn impossible_evidence_is_reported() {
        // A trait nobody can show makes every admissible hypothesis weigh zero.
        let mut model = Model::default();
        for count in GeneCount::ALL.iter() {
            let table = match count {
                GeneCount::Zero => &mut model.trait_given_gene.zero,
                GeneCount::One => &mut model.trait_given_gene.one,
                GeneCount::Two => &mut model.trait_given_gene.two,
            };
            *table = TraitTable::new(0.0, 1.0);
        }
        let population =
            Population::from_individuals(vec![Individual::founder("a").with_trait(Some(true))])
                .unwrap();
        assert!(matches!(
            infer(&population, &model),
            Err(InferenceError::NoConsistentHypothesis { hypotheses: 3 })
        ));
    }

    #[test]
    fn empty_population_yields_empty_posterior() {
        let model = Model::default();
        let posterior = infer(&Population::new(), &model).unwrap();
        assert!(posterior.is_empty());
    }
}
