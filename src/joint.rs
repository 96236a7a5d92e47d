//! Probability of one complete hypothesis over the whole population.
use crate::family::Population;
use crate::hypothesis::Hypothesis;
use crate::inference::{InferenceError, RelationshipFault};
use crate::model::{child_gene_distribution, Model};

/// Computes joint probabilities for hypotheses over a fixed population.
///
/// Parent names are resolved to population indices once, up front; a
/// population whose parent links do not resolve never yields a calculator.
#[derive(Debug, Clone)]
pub struct JointProbability<'m> {
    model: &'m Model,
    parents: Vec<Option<(usize, usize)>>,
}

impl<'m> JointProbability<'m> {
    pub fn new(population: &Population, model: &'m Model) -> Result<Self, InferenceError> {
        let parents = population
            .iter()
            .map(|individual| {
                let malformed = |reason| InferenceError::MalformedRelationship {
                    name: individual.name().to_string(),
                    reason,
                };
                let (mother, father) = match (individual.mother(), individual.father()) {
                    (None, None) => return Ok(None),
                    (Some(mother), Some(father)) => (mother, father),
                    _ => return Err(malformed(RelationshipFault::SingleParent)),
                };
                let resolve = |parent: &str| {
                    if parent == individual.name() {
                        return Err(malformed(RelationshipFault::SelfParent));
                    }
                    population.index_of(parent).ok_or_else(|| {
                        malformed(RelationshipFault::UnknownParent(parent.to_string()))
                    })
                };
                Ok(Some((resolve(mother)?, resolve(father)?)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { model, parents })
    }

    /// Probability of the gene count `hypothesis` assigns to `individual`.
    pub fn gene_probability(&self, hypothesis: &Hypothesis, individual: usize) -> f64 {
        let count = hypothesis.gene(individual);
        match self.parents[individual] {
            None => self.model.prior(count),
            Some((mother, father)) => {
                let p_mother = self.model.transmission(hypothesis.gene(mother));
                let p_father = self.model.transmission(hypothesis.gene(father));
                *child_gene_distribution(p_mother, p_father).get(count)
            }
        }
    }

    /// Probability of the exact assignment in `hypothesis`.
    pub fn probability(&self, hypothesis: &Hypothesis) -> f64 {
        (0..self.parents.len())
            .map(|individual| {
                let gene = self.gene_probability(hypothesis, individual);
                let has_trait = self.model.trait_probability(
                    hypothesis.gene(individual),
                    hypothesis.has_trait(individual),
                );
                gene * has_trait
            })
            .product()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
