//! Accumulation of joint probabilities into per-individual marginals.
use crate::family::Population;
use crate::hypothesis::Hypothesis;
use crate::inference::InferenceError;
use crate::model::{GeneTable, TraitTable};
use crate::GeneCount;
use ndarray::{Array2, Axis, Zip};
use serde::Serialize;
use std::collections::BTreeMap;

const TRAIT_PRESENT: usize = 0;
const TRAIT_ABSENT: usize = 1;

fn trait_column(has_trait: bool) -> usize {
    if has_trait {
        TRAIT_PRESENT
    } else {
        TRAIT_ABSENT
    }
}

/// Raw probability mass per individual, one row each.
///
/// `genes` has one column per gene count, `traits` one column for showing the
/// trait and one for not showing it. Nothing is normalized until `normalize()`.
#[derive(Debug, Clone)]
pub struct Beliefs {
    names: Vec<String>,
    genes: Array2<f64>,
    traits: Array2<f64>,
    mass: f64,
    hypotheses: usize,
}

impl Beliefs {
    pub fn new(population: &Population) -> Self {
        let individuals = population.len();
        Self {
            names: population.names().map(String::from).collect(),
            genes: Array2::zeros((individuals, GeneCount::ALL.len())),
            traits: Array2::zeros((individuals, 2)),
            mass: 0.0,
            hypotheses: 0,
        }
    }

    /// Adds `probability` to each individual's gene and trait bucket under `hypothesis`.
    pub fn accumulate(&mut self, hypothesis: &Hypothesis, probability: f64) {
        let assignments = hypothesis.genes().iter().zip(hypothesis.traits());
        for (individual, (gene, &has_trait)) in assignments.enumerate() {
            self.genes[[individual, gene.index()]] += probability;
            self.traits[[individual, trait_column(has_trait)]] += probability;
        }
        self.mass += probability;
        self.hypotheses += 1;
    }

    /// Sum of every accumulated joint probability.
    pub fn total_mass(&self) -> f64 {
        self.mass
    }

    /// Number of hypotheses accumulated so far.
    pub fn hypotheses(&self) -> usize {
        self.hypotheses
    }

    /// Rescales every row to sum to one.
    ///
    /// Fails with `NoConsistentHypothesis` when an individual's mass is zero,
    /// which happens exactly when no admissible hypothesis has positive probability.
    pub fn normalize(mut self) -> Result<Posterior, InferenceError> {
        let gene_totals = self.genes.sum_axis(Axis(1));
        let trait_totals = self.traits.sum_axis(Axis(1));
        if gene_totals
            .iter()
            .chain(trait_totals.iter())
            .any(|&total| !(total > 0.0))
        {
            return Err(InferenceError::NoConsistentHypothesis {
                hypotheses: self.hypotheses,
            });
        }

        Zip::from(self.genes.genrows_mut())
            .and(&gene_totals)
            .apply(|mut row, &total| row.mapv_inplace(|mass| mass / total));
        Zip::from(self.traits.genrows_mut())
            .and(&trait_totals)
            .apply(|mut row, &total| row.mapv_inplace(|mass| mass / total));

        let genes = &self.genes;
        let traits = &self.traits;
        let marginals = self
            .names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let marginal = Marginals {
                    gene: GeneTable::new(genes[[idx, 0]], genes[[idx, 1]], genes[[idx, 2]]),
                    has_trait: TraitTable::new(
                        traits[[idx, TRAIT_PRESENT]],
                        traits[[idx, TRAIT_ABSENT]],
                    ),
                };
                (name.clone(), marginal)
            })
            .collect();

        Ok(Posterior { marginals })
    }
}

/// Normalized distributions for one individual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marginals {
    pub gene: GeneTable<f64>,
    #[serde(rename = "trait")]
    pub has_trait: TraitTable<f64>,
}

/// Normalized marginals for everyone in a population, keyed by name.
///
/// Iteration, and so every report, follows name order rather than the row
/// order of the input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Posterior {
    marginals: BTreeMap<String, Marginals>,
}

impl Posterior {
    pub fn get(&self, name: &str) -> Option<&Marginals> {
        self.marginals.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Marginals)> {
        self.marginals
            .iter()
            .map(|(name, marginals)| (name.as_str(), marginals))
    }

    pub fn len(&self) -> usize {
        self.marginals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marginals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Individual;

    fn pair() -> Population {
        Population::from_individuals(vec![Individual::founder("a"), Individual::founder("b")])
            .unwrap()
    }

    #[test]
    fn accumulate_adds_to_matching_buckets() {
        let mut beliefs = Beliefs::new(&pair());
        let hypothesis = Hypothesis::new(vec![GeneCount::Two, GeneCount::Zero], vec![true, false]);
        beliefs.accumulate(&hypothesis, 0.25);
        beliefs.accumulate(&hypothesis, 0.5);

        assert_eq!(beliefs.total_mass(), 0.75);
        assert_eq!(beliefs.hypotheses(), 2);

        let posterior = beliefs.normalize().expect("positive mass");
        let a = posterior.get("a").unwrap();
        assert_eq!(a.gene, GeneTable::new(0.0, 0.0, 1.0));
        assert_eq!(a.has_trait, TraitTable::new(1.0, 0.0));
        let b = posterior.get("b").unwrap();
        assert_eq!(b.gene, GeneTable::new(1.0, 0.0, 0.0));
        assert_eq!(b.has_trait, TraitTable::new(0.0, 1.0));
    }

    #[test]
    fn normalize_preserves_proportions() {
        let mut beliefs = Beliefs::new(&pair());
        beliefs.accumulate(
            &Hypothesis::new(vec![GeneCount::One, GeneCount::One], vec![true, true]),
            0.1,
        );
        beliefs.accumulate(
            &Hypothesis::new(vec![GeneCount::Two, GeneCount::One], vec![false, true]),
            0.3,
        );
        let posterior = beliefs.normalize().expect("positive mass");

        let a = posterior.get("a").unwrap();
        assert!((a.gene.one - 0.25).abs() < 1e-12);
        assert!((a.gene.two - 0.75).abs() < 1e-12);
        assert_eq!(a.gene.zero, 0.0);
        assert!((a.has_trait.present - 0.25).abs() < 1e-12);

        let b = posterior.get("b").unwrap();
        assert!((b.gene.one - 1.0).abs() < 1e-12);
        assert!((b.has_trait.present - 1.0).abs() < 1e-12);
        assert_eq!(b.has_trait.absent, 0.0);
    }

    #[test]
    fn zero_mass_is_an_error() {
        let beliefs = Beliefs::new(&pair());
        assert!(matches!(
            beliefs.normalize(),
            Err(InferenceError::NoConsistentHypothesis { hypotheses: 0 })
        ));
    }

    #[test]
    fn posterior_serializes_by_name() {
        let mut beliefs = Beliefs::new(&pair());
        beliefs.accumulate(
            &Hypothesis::new(vec![GeneCount::Zero, GeneCount::Zero], vec![false, false]),
            1.0,
        );
        let json = serde_json::to_value(beliefs.normalize().unwrap()).unwrap();
        assert_eq!(json["a"]["gene"]["zero"], 1.0);
        assert_eq!(json["b"]["trait"]["absent"], 1.0);
    }
}
