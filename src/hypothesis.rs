//! Enumeration of complete gene and trait assignments consistent with evidence.
use crate::family::Population;
use crate::partition::{subsets, Partitions};
use crate::GeneCount;
use std::collections::BTreeSet;
use tracing::trace;

/// One complete assignment over a population, indexed in population order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hypothesis {
    genes: Vec<GeneCount>,
    traits: Vec<bool>,
}

impl Hypothesis {
    pub fn new(genes: Vec<GeneCount>, traits: Vec<bool>) -> Self {
        debug_assert_eq!(genes.len(), traits.len());
        Self { genes, traits }
    }

    pub fn genes(&self) -> &[GeneCount] {
        &self.genes
    }

    pub fn traits(&self) -> &[bool] {
        &self.traits
    }

    pub fn gene(&self, individual: usize) -> GeneCount {
        self.genes[individual]
    }

    pub fn has_trait(&self, individual: usize) -> bool {
        self.traits[individual]
    }

    /// Indices of the individuals assumed to carry `count` copies.
    pub fn members(&self, count: GeneCount) -> BTreeSet<usize> {
        self.genes
            .iter()
            .enumerate()
            .filter(|&(_, &gene)| gene == count)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// Produces every admissible hypothesis for a population exactly once.
///
/// Trait subsets that contradict an observation are dropped before any gene
/// assignment is generated for them. Each surviving trait subset is paired
/// with all `3^n` gene assignments.
#[derive(Debug, Clone)]
pub struct Enumerator {
    evidence: Vec<Option<bool>>,
}

impl Enumerator {
    pub fn new(population: &Population) -> Self {
        Self {
            evidence: population.iter().map(|individual| individual.has_trait()).collect(),
        }
    }

    pub fn from_evidence(evidence: Vec<Option<bool>>) -> Self {
        Self { evidence }
    }

    /// Whether a trait subset agrees with every known observation.
    pub fn admissible(&self, traits: &[bool]) -> bool {
        self.evidence
            .iter()
            .zip(traits)
            .all(|(observed, assumed)| observed.map_or(true, |observed| observed == *assumed))
    }

    /// All trait subsets that agree with the evidence.
    pub fn trait_hypotheses(&self) -> impl Iterator<Item = Vec<bool>> + '_ {
        subsets(self.evidence.len()).filter(move |traits| {
            let keep = self.admissible(traits);
            if !keep {
                trace!(?traits, "pruned trait hypothesis contradicting evidence");
            }
            keep
        })
    }

    /// All `3^n` gene assignments.
    pub fn gene_hypotheses(&self) -> impl Iterator<Item = Vec<GeneCount>> {
        Partitions::new(self.evidence.len(), GeneCount::ALL.len()).map(|labels| {
            labels
                .into_iter()
                .map(|label| GeneCount::ALL[label])
                .collect()
        })
    }

    /// Every admissible (gene, trait) hypothesis.
    pub fn hypotheses(&self) -> impl Iterator<Item = Hypothesis> + '_ {
        self.trait_hypotheses().flat_map(move |traits| {
            self.gene_hypotheses()
                .map(move |genes| Hypothesis::new(genes, traits.clone()))
        })
    }

    pub fn len(&self) -> usize {
        self.evidence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty()
    }
}
