//! Rendering of posteriors for people and for other programs.
use crate::belief::Posterior;
use crate::GeneCount;
use std::fmt;

pub const DEFAULT_PRECISION: usize = 4;

/// Indented plain-text listing, one block per individual.
///
/// ```text
/// Harry:
///   Gene:
///     2: 0.0092
///     1: 0.4557
///     0: 0.5351
///   Trait:
///     True: 0.2665
///     False: 0.7335
/// ```
pub struct TextReport<'a> {
    posterior: &'a Posterior,
    precision: usize,
}

impl<'a> TextReport<'a> {
    pub fn new(posterior: &'a Posterior) -> Self {
        Self {
            posterior,
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.precision;
        for (name, marginals) in self.posterior.iter() {
            writeln!(f, "{}:", name)?;
            writeln!(f, "  Gene:")?;
            for count in GeneCount::ALL.iter().rev() {
                writeln!(f, "    {}: {:.*}", count, precision, marginals.gene.get(*count))?;
            }
            writeln!(f, "  Trait:")?;
            writeln!(f, "    True: {:.*}", precision, marginals.has_trait.present)?;
            writeln!(f, "    False: {:.*}", precision, marginals.has_trait.absent)?;
        }
        Ok(())
    }
}

impl fmt::Display for Posterior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&TextReport::new(self), f)
    }
}

/// Pretty-printed JSON keyed by individual name.
pub fn to_json(posterior: &Posterior) -> serde_json::Result<String> {
    serde_json::to_string_pretty(posterior)
}
