#![crate_name = "heredity"]
//! Exact inference over a single-gene inheritance network.
//!
//! A [`Population`](family::Population) of individuals, each optionally linked
//! to a mother and a father and optionally observed to show the trait, is fed to
//! an [`Engine`](inference::Engine). The engine enumerates every complete
//! assignment of gene copies and trait status, weighs each one under a
//! [`Model`](model::Model), and reports per-individual posteriors.
use std::convert::TryFrom;
use std::fmt;

pub mod prelude;

pub mod belief;
pub mod family;
pub mod hypothesis;
pub mod inference;
pub mod joint;
pub mod logging;
pub mod model;
pub mod observable;
pub mod partition;
pub mod report;

/// Number of copies of the modeled gene carried by one individual.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum GeneCount {
    Zero,
    One,
    Two,
}

impl GeneCount {
    /// Every gene count in ascending order.
    pub const ALL: [GeneCount; 3] = [GeneCount::Zero, GeneCount::One, GeneCount::Two];

    pub fn copies(self) -> u8 {
        match self {
            GeneCount::Zero => 0,
            GeneCount::One => 1,
            GeneCount::Two => 2,
        }
    }

    /// Position of this count in [`GeneCount::ALL`] and in belief table columns.
    pub fn index(self) -> usize {
        self.copies() as usize
    }
}

impl TryFrom<u8> for GeneCount {
    type Error = u8;

    fn try_from(copies: u8) -> Result<Self, Self::Error> {
        match copies {
            0 => Ok(GeneCount::Zero),
            1 => Ok(GeneCount::One),
            2 => Ok(GeneCount::Two),
            other => Err(other),
        }
    }
}

impl fmt::Display for GeneCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.copies())
    }
}
