pub use crate::belief::{Beliefs, Marginals, Posterior};
pub use crate::family::{FamilyError, Individual, Population};
pub use crate::hypothesis::{Enumerator, Hypothesis};
pub use crate::inference::{infer, Engine, InferenceError, RelationshipFault};
pub use crate::joint::JointProbability;
pub use crate::model::{GeneTable, Model, ModelError, TraitTable};
pub use crate::observable::CsvBuilder;
pub use crate::GeneCount;
