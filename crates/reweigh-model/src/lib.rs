//! Data model for representativeness reweighting.
//!
//! Types here are produced fresh by every evaluation and never persisted by
//! the engine itself. Callers decide whether to keep the weight vector or the
//! report.

pub mod binding;
pub mod comparison;
pub mod distribution;
pub mod error;
pub mod evaluation;

pub use binding::{AttributeBinding, BindingMethod};
pub use comparison::{AttributeComparison, CategoryComparison, ReferenceOrigin};
pub use distribution::{ObservedDistribution, ReferenceDistribution, WeightMap};
pub use error::{ModelError, Result};
pub use evaluation::{
    AttributeOutcome, AttributeResult, EvaluationResult, WeightAnomaly, WeightSummary,
};
