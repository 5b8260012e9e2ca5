//! Representativeness correction engine.
//!
//! The pipeline binds registry attributes to dataset columns, compares each
//! bound column's category shares against a reference distribution, and turns
//! the ratios into per-row correction weights:
//!
//! ```rust,ignore
//! use reweigh_core::{AttributeRegistry, EngineConfig, evaluate};
//! use reweigh_reference::builtin_source;
//!
//! let census = builtin_source("US Census")?;
//! let result = evaluate(&df, &AttributeRegistry::default(), &census, &EngineConfig::default())?;
//! assert_eq!(result.weights.len(), df.height());
//! ```
//!
//! Evaluation is synchronous and keeps no state between calls.

pub mod compare;
pub mod config;
pub mod detect;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod weights;

pub use compare::{compare, compare_observed, observed_distribution, tally_column};
pub use config::{
    ConfigFile, DEFAULT_FLOOR_PROPORTION, DEFAULT_SHAPE_MATCH_THRESHOLD, EngineConfig,
    EngineOverrides,
};
pub use detect::{detect, detect_all, shape_match_ratio};
pub use error::{EngineError, Result};
pub use pipeline::evaluate;
pub use registry::{AttributeRegistry, AttributeSpec, NameMatch, ValueShape};
pub use weights::{compute_weights, weight_map, weighted_shares, weighted_shares_for};
