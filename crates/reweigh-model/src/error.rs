use thiserror::Error;

/// Errors raised while constructing model values.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("reference distribution '{attribute}' has no categories")]
    EmptyDistribution { attribute: String },
    #[error("proportion for '{category}' in '{attribute}' must be in (0, 1], got {value}")]
    InvalidProportion {
        attribute: String,
        category: String,
        value: f64,
    },
    #[error("reference proportions for '{attribute}' sum to {total}, expected at most 1")]
    ProportionOverflow { attribute: String, total: f64 },
    #[error("reference count for '{category}' in '{attribute}' must be positive, got {value}")]
    InvalidCount {
        attribute: String,
        category: String,
        value: f64,
    },
    #[error("alias '{alias}' in '{attribute}' points at unknown category '{category}'")]
    UnknownAliasTarget {
        attribute: String,
        alias: String,
        category: String,
    },
    #[error("alias '{alias}' in '{attribute}' clashes with another category or alias")]
    AliasConflict { attribute: String, alias: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
