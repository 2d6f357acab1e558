//! Error taxonomy for the projection engine.
//!
//! Every error is raised before any simulation work begins (parameter
//! validation) or when a reduction is asked to summarise an empty ensemble.
//! Path depletion and over-withdrawal are simulated outcomes, not errors.

/// Errors returned by the projection engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// A parameter is outside its valid domain
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    /// Regime transitions were declared out of chronological order
    #[error(
        "regime transitions out of order: update2 year {second_year} precedes update1 year {first_year}"
    )]
    AmbiguousRegimeOrdering { first_year: i16, second_year: i16 },

    /// A ratio or statistic was requested over zero paths
    #[error("numeric degeneracy in {context}: no simulated paths")]
    NumericDegeneracy { context: &'static str },
}

impl SimulationError {
    /// Create an invalid parameter error naming the offending field
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a degeneracy error for the given reduction
    pub fn degenerate(context: &'static str) -> Self {
        Self::NumericDegeneracy { context }
    }

    /// Field name for `InvalidParameter`, if any
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
