//! Error and warning kinds for the triple store, mirroring spec §7.

use thiserror::Error;

/// Hard failures raised by the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KglError {
    #[error("invalid triple: {0}")]
    InvalidTriple(String),

    #[error("Node does not have property {0}.")]
    MissingProperty(String),

    #[error("invalid JSON input: {0}")]
    InvalidJsonInput(String),
}

/// Soft failures that are recovered from automatically; the offending flag or
/// option is ignored and the warning is surfaced to the caller for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KglWarning {
    /// `~` used without a similarity index.
    NearWithoutSimilarityIndex,
    /// `++` or `+` used without substring search enabled.
    SubstringSearchDisabled,
}

impl std::fmt::Display for KglWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KglWarning::NearWithoutSimilarityIndex => write!(
                f,
                "Near search is not allowed without a similarity index enabled."
            ),
            KglWarning::SubstringSearchDisabled => write!(
                f,
                "Subsequence and enumerate options are not allowed without substring search enabled."
            ),
        }
    }
}
