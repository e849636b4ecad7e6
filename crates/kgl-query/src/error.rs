//! Error kinds raised by the parser and evaluator (spec §7).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid query at position {position}: {message}")]
    InvalidQuery { position: usize, message: String },

    #[error("query depth exceeded cap of {cap}")]
    QueryDepthExceeded { cap: usize },

    #[error("Node does not have property {0}.")]
    MissingProperty(String),
}
