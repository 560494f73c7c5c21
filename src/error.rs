//! Errors raised by tree construction and topology operations.

use crate::parser::ParsingError;
use thiserror::Error;

/// Errors that can occur when building, querying, or rearranging a [Tree](crate::model::Tree).
#[derive(Error, Debug)]
pub enum TreeError {
    /// No node carries the requested name
    #[error("No node named '{0}' in tree")]
    NotFound(String),

    /// The operation cannot be applied to this node or tree shape
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// Two nodes would end up with the same name
    #[error("Node name '{0}' is not unique in tree")]
    DuplicateName(String),

    /// The Newick text could not be parsed
    #[error(transparent)]
    Parsing(#[from] ParsingError),
}

impl TreeError {
    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        TreeError::PreconditionViolation(msg.into())
    }
}
