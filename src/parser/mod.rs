//! Low-level parsing infrastructure for the Newick format.
//!
//! This module provides the byte parser used by
//! [NewickParser](crate::newick::NewickParser) and the error type reported
//! for malformed input.

pub mod byte_parser;
pub mod parsing_error;

pub use parsing_error::{ParsingError, ParsingErrorType};
