//! Newick format parser and writer for labeled phylogenetic trees.
//!
//! This module is the text boundary of the crate: [`NewickParser`] turns a
//! Newick string into a [`Tree`] and [`to_newick`] turns a tree back into text.
//!
//! # Quick API
//! * [`parse_str`] - parses a single string with default settings
//!
//! # Format
//! The Newick format has the following grammar:
//! * `tree ::= node [';']`
//! * `node ::= ['(' node {',' node} ')'] [label] [comment] [':' branch_length]`
//! * `label ::= quoted_label | unquoted_label`
//! * `comment ::= '[' text ']'`
//!
//! Furthermore:
//! * Quoted labels use single quotes, a doubled quote `''` stands for `'`
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Comments can occur anywhere where whitespace is allowed; only a comment
//!   directly following a label is kept (e.g. `A[&rate=0.5]:2.1`), others are skipped
//! * Branch lengths are kept as written, so writing reproduces them exactly
//!
//! Writing a parsed tree gives back the input, except for names assigned to
//! anonymous nodes, when the input has no extra whitespace, no skipped
//! comments and no quotes around labels that don't need them.

mod defs;
mod parser;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::writer::{subtree_to_newick, to_newick};

use crate::error::TreeError;
use crate::model::Tree;
use crate::parser::byte_parser::ByteParser;

/// Parses a single Newick string to obtain a labeled [`Tree`].
///
/// This is a convenience function using default settings and thus not
/// requiring configuration of a parser.
///
/// # Example
/// ```
/// use rootwick::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, TreeError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    NewickParser::new().parse_str(&mut byte_parser)
}
