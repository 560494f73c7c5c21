//! Constants for Newick parsing and writing.

/// Newick label delimiters: parentheses, brackets, comma, colon, semicolon
/// (whitespace also ends an unquoted label)
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"()[],:;";

/// Characters that force a label to be written in single quotes
pub(crate) const NEWICK_QUOTE_TRIGGERS: &[char] = &['(', ')', '[', ']', ',', ':', ';', '\''];

/// Estimate of structural characters per node: `(`, `)`, `,` and `:`
pub(crate) const STRUCTURE_CHARS_PER_NODE: usize = 4;
