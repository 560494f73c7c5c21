use crate::error::TreeError;
use crate::model::{BranchLength, NodeIndex, NodeLabeler, Tree};
use crate::newick::defs::NEWICK_LABEL_DELIMITERS;
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::ParsingError;
use tracing::debug;

/// Parser (configuration) for Newick strings into labeled [Tree]s.
///
/// The parser builds the arena bottom-up, then names anonymous nodes with its
/// [NodeLabeler] and finally builds the name index of the tree.
///
/// # Configuration
/// * `with_labeler(labeler)` - How anonymous nodes are named (default [NodeLabeler::new])
/// * `with_tree_name(name)` - Name given to the root after labeling, replacing any parsed name
///
/// # Example
/// ```
/// use rootwick::newick::NewickParser;
/// use rootwick::parser::byte_parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((A:1.0,B:1.0):0.5,C:1.5);");
/// let tree = NewickParser::new()
///     .with_tree_name("Kiwi")
///     .parse_str(&mut byte_parser)
///     .unwrap();
/// assert_eq!(tree.serialize(), "((A:1.0,B:1.0)Edge1:0.5,C:1.5)Kiwi;");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewickParser {
    labeler: NodeLabeler,
    tree_name: Option<String>,
}

impl NewickParser {
    /// Creates a new `NewickParser` with the default [NodeLabeler] and no tree name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the [NodeLabeler] used to name anonymous nodes.
    pub fn with_labeler(mut self, labeler: NodeLabeler) -> Self {
        self.labeler = labeler;
        self
    }

    /// Sets a name for the root of parsed trees.
    ///
    /// An empty name clears the override, so the root keeps its parsed or generated name.
    pub fn with_tree_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.tree_name = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// The terminating `;` may be omitted at the end of the input; anything but
    /// whitespace and comments after the tree is rejected.
    ///
    /// # Returns
    /// * `Ok(Tree)` - The parsed, fully labeled tree
    /// * `Err(TreeError::Parsing)` - If the Newick format is invalid
    /// * `Err(TreeError::DuplicateName)` - If two nodes end up with the same name
    pub fn parse_str(&self, parser: &mut ByteParser<'_>) -> Result<Tree, TreeError> {
        let mut tree = Tree::with_labeler(self.labeler.clone());

        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser).into());
        }

        let root = self.parse_node(parser, &mut tree)?;
        tree.set_root(root);

        // Consume the terminating semicolon, if any
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') && !parser.is_eof() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", parser.peek().map(|b| b as char)),
            ).into());
        }
        parser.skip_comment_and_whitespace()?;
        if !parser.is_eof() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Unexpected content after end of tree".to_string(),
            ).into());
        }

        let num_labeled = self.labeler.label_nodes(&mut tree);
        if let Some(name) = &self.tree_name {
            *tree.name_mut(root) = name.clone();
        }
        tree.rebuild_name_index()?;

        debug!(num_nodes = tree.num_nodes(), num_labeled, tree = tree.name(), "parsed newick tree");
        Ok(tree)
    }

    /// Parses a node (leaf or internal) with its subtree, adds it to the tree, and returns its index:
    /// - `[(children)] [label] [comment] [:branch_length]`
    /// - Children are separated by `,`, at least one per parenthesis
    /// - Skips comments and whitespace before each node
    ///
    /// Nesting is tracked with an explicit stack of open parentheses, each
    /// holding the children parsed so far.
    fn parse_node(&self, parser: &mut ByteParser<'_>, tree: &mut Tree) -> Result<NodeIndex, ParsingError> {
        let mut open: Vec<Vec<NodeIndex>> = Vec::new();

        loop {
            parser.skip_comment_and_whitespace()?;
            if parser.consume_if(b'(') {
                open.push(Vec::with_capacity(2));
                continue;
            }

            // Leaf, then close as many parentheses as follow it
            let mut index = self.parse_node_suffix(parser, tree, Vec::new())?;
            loop {
                let Some(mut children) = open.pop() else {
                    return Ok(index);
                };
                children.push(index);

                parser.skip_comment_and_whitespace()?;
                if parser.consume_if(b',') {
                    open.push(children);
                    break;
                }
                if parser.consume_if(b')') {
                    index = self.parse_node_suffix(parser, tree, children)?;
                    continue;
                }
                if parser.is_eof() {
                    return Err(ParsingError::unexpected_eof(parser));
                }
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    format!("Expected ',' or ')' after child but found {:?}", parser.peek().map(|b| b as char)),
                ));
            }
        }
    }

    /// Parses `[label] [comment] [:branch_length]` following the children (if any) of a node,
    /// and adds the node to the tree:
    /// - A comment directly after the label is kept with the node
    fn parse_node_suffix(
        &self,
        parser: &mut ByteParser<'_>,
        tree: &mut Tree,
        children: Vec<NodeIndex>,
    ) -> Result<NodeIndex, ParsingError> {
        parser.skip_whitespace();
        let name = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        parser.skip_whitespace();
        let comment = parser.parse_comment()?;
        let branch_length = self.parse_branch_length(parser)?;

        Ok(tree.add_node(name, children, branch_length, comment))
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - [BranchLength] if found branch length and was able to parse it
    /// - `None` if found no branch length
    /// - [ParsingError] if it couldn't parse branch length value
    fn parse_branch_length(&self, parser: &mut ByteParser<'_>) -> Result<Option<BranchLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
        let raw = parser.consume_while(|b| {
            b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'+' || b == b'e' || b == b'E'
        });

        BranchLength::parse(&raw)
            .map(Some)
            .ok_or_else(|| ParsingError::invalid_branch_length(parser, raw))
    }
}
