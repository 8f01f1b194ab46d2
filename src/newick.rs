//! A module to parse a Newick string into a tree and to convert a tree back to a Newick string.
//!
//! # Parsing
//!
//! The main parsing function is `parse_tree()`.  The input has to be a valid Newick string
//! representing a single tree, optionally followed by whitespace.  Whitespace, including line
//! breaks, and `[...]` comments may appear between any two tokens.
//!
//! The grammar for a a Newick string used by the parser is the following:
//!
//! ```ignore
//! Newick     -> Tree ;
//! Tree       -> Subtree Label : EdgeLength
//! Label      -> string | 'quoted string' | Nothing
//! EdgeLength -> number | Nothing
//! Subtree    -> ( Trees ) | Nothing
//! Trees      -> Tree MoreTrees
//! MoreTrees  -> , Trees | Nothing
//! Nothing    ->
//! ```
//!
//! Labels of internal nodes are kept as node names.  Edge lengths are skipped since the clade
//! search only depends on the topology.  A quoted label may contain any of the characters that
//! otherwise delimit labels; a single quote inside a quoted label is written as `''`.
//!
//! Every leaf must have a label and no two leaves may share a label, because leaves are later
//! looked up by name.
//!
//! # Formatting
//!
//! `format_tree()` and `format_subtree()` turn a tree, or the part of it below a given node, back
//! into a Newick string.  Labels that contain delimiters are quoted.

use crate::tree::{Node, Tree, TreeBuilder};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::iter;
use std::result;
use std::str;
use thiserror::Error;

/// The parser's result type
pub type Result<T> = result::Result<T, Error>;

/// The error raised when a parse error is encountered
#[derive(Debug, Error)]
#[error("{message} at position {pos}")]
pub struct Error {

    /// The error message
    message: String,

    /// The position in the input text where the error occurred
    pos: Pos,
}

impl Error {
    /// The error message without the position
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The line and column where the error occurred, both counted from 1
    pub fn position(&self) -> (usize, usize) {
        (self.pos.0, self.pos.1)
    }
}

/// Representation of an input position
#[derive(Clone, Copy, Debug)]
struct Pos(usize, usize);

/// Characters that end an unquoted label or an edge length
const DELIMITERS: &[char] = &[',', ';', ':', '(', ')', '['];

/// Parse a given Newick string into a tree
///
/// # Example
///
/// ```
/// # use clade_sort::newick::*;
/// let newick = "((a,(b,(c,d))),e);";
/// let tree   = parse_tree(newick).unwrap();
/// assert_eq!(tree.leaf_count(tree.root()), 5);
/// assert_eq!(newick, format_tree(&tree));
/// ```
pub fn parse_tree(newick: &str) -> Result<Tree> {
    Parser::new(newick).parse_tree()
}

/// Struct representing the state of the Newick parser
struct Parser<'i> {

    /// The builder used to build the tree
    builder: TreeBuilder,

    /// The leaf labels seen so far
    leaf_labels: HashSet<String>,

    /// The current input position
    pos: Pos,

    /// The iterator currently used
    chars: iter::Peekable<str::Chars<'i>>,
}

impl<'i> Parser<'i> {

    /// Create a new parser that parses the given Newick string
    fn new(newick: &'i str) -> Parser<'i> {
        Parser {
            builder:     TreeBuilder::new(),
            leaf_labels: HashSet::new(),
            pos:         Pos(1, 1),
            chars:       newick.chars().peekable(),
        }
    }

    /// Parse a tree followed by nothing but whitespace and comments
    fn parse_tree(mut self) -> Result<Tree> {
        let root = self.parse_subtree()?;
        self.skip_spaces()?;
        self.parse_symbol(';')?;
        self.skip_spaces()?;
        match self.chars.peek() {
            None => Ok(self.builder.finish(root)),
            _    => Self::error("expected end of input after `;'", self.pos),
        }
    }

    /// Consume the next character and advance the input position
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.pos = Pos(self.pos.0 + 1, 1);
        } else {
            self.pos = Pos(self.pos.0, self.pos.1 + 1);
        }
        Some(c)
    }

    /// Parse the given symbol
    fn parse_symbol(&mut self, sym: char) -> Result<()> {
        let pos = self.pos;
        match self.bump() {
            Some(c) if c == sym => Ok(()),
            _                   => Self::error(&format!("expected `{}'", sym), pos),
        }
    }

    /// Skip over whitespace and comments
    fn skip_spaces(&mut self) -> Result<()> {
        loop {
            match self.chars.peek() {
                Some(&c) if c.is_whitespace() => {
                    self.bump();
                },
                Some('[') => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Skip a `[...]` comment
    fn skip_comment(&mut self) -> Result<()> {
        let pos = self.pos;
        self.bump();
        loop {
            match self.bump() {
                Some(']') => return Ok(()),
                Some(_)   => (),
                None      => return Self::error("unterminated comment", pos),
            }
        }
    }

    /// Parse one subtree
    fn parse_subtree(&mut self) -> Result<Node> {
        self.skip_spaces()?;
        match self.chars.peek() {

            Some('(') => {
                self.bump();
                let children = self.parse_subtrees()?;
                self.skip_spaces()?;
                self.parse_symbol(')')?;
                let label = self.parse_label()?;
                self.skip_edge_length()?;
                Ok(self.builder.new_node(children, label))
            },

            _ => {
                let pos = self.pos;
                let label = match self.parse_label()? {
                    Some(label) if !label.is_empty() => label,
                    _                                => return Self::error("expected leaf label", pos),
                };
                if !self.leaf_labels.insert(label.clone()) {
                    return Self::error(&format!("duplicate leaf label `{}'", label), pos);
                }
                self.skip_edge_length()?;
                Ok(self.builder.new_leaf(label))
            },
        }
    }

    /// Parse a list of subtrees
    fn parse_subtrees(&mut self) -> Result<Vec<Node>> {

        let mut nodes = vec![];
        let node = self.parse_subtree()?;
        nodes.push(node);

        loop {

            self.skip_spaces()?;
            match self.chars.peek() {

                Some(',') => {
                    self.bump();
                    let node = self.parse_subtree()?;
                    nodes.push(node);
                },

                _ => break,
            };
        }

        Ok(nodes)
    }

    /// Skip edge lengths
    fn skip_edge_length(&mut self) -> Result<()> {

        self.skip_spaces()?;

        match self.chars.peek() {
            Some(':') => (),
            _         => return Ok(()),
        }

        self.bump();

        loop {
            match self.chars.peek() {
                Some(&c) if !DELIMITERS.contains(&c) => {
                    self.bump();
                },
                _ => break,
            };
        }

        Ok(())
    }

    /// Parse a node label, quoted or not.  Returns `None` if there is no label.
    fn parse_label(&mut self) -> Result<Option<String>> {

        self.skip_spaces()?;
        if let Some('\'') = self.chars.peek() {
            return self.parse_quoted_label().map(Some);
        }

        let mut label = String::new();
        loop {
            match self.chars.peek() {
                Some(&c) if !DELIMITERS.contains(&c) && c != '\'' => {
                    label.push(c);
                    self.bump();
                },
                _ => break,
            }
        }

        let label = label.trim();
        if label.is_empty() {
            Ok(None)
        } else {
            Ok(Some(label.to_string()))
        }
    }

    /// Parse a label enclosed in single quotes
    fn parse_quoted_label(&mut self) -> Result<String> {
        let pos = self.pos;
        self.bump();

        let mut label = String::new();
        loop {
            match self.bump() {
                Some('\'') => match self.chars.peek() {
                    Some('\'') => {
                        label.push('\'');
                        self.bump();
                    },
                    _ => return Ok(label),
                },
                Some(c) => label.push(c),
                None    => return Self::error("unterminated quoted label", pos),
            }
        }
    }

    /// Report an error at the given position
    fn error<T>(message: &str, pos: Pos) -> Result<T> {
        Err(Error {
            message: message.to_string(),
            pos,
        })
    }
}

/// Format a tree into a Newick string
///
/// # Example
///
/// ```
/// # use clade_sort::newick::*;
/// let newick = "((a,(b,(c,d))x),e);";
/// let tree   = parse_tree(newick).unwrap();
/// assert_eq!(newick, format_tree(&tree));
/// ```
pub fn format_tree(tree: &Tree) -> String {
    format_subtree(tree, tree.root())
}

/// Format the subtree rooted at `node` into a Newick string
pub fn format_subtree(tree: &Tree, node: Node) -> String {
    let mut formatter = Formatter::new(tree);
    formatter.visit_node(node);
    formatter.newick.push(';');
    formatter.newick
}

/// Quote a label if it contains characters that would otherwise end it
pub fn quote_label(label: &str) -> Cow<str> {
    let needs_quotes = label
        .chars()
        .any(|c| c.is_whitespace() || DELIMITERS.contains(&c) || c == ']' || c == '\'');
    if needs_quotes {
        Cow::Owned(format!("'{}'", label.replace('\'', "''")))
    } else {
        Cow::Borrowed(label)
    }
}

/// The state of the formatting process
struct Formatter<'a> {

    /// The tree being formatted
    tree: &'a Tree,

    /// The current string
    newick: String,
}

impl<'a> Formatter<'a> {

    /// Create a new formatter for the given tree
    fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            newick: String::new(),
        }
    }

    /// Visit the given node
    fn visit_node(&mut self, node: Node) {
        if !self.tree.is_leaf(node) {
            self.newick.push('(');
            for (i, &child) in self.tree.children(node).iter().enumerate() {
                if i > 0 {
                    self.newick.push(',');
                }
                self.visit_node(child);
            }
            self.newick.push(')');
        }
        if let Some(name) = self.tree.name(node) {
            self.newick.push_str(&quote_label(name));
        }
    }
}

impl fmt::Display for Pos {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.0, self.1)
    }
}
