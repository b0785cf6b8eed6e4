//! Concrete syntax tree stored as an index-addressed arena.
//!
//! Tree-sitter trees borrow their source and hand out short-lived node
//! handles. The engine copies the parts it needs into a flat `Vec` once per
//! file: parent and child relations become [`NodeId`] indices, so walking up
//! to an ancestor or down into children never involves shared ownership.
//! Nodes are stored in pre-order, which is also document order.

use crate::error::{ChunkerError, Result};
use crate::language::Grammar;
use crate::node_kind::NodeKind;
use serde::Serialize;
use tree_sitter::Parser;

/// Index of a node inside a [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The tree root always sits at index zero
    pub const ROOT: NodeId = NodeId(0);

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Zero-based row/column position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl From<tree_sitter::Point> for Position {
    fn from(point: tree_sitter::Point) -> Self {
        Self {
            row: point.row,
            column: point.column,
        }
    }
}

/// One named node of the concrete syntax tree
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Raw grammar kind, e.g. `function_declaration`
    pub kind_name: &'static str,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start: Position,
    pub end: Position,
    pub parent: Option<NodeId>,
    /// Named children in source order
    pub children: Vec<NodeId>,
    fields: Vec<(&'static str, NodeId)>,
}

impl SyntaxNode {
    /// 1-based first line
    #[must_use]
    pub const fn start_line(&self) -> usize {
        self.start.row + 1
    }

    /// 1-based last line (inclusive)
    #[must_use]
    pub const fn end_line(&self) -> usize {
        self.end.row + 1
    }
}

/// Arena of named nodes plus the source they were parsed from
#[derive(Debug)]
pub struct SyntaxTree<'src> {
    source: &'src str,
    nodes: Vec<SyntaxNode>,
    has_errors: bool,
}

impl<'src> SyntaxTree<'src> {
    fn from_tree_sitter(tree: &tree_sitter::Tree, source: &'src str) -> Self {
        let root = tree.root_node();
        let mut nodes: Vec<SyntaxNode> = Vec::new();
        // (node, parent, field name); children pushed in reverse keep pre-order.
        let mut stack = vec![(root, None::<NodeId>, None::<&'static str>)];

        while let Some((ts_node, parent, field)) = stack.pop() {
            let id = NodeId(nodes.len());
            nodes.push(SyntaxNode {
                kind: NodeKind::from_grammar(ts_node.kind()),
                kind_name: ts_node.kind(),
                start_byte: ts_node.start_byte(),
                end_byte: ts_node.end_byte(),
                start: ts_node.start_position().into(),
                end: ts_node.end_position().into(),
                parent,
                children: Vec::new(),
                fields: Vec::new(),
            });

            if let Some(parent_id) = parent {
                let parent_node = &mut nodes[parent_id.0];
                parent_node.children.push(id);
                if let Some(field) = field {
                    parent_node.fields.push((field, id));
                }
            }

            let mut named = Vec::new();
            let mut cursor = ts_node.walk();
            if cursor.goto_first_child() {
                loop {
                    let child = cursor.node();
                    if child.is_named() {
                        named.push((child, Some(id), cursor.field_name()));
                    }
                    if !cursor.goto_next_sibling() {
                        break;
                    }
                }
            }
            stack.extend(named.into_iter().rev());
        }

        Self {
            source,
            nodes,
            has_errors: root.has_error(),
        }
    }

    /// Root node id
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Look up a named child by its semantic role (`name`, `consequence`, ...)
    #[must_use]
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.nodes[id.0]
            .fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, child)| *child)
    }

    /// Exact source text spanned by the node
    #[must_use]
    pub fn text(&self, id: NodeId) -> &'src str {
        let node = &self.nodes[id.0];
        self.source
            .get(node.start_byte..node.end_byte)
            .unwrap_or_default()
    }

    /// Ancestors from the immediate parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Every node id in pre-order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Pre-order ids of the subtree rooted at `id` (inclusive)
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![id];
        std::iter::from_fn(move || {
            let current = stack.pop()?;
            stack.extend(self.children(current).iter().rev().copied());
            Some(current)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether tree-sitter had to recover from syntax errors
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.has_errors
    }
}

/// Parser bound to one grammar; one instance per unit of work
pub struct SyntaxParser {
    parser: Parser,
    grammar: Grammar,
}

impl SyntaxParser {
    /// Create a new parser for the given grammar
    pub fn new(grammar: Grammar) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar.tree_sitter_language())
            .map_err(|e| ChunkerError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(Self { parser, grammar })
    }

    /// Parse source text into an arena tree; syntax errors are tolerated
    pub fn parse<'src>(&mut self, source: &'src str) -> Result<SyntaxTree<'src>> {
        let tree = self.parser.parse(source, None).ok_or_else(|| {
            ChunkerError::parse(format!(
                "tree-sitter produced no tree for {} source",
                self.grammar.as_str()
            ))
        })?;
        Ok(SyntaxTree::from_tree_sitter(&tree, source))
    }
}
