use crate::config::ChunkerConfig;
use crate::node_kind::NodeKind;
use crate::syntax::{NodeId, SyntaxTree};
use std::collections::HashSet;

/// Decides which syntax nodes become chunks.
///
/// Every node is judged on its own; a chunk-worthy node inside another
/// chunk-worthy node yields two overlapping chunks.
#[derive(Debug, Clone)]
pub struct Classifier {
    enabled: HashSet<NodeKind>,
    switch_case_min_children: usize,
    if_consequence_min_children: usize,
}

impl Classifier {
    pub fn new(config: &ChunkerConfig) -> Self {
        Self {
            enabled: config.chunk_kinds.iter().copied().collect(),
            switch_case_min_children: config.switch_case_min_children,
            if_consequence_min_children: config.if_consequence_min_children,
        }
    }

    /// Whether the node at `id` is a chunk
    #[must_use]
    pub fn is_chunk_worthy(&self, tree: &SyntaxTree<'_>, id: NodeId) -> bool {
        let kind = tree.kind(id);
        if !self.enabled.contains(&kind) {
            return false;
        }

        match kind {
            NodeKind::FunctionDeclaration
            | NodeKind::ClassDeclaration
            | NodeKind::AbstractClassDeclaration
            | NodeKind::Class
            | NodeKind::MethodDefinition
            | NodeKind::InterfaceDeclaration
            | NodeKind::TypeAliasDeclaration
            | NodeKind::ArrowFunction
            | NodeKind::FunctionExpression
            | NodeKind::GeneratorFunctionDeclaration
            | NodeKind::GeneratorFunction
            | NodeKind::ObjectPattern
            | NodeKind::ArrayPattern
            | NodeKind::JsxElement
            | NodeKind::JsxSelfClosingElement
            | NodeKind::Decorator
            | NodeKind::TryStatement => true,

            NodeKind::LexicalDeclaration | NodeKind::VariableDeclaration => {
                declares_structured_value(tree, id)
            }

            NodeKind::ExportStatement => tree
                .child_by_field(id, "declaration")
                .or_else(|| tree.child_by_field(id, "value"))
                .is_some_and(|inner| self.is_chunk_worthy(tree, inner)),

            NodeKind::SwitchCase => tree.children(id).len() >= self.switch_case_min_children,

            NodeKind::IfStatement => tree.child_by_field(id, "consequence").is_some_and(|body| {
                tree.kind(body) == NodeKind::StatementBlock
                    || tree.children(body).len() >= self.if_consequence_min_children
            }),

            NodeKind::Object => tree
                .parent(id)
                .map_or(true, |parent| tree.kind(parent) != NodeKind::VariableDeclarator),

            NodeKind::Program
            | NodeKind::ClassBody
            | NodeKind::MethodSignature
            | NodeKind::AbstractMethodSignature
            | NodeKind::EnumDeclaration
            | NodeKind::InternalModule
            | NodeKind::Module
            | NodeKind::VariableDeclarator
            | NodeKind::Array
            | NodeKind::ImportStatement
            | NodeKind::SwitchStatement
            | NodeKind::StatementBlock
            | NodeKind::CallExpression
            | NodeKind::Error
            | NodeKind::Other => false,
        }
    }
}

/// At least one declarator binds an object, array or function value
fn declares_structured_value(tree: &SyntaxTree<'_>, id: NodeId) -> bool {
    tree.children(id)
        .iter()
        .filter(|child| tree.kind(**child) == NodeKind::VariableDeclarator)
        .filter_map(|declarator| tree.child_by_field(*declarator, "value"))
        .any(|value| {
            matches!(
                tree.kind(value),
                NodeKind::Object
                    | NodeKind::Array
                    | NodeKind::ArrowFunction
                    | NodeKind::FunctionExpression
                    | NodeKind::GeneratorFunction
            )
        })
}
