use crate::classifier::Classifier;
use crate::config::ContextChunkMode;
use crate::language::Grammar;
use crate::node_kind::NodeKind;
use crate::syntax::{NodeId, SyntaxTree};
use crate::types::{Chunk, ContextChunk, ContextRelationship, FileContext, Relationships, ANONYMOUS};

/// Chunks and context records of one walk
#[derive(Debug, Default)]
pub struct BuildOutput {
    pub chunks: Vec<Chunk>,
    pub context_chunks: Vec<ContextChunk>,
}

/// Walks a syntax tree and materializes chunk records
pub struct ChunkBuilder<'a> {
    classifier: &'a Classifier,
    context_mode: ContextChunkMode,
}

impl<'a> ChunkBuilder<'a> {
    pub const fn new(classifier: &'a Classifier, context_mode: ContextChunkMode) -> Self {
        Self {
            classifier,
            context_mode,
        }
    }

    /// Depth-first pre-order walk over every named node.
    ///
    /// `file_context` is copied onto each chunk; relationships stay empty
    /// until the linker runs.
    pub fn build(
        &self,
        tree: &SyntaxTree<'_>,
        grammar: Grammar,
        file_path: &str,
        file_context: &FileContext,
    ) -> BuildOutput {
        let mut output = BuildOutput::default();
        let language = grammar.language_name();
        let mut stack = vec![(tree.root(), 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let chunk_worthy = self.classifier.is_chunk_worthy(tree, id);
            if chunk_worthy {
                output.chunks.push(Chunk {
                    id: node_id(tree, id),
                    node_type: tree.node(id).kind_name.to_string(),
                    name: resolve_name(tree, id),
                    text: tree.text(id).to_string(),
                    start_line: tree.node(id).start_line(),
                    end_line: tree.node(id).end_line(),
                    parent_type: tree
                        .parent(id)
                        .map(|parent| tree.node(parent).kind_name.to_string()),
                    children_types: tree
                        .children(id)
                        .iter()
                        .map(|child| tree.node(*child).kind_name.to_string())
                        .collect(),
                    depth,
                    language: language.to_string(),
                    file_path: file_path.to_string(),
                    file_context: file_context.clone(),
                    relationships: Relationships::default(),
                    calls: collect_calls(tree, id),
                });
            }

            let wants_context = match self.context_mode {
                ContextChunkMode::AllNodes => true,
                ContextChunkMode::ChunksOnly => chunk_worthy,
                ContextChunkMode::Off => false,
            };
            if wants_context {
                if let Some(context) = context_chunk(tree, id, language, file_path) {
                    output.context_chunks.push(context);
                }
            }

            stack.extend(
                tree.children(id)
                    .iter()
                    .rev()
                    .map(|child| (*child, depth + 1)),
            );
        }

        output
    }
}

fn node_id(tree: &SyntaxTree<'_>, id: NodeId) -> String {
    let node = tree.node(id);
    Chunk::make_id(node.kind_name, node.start_line(), node.end_line())
}

/// `name` field, else the first named child's text, else [`ANONYMOUS`]
pub(crate) fn resolve_name(tree: &SyntaxTree<'_>, id: NodeId) -> String {
    tree.child_by_field(id, "name")
        .or_else(|| tree.children(id).first().copied())
        .map(|named| tree.text(named))
        .filter(|text| !text.is_empty())
        .map_or_else(|| ANONYMOUS.to_string(), str::to_string)
}

/// Callee texts of every call expression in the subtree, de-duplicated
fn collect_calls(tree: &SyntaxTree<'_>, id: NodeId) -> Vec<String> {
    let mut calls: Vec<String> = Vec::new();
    for node in tree.descendants(id) {
        if tree.kind(node) != NodeKind::CallExpression {
            continue;
        }
        let Some(callee) = tree.child_by_field(node, "function") else {
            continue;
        };
        let target = tree.text(callee);
        if !target.is_empty() && !calls.iter().any(|known| known == target) {
            calls.push(target.to_string());
        }
    }
    calls
}

fn context_chunk(
    tree: &SyntaxTree<'_>,
    id: NodeId,
    language: &str,
    file_path: &str,
) -> Option<ContextChunk> {
    let ancestor = tree
        .ancestors(id)
        .find(|ancestor| tree.kind(*ancestor).is_significant())?;

    let node = tree.node(id);
    let parent_id = node_id(tree, ancestor);
    Some(ContextChunk {
        id: ContextChunk::make_id(node.kind_name, node.start_line(), node.end_line(), &parent_id),
        parent_id,
        parent_type: tree.node(ancestor).kind_name.to_string(),
        child_type: node.kind_name.to_string(),
        relationship: relationship(tree.kind(ancestor), node.kind),
        scope: resolve_name(tree, ancestor),
        text: tree.text(id).to_string(),
        start_line: node.start_line(),
        end_line: node.end_line(),
        language: language.to_string(),
        file_path: file_path.to_string(),
    })
}

fn relationship(ancestor: NodeKind, child: NodeKind) -> ContextRelationship {
    if ancestor.is_class_like() && child == NodeKind::MethodDefinition {
        ContextRelationship::ClassMethod
    } else if ancestor == NodeKind::InterfaceDeclaration
        && matches!(child, NodeKind::MethodSignature | NodeKind::MethodDefinition)
    {
        ContextRelationship::InterfaceMethod
    } else if ancestor.is_function_like() && child.is_function_like() {
        ContextRelationship::NestedFunction
    } else {
        ContextRelationship::Contained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkerConfig;
    use crate::syntax::SyntaxParser;
    use pretty_assertions::assert_eq;

    fn build(source: &str, mode: ContextChunkMode) -> BuildOutput {
        let tree = SyntaxParser::new(Grammar::TypeScript)
            .unwrap()
            .parse(source)
            .unwrap();
        let classifier = Classifier::new(&ChunkerConfig::default());
        ChunkBuilder::new(&classifier, mode).build(
            &tree,
            Grammar::TypeScript,
            "a.ts",
            &FileContext::default(),
        )
    }

    #[test]
    fn function_chunk_fields() {
        let output = build("\nfunction foo(a) {\n  return bar(a);\n}\n", ContextChunkMode::Off);
        assert_eq!(output.chunks.len(), 1);
        let chunk = &output.chunks[0];
        assert_eq!(chunk.id, "function_declaration@2-4");
        assert_eq!(chunk.name, "foo");
        assert_eq!(chunk.parent_type.as_deref(), Some("program"));
        assert_eq!(chunk.depth, 1);
        assert_eq!(
            chunk.children_types,
            vec!["identifier", "formal_parameters", "statement_block"]
        );
        assert_eq!(chunk.calls, vec!["bar"]);
        assert_eq!(chunk.language, "typescript");
        assert!(output.context_chunks.is_empty());
    }

    #[test]
    fn calls_are_deduplicated_in_order() {
        let output = build(
            "function f() { b(); a(); b(); this.store.save(); }",
            ContextChunkMode::Off,
        );
        assert_eq!(output.chunks[0].calls, vec!["b", "a", "this.store.save"]);
    }

    #[test]
    fn anonymous_arrow_falls_back_to_first_named_child() {
        let output = build("run(() => {});", ContextChunkMode::Off);
        assert_eq!(output.chunks.len(), 1);
        // formal_parameters `()` is the first named child
        assert_eq!(output.chunks[0].name, "()");
    }

    #[test]
    fn class_method_context() {
        let output = build(
            "class Box {\n  open() {\n    return 1;\n  }\n}\n",
            ContextChunkMode::ChunksOnly,
        );
        let kinds: Vec<_> = output.chunks.iter().map(|c| c.node_type.as_str()).collect();
        assert_eq!(kinds, vec!["class_declaration", "method_definition"]);

        assert_eq!(output.context_chunks.len(), 1);
        let context = &output.context_chunks[0];
        assert_eq!(context.relationship, ContextRelationship::ClassMethod);
        assert_eq!(context.parent_type, "class_declaration");
        assert_eq!(context.scope, "Box");
        assert_eq!(context.parent_id, "class_declaration@1-5");
        assert_eq!(
            context.id,
            "method_definition@2-4^class_declaration@1-5"
        );
    }

    #[test]
    fn interface_and_nested_function_context() {
        let output = build(
            "interface Shape {\n  area(): number;\n}\nfunction outer() {\n  function inner() {}\n}\n",
            ContextChunkMode::AllNodes,
        );
        let signature = output
            .context_chunks
            .iter()
            .find(|c| c.child_type == "method_signature")
            .unwrap();
        assert_eq!(signature.relationship, ContextRelationship::InterfaceMethod);
        assert_eq!(signature.scope, "Shape");

        let inner = output
            .context_chunks
            .iter()
            .find(|c| c.child_type == "function_declaration")
            .unwrap();
        assert_eq!(inner.relationship, ContextRelationship::NestedFunction);
        assert_eq!(inner.scope, "outer");
    }

    #[test]
    fn top_level_nodes_have_no_context() {
        let output = build("function foo() {}\n", ContextChunkMode::ChunksOnly);
        assert_eq!(output.chunks.len(), 1);
        assert!(output.context_chunks.is_empty());
    }

    #[test]
    fn all_nodes_mode_covers_non_chunks() {
        let output = build("function foo() { return 1; }\n", ContextChunkMode::AllNodes);
        assert_eq!(output.chunks.len(), 1);
        assert!(output
            .context_chunks
            .iter()
            .all(|c| c.parent_type == "function_declaration"
                && c.relationship == ContextRelationship::Contained));
        assert!(output
            .context_chunks
            .iter()
            .any(|c| c.child_type == "return_statement"));
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let depth = 500;
        let source = format!("const v = {}1{};", "[".repeat(depth), "]".repeat(depth));
        let output = build(&source, ContextChunkMode::Off);
        assert_eq!(output.chunks.len(), 1);
        assert_eq!(output.chunks[0].node_type, "lexical_declaration");
    }
}
