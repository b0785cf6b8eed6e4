use crate::node_kind::NodeKind;
use crate::syntax::{NodeId, SyntaxTree};
use crate::types::FileContext;

/// Collect imports, exports and top-level declarations of a file
pub fn extract_file_context(tree: &SyntaxTree<'_>) -> FileContext {
    let mut context = FileContext::default();

    for id in tree.ids() {
        match tree.kind(id) {
            NodeKind::ImportStatement => context.imports.push(tree.text(id).to_string()),
            NodeKind::ExportStatement => context.exports.push(tree.text(id).to_string()),
            kind if kind.is_variable_declaration() && !inside_function(tree, id) => {
                context.global_scope.push(tree.text(id).to_string());
            }
            _ => {}
        }
    }

    context
}

fn inside_function(tree: &SyntaxTree<'_>, id: NodeId) -> bool {
    tree.ancestors(id)
        .any(|ancestor| tree.kind(ancestor).is_function_like())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Grammar;
    use crate::syntax::SyntaxParser;
    use pretty_assertions::assert_eq;

    fn context_of(source: &str) -> FileContext {
        let tree = SyntaxParser::new(Grammar::TypeScript)
            .unwrap()
            .parse(source)
            .unwrap();
        extract_file_context(&tree)
    }

    #[test]
    fn collects_imports_and_exports() {
        let context = context_of(
            "import { a } from './a';\nimport b from 'b';\nexport const c = 1;\nexport { a };\n",
        );
        assert_eq!(
            context.imports,
            vec!["import { a } from './a';", "import b from 'b';"]
        );
        assert_eq!(context.exports, vec!["export const c = 1;", "export { a };"]);
    }

    #[test]
    fn global_scope_skips_function_locals() {
        let context = context_of(
            "const top = 1;\nlet other = 2;\nfunction f() { const local = 3; }\nconst g = () => { var inner = 4; };\nif (top) { var hoisted = 5; }\n",
        );
        assert_eq!(
            context.global_scope,
            vec![
                "const top = 1;",
                "let other = 2;",
                "const g = () => { var inner = 4; };",
                "var hoisted = 5;",
            ]
        );
    }

    #[test]
    fn method_bodies_are_function_scope() {
        let context = context_of("class A { m() { const x = 1; } }\n");
        assert!(context.global_scope.is_empty());
    }

    #[test]
    fn empty_file_has_empty_context() {
        assert_eq!(context_of(""), FileContext::default());
    }
}
