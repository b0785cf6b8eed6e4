use pretty_assertions::assert_eq;
use repochunk_chunker::{
    link_chunks, Chunk, ChunkRecord, Chunker, ChunkerConfig, ContextChunkMode,
    ContextRelationship,
};

fn chunk(code: &str, file_path: &str) -> Vec<Chunk> {
    Chunker::default()
        .chunk_str(code, file_path)
        .expect("chunking failed")
        .chunks
}

fn find<'a>(chunks: &'a [Chunk], node_type: &str, name: &str) -> &'a Chunk {
    chunks
        .iter()
        .find(|c| c.node_type == node_type && c.name == name)
        .unwrap_or_else(|| panic!("no {node_type} named {name} in {chunks:#?}"))
}

#[test]
fn call_edges_between_two_functions() {
    let chunks = chunk("function foo(){}\nfunction bar(){ foo(); }\n", "a.ts");
    assert_eq!(chunks.len(), 2);

    let foo = find(&chunks, "function_declaration", "foo");
    let bar = find(&chunks, "function_declaration", "bar");
    assert_eq!(bar.calls, vec!["foo"]);
    assert!(bar.relationships.called_by.is_empty());
    assert_eq!(foo.relationships.called_by, vec![bar.id.clone()]);
    assert_eq!(foo.relationships.called_by, vec!["function_declaration@2-2"]);
}

#[test]
fn plain_constant_versus_arrow_constant() {
    assert!(chunk("const x = 1;\n", "x.js").is_empty());

    let chunks = chunk("const f = () => {};\n", "f.js");
    assert!(chunks.iter().any(|c| c.node_type == "lexical_declaration"));
}

#[test]
fn class_with_methods() {
    let code = r"
export class Cart {
  add(item) {
    this.items.push(item);
  }

  total() {
    return this.items.reduce((sum, i) => sum + i.price, 0);
  }
}
";
    let chunks = chunk(code, "cart.js");
    let kinds: Vec<_> = chunks.iter().map(|c| c.node_type.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "export_statement",
            "class_declaration",
            "method_definition",
            "method_definition",
            "arrow_function",
        ]
    );

    let class = find(&chunks, "class_declaration", "Cart");
    assert_eq!(class.parent_type.as_deref(), Some("export_statement"));
    assert_eq!(class.depth, 2);

    let add = find(&chunks, "method_definition", "add");
    assert_eq!(add.start_line, 3);
    assert_eq!(add.end_line, 5);
    assert_eq!(add.calls, vec!["this.items.push"]);
    // Both methods share `class_body` as parent; the arrow function sits deeper
    // but under `arguments`, so it is nobody's child.
    assert!(add.relationships.children.is_empty());
}

#[test]
fn same_line_arrow_functions_collide_but_are_kept() {
    let chunks = chunk("run(() => 1, () => 2);\n", "dup.js");
    let arrows: Vec<_> = chunks
        .iter()
        .filter(|c| c.node_type == "arrow_function")
        .collect();
    assert_eq!(arrows.len(), 2);
    assert_eq!(arrows[0].id, arrows[1].id);
    assert_eq!(arrows[0].id, "arrow_function@1-1");
    assert_ne!(arrows[0].text, arrows[1].text);
}

#[test]
fn tsx_component_chunks() {
    let code = r#"
import React from "react";

interface Props {
  title: string;
}

export const Header = ({ title }: Props) => {
  return <h1 className="header">{title}</h1>;
};
"#;
    let chunks = chunk(code, "Header.tsx");
    let kinds: Vec<_> = chunks.iter().map(|c| c.node_type.as_str()).collect();
    assert!(kinds.contains(&"interface_declaration"));
    assert!(kinds.contains(&"export_statement"));
    assert!(kinds.contains(&"lexical_declaration"));
    assert!(kinds.contains(&"arrow_function"));
    assert!(kinds.contains(&"object_pattern"));
    assert!(kinds.contains(&"jsx_element"));

    for c in &chunks {
        assert_eq!(c.language, "typescript");
        assert_eq!(c.file_context.imports, vec![r#"import React from "react";"#]);
    }
}

#[test]
fn default_exported_component_class() {
    let code = "export default class extends Component {\n  render() {\n    return <Title />;\n  }\n}\n";
    let chunks = chunk(code, "Page.jsx");
    let kinds: Vec<_> = chunks.iter().map(|c| c.node_type.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "export_statement",
            "class",
            "method_definition",
            "jsx_self_closing_element",
        ]
    );

    let class = chunks.iter().find(|c| c.node_type == "class").unwrap();
    assert_eq!((class.start_line, class.end_line), (1, 5));
    assert_eq!(class.parent_type.as_deref(), Some("export_statement"));
}

#[test]
fn nested_function_context_records() {
    let code = "function outer() {\n  function inner() {}\n  return inner;\n}\n";
    let config = ChunkerConfig {
        context_chunks: ContextChunkMode::ChunksOnly,
        ..Default::default()
    };
    let file = Chunker::new(config)
        .unwrap()
        .chunk_str(code, "nested.js")
        .unwrap();
    assert_eq!(file.chunks.len(), 2);
    assert_eq!(file.context_chunks.len(), 1);

    let context = &file.context_chunks[0];
    assert_eq!(context.relationship, ContextRelationship::NestedFunction);
    assert_eq!(context.scope, "outer");
    assert_eq!(context.child_type, "function_declaration");
    assert_eq!(context.parent_id, "function_declaration@1-4");
    assert_eq!(
        context.id,
        "function_declaration@2-2^function_declaration@1-4"
    );
}

#[test]
fn syntax_errors_do_not_abort_extraction() {
    let code = "function ok() { return 1; }\nfunction broken( {\n";
    let chunks = chunk(code, "broken.js");
    assert!(chunks.iter().any(|c| c.name == "ok"));
    assert!(chunks.iter().all(|c| c.node_type != "ERROR"));
}

#[test]
fn repository_linking_crosses_files() {
    let chunker = Chunker::new(ChunkerConfig::for_repository()).unwrap();
    let mut chunks = chunker
        .chunk_str("export function formatDate(d) { return d; }\n", "util.ts")
        .unwrap()
        .chunks;
    chunks.extend(
        chunker
            .chunk_str(
                "import { formatDate } from './util';\nfunction view() { formatDate(1); }\n",
                "view.ts",
            )
            .unwrap()
            .chunks,
    );
    link_chunks(&mut chunks);

    let format = find(&chunks, "function_declaration", "formatDate");
    assert_eq!(format.relationships.imported_by, vec!["function_declaration@2-2"]);
    assert_eq!(format.relationships.called_by, vec!["function_declaration@2-2"]);
}

#[test]
fn records_serialize_as_flat_tagged_array() {
    let file = Chunker::default()
        .chunk_str("class A { m() {} }\n", "a.ts")
        .unwrap();
    let records = file.into_records();
    assert!(matches!(records[0], ChunkRecord::Chunk(_)));

    let json = serde_json::to_value(&records).unwrap();
    let array = json.as_array().unwrap();
    assert!(array.iter().any(|r| r["record"] == "chunk" && r["type"] == "class_declaration"));
    assert!(array
        .iter()
        .any(|r| r["record"] == "context" && r["relationship"] == "class_method"));

    let back: Vec<ChunkRecord> = serde_json::from_value(json).unwrap();
    assert_eq!(back, records);
}
