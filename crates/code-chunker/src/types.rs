use crate::language::Grammar;
use serde::{Deserialize, Serialize};

/// Name given to nodes without a resolvable name
pub const ANONYMOUS: &str = "(anonymous)";

/// A semantically meaningful unit of source code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// `<nodeType>@<startLine>-<endLine>`
    pub id: String,

    /// Grammar kind of the node
    #[serde(rename = "type", alias = "nodeType")]
    pub node_type: String,

    /// Declared name, first named child, or [`ANONYMOUS`]
    pub name: String,

    /// Exact source text of the node
    pub text: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Kind of the immediate syntactic parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,

    /// Kinds of the direct named children, in order
    #[serde(default)]
    pub children_types: Vec<String>,

    /// Distance from the root (root = 0)
    pub depth: usize,

    pub language: String,

    /// Path relative to the collection root, `/`-separated
    pub file_path: String,

    #[serde(default)]
    pub file_context: FileContext,

    #[serde(default)]
    pub relationships: Relationships,

    /// Callee texts of every call inside the node, first occurrence order
    #[serde(default)]
    pub calls: Vec<String>,
}

impl Chunk {
    /// Chunk identifier for a node kind and line span
    #[must_use]
    pub fn make_id(node_type: &str, start_line: usize, end_line: usize) -> String {
        format!("{node_type}@{start_line}-{end_line}")
    }

    /// Whether the chunk has a usable name for relationship matching
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty() || self.name == ANONYMOUS
    }
}

/// File-level facts shared by every chunk of a file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileContext {
    /// Texts of every import statement
    pub imports: Vec<String>,

    /// Texts of every export statement
    pub exports: Vec<String>,

    /// Texts of variable declarations outside any function
    pub global_scope: Vec<String>,
}

/// Cross-reference edges, each a list of chunk ids
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Relationships {
    pub imported_by: Vec<String>,
    pub called_by: Vec<String>,
    pub children: Vec<String>,
}

/// How a node relates to its nearest significant ancestor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextRelationship {
    ClassMethod,
    InterfaceMethod,
    NestedFunction,
    Contained,
}

impl ContextRelationship {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClassMethod => "class_method",
            Self::InterfaceMethod => "interface_method",
            Self::NestedFunction => "nested_function",
            Self::Contained => "contained",
        }
    }
}

/// Secondary record tying a node to its contextual ancestor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContextChunk {
    /// `<childType>@<startLine>-<endLine>^<parentId>`
    pub id: String,

    /// Chunk-style id of the ancestor
    pub parent_id: String,

    pub parent_type: String,
    pub child_type: String,
    pub relationship: ContextRelationship,

    /// Resolved name of the ancestor
    pub scope: String,

    /// Source text of the child node
    pub text: String,

    pub start_line: usize,
    pub end_line: usize,
    pub language: String,
    pub file_path: String,
}

impl ContextChunk {
    #[must_use]
    pub fn make_id(child_type: &str, start_line: usize, end_line: usize, parent_id: &str) -> String {
        format!("{child_type}@{start_line}-{end_line}^{parent_id}")
    }
}

/// One element of the serialized output array
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum ChunkRecord {
    Chunk(Chunk),
    Context(ContextChunk),
}

impl ChunkRecord {
    #[must_use]
    pub fn file_path(&self) -> &str {
        match self {
            Self::Chunk(chunk) => &chunk.file_path,
            Self::Context(context) => &context.file_path,
        }
    }

    #[must_use]
    pub const fn start_line(&self) -> usize {
        match self {
            Self::Chunk(chunk) => chunk.start_line,
            Self::Context(context) => context.start_line,
        }
    }
}

/// Everything extracted from one file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileChunks {
    pub file_path: String,
    pub grammar: Grammar,
    /// Lines in the source text
    pub line_count: usize,
    pub chunks: Vec<Chunk>,
    pub context_chunks: Vec<ContextChunk>,
}

impl FileChunks {
    /// Flatten into output records, chunks first
    #[must_use]
    pub fn into_records(self) -> Vec<ChunkRecord> {
        self.chunks
            .into_iter()
            .map(ChunkRecord::Chunk)
            .chain(self.context_chunks.into_iter().map(ChunkRecord::Context))
            .collect()
    }
}
