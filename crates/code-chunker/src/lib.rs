//! # Repochunk Chunker
//!
//! Syntax-tree driven chunk extraction for JavaScript and TypeScript sources.
//!
//! Every named node of a file's concrete syntax tree is judged by a fixed
//! predicate table. Nodes that pass become [`Chunk`]s; nodes nested under a
//! significant ancestor also produce a [`ContextChunk`] that records the
//! enclosing scope. File-level facts (imports, exports, top-level
//! declarations) are attached to every chunk, and a final linking pass
//! derives name-based cross references.
//!
//! ## Architecture
//!
//! ```text
//! File text
//!     │
//!     ├──> Grammar Resolver (extension table → Grammar)
//!     │
//!     ├──> Syntax Parser (tree-sitter → SyntaxTree arena)
//!     │
//!     ├──> File Context Extractor (imports, exports, globalScope)
//!     │
//!     ├──> Chunk Builder
//!     │    ├─> Node Classifier (chunk-worthy?)
//!     │    └─> nearest significant ancestor → ContextChunk
//!     │
//!     └──> Relationship Linker (importedBy, calledBy, children)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use repochunk_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
//!
//! let code = r#"
//! function foo() {}
//! function bar() { foo(); }
//! "#;
//!
//! let file = chunker.chunk_str(code, "src/a.ts").unwrap();
//! for chunk in &file.chunks {
//!     println!("{} {} calls={:?}", chunk.id, chunk.name, chunk.calls);
//! }
//! ```

mod builder;
mod chunker;
mod classifier;
mod config;
mod error;
mod file_context;
mod language;
mod linker;
mod node_kind;
mod syntax;
mod types;

pub use builder::{BuildOutput, ChunkBuilder};
pub use chunker::Chunker;
pub use classifier::Classifier;
pub use config::{ChunkerConfig, ContextChunkMode, LinkScope};
pub use error::{ChunkerError, Result};
pub use file_context::extract_file_context;
pub use language::{Grammar, GrammarResolver};
pub use linker::link_chunks;
pub use node_kind::NodeKind;
pub use syntax::{NodeId, Position, SyntaxNode, SyntaxParser, SyntaxTree};
pub use types::{
    Chunk, ChunkRecord, ContextChunk, ContextRelationship, FileChunks, FileContext,
    Relationships, ANONYMOUS,
};
