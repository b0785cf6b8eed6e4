use crate::builder::ChunkBuilder;
use crate::classifier::Classifier;
use crate::config::{ChunkerConfig, LinkScope};
use crate::error::{ChunkerError, Result};
use crate::file_context::extract_file_context;
use crate::language::{Grammar, GrammarResolver};
use crate::linker::link_chunks;
use crate::syntax::SyntaxParser;
use crate::types::FileChunks;
use std::collections::HashSet;
use std::path::Path;

/// Main chunker interface for processing one file at a time.
///
/// A `Chunker` holds no parser; every call creates its own, so a shared
/// instance can serve concurrent tasks.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
    resolver: GrammarResolver,
    classifier: Classifier,
}

impl Chunker {
    /// Create a new chunker with a validated configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            resolver: GrammarResolver::new(config.extensions.clone()),
            classifier: Classifier::new(&config),
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Grammar for a path, `None` when the extension is not configured
    pub fn grammar_for(&self, path: impl AsRef<Path>) -> Option<Grammar> {
        self.resolver.resolve_path(path)
    }

    /// Chunk source text; the grammar comes from the extension of `file_path`
    pub fn chunk_str(&self, content: &str, file_path: &str) -> Result<FileChunks> {
        let grammar = self
            .grammar_for(file_path)
            .ok_or_else(|| ChunkerError::unsupported_language(file_path))?;
        self.chunk_with_grammar(content, file_path, grammar)
    }

    /// Read and chunk a file from disk.
    ///
    /// `file_path` is the label recorded on the chunks (normally the path
    /// relative to the collection root).
    pub fn chunk_file(&self, path: impl AsRef<Path>, file_path: &str) -> Result<FileChunks> {
        let path = path.as_ref();
        let grammar = self
            .grammar_for(path)
            .ok_or_else(|| ChunkerError::unsupported_language(path.display().to_string()))?;
        let bytes = std::fs::read(path).map_err(|e| ChunkerError::io(path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| {
            ChunkerError::parse(format!("{}: not valid UTF-8 ({e})", path.display()))
        })?;
        self.chunk_with_grammar(&content, file_path, grammar)
    }

    /// Chunk code with an explicit grammar
    pub fn chunk_with_grammar(
        &self,
        content: &str,
        file_path: &str,
        grammar: Grammar,
    ) -> Result<FileChunks> {
        let mut parser = SyntaxParser::new(grammar)?;
        let tree = parser.parse(content)?;
        if tree.has_errors() {
            log::debug!("{file_path}: syntax errors recovered while parsing");
        }

        let file_context = extract_file_context(&tree);
        let output = ChunkBuilder::new(&self.classifier, self.config.context_chunks).build(
            &tree,
            grammar,
            file_path,
            &file_context,
        );

        let mut chunks = output.chunks;
        let mut seen = HashSet::new();
        for chunk in &chunks {
            if !seen.insert(chunk.id.as_str()) {
                log::debug!("{file_path}: duplicate chunk id {}", chunk.id);
            }
        }

        if self.config.link_scope == LinkScope::File {
            link_chunks(&mut chunks);
        }

        log::debug!(
            "{file_path}: {} chunks, {} context records",
            chunks.len(),
            output.context_chunks.len()
        );

        Ok(FileChunks {
            file_path: file_path.to_string(),
            grammar,
            line_count: content.lines().count(),
            chunks,
            context_chunks: output.context_chunks,
        })
    }
}

impl Default for Chunker {
    fn default() -> Self {
        let config = ChunkerConfig::default();
        Self {
            resolver: GrammarResolver::new(config.extensions.clone()),
            classifier: Classifier::new(&config),
            config,
        }
    }
}
