use crate::error::{ChunkerError, Result};
use crate::language::Grammar;
use crate::node_kind::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for chunk extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Node kinds whose chunk-worthiness predicate is enabled
    pub chunk_kinds: Vec<NodeKind>,

    /// Minimum named children for a `switch_case` to become a chunk
    pub switch_case_min_children: usize,

    /// Minimum named children of a non-block `if` consequence
    pub if_consequence_min_children: usize,

    /// Which nodes emit a context record for their significant ancestor
    pub context_chunks: ContextChunkMode,

    /// Set of chunks relationships are computed over
    pub link_scope: LinkScope,

    /// Extension (with leading dot) to grammar table
    pub extensions: BTreeMap<String, Grammar>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_kinds: NodeKind::CLASSIFIABLE.to_vec(),
            switch_case_min_children: 3,
            if_consequence_min_children: 2,
            context_chunks: ContextChunkMode::AllNodes,
            link_scope: LinkScope::File,
            extensions: Grammar::default_extensions(),
        }
    }
}

impl ChunkerConfig {
    /// Output meant for an embedding pipeline: primary chunks carry the
    /// payload, context records only for the chunks themselves
    pub fn for_embeddings() -> Self {
        Self {
            context_chunks: ContextChunkMode::ChunksOnly,
            ..Default::default()
        }
    }

    /// Cross-file linking over the whole repository
    pub fn for_repository() -> Self {
        Self {
            link_scope: LinkScope::Repository,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(ChunkerError::invalid_config(
                "extensions table must not be empty",
            ));
        }

        for ext in self.extensions.keys() {
            if ext.len() < 2 || !ext.starts_with('.') {
                return Err(ChunkerError::invalid_config(format!(
                    "extension {ext:?} must start with '.' followed by a suffix"
                )));
            }
            if ext.chars().any(char::is_uppercase) {
                return Err(ChunkerError::invalid_config(format!(
                    "extension {ext:?} must be lower-case"
                )));
            }
        }

        if let Some(kind) = self.chunk_kinds.iter().find(|kind| !kind.is_classifiable()) {
            return Err(ChunkerError::invalid_config(format!(
                "{kind:?} has no chunk-worthiness predicate"
            )));
        }

        if self.switch_case_min_children == 0 {
            return Err(ChunkerError::invalid_config(
                "switch_case_min_children must be > 0",
            ));
        }

        if self.if_consequence_min_children == 0 {
            return Err(ChunkerError::invalid_config(
                "if_consequence_min_children must be > 0",
            ));
        }

        Ok(())
    }
}

/// Which visited nodes get a context record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextChunkMode {
    /// Every visited named node with a significant ancestor
    #[default]
    AllNodes,

    /// Only nodes that are chunks themselves
    ChunksOnly,

    /// No context records
    Off,
}

/// Set of chunks the relationship linker sees at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkScope {
    /// Link inside each file
    #[default]
    File,

    /// Link once over the merged output of a batch
    Repository,
}
