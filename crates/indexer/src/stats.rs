use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics about one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Files found by the collector
    pub files_seen: usize,

    /// Files parsed and chunked
    pub files_chunked: usize,

    /// Files skipped (no grammar, or over the size cap)
    pub files_skipped: usize,

    /// Files that failed to read or parse
    pub files_failed: usize,

    /// Primary chunks emitted
    pub chunks: usize,

    /// Context records emitted
    pub context_chunks: usize,

    /// Total lines of chunked files
    pub total_lines: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Chunked files per grammar
    pub grammars: BTreeMap<String, usize>,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, grammar: &str, lines: usize) {
        self.files_chunked += 1;
        self.total_lines += lines;
        *self.grammars.entry(grammar.to_string()).or_insert(0) += 1;
    }

    pub fn add_chunks(&mut self, chunks: usize, context_chunks: usize) {
        self.chunks += chunks;
        self.context_chunks += context_chunks;
    }

    pub fn add_skipped(&mut self) {
        self.files_skipped += 1;
    }

    pub fn add_failure(&mut self) {
        self.files_failed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accumulates_per_grammar() {
        let mut stats = BatchStats::new();
        stats.add_file("typescript", 10);
        stats.add_file("typescript", 5);
        stats.add_file("jsx", 1);
        stats.add_chunks(4, 9);
        stats.add_skipped();
        stats.add_failure();

        assert_eq!(stats.files_chunked, 3);
        assert_eq!(stats.total_lines, 16);
        assert_eq!(stats.grammars.get("typescript"), Some(&2));
        assert_eq!(stats.chunks, 4);
        assert_eq!(stats.context_chunks, 9);
        assert_eq!(stats.files_skipped, 1);
        assert_eq!(stats.files_failed, 1);
    }
}
