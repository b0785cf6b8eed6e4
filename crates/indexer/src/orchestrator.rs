use crate::error::{IndexerError, Result};
use crate::limits::resolve_concurrency;
use crate::scanner::FileCollector;
use crate::stats::BatchStats;
use repochunk_chunker::{
    link_chunks, Chunk, ChunkRecord, Chunker, ChunkerConfig, ChunkerError, ContextChunk,
    FileChunks, LinkScope,
};
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Settings for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Files processed at once (falls back to `REPOCHUNK_CONCURRENCY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Files larger than this are skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_bytes: Option<u64>,

    /// Per-file extraction settings
    pub chunker: ChunkerConfig,
}

impl BatchConfig {
    pub fn validate(&self) -> Result<()> {
        self.chunker.validate()?;
        if self.concurrency == Some(0) {
            return Err(ChunkerError::invalid_config("concurrency must be > 0").into());
        }
        if self.max_file_bytes == Some(0) {
            return Err(ChunkerError::invalid_config("max_file_bytes must be > 0").into());
        }
        Ok(())
    }
}

/// A file that could not be chunked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    /// Path relative to the collection root
    pub path: String,
    pub reason: String,
}

/// Aggregated result of a batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutput {
    /// Primary chunks sorted by `(filePath, startLine)`
    pub chunks: Vec<Chunk>,
    /// Context records sorted by `(filePath, startLine)`
    pub context_chunks: Vec<ContextChunk>,
    /// Failed files sorted by path
    pub failures: Vec<FileFailure>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Flat record list sorted by `(filePath, startLine)`; a chunk precedes
    /// context records that start on the same line
    #[must_use]
    pub fn into_records(self) -> Vec<ChunkRecord> {
        let mut records: Vec<ChunkRecord> = self
            .chunks
            .into_iter()
            .map(ChunkRecord::Chunk)
            .chain(self.context_chunks.into_iter().map(ChunkRecord::Context))
            .collect();
        records.sort_by(|a, b| {
            a.file_path()
                .cmp(b.file_path())
                .then_with(|| a.start_line().cmp(&b.start_line()))
        });
        records
    }
}

enum FileOutcome {
    Chunked(FileChunks),
    Skipped(String),
    Failed(String),
}

/// Fans chunk extraction out over every file below a root directory
pub struct BatchOrchestrator {
    root: PathBuf,
    chunker: Arc<Chunker>,
    config: BatchConfig,
}

impl BatchOrchestrator {
    pub fn new(root: impl AsRef<Path>, config: BatchConfig) -> Result<Self> {
        config.validate()?;
        let root = root.as_ref().to_path_buf();
        std::fs::metadata(&root).map_err(|e| IndexerError::io(&root, e))?;

        Ok(Self {
            root,
            chunker: Arc::new(Chunker::new(config.chunker.clone())?),
            config,
        })
    }

    /// Run the batch.
    ///
    /// Only enumeration failures abort; per-file failures are recorded in
    /// [`BatchOutput::failures`].
    pub async fn run(&self) -> Result<BatchOutput> {
        let start = Instant::now();
        log::info!("Extracting chunks from {}", self.root.display());

        let collector = FileCollector::new(&self.root);
        let files = collector.collect()?;

        let mut stats = BatchStats::new();
        stats.files_seen = files.len();

        let concurrency = resolve_concurrency(self.config.concurrency);
        log::debug!("Processing up to {concurrency} files at once");
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = JoinSet::new();

        for path in files {
            if self.chunker.grammar_for(&path).is_none() {
                log::debug!("Skipping unsupported file {}", path.display());
                stats.add_skipped();
                continue;
            }

            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| IndexerError::TaskFailed(e.to_string()))?;
            let chunker = Arc::clone(&self.chunker);
            let relative = collector.relative_path(&path);
            let max_file_bytes = self.config.max_file_bytes;

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
                    process_file(&chunker, &path, &relative, max_file_bytes)
                }))
                .unwrap_or_else(|_| FileOutcome::Failed("chunking panicked".to_string()));
                (relative, outcome)
            });
        }

        let mut chunks = Vec::new();
        let mut context_chunks = Vec::new();
        let mut failures = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            let (relative, outcome) = joined.map_err(|e| IndexerError::TaskFailed(e.to_string()))?;
            match outcome {
                FileOutcome::Chunked(file) => {
                    stats.add_file(file.grammar.as_str(), file.line_count);
                    stats.add_chunks(file.chunks.len(), file.context_chunks.len());
                    chunks.extend(file.chunks);
                    context_chunks.extend(file.context_chunks);
                }
                FileOutcome::Skipped(reason) => {
                    log::debug!("Skipping {relative}: {reason}");
                    stats.add_skipped();
                }
                FileOutcome::Failed(reason) => {
                    log::warn!("Failed to chunk {relative}: {reason}");
                    stats.add_failure();
                    failures.push(FileFailure {
                        path: relative,
                        reason,
                    });
                }
            }
        }

        // Tasks finish in any order; within a file the stable sort keeps walk order.
        chunks.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then_with(|| a.start_line.cmp(&b.start_line))
        });
        context_chunks.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then_with(|| a.start_line.cmp(&b.start_line))
        });
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        if self.config.chunker.link_scope == LinkScope::Repository {
            link_chunks(&mut chunks);
        }

        stats.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!("Chunk extraction completed: {stats:?}");

        Ok(BatchOutput {
            chunks,
            context_chunks,
            failures,
            stats,
        })
    }
}

fn process_file(
    chunker: &Chunker,
    path: &Path,
    relative: &str,
    max_file_bytes: Option<u64>,
) -> FileOutcome {
    if let Some(limit) = max_file_bytes {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > limit => {
                return FileOutcome::Skipped(format!("{} bytes > {limit}", meta.len()));
            }
            Ok(_) => {}
            Err(e) => return FileOutcome::Failed(ChunkerError::io(path, e).to_string()),
        }
    }

    match chunker.chunk_file(path, relative) {
        Ok(file) => FileOutcome::Chunked(file),
        Err(e) => FileOutcome::Failed(e.to_string()),
    }
}
