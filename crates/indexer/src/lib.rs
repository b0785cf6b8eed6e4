//! # Repochunk Indexer
//!
//! Batch chunk extraction over a directory tree.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Collector (every regular file, sorted)
//!     │
//!     ├──> Grammar Resolver (unsupported → skipped)
//!     │
//!     ├──> Chunker per file (bounded spawn_blocking pool)
//!     │      └─> FileChunks | FileFailure
//!     │
//!     └──> Merge, sort by (filePath, startLine), optional repository linking
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use repochunk_indexer::{BatchConfig, BatchOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = BatchOrchestrator::new("/path/to/repo", BatchConfig::default())?;
//!     let output = orchestrator.run().await?;
//!
//!     println!(
//!         "Chunked {} files into {} chunks ({} failures)",
//!         output.stats.files_chunked,
//!         output.stats.chunks,
//!         output.failures.len()
//!     );
//!     Ok(())
//! }
//! ```

mod error;
mod limits;
mod orchestrator;
mod scanner;
mod stats;

pub use error::{IndexerError, Result};
pub use limits::{resolve_concurrency, CONCURRENCY_ENV};
pub use orchestrator::{BatchConfig, BatchOrchestrator, BatchOutput, FileFailure};
pub use scanner::FileCollector;
pub use stats::BatchStats;
