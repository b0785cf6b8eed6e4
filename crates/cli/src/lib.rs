use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use repochunk_chunker::{ChunkRecord, Chunker, ContextChunkMode, LinkScope};
use repochunk_indexer::{BatchConfig, BatchOrchestrator};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod config;
mod report;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "repochunk")]
#[command(
    about = "Extract semantic code chunks from JavaScript/TypeScript sources",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract chunks from every file below a directory
    Extract(ExtractArgs),

    /// Extract chunks from a single file
    File(FileArgs),

    /// Print the default configuration as TOML
    Config,
}

#[derive(Args)]
struct ExtractArgs {
    /// Root directory to extract from
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Write the JSON records here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file (default: <path>/repochunk.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which chunks relationships are linked across
    #[arg(long, value_enum)]
    link_scope: Option<LinkScopeArg>,

    /// Which nodes emit context records
    #[arg(long, value_enum)]
    context: Option<ContextArg>,

    /// Files processed at once (overrides REPOCHUNK_CONCURRENCY)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Skip files larger than this many bytes
    #[arg(long)]
    max_file_bytes: Option<u64>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,

    /// Write a markdown summary of the run
    #[arg(long)]
    report: Option<PathBuf>,

    /// Exit with an error when any file failed
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct FileArgs {
    /// Source file to chunk
    path: PathBuf,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which nodes emit context records
    #[arg(long, value_enum)]
    context: Option<ContextArg>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LinkScopeArg {
    File,
    Repository,
}

impl From<LinkScopeArg> for LinkScope {
    fn from(arg: LinkScopeArg) -> Self {
        match arg {
            LinkScopeArg::File => Self::File,
            LinkScopeArg::Repository => Self::Repository,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ContextArg {
    AllNodes,
    ChunksOnly,
    Off,
}

impl From<ContextArg> for ContextChunkMode {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::AllNodes => Self::AllNodes,
            ContextArg::ChunksOnly => Self::ChunksOnly,
            ContextArg::Off => Self::Off,
        }
    }
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // stdout carries the JSON records
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Extract(args) => run_extract(args).await?,
        Commands::File(args) => run_file(args)?,
        Commands::Config => print_stdout(config::default_config_toml()?.trim_end())?,
    }

    Ok(())
}

async fn run_extract(args: ExtractArgs) -> Result<()> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("Invalid project path {}", args.path.display()))?;

    let mut batch_config: BatchConfig = config::load_batch_config(args.config.as_deref(), &root)?;
    if let Some(scope) = args.link_scope {
        batch_config.chunker.link_scope = scope.into();
    }
    if let Some(mode) = args.context {
        batch_config.chunker.context_chunks = mode.into();
    }
    if args.concurrency.is_some() {
        batch_config.concurrency = args.concurrency;
    }
    if args.max_file_bytes.is_some() {
        batch_config.max_file_bytes = args.max_file_bytes;
    }

    let orchestrator =
        BatchOrchestrator::new(&root, batch_config).context("Invalid batch configuration")?;
    let output = orchestrator
        .run()
        .await
        .with_context(|| format!("Failed to extract chunks from {}", root.display()))?;

    if let Some(report_path) = &args.report {
        let md = report::render_batch_report(&root, &output);
        fs::write(report_path, md)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    }

    let failed = output.failures.len();
    let records = output.into_records();
    write_records(&records, args.output.as_deref(), args.pretty)?;

    if args.strict && failed > 0 {
        bail!("{failed} file(s) failed to chunk");
    }
    Ok(())
}

fn run_file(args: FileArgs) -> Result<()> {
    let base = args.path.parent().unwrap_or_else(|| Path::new("."));
    let mut batch_config = config::load_batch_config(args.config.as_deref(), base)?;
    if let Some(mode) = args.context {
        batch_config.chunker.context_chunks = mode.into();
    }

    let chunker = Chunker::new(batch_config.chunker).context("Invalid chunker configuration")?;
    let label = args.path.to_string_lossy().replace('\\', "/");
    let file = chunker
        .chunk_file(&args.path, &label)
        .with_context(|| format!("Failed to chunk {}", args.path.display()))?;

    write_records(&file.into_records(), None, args.pretty)
}

fn write_records(records: &[ChunkRecord], output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = to_json(&records, pretty)?;
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} records to {}", records.len(), path.display());
            Ok(())
        }
        None => print_stdout(&json),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
