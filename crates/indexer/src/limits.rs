const MAX_CONCURRENCY: usize = 32;

/// Environment override for the per-file task bound
pub const CONCURRENCY_ENV: &str = "REPOCHUNK_CONCURRENCY";

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_CONCURRENCY)
}

/// Number of files processed at once.
///
/// An explicit value wins; otherwise `REPOCHUNK_CONCURRENCY`, otherwise the
/// available parallelism. The result is always within `1..=32`.
pub fn resolve_concurrency(explicit: Option<usize>) -> usize {
    if let Some(value) = explicit {
        return value.clamp(1, MAX_CONCURRENCY);
    }
    let raw = std::env::var(CONCURRENCY_ENV).ok();
    parse_concurrency(raw.as_deref(), default_concurrency())
}
