use anyhow::{Context as AnyhowContext, Result};
use repochunk_indexer::BatchConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the extraction root when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "repochunk.toml";

/// Load a batch config from an explicit file, else `<root>/repochunk.toml`,
/// else defaults
pub fn load_batch_config(explicit: Option<&Path>, root: &Path) -> Result<BatchConfig> {
    let candidate: Option<PathBuf> = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let discovered = root.join(DEFAULT_CONFIG_FILE);
            discovered.is_file().then_some(discovered)
        }
    };

    let Some(path) = candidate else {
        log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
        return Ok(BatchConfig::default());
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: BatchConfig =
        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Default configuration rendered as TOML
pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&BatchConfig::default()).context("Failed to render default config")
}
