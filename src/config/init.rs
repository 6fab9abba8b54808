use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::schema::Config;
use crate::scoring::ScoringConfig;

/// Render the built-in configuration as YAML.
pub fn default_config_yaml() -> Result<String> {
    let config = Config {
        scoring: Some(ScoringConfig::default()),
    };
    serde_saphyr::to_string(&config).context("Failed to serialize default config")
}

/// Write the default configuration to `path` atomically.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    super::ensure_parent_dir(path)?;
    let yaml = default_config_yaml()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config file")?;

    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}
