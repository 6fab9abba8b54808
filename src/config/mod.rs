mod init;
mod schema;

pub use init::{default_config_yaml, write_default_config};
pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/faei/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("faei"))
}

/// Get the default config file path (~/.config/faei/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Ensure the parent directory of a config file exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/faei/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config path does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default location is not an error: the built-in
/// defaults are returned instead.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                tracing::debug!(path = %default_path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            default_path
        }
    };

    read_config(&config_path)
}

fn read_config(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::info!(path = %config_path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let temp_path = env::temp_dir().join("faei_test_missing_config.yaml");
        let _ = fs::remove_file(&temp_path);

        let result = load_config(Some(temp_path));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_partial_config() {
        let temp_path = env::temp_dir().join("faei_test_partial_config.yaml");
        fs::write(&temp_path, "scoring:\n  fail_alpha: 0.4\n").unwrap();

        let config = load_config(Some(temp_path.clone())).unwrap();
        let scoring = config.effective_scoring();
        assert_eq!(scoring.fail_alpha, Some(0.4));
        assert!(scoring.weights.is_none());

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_empty_scoring_section() {
        let temp_path = env::temp_dir().join("faei_test_empty_config.yaml");
        fs::write(&temp_path, "{}\n").unwrap();

        let config = load_config(Some(temp_path.clone())).unwrap();
        assert!(config.scoring.is_none());
        assert_eq!(config.effective_scoring(), crate::scoring::ScoringConfig::default());

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_invalid_yaml_errors() {
        let temp_path = env::temp_dir().join("faei_test_invalid_config.yaml");
        fs::write(&temp_path, "scoring:\n  fail_alpha: [not, a, number]\n").unwrap();

        let result = load_config(Some(temp_path.clone()));
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("invalid YAML"));

        let _ = fs::remove_file(&temp_path);
    }
}
