use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::scoring::{ActionSet, PlayerActions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Guess the format from a file extension. Anything unrecognised is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                InputFormat::Yaml
            }
            _ => InputFormat::Json,
        }
    }
}

/// Decoded scoring input: one action record, or a roster of named ones.
///
/// ```json
/// {"A_SHOTS": {"attempts": 6, "success": 3}}
/// ```
/// ```json
/// [{"name": "Pito", "actions": {"A_SHOTS": {"attempts": 6, "success": 3}}}]
/// ```
///
/// The variant is picked from the top-level shape before decoding, so decode
/// errors point at the offending value rather than at the enum.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreInput {
    Roster(Vec<PlayerActions>),
    Single(ActionSet),
}

/// Whether the document's top-level value is a sequence (a roster).
fn is_sequence(content: &str, format: InputFormat) -> bool {
    match format {
        InputFormat::Json => content.trim_start().starts_with('['),
        InputFormat::Yaml => {
            for line in content.lines() {
                let mut line = line.trim();
                if let Some(rest) = line.strip_prefix("---") {
                    line = rest.trim();
                }
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                return line.starts_with('[') || line == "-" || line.starts_with("- ");
            }
            false
        }
    }
}

fn decode<T: DeserializeOwned>(content: &str, format: InputFormat) -> Result<T> {
    match format {
        InputFormat::Json => {
            serde_json::from_str(content).context("Failed to parse actions: invalid JSON")
        }
        InputFormat::Yaml => {
            serde_saphyr::from_str(content).context("Failed to parse actions: invalid YAML")
        }
    }
}

/// Parse input text in the given format.
pub fn parse_actions(content: &str, format: InputFormat) -> Result<ScoreInput> {
    if is_sequence(content, format) {
        decode(content, format).map(ScoreInput::Roster)
    } else {
        decode(content, format).map(ScoreInput::Single)
    }
}

/// Load actions from a file, or from stdin when `path` is None.
///
/// `format` overrides extension-based detection. Stdin defaults to JSON.
pub fn load_actions(path: Option<&Path>, format: Option<InputFormat>) -> Result<ScoreInput> {
    match path {
        Some(p) => {
            let content = fs::read_to_string(p)
                .with_context(|| format!("Failed to read actions file at {}", p.display()))?;
            let format = format.unwrap_or_else(|| InputFormat::from_path(p));
            parse_actions(&content, format)
                .with_context(|| format!("Failed to decode actions from {}", p.display()))
        }
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read actions from stdin")?;
            parse_actions(&content, format.unwrap_or(InputFormat::Json))
        }
    }
}
