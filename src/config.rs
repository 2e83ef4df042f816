//! Key=value configuration for the classification service.
//!
//! Lines are `key=value`; `#`-prefixed lines and blank lines are ignored.
//! Missing required keys fail explicitly; there are no silent default
//! credentials. Interactive prompting is the caller's concern.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration line {line}: {content:?}")]
    Malformed { line: usize, content: String },

    #[error("invalid value for {key:?}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("missing required configuration key {0:?}")]
    MissingKey(&'static str),
}

/// Parse key=value configuration text.
pub fn parse_config(text: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut config = HashMap::new();
    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Malformed {
            line: number + 1,
            content: raw.to_string(),
        })?;
        config.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(config)
}

/// Read a configuration file into a key=value map.
pub fn read_config(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Update or append a single key in a configuration file, preserving every
/// other line (comments included).
pub fn write_key(path: &Path, key: &str, value: &str) -> Result<(), ConfigError> {
    let mut lines: Vec<String> = if path.exists() {
        std::fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let entry = format!("{key}={value}");
    match lines
        .iter_mut()
        .find(|line| line.trim_start().starts_with(&format!("{key}=")))
    {
        Some(line) => *line = entry,
        None => lines.push(entry),
    }

    std::fs::write(path, lines.join("\n") + "\n")?;
    Ok(())
}

/// Connection settings for the external classification service.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

impl LlmConfig {
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required(map, "api_key")?,
            base_url: required(map, "base_url")?,
            model: required(map, "model")?,
            temperature: optional_float(map, "temperature")?,
            top_p: optional_float(map, "top_p")?,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_map(&read_config(path)?)
    }
}

fn required(map: &HashMap<String, String>, key: &'static str) -> Result<String, ConfigError> {
    match map.get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(ConfigError::MissingKey(key)),
    }
}

fn optional_float(
    map: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<f64>, ConfigError> {
    match map.get(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key,
                value: value.clone(),
            }),
    }
}
