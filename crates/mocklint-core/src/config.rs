//! Configuration loading and parsing for mocklint
//!
//! Provides functionality to load and parse `mocklint.toml` configuration files.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::rules::Severity;

pub const CONFIG_FILENAME: &str = "mocklint.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["exclude", "rules"];
const KNOWN_RULES_KEYS: &[&str] = &["disabled", "severity", "options"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    /// Location of the loaded file, `None` when defaults are used.
    pub path: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl ConfigResult {
    /// Directory that relative `exclude` patterns are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub exclude: Vec<String>,
    pub rules: RulesConfig,
}

impl Config {
    pub fn exclude_matcher(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source: e,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| ConfigError::InvalidPattern {
            pattern: self.exclude.join(", "),
            source: e,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule ids or names to turn off.
    pub disabled: Vec<String>,
    pub severity: HashMap<String, SeverityValue>,
    /// Per-rule option tables, keyed by rule id or name.
    pub options: HashMap<String, toml::Value>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SeverityValue {
    Error,
    Warning,
    Info,
    Hint,
}

impl From<SeverityValue> for Severity {
    fn from(value: SeverityValue) -> Self {
        match value {
            SeverityValue::Error => Severity::Error,
            SeverityValue::Warning => Severity::Warning,
            SeverityValue::Info => Severity::Info,
            SeverityValue::Hint => Severity::Hint,
        }
    }
}

/// Searches `start_dir` and its ancestors for `mocklint.toml`. Relative paths
/// are resolved against the working directory first so the search can leave it.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = std::path::absolute(start_dir).unwrap_or_else(|_| start_dir.to_path_buf());
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.is_file() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_warnings(path).map(|result| result.config)
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let warnings = detect_unknown_keys(&content);
    tracing::debug!(path = %path.display(), warnings = warnings.len(), "loaded config");

    Ok(ConfigResult {
        config,
        path: Some(path.to_path_buf()),
        warnings,
    })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    if let Some(toml::Value::Table(rules)) = table.get("rules") {
        let known_rules: HashSet<&str> = KNOWN_RULES_KEYS.iter().copied().collect();
        for key in rules.keys() {
            if !known_rules.contains(key.as_str()) {
                warnings.push(format!("Unknown config option in [rules]: '{}'", key));
            }
        }
    }

    warnings
}

/// Loads the nearest `mocklint.toml` above `start_dir`, or defaults when
/// there is none. A config file that exists but cannot be read or parsed is
/// an error.
pub fn load_config_or_default_with_warnings(start_dir: &Path) -> Result<ConfigResult, ConfigError> {
    match find_config_file(start_dir) {
        Some(path) => load_config_with_warnings(&path),
        None => Ok(ConfigResult::default()),
    }
}
