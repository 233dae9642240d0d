use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path:?}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file at {path:?}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("invalid override {key:?}: {message}")]
    Override { key: String, message: String },
    #[error("{message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchEngine {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_ms: u64,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self { url: "https://localhost:9200".into(), username: None, password: None, timeout_ms: 10_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Directory holding the static frontend.
    pub app_dir: PathBuf,
}

impl Default for Server {
    fn default() -> Self { Self { host: "localhost".into(), port: 2048, app_dir: PathBuf::from("./app") } }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search_engine: SearchEngine,
    pub server: Server,
}

/// Read a TOML config file, or start from defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else { return Ok(Config::default()) };
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

fn optional(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() || v == "null" { None } else { Some(v.to_string()) }
}

impl Config {
    /// Apply a `key=value` override. Unknown keys are logged and ignored.
    pub fn apply_override(&mut self, raw: &str) -> Result<(), ConfigError> {
        let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
        let bad = |message: String| ConfigError::Override { key: key.to_string(), message };
        match key.trim() {
            "search_engine.url" => self.search_engine.url = value.trim().to_string(),
            "search_engine.username" => self.search_engine.username = optional(value),
            "search_engine.password" => self.search_engine.password = optional(value),
            "search_engine.timeout_ms" => {
                self.search_engine.timeout_ms = value.trim().parse().map_err(|e| bad(format!("{e}")))?
            }
            "server.host" => self.server.host = value.trim().to_string(),
            "server.port" => self.server.port = value.trim().parse().map_err(|e| bad(format!("{e}")))?,
            "server.app_dir" => self.server.app_dir = PathBuf::from(value.trim()),
            other => tracing::warn!(key = other, "unrecognized configuration field"),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = reqwest::Url::parse(&self.search_engine.url) {
            return Err(ConfigError::Validation { message: format!("search_engine.url is not a valid URL: {e}") });
        }
        if self.search_engine.timeout_ms == 0 {
            return Err(ConfigError::Validation { message: "search_engine.timeout_ms must be greater than zero.".into() });
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation { message: "server.host must be non-empty.".into() });
        }
        Ok(())
    }

    /// Basic credentials, only when both halves are set.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.search_engine.username, &self.search_engine.password) {
            (Some(u), Some(p)) => Some((u.clone(), p.clone())),
            _ => None,
        }
    }
}
