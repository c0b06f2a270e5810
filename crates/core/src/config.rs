// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layer configuration.
//!
//! Everything that used to be baked into call sites (the escalation program
//! and its flags, per-helper timeouts, workspace layout) lives here and is
//! handed to constructors explicitly. Nothing reads ambient state at call time.
//!
//! Resolution: explicit path > `RUNAS_CONFIG` > `<config dir>/runas/config.toml`
//! (if present) > defaults, then `RUNAS_*` environment overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn hint(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "check that the config file exists and is readable",
            ConfigError::Parse { .. } => "fix the TOML syntax or remove the offending key",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub executor: ExecutorConfig,
    pub workspace: WorkspaceConfig,
    pub git: GitConfig,
}

/// How the escalation mechanism is invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Escalation program, looked up on PATH.
    pub program: String,
    /// Flag that makes the mechanism fail instead of prompting.
    pub non_interactive_flag: String,
    /// Flag that precedes the target username.
    pub user_flag: String,
    /// Program that runs the target after escalation, with the overlay as `K=V` arguments.
    pub env_program: String,
    /// Variables merged under every invocation's own overlay. Empty by default:
    /// sudo's env_reset already provides the minimal base environment.
    pub base_env: BTreeMap<String, String>,
    pub timeouts: Timeouts,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            program: "sudo".to_string(),
            non_interactive_flag: "-n".to_string(),
            user_flag: "-u".to_string(),
            env_program: "env".to_string(),
            base_env: BTreeMap::new(),
            timeouts: Timeouts::default(),
        }
    }
}

/// Per-operation timeouts, written in (fractional) seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    #[serde(with = "secs")]
    pub default: Duration,
    #[serde(with = "secs")]
    pub path_check: Duration,
    #[serde(with = "secs")]
    pub mkdir: Duration,
    #[serde(with = "secs")]
    pub ownership: Duration,
    #[serde(with = "secs")]
    pub remove: Duration,
    /// Local git commands (status, remote, reset).
    #[serde(with = "secs")]
    pub git: Duration,
    #[serde(with = "secs")]
    pub clone: Duration,
    /// Git commands that talk to a remote (pull, push).
    #[serde(with = "secs")]
    pub network: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(30),
            path_check: Duration::from_secs(5),
            mkdir: Duration::from_secs(10),
            ownership: Duration::from_secs(10),
            remove: Duration::from_secs(10),
            git: Duration::from_secs(60),
            clone: Duration::from_secs(300),
            network: Duration::from_secs(300),
        }
    }
}

/// Where workspaces live under each user's home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Directory under the home that holds all workspaces.
    pub dir_name: String,
    /// Version-control metadata directory that marks a valid workspace.
    pub metadata_dir: String,
    /// When set, homes are `<home_root>/<username>` instead of the passwd entry.
    pub home_root: Option<PathBuf>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self { dir_name: "workspace".to_string(), metadata_dir: ".git".to_string(), home_root: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    pub program: String,
    /// Default `GIT_SSH_COMMAND`; BatchMode keeps ssh from ever prompting.
    pub ssh_command: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            ssh_command: "ssh -o BatchMode=yes -o StrictHostKeyChecking=accept-new".to_string(),
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&text, path)
    }

    /// Resolve and load configuration, then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path(explicit) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply `RUNAS_SUDO`, `RUNAS_HOME_ROOT` and `RUNAS_TIMEOUT_MS`.
    pub fn apply_env(&mut self) {
        if let Some(program) = non_empty_var("RUNAS_SUDO") {
            self.executor.program = program;
        }
        if let Some(root) = non_empty_var("RUNAS_HOME_ROOT") {
            self.workspace.home_root = Some(PathBuf::from(root));
        }
        if let Some(ms) = non_empty_var("RUNAS_TIMEOUT_MS").and_then(|s| s.parse::<u64>().ok()) {
            if ms > 0 {
                self.executor.timeouts.default = Duration::from_millis(ms);
            }
        }
    }
}

/// Resolve the config file: explicit > `RUNAS_CONFIG` > user config dir (if present).
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = non_empty_var("RUNAS_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("runas").join("config.toml")).filter(|p| p.is_file())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Serde adapter for durations written as seconds (integer or fractional).
mod secs {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Secs {
            Int(u64),
            Float(f64),
        }
        let duration = match Secs::deserialize(deserializer)? {
            Secs::Int(n) => Duration::from_secs(n),
            Secs::Float(f) => Duration::try_from_secs_f64(f).map_err(D::Error::custom)?,
        };
        if duration.is_zero() {
            return Err(D::Error::custom("timeout must be positive"));
        }
        Ok(duration)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
