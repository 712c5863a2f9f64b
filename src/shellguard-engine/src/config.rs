//! Configuration loading.
//!
//! A single TOML file controls the safety policy, execution limits, and
//! history retention. A missing file is not an error; every field has a
//! default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use shellguard_protocol::SecurityLevel;

use crate::error::{EngineError, Result};
use crate::exec::{DEFAULT_TIMEOUT, ExecRequest, Interpreter};
use crate::safety::SafetyPolicy;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SHELLGUARD_CONFIG";
/// Directory name under the OS config dir.
pub const APP_DIR: &str = "shellguard";
/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub safety: SafetyConfig,
    pub execution: ExecutionConfig,
    pub history: HistoryConfig,
}

/// Safety policy settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Active security level.
    pub security_level: SecurityLevel,
    /// Extra denied substrings, case-insensitive.
    pub custom_blacklist: Vec<String>,
    /// Reserved allow-list; carried but not consulted.
    pub custom_whitelist: Vec<String>,
}

/// Execution settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Hard timeout in seconds.
    pub timeout_secs: u64,
    /// Interpreter flavor.
    pub interpreter: Interpreter,
    /// Interpreter binary override; `None` uses the flavor default.
    pub shell: Option<String>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            interpreter: Interpreter::default(),
            shell: None,
        }
    }
}

/// History retention settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Records older than this many days are swept at startup.
    pub retention_days: u32,
    /// Whether the startup sweep runs at all.
    pub auto_cleanup: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention_days: 30,
            auto_cleanup: true,
        }
    }
}

impl Config {
    /// Load from the default location, honoring `SHELLGUARD_CONFIG`.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path()?)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Execution timeout as a duration.
    pub fn execution_timeout(&self) -> Duration {
        Duration::from_secs(self.execution.timeout_secs)
    }

    /// Build the safety policy this config describes.
    pub fn safety_policy(&self) -> SafetyPolicy {
        SafetyPolicy::new(self.safety.security_level)
            .with_blacklist(self.safety.custom_blacklist.clone())
            .with_whitelist(self.safety.custom_whitelist.clone())
    }

    /// Build an execution request for `command` under this config.
    pub fn exec_request(&self, command: impl Into<String>) -> ExecRequest {
        let mut request = ExecRequest::new(command)
            .with_timeout(self.execution_timeout())
            .with_interpreter(self.execution.interpreter);
        if let Some(shell) = &self.execution.shell {
            request = request.with_binary(shell.clone());
        }
        request
    }
}

/// Default config file path, honoring the env override.
pub fn default_config_path() -> Result<PathBuf> {
    if let Ok(val) = std::env::var(CONFIG_ENV) {
        if !val.is_empty() {
            return Ok(PathBuf::from(val));
        }
    }
    let base = dirs::config_dir()
        .ok_or_else(|| EngineError::Config("could not determine the OS config directory".into()))?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.safety.security_level, SecurityLevel::Standard);
        assert!(config.safety.custom_blacklist.is_empty());
        assert_eq!(config.execution.timeout_secs, 60);
        assert_eq!(config.execution.interpreter, Interpreter::PowerShell);
        assert_eq!(config.history.retention_days, 30);
        assert!(config.history.auto_cleanup);
    }

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            [safety]
            security_level = "relaxed"
            custom_blacklist = ["Invoke-Nuke"]

            [execution]
            timeout_secs = 5
            interpreter = "posix"
            shell = "/bin/dash"

            [history]
            retention_days = 7
            auto_cleanup = false
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.safety.security_level, SecurityLevel::Relaxed);
        assert_eq!(config.safety.custom_blacklist, vec!["Invoke-Nuke"]);
        assert_eq!(config.execution_timeout(), Duration::from_secs(5));
        assert_eq!(config.execution.interpreter, Interpreter::Posix);
        assert_eq!(config.execution.shell.as_deref(), Some("/bin/dash"));
        assert_eq!(config.history.retention_days, 7);
        assert!(!config.history.auto_cleanup);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let raw = r#"
            [safety]
            security_level = "strict"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.safety.security_level, SecurityLevel::Strict);
        assert_eq!(config.execution.timeout_secs, 60);
        assert!(config.history.auto_cleanup);
    }

    #[test]
    fn test_load_from_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.safety.security_level, SecurityLevel::Standard);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[execution]\ntimeout_secs = 9\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.execution.timeout_secs, 9);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml at all [[[").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_exec_request_carries_settings() {
        let raw = r#"
            [execution]
            timeout_secs = 3
            interpreter = "posix"
            shell = "/bin/sh"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        let request = config.exec_request("echo hi");
        assert_eq!(request.timeout, Duration::from_secs(3));
        assert_eq!(request.interpreter, Interpreter::Posix);
        assert_eq!(request.binary.as_deref(), Some("/bin/sh"));
    }

    #[test]
    fn test_safety_policy_from_config() {
        let raw = r#"
            [safety]
            security_level = "strict"
            custom_blacklist = ["Invoke-Nuke"]
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        let policy = config.safety_policy();
        assert_eq!(policy.level(), SecurityLevel::Strict);
        assert!(policy.evaluate("invoke-nuke now").is_denied());
    }
}
