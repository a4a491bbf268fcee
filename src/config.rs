//! # Configuration Management
//!
//! Centralized configuration for a synchronization client.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`WORLDSYNC_*`)
//!
//! Durations are written as milliseconds and log levels as strings.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

/// Client build version, first half of the handshake token
pub const CLIENT_VERSION: &str = "0.3.0";

/// Wire protocol revision, second half of the handshake token
pub const PROTOCOL_VERSION: &str = "7";

/// Connection-request payload. Both sides must agree on it exactly.
pub fn handshake_token() -> String {
    format!("{CLIENT_VERSION}{PROTOCOL_VERSION}")
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SyncConfig {
    #[serde(default)]
    pub client: ClientConfig,

    /// Content files that must match the server's
    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SyncConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| SyncError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| SyncError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| SyncError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("WORLDSYNC_SERVER_ADDRESS") {
            config.client.address = addr;
        }

        if let Ok(port) = std::env::var("WORLDSYNC_SERVER_PORT") {
            config.client.port = port
                .parse::<u16>()
                .map_err(|e| SyncError::ConfigError(format!("Invalid port '{port}': {e}")))?;
        }

        if let Ok(name) = std::env::var("WORLDSYNC_PLAYER_NAME") {
            config.client.player_name = name;
        }

        if let Ok(password) = std::env::var("WORLDSYNC_PLAYER_PASSWORD") {
            config.client.player_password = password;
        }

        if let Ok(attempts) = std::env::var("WORLDSYNC_CONNECT_ATTEMPTS") {
            if let Ok(val) = attempts.parse::<u32>() {
                config.client.connect_attempts = val;
            }
        }

        if let Ok(interval) = std::env::var("WORLDSYNC_ATTEMPT_INTERVAL_MS") {
            if let Ok(val) = interval.parse::<u64>() {
                config.client.attempt_interval = Duration::from_millis(val);
            }
        }

        if let Ok(dirs) = std::env::var("WORLDSYNC_DATA_DIRS") {
            config.content.data_dirs = std::env::split_paths(&dirs).collect();
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SyncError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| SyncError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.client.validate());
        errors.extend(self.content.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SyncError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Client-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server host name or IP address
    pub address: String,

    pub port: u16,

    pub player_name: String,

    /// Account password sent in the handshake reply
    pub player_password: String,

    /// Connection attempts before giving up
    pub connect_attempts: u32,

    /// Wait between connection attempts
    #[serde(with = "duration_serde")]
    pub attempt_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: String::from("127.0.0.1"),
            port: 25565,
            player_name: String::from("Player"),
            player_password: String::new(),
            connect_attempts: 3,
            attempt_interval: Duration::from_millis(500),
        }
    }
}

impl ClientConfig {
    /// Total time the handshake may wait without hearing from the server.
    /// At least one interval, even with zero attempts configured.
    pub fn handshake_budget(&self) -> Duration {
        self.attempt_interval * self.connect_attempts.max(1)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.address.is_empty() {
            errors.push("Server address cannot be empty".to_string());
        }

        if self.port == 0 {
            errors.push("Server port must be greater than 0".to_string());
        }

        if self.player_name.is_empty() {
            errors.push("Player name cannot be empty".to_string());
        } else if self.player_name.chars().count() > 32 {
            errors.push(format!(
                "Player name too long: {} characters (maximum: 32)",
                self.player_name.chars().count()
            ));
        }

        if self.connect_attempts == 0 {
            errors.push("Connect attempts must be greater than 0".to_string());
        } else if self.connect_attempts > 100 {
            errors.push(format!(
                "Connect attempts too high: {} (maximum: 100)",
                self.connect_attempts
            ));
        }

        if self.attempt_interval.as_millis() < 1 {
            errors.push("Attempt interval too short (minimum: 1ms)".to_string());
        } else if self.attempt_interval.as_secs() > 60 {
            errors.push("Attempt interval too long (maximum: 60s)".to_string());
        }

        errors
    }
}

/// Content files and where to find them
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content file names in load order
    pub files: Vec<String>,

    /// Directories searched for content files, first match wins
    pub data_dirs: Vec<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            data_dirs: vec![PathBuf::from("data")],
        }
    }
}

impl ContentConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.files.is_empty() && self.data_dirs.is_empty() {
            errors.push("At least one data directory is required when content files are listed".to_string());
        }

        for (i, file) in self.files.iter().enumerate() {
            if file.trim().is_empty() {
                errors.push(format!("Content file #{i} has an empty name"));
            } else if self.files[..i].iter().any(|f| f.eq_ignore_ascii_case(file)) {
                errors.push(format!("Content file listed twice: {file}"));
            }
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    pub log_to_console: bool,

    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("worldsync"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Duration as milliseconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// tracing::Level as a lowercase string
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_joins_versions() {
        assert_eq!(handshake_token(), "0.3.07");
    }

    #[test]
    fn budget_is_attempts_times_interval() {
        let client = ClientConfig {
            connect_attempts: 4,
            attempt_interval: Duration::from_millis(250),
            ..ClientConfig::default()
        };
        assert_eq!(client.handshake_budget(), Duration::from_secs(1));

        let none = ClientConfig {
            connect_attempts: 0,
            ..client
        };
        assert_eq!(none.handshake_budget(), Duration::from_millis(250));
    }

    #[test]
    fn duplicate_content_files_are_reported() {
        let content = ContentConfig {
            files: vec!["Morrowind.esm".into(), "morrowind.ESM".into()],
            data_dirs: vec![PathBuf::from("data")],
        };
        let errors = content.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("listed twice"));
    }
}
