//! Configuration management for chargelimit
//!
//! An optional, read-only TOML file adjusts where the control file is searched
//! for, which elevation helper performs the write, and where logs go. Every
//! key has a default matching a stock Linux desktop with polkit.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Standard configuration path
pub const CONFIG_DIR: &str = "/etc/chargelimit";

pub use chargelimit_hal::DEFAULT_PATTERN;

/// Main chargelimit configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChargeLimitConfig {
    #[serde(default)]
    pub battery: BatteryConfig,

    #[serde(default)]
    pub elevation: ElevationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Control file discovery
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatteryConfig {
    /// Glob pattern; the first match is used
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
        }
    }
}

/// Privileged write helper
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElevationConfig {
    /// Helper binary, looked up on `PATH` unless absolute
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Shell run by the helper to perform the redirect
    #[serde(default = "default_shell")]
    pub shell: PathBuf,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            shell: default_shell(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive
    #[serde(default = "default_level")]
    pub level: String,

    /// Log file; stderr when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_tool() -> String {
    "pkexec".to_string()
}

fn default_shell() -> PathBuf {
    PathBuf::from("/bin/bash")
}

fn default_level() -> String {
    "warn".to_string()
}

impl ChargeLimitConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::load(&Self::default_path()) {
            Err(ConfigError::NotFound(_)) => {
                tracing::warn!("No configuration file found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// `/etc/chargelimit/config.toml`
    pub fn default_path() -> PathBuf {
        Path::new(CONFIG_DIR).join("config.toml")
    }

    /// Reject values that cannot work
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.battery.pattern.trim().is_empty() {
            return Err(ConfigError::Invalid("battery.pattern is empty".into()));
        }
        if self.elevation.tool.trim().is_empty() {
            return Err(ConfigError::Invalid("elevation.tool is empty".into()));
        }
        if self.elevation.shell.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("elevation.shell is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ChargeLimitConfig::default();
        assert_eq!(config.battery.pattern, chargelimit_hal::DEFAULT_PATTERN);
        assert_eq!(config.elevation.tool, "pkexec");
        assert_eq!(config.elevation.shell, PathBuf::from("/bin/bash"));
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("/etc/chargelimit/config.toml"));
        assert!(format!("{}", err).contains("not found"));

        let err = ConfigError::Invalid("test error".to_string());
        assert!(format!("{}", err).contains("Invalid"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[battery]
pattern = "/sys/class/power_supply/BATT/charge_control_end_threshold"

[elevation]
tool = "/usr/bin/pkexec"
"#;
        write!(temp_file, "{}", config_content).unwrap();

        let config = ChargeLimitConfig::load(temp_file.path()).unwrap();
        assert_eq!(
            config.battery.pattern,
            "/sys/class/power_supply/BATT/charge_control_end_threshold"
        );
        assert_eq!(config.elevation.tool, "/usr/bin/pkexec");
        assert_eq!(config.elevation.shell, PathBuf::from("/bin/bash"));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = ChargeLimitConfig::load(temp_file.path()).unwrap();
        assert_eq!(config, ChargeLimitConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ChargeLimitConfig::load(Path::new("/nonexistent/chargelimit.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[battery\npattern = 3").unwrap();

        let err = ChargeLimitConfig::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let mut config = ChargeLimitConfig::default();
        config.elevation.tool = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ChargeLimitConfig::default();
        config.battery.pattern = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_constants() {
        assert_eq!(CONFIG_DIR, "/etc/chargelimit");
        assert_eq!(
            ChargeLimitConfig::default_path(),
            PathBuf::from("/etc/chargelimit/config.toml")
        );
    }
}
