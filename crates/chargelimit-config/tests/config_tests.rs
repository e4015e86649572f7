//! Integration tests for loading chargelimit configuration files

use chargelimit_config::{ChargeLimitConfig, ConfigError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct ConfigTestEnvironment {
    temp_dir: TempDir,
}

impl ConfigTestEnvironment {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn write_config(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_full_config() {
    let env = ConfigTestEnvironment::new();
    let log_file = env.temp_dir.path().join("chargelimit.log");
    let path = env.write_config(
        "config.toml",
        &format!(
            r#"
[battery]
pattern = "/sys/class/power_supply/CMB*/charge_control_end_threshold"

[elevation]
tool = "doas"
shell = "/bin/sh"

[logging]
level = "debug"
file = "{}"
"#,
            log_file.display()
        ),
    );

    let config = ChargeLimitConfig::load(&path).unwrap();

    assert_eq!(
        config.battery.pattern,
        "/sys/class/power_supply/CMB*/charge_control_end_threshold"
    );
    assert_eq!(config.elevation.tool, "doas");
    assert_eq!(config.elevation.shell, PathBuf::from("/bin/sh"));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file, Some(log_file));
}

#[test]
fn test_partial_sections_fill_defaults() {
    let env = ConfigTestEnvironment::new();
    let path = env.write_config("config.toml", "[logging]\nlevel = \"info\"\n");

    let config = ChargeLimitConfig::load(&path).unwrap();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.battery, Default::default());
    assert_eq!(config.elevation, Default::default());
}

#[test]
fn test_wrong_type_is_parse_error() {
    let env = ConfigTestEnvironment::new();
    let path = env.write_config("config.toml", "[elevation]\ntool = 42\n");

    let err = ChargeLimitConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

#[test]
fn test_empty_shell_is_invalid() {
    let env = ConfigTestEnvironment::new();
    let path = env.write_config("config.toml", "[elevation]\nshell = \"\"\n");

    let err = ChargeLimitConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("shell")));
}
