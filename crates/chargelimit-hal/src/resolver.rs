//! Control file discovery
//!
//! The charge threshold lives at a device-enumerated path (`BAT0`, `BAT1`, `BATT`...),
//! so it is found by expanding a glob pattern rather than by a fixed path.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default glob for the charge-limit control file
pub const DEFAULT_PATTERN: &str = "/sys/class/power_supply/BAT*/charge_control_end_threshold";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No battery charge control file matches {0}")]
    NotFound(String),

    #[error("Invalid search pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ResolveError {
    /// The pattern that was searched
    pub fn pattern(&self) -> &str {
        match self {
            ResolveError::NotFound(pattern) => pattern,
            ResolveError::InvalidPattern { pattern, .. } => pattern,
        }
    }
}

/// Resolved path to a charge threshold control file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPath(PathBuf);

impl ControlPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Name of the power supply directory holding the control file, e.g. `BAT0`
    pub fn battery_name(&self) -> Option<&str> {
        self.0
            .parent()
            .and_then(|dir| dir.file_name())
            .and_then(|name| name.to_str())
    }
}

impl AsRef<Path> for ControlPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ControlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Every path matching `pattern`, in the order glob returns them (sorted)
///
/// Entries that cannot be read while walking are skipped.
pub fn resolve_all(pattern: &str) -> Result<Vec<ControlPath>, ResolveError> {
    let paths = glob::glob(pattern).map_err(|source| ResolveError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(ControlPath(path)),
            Err(e) => tracing::debug!("Skipping unreadable entry: {}", e),
        }
    }

    Ok(matches)
}

/// The first path matching `pattern`
///
/// Only one battery is managed. When several match, the rest are logged and ignored.
pub fn resolve(pattern: &str) -> Result<ControlPath, ResolveError> {
    let mut matches = resolve_all(pattern)?.into_iter();

    let Some(first) = matches.next() else {
        tracing::warn!("No charge control file found for {}", pattern);
        return Err(ResolveError::NotFound(pattern.to_string()));
    };

    let ignored: Vec<String> = matches.map(|p| p.to_string()).collect();
    if !ignored.is_empty() {
        tracing::warn!(
            "Multiple charge control files found, using {} and ignoring {}",
            first,
            ignored.join(", ")
        );
    }

    tracing::info!("Found charge control file at {}", first);
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fake_supply(root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("charge_control_end_threshold");
        fs::write(&file, "80\n").unwrap();
        file
    }

    fn pattern_in(root: &Path) -> String {
        format!("{}/BAT*/charge_control_end_threshold", root.display())
    }

    #[test]
    fn test_resolve_single_match() {
        let tmp = TempDir::new().unwrap();
        let file = fake_supply(tmp.path(), "BAT0");

        let path = resolve(&pattern_in(tmp.path())).unwrap();
        assert_eq!(path.as_path(), file);
        assert_eq!(path.battery_name(), Some("BAT0"));
    }

    #[test]
    fn test_resolve_first_of_many() {
        let tmp = TempDir::new().unwrap();
        fake_supply(tmp.path(), "BAT1");
        let first = fake_supply(tmp.path(), "BAT0");
        fake_supply(tmp.path(), "BATT");

        let path = resolve(&pattern_in(tmp.path())).unwrap();
        assert_eq!(path.as_path(), first);

        let all = resolve_all(&pattern_in(tmp.path())).unwrap();
        let names: Vec<_> = all.iter().filter_map(|p| p.battery_name()).collect();
        assert_eq!(names, ["BAT0", "BAT1", "BATT"]);
    }

    #[test]
    fn test_resolve_not_found_carries_pattern() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("AC")).unwrap();
        let pattern = pattern_in(tmp.path());

        let err = resolve(&pattern).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(ref p) if *p == pattern));
        assert_eq!(err.pattern(), pattern);
    }

    #[test]
    fn test_resolve_invalid_pattern() {
        let err = resolve("/sys/class/power_supply/***/x").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPattern { .. }));
        assert!(format!("{}", err).contains("Invalid search pattern"));
    }

    #[test]
    fn test_battery_name_without_parent() {
        let path = ControlPath::new("charge_control_end_threshold");
        assert_eq!(path.battery_name(), None);
    }
}
