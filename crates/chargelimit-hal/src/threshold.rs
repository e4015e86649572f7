//! Current threshold readout
//!
//! Reading needs no privileges. Failures are folded into [`DisplayState`] so
//! the caller can always render something.

use crate::ControlPath;
use std::fmt;
use std::fs;
use std::io;

/// What the current value display shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// Value reported by the kernel, not necessarily within the writable range
    Value(i64),
    NotFound,
    PermissionDenied,
    UnknownError(String),
}

impl DisplayState {
    /// Label text for the current value display
    pub fn label(&self) -> String {
        format!("Current value: {}", self)
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            DisplayState::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, DisplayState::Value(_))
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayState::Value(v) => write!(f, "{}%", v),
            DisplayState::NotFound => write!(f, "Not Found"),
            DisplayState::PermissionDenied => write!(f, "Read Error"),
            DisplayState::UnknownError(_) => write!(f, "Unknown Error"),
        }
    }
}

impl From<io::Error> for DisplayState {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => DisplayState::NotFound,
            io::ErrorKind::PermissionDenied => DisplayState::PermissionDenied,
            _ => DisplayState::UnknownError(e.to_string()),
        }
    }
}

/// Parse sysfs contents: an integer with optional surrounding whitespace
fn parse_contents(contents: &str) -> DisplayState {
    let trimmed = contents.trim();
    match trimmed.parse::<i64>() {
        Ok(v) => DisplayState::Value(v),
        Err(_) => DisplayState::UnknownError(format!("Unexpected contents: {:?}", trimmed)),
    }
}

/// Read the current threshold from the control file
pub fn read_threshold(path: &ControlPath) -> DisplayState {
    let state = match fs::read_to_string(path) {
        Ok(contents) => parse_contents(&contents),
        Err(e) => {
            tracing::warn!("Error reading threshold value from {}: {}", path, e);
            DisplayState::from(e)
        }
    };

    match &state {
        DisplayState::Value(v) => tracing::debug!("Current threshold at {} is {}%", path, v),
        DisplayState::UnknownError(msg) => tracing::warn!("Unreadable threshold at {}: {}", path, msg),
        _ => {}
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn control_file(contents: &str) -> (TempDir, ControlPath) {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("charge_control_end_threshold");
        fs::write(&file, contents).unwrap();
        (tmp, ControlPath::new(file))
    }

    #[test]
    fn test_read_value_with_newline() {
        let (_tmp, path) = control_file("80\n");
        let state = read_threshold(&path);
        assert_eq!(state, DisplayState::Value(80));
        assert_eq!(state.label(), "Current value: 80%");
    }

    #[test]
    fn test_read_value_outside_writable_range() {
        let (_tmp, path) = control_file("  5 \n");
        assert_eq!(read_threshold(&path), DisplayState::Value(5));
    }

    #[test]
    fn test_read_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = ControlPath::new(tmp.path().join("BAT9/charge_control_end_threshold"));
        let state = read_threshold(&path);
        assert_eq!(state, DisplayState::NotFound);
        assert_eq!(state.label(), "Current value: Not Found");
    }

    #[test]
    fn test_read_garbage_contents() {
        let (_tmp, path) = control_file("full\n");
        let state = read_threshold(&path);
        assert!(matches!(state, DisplayState::UnknownError(ref m) if m.contains("full")));
        assert_eq!(state.label(), "Current value: Unknown Error");
        assert!(state.is_error());
    }

    #[test]
    fn test_read_directory_is_unknown_error() {
        let tmp = TempDir::new().unwrap();
        let path = ControlPath::new(tmp.path());
        assert!(matches!(read_threshold(&path), DisplayState::UnknownError(_)));
    }

    #[test]
    fn test_io_error_mapping() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        let state = DisplayState::from(denied);
        assert_eq!(state, DisplayState::PermissionDenied);
        assert_eq!(state.label(), "Current value: Read Error");
        assert_eq!(state.value(), None);
    }
}
