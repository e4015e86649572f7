//! Mock writer for testing without root or a real battery
//!
//! `MockWriter` writes straight to the control file (usually a temp file) as if
//! the elevation prompt had been accepted, or fails with a preset error.
//!
//! # Usage
//!
//! ```no_run
//! use chargelimit_hal::mock::MockWriter;
//! use chargelimit_hal::WriteError;
//!
//! // Accepts every request
//! let writer = MockWriter::new();
//!
//! // Behaves like a dismissed authorization dialog
//! let rejecting = MockWriter::failing(WriteError::Rejected("Request dismissed".into()));
//! ```

use crate::{ControlPath, Threshold, ThresholdWriter, WriteError};
use std::cell::RefCell;
use std::fs;

/// In-process stand-in for [`crate::ElevatedWriter`]
#[derive(Debug, Default)]
pub struct MockWriter {
    failure: Option<WriteError>,
    calls: RefCell<Vec<(ControlPath, Threshold)>>,
}

impl MockWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer that fails every request with `error`
    pub fn failing(error: WriteError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Every write requested so far
    pub fn calls(&self) -> Vec<(ControlPath, Threshold)> {
        self.calls.borrow().clone()
    }
}

impl ThresholdWriter for MockWriter {
    fn write(&self, path: &ControlPath, value: Threshold) -> Result<(), WriteError> {
        self.calls.borrow_mut().push((path.clone(), value));

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        fs::write(path, format!("{}\n", value)).map_err(|e| WriteError::Unknown(e.to_string()))
    }
}
