//! Privileged threshold writes
//!
//! The control file is root-owned. Rather than running the whole program as root,
//! a single shell command is run through an elevation helper which prompts the
//! user for authorization:
//!
//! ```text
//! pkexec /bin/bash -c "echo 80 > /sys/class/power_supply/BAT0/charge_control_end_threshold"
//! ```

use crate::{ControlPath, Threshold};
use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use thiserror::Error;

/// pkexec exit status when the authorization dialog was dismissed
const EXIT_DISMISSED: i32 = 126;
/// pkexec exit status when authorization failed or was refused
const EXIT_NOT_AUTHORIZED: i32 = 127;

/// pkexec messages meaning the user did not grant authorization
const REJECTION_MESSAGES: [&str; 2] = ["Request dismissed", "Not authorized"];

/// Reason shown when the helper rejects the request without saying why
const REJECTED_FALLBACK: &str = "The command was rejected or failed.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Elevation tool '{tool}' not found")]
    ElevationToolMissing { tool: String },

    #[error("Write failed: {0}")]
    Unknown(String),
}

/// Something that can store a validated threshold in the control file
pub trait ThresholdWriter {
    fn write(&self, path: &ControlPath, value: Threshold) -> Result<(), WriteError>;
}

/// Writes through an elevation helper such as `pkexec`
#[derive(Debug, Clone)]
pub struct ElevatedWriter {
    /// Helper binary name or path
    tool: String,

    /// Shell used to run the redirect
    shell: PathBuf,

    /// Overrides `PATH` when locating the helper
    search_path: Option<OsString>,
}

impl Default for ElevatedWriter {
    fn default() -> Self {
        Self {
            tool: "pkexec".to_string(),
            shell: PathBuf::from("/bin/bash"),
            search_path: None,
        }
    }
}

impl ElevatedWriter {
    /// Create a writer using `pkexec` and `/bin/bash`
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the elevation helper
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Set the shell that performs the redirect
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Look the helper up in `paths` instead of `PATH`
    pub fn with_search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Resolve the helper binary, or report it missing
    fn locate_tool(&self) -> Result<PathBuf, WriteError> {
        let search_path = self.search_path.clone().or_else(|| env::var_os("PATH"));
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));

        which::which_in(&self.tool, search_path, cwd).map_err(|e| {
            tracing::error!("Elevation tool {} not found: {}", self.tool, e);
            WriteError::ElevationToolMissing {
                tool: self.tool.clone(),
            }
        })
    }

    fn classify(&self, output: Output) -> Result<(), WriteError> {
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        // Some helpers report a refused prompt with an ordinary failure status
        let refused = matches!(
            output.status.code(),
            Some(EXIT_DISMISSED | EXIT_NOT_AUTHORIZED)
        ) || REJECTION_MESSAGES.iter().any(|m| stderr.contains(m));

        if refused {
            let reason = if stderr.is_empty() {
                REJECTED_FALLBACK.to_string()
            } else {
                stderr
            };
            return Err(WriteError::Rejected(reason));
        }

        match output.status.code() {
            Some(code) if stderr.is_empty() => {
                Err(WriteError::Unknown(format!("{} exited with status {}", self.tool, code)))
            }
            Some(_) => Err(WriteError::Unknown(stderr)),
            None => Err(WriteError::Unknown(format!("{} was terminated by a signal", self.tool))),
        }
    }
}

impl ThresholdWriter for ElevatedWriter {
    fn write(&self, path: &ControlPath, value: Threshold) -> Result<(), WriteError> {
        let tool = self.locate_tool()?;
        let script = redirect_script(path.as_path(), value);

        tracing::info!(
            "Running {} {} -c {:?}",
            tool.display(),
            self.shell.display(),
            script
        );

        // stdin stays attached so a text-mode polkit agent can prompt on the tty
        let output = Command::new(&tool)
            .arg(&self.shell)
            .arg("-c")
            .arg(&script)
            .stdin(Stdio::inherit())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => WriteError::ElevationToolMissing {
                    tool: self.tool.clone(),
                },
                _ => WriteError::Unknown(format!("Failed to run {}: {}", self.tool, e)),
            })?;

        let result = self.classify(output);
        match &result {
            Ok(()) => tracing::info!("Charge threshold at {} set to {}%", path, value),
            Err(e) => tracing::error!("Failed to set charge threshold: {}", e),
        }
        result
    }
}

/// Shell command writing `value` to `path`
pub(crate) fn redirect_script(path: &Path, value: Threshold) -> String {
    format!("echo {} > {}", value, shell_quote(&path.to_string_lossy()))
}

/// Quote `word` for a POSIX shell unless it is plainly safe
fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-'));

    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
