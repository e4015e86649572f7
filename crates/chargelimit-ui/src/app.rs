//! Application state
//!
//! Everything the screen shows lives here, and every action returns the
//! [`Notification`] to present, so the flow can be driven without a terminal.

use chargelimit_hal::{
    ControlPath, DisplayState, MAX_THRESHOLD, MIN_THRESHOLD, ThresholdWriter, WriteError,
    read_threshold, resolve, validate,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Longest text accepted in the entry field
const MAX_INPUT_LEN: usize = 8;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A modal message the user has to dismiss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn new(level: Level, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Error, title, message)
    }
}

/// Lifecycle of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready(ControlPath),
    /// No control file; the session ends once the error is dismissed
    FatalNoPath,
}

/// Which widget receives Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Button,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Apply,
    Quit,
}

pub struct App<W: ThresholdWriter> {
    /// Glob searched at startup
    pattern: String,

    /// Performs the privileged write
    writer: W,

    phase: Phase,

    /// Last value read from the control file
    display: Option<DisplayState>,

    /// Proposed value as typed
    input: String,

    focus: Focus,

    /// Modal currently shown
    notification: Option<Notification>,

    should_quit: bool,
}

impl<W: ThresholdWriter> App<W> {
    pub fn new(pattern: impl Into<String>, writer: W) -> Self {
        Self {
            pattern: pattern.into(),
            writer,
            phase: Phase::Loading,
            display: None,
            input: String::new(),
            focus: Focus::Input,
            notification: None,
            should_quit: false,
        }
    }

    /// Resolve the control file and read its value
    ///
    /// Only acts while loading; the resolved path is never replaced.
    pub fn start(&mut self) {
        if self.phase != Phase::Loading {
            return;
        }

        match resolve(&self.pattern) {
            Ok(path) => {
                self.display = Some(read_threshold(&path));
                self.phase = Phase::Ready(path);
            }
            Err(e) => {
                tracing::error!("Battery path lookup failed: {}", e);
                let message = match &e {
                    chargelimit_hal::ResolveError::NotFound(pattern) => format!(
                        "Could not find the battery charge control file.\n\
                         Searched for: {}\n\n\
                         This tool may not be compatible with your device.",
                        pattern
                    ),
                    other => format!("An error occurred while finding the battery path: {}", other),
                };
                self.display = Some(DisplayState::NotFound);
                self.phase = Phase::FatalNoPath;
                self.notification = Some(Notification::error("Error", message));
            }
        }
    }

    /// Validate the input, write it, and re-read on success
    pub fn apply(&mut self) -> Notification {
        let notification = self.validate_and_write();
        self.notification = Some(notification.clone());
        notification
    }

    fn validate_and_write(&mut self) -> Notification {
        let value = match validate(&self.input) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Rejected input: {}", e);
                return Notification::warning(
                    "Invalid Input",
                    format!(
                        "Please enter a whole number between {} and {}.",
                        MIN_THRESHOLD, MAX_THRESHOLD
                    ),
                );
            }
        };

        let Phase::Ready(path) = &self.phase else {
            return Notification::error(
                "Error",
                "Cannot set threshold because battery path is not defined.",
            );
        };

        match self.writer.write(path, value) {
            Ok(()) => {
                self.display = Some(read_threshold(path));
                Notification::info(
                    "Success",
                    format!("Battery charge threshold successfully set to {}%.", value),
                )
            }
            Err(WriteError::Rejected(reason)) => Notification::error(
                "Execution Failed",
                format!(
                    "Failed to set the new threshold.\n\n\
                     Reason: {}\n\n\
                     Please ensure you have administrative privileges and entered the correct password.",
                    reason
                ),
            ),
            Err(WriteError::ElevationToolMissing { tool }) => Notification::error(
                "Error",
                format!(
                    "The '{}' command was not found.\n\
                     Please ensure Polkit is installed on your system.",
                    tool
                ),
            ),
            Err(WriteError::Unknown(details)) => Notification::error(
                "An Unexpected Error Occurred",
                format!("Details: {}", details),
            ),
        }
    }

    /// Close the modal; closing the fatal error ends the session
    pub fn dismiss(&mut self) {
        self.notification = None;
        if self.phase == Phase::FatalNoPath {
            self.should_quit = true;
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Action::Quit;
        }

        if self.notification.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dismiss();
            }
            return if self.should_quit {
                Action::Quit
            } else {
                Action::None
            };
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                Action::Quit
            }
            KeyCode::Enter if matches!(self.phase, Phase::Ready(_)) => Action::Apply,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    Focus::Input => Focus::Button,
                    Focus::Button => Focus::Input,
                };
                Action::None
            }
            KeyCode::Backspace if self.focus == Focus::Input => {
                self.input.pop();
                Action::None
            }
            KeyCode::Char(c) if self.focus == Focus::Input && !c.is_control() => {
                if self.input.chars().count() < MAX_INPUT_LEN {
                    self.input.push(c);
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Text for the current value display
    pub fn label(&self) -> String {
        match &self.display {
            Some(state) => state.label(),
            None => "Current value: Loading...".to_string(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn display(&self) -> Option<&DisplayState> {
        self.display.as_ref()
    }

    /// Battery directory name of the control file, once resolved
    pub fn battery_name(&self) -> Option<&str> {
        match &self.phase {
            Phase::Ready(path) => path.battery_name(),
            _ => None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    #[cfg(test)]
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_fatal(&self) -> bool {
        self.phase == Phase::FatalNoPath
    }
}
