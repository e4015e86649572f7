//! chargelimit
//!
//! A TUI for viewing and setting the battery charge threshold exposed under
//! `/sys/class/power_supply`. Reads are unprivileged; each write goes through
//! the configured elevation helper.

mod app;
mod ui;

use anyhow::{Context, Result};
use chargelimit_config::{ChargeLimitConfig, LoggingConfig};
use chargelimit_hal::ElevatedWriter;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{info, warn};

use app::{Action, App};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Setup logging to the configured file, or stderr
fn setup_logging(logging: &LoggingConfig) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer().with_target(false).with_ansi(false);

    let file = logging.file.as_ref().map(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| (path.clone(), e))
    });

    match file {
        Some(Ok(file)) => tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_writer(Mutex::new(file)))
            .init(),
        Some(Err((path, e))) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.with_writer(io::stderr))
                .init();
            warn!("Cannot open log file {}: {}", path.display(), e);
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_writer(io::stderr))
            .init(),
    }
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Hand the tty back while `f` runs so the elevation prompt can use it
fn with_terminal_suspended<T>(terminal: &mut Tui, f: impl FnOnce() -> T) -> Result<T> {
    restore_terminal(terminal)?;
    let out = f();
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(out)
}

fn run(terminal: &mut Tui, app: &mut App<ElevatedWriter>) -> Result<()> {
    terminal.draw(|f| ui::draw_ui(f, app))?;
    app.start();

    while !app.should_quit() {
        terminal.draw(|f| ui::draw_ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.handle_key(key) {
            Action::Apply => {
                let note = with_terminal_suspended(terminal, || app.apply())?;
                info!("{}: {}", note.title, note.message);
            }
            Action::Quit | Action::None => {}
        }
    }

    Ok(())
}

fn main() -> Result<ExitCode> {
    let (config, config_error) = match ChargeLimitConfig::load_default() {
        Ok(config) => (config, None),
        Err(e) => (ChargeLimitConfig::default(), Some(e)),
    };

    setup_logging(&config.logging);
    if let Some(e) = config_error {
        warn!("Ignoring configuration: {}", e);
    }

    info!("chargelimit starting...");

    let writer = ElevatedWriter::new()
        .with_tool(config.elevation.tool.clone())
        .with_shell(config.elevation.shell.clone());
    let mut app = App::new(config.battery.pattern.clone(), writer);

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    result?;

    info!("chargelimit exiting");
    Ok(if app.is_fatal() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
