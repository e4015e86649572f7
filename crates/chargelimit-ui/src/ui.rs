//! Drawing
//!
//! Pure presentation of [`App`] state: one value display, one entry field,
//! one button, and a modal for the active notification.

use crate::app::{App, Focus, Level, Phase};
use chargelimit_hal::{MAX_THRESHOLD, MIN_THRESHOLD, ThresholdWriter};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub const WINDOW_TITLE: &str = "ASUS Battery Charge Limiter";

/// Draw the UI
pub fn draw_ui<W: ThresholdWriter>(frame: &mut Frame, app: &App<W>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Current value
            Constraint::Length(3), // Entry
            Constraint::Length(3), // Button
            Constraint::Min(0),
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], app);
    draw_current_value(frame, chunks[1], app);
    draw_entry(frame, chunks[2], app);
    draw_button(frame, chunks[3], app);
    draw_footer(frame, chunks[5], app);

    if let Some(note) = app.notification() {
        draw_notification(frame, note.level, &note.title, &note.message);
    }
}

fn draw_header<W: ThresholdWriter>(frame: &mut Frame, area: Rect, app: &App<W>) {
    let title = match app.battery_name() {
        Some(name) => format!("{} - {}", WINDOW_TITLE, name),
        None => WINDOW_TITLE.to_string(),
    };

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_current_value<W: ThresholdWriter>(frame: &mut Frame, area: Rect, app: &App<W>) {
    let style = match app.display() {
        Some(state) if state.is_error() => Style::default().fg(Color::Red),
        _ => Style::default().add_modifier(Modifier::BOLD),
    };

    let value = Paragraph::new(app.label())
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(value, area);
}

fn draw_entry<W: ThresholdWriter>(frame: &mut Frame, area: Rect, app: &App<W>) {
    let focused = app.focus() == Focus::Input;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let entry = Paragraph::new(app.input()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!("Set Threshold ({}-{}):", MIN_THRESHOLD, MAX_THRESHOLD)),
    );
    frame.render_widget(entry, area);

    if focused && app.notification().is_none() {
        let x = area.x + 1 + app.input().chars().count() as u16;
        frame.set_cursor(x.min(area.right().saturating_sub(2)), area.y + 1);
    }
}

fn draw_button<W: ThresholdWriter>(frame: &mut Frame, area: Rect, app: &App<W>) {
    let style = match (app.phase(), app.focus()) {
        (Phase::Ready(_), Focus::Button) => Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        (Phase::Ready(_), Focus::Input) => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::DarkGray),
    };

    let button = Paragraph::new("Apply New Threshold")
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(button, area);
}

fn draw_footer<W: ThresholdWriter>(frame: &mut Frame, area: Rect, app: &App<W>) {
    let help_text = if app.notification().is_some() {
        "[Enter] OK"
    } else {
        "[0-9] Edit  [Enter] Apply  [Tab] Focus  [Esc] Quit"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

/// Modal box centered over everything else
fn draw_notification(frame: &mut Frame, level: Level, title: &str, message: &str) {
    let color = match level {
        Level::Info => Color::Green,
        Level::Warning => Color::Yellow,
        Level::Error => Color::Red,
    };

    let area = centered_rect(70, 60, frame.size());

    let mut lines: Vec<Line> = message.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[ OK ]",
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(
                    title,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// Rectangle of `percent_x` by `percent_y` centered in `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
