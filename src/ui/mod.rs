//! UI rendering module for the weather dashboard
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dashboard;
pub mod error_dialog;
pub mod help_overlay;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppState};

/// Renders the current view plus any overlay
pub fn render(frame: &mut Frame, app: &App) {
    match app.state {
        AppState::Loading => render_loading(frame),
        AppState::Dashboard => dashboard::render(frame, app),
    }

    if app.show_help {
        help_overlay::render(frame);
    }

    if let Some(error) = app.current_error() {
        error_dialog::render(frame, error);
    }
}

/// Renders a loading message while the first city is fetched
fn render_loading(frame: &mut Frame) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading weather...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Creates a rect of at most `width` x `height` centered in `area`
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
