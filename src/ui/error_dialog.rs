//! Modal error dialog

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::app::ErrorDialog;

const DIALOG_WIDTH: u16 = 50;

/// Renders `error` centered over the current view
pub fn render(frame: &mut Frame, error: &ErrorDialog) {
    // Borders, a blank line and the footer around the wrapped message
    let text_width = DIALOG_WIDTH.saturating_sub(4).max(1) as usize;
    let message_lines = error.message.chars().count().div_ceil(text_width).max(1) as u16;
    let area = centered_rect(DIALOG_WIDTH, message_lines + 5, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(error.message.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", error.title),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
