//! Keybinding help, drawn over the dashboard while `?` is toggled on

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

/// (section, [(keys, action)])
const KEYBINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "City",
        &[
            ("/, e", "Edit city name"),
            ("Enter", "Search typed city"),
            ("Esc", "Stop editing"),
            ("a", "Auto-detect city from IP"),
        ],
    ),
    (
        "Other",
        &[
            ("r", "Refresh current city"),
            ("?", "Toggle this help"),
            ("q", "Quit application"),
        ],
    ),
];

const KEY_COLUMN: usize = 10;

fn overlay_lines() -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for (section, bindings) in KEYBINDINGS {
        lines.push(Line::from(Span::styled(*section, bold)));
        for (keys, action) in bindings.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<width$}", keys, width = KEY_COLUMN), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Esc or ? closes this window",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

pub fn render(frame: &mut Frame) {
    let lines = overlay_lines();
    // Content plus top and bottom border
    let area = centered_rect(46, lines.len() as u16 + 2, frame.area());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(" Help: Keyboard Shortcuts ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::render_to_string;

    #[test]
    fn test_every_binding_is_listed() {
        let content = render_to_string(80, 24, render);

        assert!(content.contains("Help"));
        for (_, bindings) in KEYBINDINGS {
            for (_, action) in bindings.iter() {
                assert!(content.contains(action), "Missing binding: {}", action);
            }
        }
    }

    #[test]
    fn test_overlay_lines_group_sections() {
        let lines = overlay_lines();
        // Two headers, seven bindings, two spacers and the footer
        assert_eq!(lines.len(), 12);
    }
}
