//! Dashboard screen rendering
//!
//! Title, city input, weather icon, summary text and the 5-day temperature
//! chart, top to bottom.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::daily::DailySeries;
use crate::data::CurrentWeather;

const TITLE_COLOR: Color = Color::Cyan;
const CHART_TITLE: &str = "5-Day Temperature (Local Noon)";

/// Renders the dashboard
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // City input
            Constraint::Length(1), // Button hints
            Constraint::Length(3), // Icon
            Constraint::Length(4), // Summary
            Constraint::Min(8),    // Chart
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_city_input(frame, chunks[1], app);
    render_buttons(frame, chunks[2]);
    render_icon(frame, chunks[3], app.weather.as_ref());
    render_summary(frame, chunks[4], app.weather.as_ref(), app.weather_stale);
    render_chart(frame, chunks[5], &app.forecast, app.forecast_stale);
    render_status(frame, chunks[6], app);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("☀ Weather Dashboard ☁")
        .style(Style::default().fg(TITLE_COLOR).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn render_city_input(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Paragraph::new(app.city_input.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(" City ")
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(input, area);

    if editing {
        // Text is centered inside the borders
        let inner_width = area.width.saturating_sub(2);
        let text_width = app.city_input.chars().count() as u16;
        let x = area.x + 1 + inner_width.saturating_sub(text_width) / 2 + text_width;
        frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_buttons(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled("[/]", key),
        Span::raw(" Edit   "),
        Span::styled("[Enter]", key),
        Span::raw(" 🔍 Search   "),
        Span::styled("[a]", key),
        Span::raw(" 📍 Auto   "),
        Span::styled("[r]", key),
        Span::raw(" Refresh"),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_icon(frame: &mut Frame, area: Rect, weather: Option<&CurrentWeather>) {
    let Some(weather) = weather else {
        return;
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(weather.icon.glyph()),
            Span::raw("  "),
            Span::styled(
                weather.icon.condition().name(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_summary(frame: &mut Frame, area: Rect, weather: Option<&CurrentWeather>, stale: bool) {
    let lines: Vec<Line> = match weather {
        Some(weather) => {
            let [heading, temperature, description] = weather.summary_lines();
            let mut lines = vec![
                Line::from(Span::styled(
                    heading,
                    Style::default().fg(TITLE_COLOR).add_modifier(Modifier::BOLD),
                )),
                Line::from(temperature),
                Line::from(description),
            ];
            if stale {
                lines.push(stale_line(weather));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No weather loaded",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn stale_line(weather: &CurrentWeather) -> Line<'static> {
    let fetched = weather.fetched_at.with_timezone(&chrono::Local);
    Line::from(Span::styled(
        format!("(offline, showing data from {})", fetched.format("%a %H:%M")),
        Style::default().fg(Color::Yellow),
    ))
}

/// Y-axis bounds with one degree of headroom on each side
fn y_bounds(series: &DailySeries) -> [f64; 2] {
    match series.temperature_range() {
        Some((lo, hi)) => [(lo - 1.0).floor(), (hi + 1.0).ceil()],
        None => [0.0, 1.0],
    }
}

fn render_chart(frame: &mut Frame, area: Rect, series: &DailySeries, stale: bool) {
    let title = if stale {
        format!(" {} (cached) ", CHART_TITLE)
    } else {
        format!(" {} ", CHART_TITLE)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(TITLE_COLOR));

    if series.is_empty() {
        let placeholder = Paragraph::new("No forecast yet")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let points: Vec<(f64, f64)> = series
        .temperatures
        .iter()
        .enumerate()
        .map(|(i, t)| (i as f64, *t))
        .collect();

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&points),
    ];

    let [y_min, y_max] = y_bounds(series);
    let x_labels: Vec<Span> = series.labels.iter().map(|l| Span::raw(l.as_str())).collect();
    let y_labels = vec![
        Span::raw(format!("{:.1}", y_min)),
        Span::raw(format!("{:.1}", (y_min + y_max) / 2.0)),
        Span::raw(format!("{:.1}", y_max)),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, (series.len().saturating_sub(1)).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("°C")
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    if app.pending.is_some() {
        spans.push(Span::styled("Fetching weather... ", Style::default().fg(Color::Yellow)));
    } else if let Some(at) = app.last_refresh {
        spans.push(Span::styled(
            format!("Updated {} ", at.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::styled(
        "?: help  q: quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Right), area);
}
