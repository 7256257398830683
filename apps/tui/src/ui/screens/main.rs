use crate::app::App;
use crate::ui::widgets::dropdown::render_dropdown;
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use bird_tracks_core::{Phase, TrackSummary};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

const KEY_HINTS: [(&str, &str); 6] = [
    ("Enter", "Choose bird"),
    ("Arrows", "Pan"),
    ("+/-", "Zoom"),
    ("r", "Reset view"),
    ("?", "Help"),
    ("q", "Quit"),
];

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Selector
            Constraint::Min(5),    // Map
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_selector(app, f, layout[0]);
    render_map(f, layout[1], app.map.current(), app.is_loading());
    render_status_section(app, f, layout[2]);
    render_shortcuts(f, layout[3]);

    if app.dropdown.open {
        render_dropdown(app, f, layout[0]);
    }
    if app.show_help {
        render_help_popup(f, f.area());
    }
}

fn render_selector(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" Bird ({}) ", app.species()))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(24)])
        .split(inner);

    let selection = selection_line(app);
    f.render_widget(Paragraph::new(selection), chunks[0]);

    if app.is_loading() {
        let throbber = Throbber::default()
            .label("Loading track")
            .style(Style::default().fg(Color::Gray))
            .throbber_style(Style::default().fg(Color::Yellow));
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, chunks[1], &mut state);
    }
}

fn selection_line(app: &App) -> TextLine<'static> {
    let arrow = if app.dropdown.open { "▲" } else { "▼" };

    match app.tracker.selected() {
        Some(identifier) => TextLine::from(vec![
            Span::styled(
                identifier.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {arrow}"), Style::default().fg(Color::Gray)),
            Span::styled(
                format!("  ({} birds)", app.tracker.identifiers().len()),
                Style::default().fg(Color::Gray),
            ),
        ]),
        None => TextLine::from(Span::styled(
            "No birds available",
            Style::default().fg(Color::Gray),
        )),
    }
}

fn status_text(phase: Phase, summary: Option<&TrackSummary>, zoom: Option<u8>) -> String {
    let mut parts = vec![phase.to_string()];

    if let Some(summary) = summary {
        parts.push(format!("{} points", summary.valid_samples));
        if summary.dropped > 0 {
            parts.push(format!("{} dropped", summary.dropped));
        }
        if let (Some(first), Some(last)) = (&summary.first_timestamp, &summary.last_timestamp) {
            parts.push(format!("{first} to {last}"));
        }
        if let Some(hours) = summary.duration_hours {
            parts.push(format!("{hours}h"));
        }
    }
    if let Some(zoom) = zoom {
        parts.push(format!("zoom {zoom}"));
    }

    parts.join(" | ")
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let zoom = app.map.current().map(|map| map.viewport.zoom);
    let text = status_text(app.tracker.phase(), app.summary.as_ref(), zoom);

    let status_paragraph = Paragraph::new(Text::from(Span::styled(
        text,
        Style::default().fg(Color::Green),
    )))
    .block(status_block)
    .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::Gray);

    let mut spans = Vec::with_capacity(KEY_HINTS.len() * 2);
    for (index, (key, label)) in KEY_HINTS.iter().enumerate() {
        let separator = if index + 1 < KEY_HINTS.len() { " | " } else { "" };
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(format!(": {label}{separator}"), label_style));
    }

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(TextLine::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn help_entry(key: &'static str, description: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("  {key}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - {description}")),
    ])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    vec![
        TextLine::from(Span::styled(
            "Bird Tracks",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from("Pick a bird to draw its GPS trajectory. Arrows along the line point the way it flew."),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Map:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        help_entry("Enter/Space", "Open the bird list"),
        help_entry("Arrow keys", "Pan the map"),
        help_entry("+ / -", "Zoom in / out"),
        help_entry("r", "Reset the view"),
        help_entry("q", "Quit application"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Bird list:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        help_entry("Type", "Filter birds by id"),
        help_entry("Up/Down", "Move the highlight"),
        help_entry("PgUp/PgDn Home/End", "Jump through the list"),
        help_entry("Enter", "Show the highlighted bird"),
        help_entry("Esc", "Close the list"),
        TextLine::from(""),
        help_entry("? / F1", "Toggle this help popup"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::tests::{load_identifiers, test_app};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|f| render_main(app, f)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn status_lists_summary_parts() {
        let summary = TrackSummary {
            identifier: None,
            records: 3,
            valid_samples: 2,
            dropped: 1,
            first_timestamp: Some("2014-08-15 00:00:00".to_string()),
            last_timestamp: Some("2014-08-16 12:00:00".to_string()),
            duration_hours: Some(36),
            bounds: None,
            bearings: vec![45.0],
        };

        assert_eq!(
            status_text(Phase::Rendered, Some(&summary), Some(4)),
            "Rendered | 2 points | 1 dropped | 2014-08-15 00:00:00 to 2014-08-16 12:00:00 | 36h | zoom 4"
        );
    }

    #[tokio::test]
    async fn selector_shows_current_bird() {
        let mut app = test_app();
        load_identifiers(&mut app, &["Anser-17", "Anser-18"]);

        let text = screen(&app);
        assert!(text.contains("Bird (anser)"));
        assert!(text.contains("Anser-17"));
        assert!(text.contains("(2 birds)"));
    }

    #[tokio::test]
    async fn open_dropdown_lists_identifiers() {
        let mut app = test_app();
        load_identifiers(&mut app, &["Anser-17", "Anser-18"]);
        app.open_dropdown();

        let text = screen(&app);
        assert!(text.contains("Filter:"));
        assert!(text.contains("Anser-18"));
    }

    #[test]
    fn help_popup_renders_over_the_map() {
        let mut app = test_app();
        app.show_help = true;

        assert!(screen(&app).contains("Help & Keyboard Shortcuts"));
    }
}
