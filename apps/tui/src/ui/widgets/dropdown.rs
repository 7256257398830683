use crate::app::App;
use crate::ui::widgets::popup::ClearWidget;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const MAX_ROWS: u16 = 10;

/// Area the open list occupies: directly under the selector, clipped to `bounds`.
pub fn dropdown_area(anchor: Rect, bounds: Rect, rows: usize) -> Rect {
    let y = anchor.y.saturating_add(anchor.height);
    let available = bounds.y.saturating_add(bounds.height).saturating_sub(y);
    let wanted = u16::try_from(rows).unwrap_or(u16::MAX).clamp(1, MAX_ROWS) + 3;

    Rect {
        x: anchor.x,
        y,
        width: anchor.width,
        height: wanted.min(available),
    }
}

pub fn render_dropdown(app: &App, f: &mut Frame<'_>, anchor: Rect) {
    let matches = app.filtered_identifiers();
    let area = dropdown_area(anchor, f.area(), matches.len());
    if area.height < 3 {
        return;
    }
    f.render_widget(ClearWidget, area);

    let block = Block::default()
        .title(format!(" Filter: {}_ ", app.dropdown.filter))
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let max_visible_rows = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(matches.len(), max_visible_rows, app.dropdown.highlighted);
    let selected = app.tracker.selected();

    let mut lines: Vec<TextLine<'_>> = matches
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .filter_map(|(row, &index)| {
            let identifier = app.tracker.identifiers().get(index)?;
            let marker = if Some(identifier) == selected { "* " } else { "  " };
            let style = if row == app.dropdown.highlighted {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Some(TextLine::from(Span::styled(format!("{marker}{identifier}"), style)))
        })
        .collect();

    if lines.is_empty() {
        lines.push(TextLine::from(Span::styled(
            "No matching birds",
            Style::default().fg(Color::Gray),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}
