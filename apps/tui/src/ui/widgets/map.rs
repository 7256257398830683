use bird_tracks_core::map::Rgb;
use bird_tracks_core::SceneMap;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Map, MapResolution};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

pub const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn map_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
}

/// Paints the current trajectory map, or the empty state when there is none
pub fn render_map(f: &mut Frame<'_>, area: Rect, map: Option<&SceneMap>, loading: bool) {
    let Some(map) = map else {
        render_empty(f, area, loading);
        return;
    };

    let attribution = map
        .tile_layers()
        .first()
        .map(|layer| format!(" Trajectory | {} ", layer.attribution))
        .unwrap_or_else(|| " Trajectory ".to_string());
    let block = map_block(attribution);

    let inner = block.inner(area);
    if inner.width == 0 || inner.height == 0 {
        f.render_widget(block, area);
        return;
    }
    let aspect = f64::from(inner.height) * CELL_ASPECT / f64::from(inner.width);

    let viewport = map.viewport;
    let has_tiles = !map.tile_layers().is_empty();
    let polylines = map.polylines().to_vec();
    let arrows = map.arrow_glyphs(aspect);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds(aspect))
        .paint(move |ctx| {
            if has_tiles {
                ctx.draw(&Map {
                    color: Color::DarkGray,
                    resolution: MapResolution::High,
                });
                ctx.layer();
            }

            for polyline in &polylines {
                let color = to_color(polyline.style.color);
                for pair in polyline.points.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].lon,
                        y1: pair[0].lat,
                        x2: pair[1].lon,
                        y2: pair[1].lat,
                        color,
                    });
                }
            }
            ctx.layer();

            for arrow in &arrows {
                let color = to_color(arrow.color);
                for barb in [arrow.left, arrow.right] {
                    ctx.draw(&CanvasLine {
                        x1: barb.lon,
                        y1: barb.lat,
                        x2: arrow.tip.lon,
                        y2: arrow.tip.lat,
                        color,
                    });
                }
            }
        });

    f.render_widget(canvas, area);
}

fn render_empty(f: &mut Frame<'_>, area: Rect, loading: bool) {
    let message = if loading {
        "Loading trajectory..."
    } else {
        "No trajectory to show."
    };

    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(map_block(" Trajectory ".to_string()));
    f.render_widget(paragraph, area);
}
