mod fetch;
mod picker;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use bird_tracks_core::api::{parse_identifiers, parse_trajectory};
use bird_tracks_core::map::Rgb;
use bird_tracks_core::{
    Command, Endpoints, Identifier, MapSlot, Phase, SceneMap, SceneProvider, TrackSummary,
    TrackerEvent, TrackerState,
};
use ratzilla::event::KeyCode;
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span},
    widgets::canvas::{Canvas, Line as CanvasLine, Map, MapResolution},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen_futures::spawn_local;

use picker::Picker;

const PAN_STEP: f64 = 0.1;

/// Everything the page shows, shared between key handlers, fetches and drawing.
#[derive(Debug, Default)]
struct Dashboard {
    tracker: TrackerState,
    map: MapSlot<SceneMap>,
    provider: SceneProvider,
    picker: Picker,
    summary: Option<TrackSummary>,
}

impl Dashboard {
    fn apply(&mut self, event: TrackerEvent) -> Option<Command> {
        let follow = matches!(event, TrackerEvent::IdentifiersLoaded(_));
        let command = self.tracker.apply(event);

        if follow {
            self.picker.follow(self.tracker.selected_index());
        }
        if self.map.sync(&self.tracker, &mut self.provider) {
            self.summary = (!self.tracker.trajectory().is_empty()).then(|| {
                TrackSummary::from_records(self.tracker.selected().cloned(), self.tracker.trajectory())
            });
        }
        command
    }

    fn highlighted_identifier(&self) -> Option<Identifier> {
        self.tracker
            .identifiers()
            .get(self.picker.highlighted())
            .cloned()
    }
}

type Shared = Rc<RefCell<Dashboard>>;

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to initialize logging: {e}").into());
    }

    let endpoints = Rc::new(Endpoints::default());
    let dashboard: Shared = Rc::new(RefCell::new(Dashboard::default()));

    spawn_local(load_identifiers(dashboard.clone(), endpoints.clone()));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let dashboard = dashboard.clone();
        let endpoints = endpoints.clone();
        move |event| handle_key(&dashboard, &endpoints, event.code)
    });

    terminal.draw_web(move |f| {
        let species = endpoints.species().to_string();
        render_dashboard(&dashboard.borrow(), &species, f);
    });

    Ok(())
}

fn handle_key(dashboard: &Shared, endpoints: &Rc<Endpoints>, code: KeyCode) {
    let mut state = dashboard.borrow_mut();
    let len = state.tracker.identifiers().len();

    match code {
        KeyCode::Up => state.picker.up(len),
        KeyCode::Down => state.picker.down(len),
        KeyCode::Enter => {
            let Some(identifier) = state.highlighted_identifier() else {
                return;
            };
            // Release the borrow before a fetch can be spawned
            drop(state);
            dispatch(dashboard, endpoints, TrackerEvent::SelectionChanged(identifier));
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char('+' | '=' | '-' | 'r') => {
            if let Some(map) = state.map.current_mut() {
                match code {
                    KeyCode::Left => map.viewport.pan(-PAN_STEP, 0.0),
                    KeyCode::Right => map.viewport.pan(PAN_STEP, 0.0),
                    KeyCode::Char('+' | '=') => map.viewport.zoom_in(),
                    KeyCode::Char('-') => map.viewport.zoom_out(),
                    _ => map.reset_view(),
                }
            }
        }
        _ => {}
    }
}

fn dispatch(dashboard: &Shared, endpoints: &Rc<Endpoints>, event: TrackerEvent) {
    let command = dashboard.borrow_mut().apply(event);

    if let Some(Command::FetchTrajectory(identifier)) = command {
        spawn_local(load_trajectory(
            dashboard.clone(),
            endpoints.clone(),
            identifier,
        ));
    }
}

async fn load_identifiers(dashboard: Shared, endpoints: Rc<Endpoints>) {
    let url = fetch::with_query(&endpoints.identifiers_url(), &endpoints.identifiers_query());
    let result = fetch::get_json(&url).await.and_then(parse_identifiers);
    dispatch(&dashboard, &endpoints, TrackerEvent::IdentifiersLoaded(result));
}

async fn load_trajectory(dashboard: Shared, endpoints: Rc<Endpoints>, identifier: Identifier) {
    let url = fetch::with_query(
        &endpoints.trajectory_url(),
        &endpoints.trajectory_query(&identifier),
    );
    let result = fetch::get_json(&url).await.and_then(parse_trajectory);
    dispatch(
        &dashboard,
        &endpoints,
        TrackerEvent::TrajectoryLoaded { identifier, result },
    );
}

fn render_dashboard(dashboard: &Dashboard, species: &str, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(f.area());

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(layout[0]);

    render_identifier_panel(dashboard, species, f, content[0]);
    render_map_panel(dashboard, f, content[1]);
    render_footer(dashboard, f, layout[1]);
}

fn render_identifier_panel(dashboard: &Dashboard, species: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!("Birds ({species})"))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let identifiers = dashboard.tracker.identifiers();
    if identifiers.is_empty() {
        let paragraph = Paragraph::new("No birds available")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    }

    let selected = dashboard.tracker.selected_index();
    let highlighted = dashboard.picker.highlighted();
    let lines: Vec<TextLine<'_>> = dashboard
        .picker
        .window(identifiers.len(), usize::from(inner.height))
        .filter_map(|index| {
            let identifier = identifiers.get(index)?;
            let marker = if Some(index) == selected { "* " } else { "  " };
            let style = if index == highlighted {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Rgb(0, 0, 238))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Some(TextLine::from(Span::styled(format!("{marker}{identifier}"), style)))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn render_map_panel(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let Some(map) = dashboard.map.current() else {
        let message = if dashboard.tracker.phase() == Phase::Loading {
            "Loading trajectory..."
        } else {
            "No trajectory to show."
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("Trajectory")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Gray)),
            );
        f.render_widget(paragraph, area);
        return;
    };

    let title = map.tile_layers().first().map_or_else(
        || "Trajectory".to_string(),
        |layer| format!("Trajectory | {}", layer.attribution),
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    if inner.width == 0 || inner.height == 0 {
        f.render_widget(block, area);
        return;
    }
    // Grid cells are about twice as tall as wide
    let aspect = f64::from(inner.height) * 2.0 / f64::from(inner.width);

    let has_tiles = !map.tile_layers().is_empty();
    let polylines = map.polylines();
    let arrows = map.arrow_glyphs(aspect);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(map.viewport.x_bounds())
        .y_bounds(map.viewport.y_bounds(aspect))
        .paint(|ctx| {
            if has_tiles {
                ctx.draw(&Map {
                    color: Color::DarkGray,
                    resolution: MapResolution::High,
                });
                ctx.layer();
            }

            for polyline in polylines {
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
                for barb in [arrow.left, arrow.right] {
                    ctx.draw(&CanvasLine {
                        x1: barb.lon,
                        y1: barb.lat,
                        x2: arrow.tip.lon,
                        y2: arrow.tip.lat,
                        color: to_color(arrow.color),
                    });
                }
            }
        });

    f.render_widget(canvas, area);
}

fn render_footer(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let mut parts = vec![dashboard.tracker.phase().to_string()];
    if let Some(summary) = &dashboard.summary {
        parts.push(format!("{} points", summary.valid_samples));
    }
    if let Some(map) = dashboard.map.current() {
        parts.push(format!("zoom {}", map.viewport.zoom));
    }

    let line = TextLine::from(vec![
        Span::styled(parts.join(" | "), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(
            "Up/Down pick  Enter show  Left/Right pan  +/- zoom  r reset",
            Style::default().fg(Color::Gray),
        ),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
