use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;

use bird_tracks_core::{Command, Identifier, TrackSummary, TrackerEvent, TrackerState};

use crate::app::{handle_input, App, TrackClient};
use crate::terminal::Tui;
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Run the terminal UI until the user quits
pub fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.update();
        app.drain_events();

        terminal
            .draw(|f| ui::ui(app, f))
            .map_err(|e| eyre!("Terminal draw error: {e}"))?;

        if !matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            continue;
        }

        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                handle_input(app, key.code);
            }
            Ok(Event::Resize(width, height)) => {
                log::debug!("Terminal resized to {width}x{height}");
            }
            Ok(_) => {}
            Err(e) => log::warn!("Failed to read terminal event: {e}"),
        }
    }

    Ok(())
}

/// Fetch one track and print what it contains, without a UI
pub async fn run_headless(client: &TrackClient, json: bool, bird_id: Option<&str>) -> Result<()> {
    let report = build_headless_report(client, bird_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_headless_text(&report);
    }

    Ok(())
}

async fn build_headless_report(
    client: &TrackClient,
    bird_id: Option<&str>,
) -> Result<HeadlessReport> {
    let mut tracker = TrackerState::new();

    let identifiers = client
        .fetch_identifiers()
        .await
        .map_err(|e| eyre!("Error fetching identifiers: {e}"))?;
    let mut command = tracker.apply(TrackerEvent::IdentifiersLoaded(Ok(identifiers)));

    if let Some(wanted) = bird_id {
        let identifier = resolve_identifier(tracker.identifiers(), wanted);
        command = tracker.apply(TrackerEvent::SelectionChanged(identifier));
    }

    let summary = match command {
        Some(Command::FetchTrajectory(identifier)) => {
            let result = client.fetch_trajectory(&identifier).await;
            if let Err(e) = &result {
                return Err(eyre!("Error fetching trajectory for {identifier}: {e}"));
            }
            tracker.apply(TrackerEvent::TrajectoryLoaded { identifier, result });
            Some(TrackSummary::from_records(
                tracker.selected().cloned(),
                tracker.trajectory(),
            ))
        }
        None => None,
    };

    Ok(HeadlessReport {
        species: client.endpoints().species().to_string(),
        identifiers: tracker.identifiers().iter().map(ToString::to_string).collect(),
        phase: tracker.phase().to_string(),
        summary,
    })
}

/// Matches a typed id against the service's list so numeric ids keep their type
fn resolve_identifier(identifiers: &[Identifier], wanted: &str) -> Identifier {
    identifiers
        .iter()
        .find(|identifier| identifier.to_string() == wanted)
        .cloned()
        .unwrap_or_else(|| Identifier::from(wanted))
}

fn render_headless_text(report: &HeadlessReport) {
    println!("\nBird Tracks ({})", report.species);
    println!("=================");
    println!("Identifiers: {}", report.identifiers.len());

    let Some(summary) = &report.summary else {
        println!("No identifiers available.");
        return;
    };

    if let Some(identifier) = &summary.identifier {
        println!("Selected: {identifier}");
    }
    println!("Records: {}", summary.records);
    println!("Valid samples: {}", summary.valid_samples);
    println!("Dropped: {}", summary.dropped);

    if summary.valid_samples == 0 {
        println!("\nNo valid trajectory data found.");
        return;
    }

    if let (Some(first), Some(last)) = (&summary.first_timestamp, &summary.last_timestamp) {
        println!("From: {first}");
        println!("To: {last}");
    }
    if let Some(hours) = summary.duration_hours {
        println!("Duration: {hours}h");
    }
    if let Some(bounds) = &summary.bounds {
        println!(
            "Bounds: {:.4}..{:.4} N, {:.4}..{:.4} E",
            bounds.south, bounds.north, bounds.west, bounds.east
        );
    }

    println!("\nSegment bearings:");
    for (index, bearing) in summary.bearings.iter().enumerate() {
        println!("- {:>3}: {bearing:.1}°", index + 1);
    }
}

#[derive(Debug, serde::Serialize)]
struct HeadlessReport {
    species: String,
    identifiers: Vec<String>,
    phase: String,
    summary: Option<TrackSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    #[test]
    fn typed_ids_resolve_to_listed_identifiers() {
        let identifiers = vec![
            Identifier::Number(Number::from(17)),
            Identifier::from("Branta-02"),
        ];

        assert_eq!(
            resolve_identifier(&identifiers, "17"),
            Identifier::Number(Number::from(17))
        );
        assert_eq!(
            resolve_identifier(&identifiers, "unknown"),
            Identifier::from("unknown")
        );
    }
}
