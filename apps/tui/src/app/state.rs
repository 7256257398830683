use crate::app::actions::TrackClient;
use bird_tracks_core::{
    Command, Identifier, MapSlot, Phase, SceneMap, SceneProvider, TrackSummary, TrackerEvent,
    TrackerState,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::cmp::Reverse;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Open/closed state of the identifier picker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dropdown {
    pub open: bool,
    /// Row within the filtered list.
    pub highlighted: usize,
    pub filter: String,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub tracker: TrackerState,
    pub map: MapSlot<SceneMap>,
    pub summary: Option<TrackSummary>,
    pub dropdown: Dropdown,
    pub throbber: ThrobberState,
    client: TrackClient,
    provider: SceneProvider,
    events_tx: UnboundedSender<TrackerEvent>,
    events_rx: UnboundedReceiver<TrackerEvent>,
}

impl App {
    pub fn new(client: TrackClient) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            show_help: false,
            tracker: TrackerState::new(),
            map: MapSlot::new(),
            summary: None,
            dropdown: Dropdown::default(),
            throbber: ThrobberState::default(),
            client,
            provider: SceneProvider,
            events_tx,
            events_rx,
        }
    }

    pub fn species(&self) -> &str {
        self.client.endpoints().species()
    }

    /// Starts the one-off identifier fetch.
    pub fn mount(&self) {
        let client = self.client.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_identifiers().await;
            // The receiver only goes away when the app is shutting down.
            let _ = events.send(TrackerEvent::IdentifiersLoaded(result));
        });
    }

    pub fn dispatch(&mut self, event: TrackerEvent) {
        if let Some(command) = self.tracker.apply(event) {
            self.run_command(command);
        }

        if self.map.sync(&self.tracker, &mut self.provider) {
            self.summary = (!self.tracker.trajectory().is_empty()).then(|| {
                TrackSummary::from_records(self.tracker.selected().cloned(), self.tracker.trajectory())
            });
        }
    }

    /// Applies every fetch result that arrived since the last frame.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event);
        }
    }

    pub fn select(&mut self, identifier: Identifier) {
        self.dispatch(TrackerEvent::SelectionChanged(identifier));
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.phase() == Phase::Loading
    }

    pub fn update(&mut self) {
        if self.is_loading() {
            self.throbber.calc_next();
        }
    }

    /// Indices into the identifier list matching the dropdown filter, best
    /// match first. An empty filter keeps list order.
    pub fn filtered_identifiers(&self) -> Vec<usize> {
        let identifiers = self.tracker.identifiers();
        if self.dropdown.filter.is_empty() {
            return (0..identifiers.len()).collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(usize, i64)> = identifiers
            .iter()
            .enumerate()
            .filter_map(|(index, identifier)| {
                matcher
                    .fuzzy_match(&identifier.to_string(), &self.dropdown.filter)
                    .map(|score| (index, score))
            })
            .collect();
        scored.sort_by_key(|&(_, score)| Reverse(score));
        scored.into_iter().map(|(index, _)| index).collect()
    }

    pub fn open_dropdown(&mut self) {
        self.dropdown = Dropdown {
            open: true,
            highlighted: self.tracker.selected_index().unwrap_or(0),
            filter: String::new(),
        };
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown = Dropdown::default();
    }

    /// Selects the highlighted row, if any, and closes the dropdown.
    pub fn confirm_dropdown(&mut self) {
        let chosen = self
            .filtered_identifiers()
            .get(self.dropdown.highlighted)
            .and_then(|&index| self.tracker.identifiers().get(index))
            .cloned();
        self.close_dropdown();

        if let Some(identifier) = chosen {
            self.select(identifier);
        }
    }

    fn run_command(&self, command: Command) {
        match command {
            Command::FetchTrajectory(identifier) => {
                let client = self.client.clone();
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = client.fetch_trajectory(&identifier).await;
                    let _ = events.send(TrackerEvent::TrajectoryLoaded { identifier, result });
                });
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bird_tracks_core::Endpoints;
    use serde_json::json;

    pub(crate) fn test_app() -> App {
        // Nothing listens on the discard port; spawned fetches fail fast.
        let endpoints = Endpoints::new("http://127.0.0.1:9", "anser");
        let client = TrackClient::new(endpoints, None).expect("client builds");
        App::new(client)
    }

    pub(crate) fn load_identifiers(app: &mut App, ids: &[&str]) {
        let ids = ids.iter().copied().map(Identifier::from).collect();
        app.dispatch(TrackerEvent::IdentifiersLoaded(Ok(ids)));
    }

    #[tokio::test]
    async fn loading_identifiers_selects_the_first() {
        let mut app = test_app();
        load_identifiers(&mut app, &["A1", "A2"]);

        assert_eq!(app.tracker.selected(), Some(&Identifier::from("A1")));
        assert!(app.is_loading());
    }

    #[tokio::test]
    async fn trajectory_builds_map_and_summary() {
        let mut app = test_app();
        load_identifiers(&mut app, &["A1"]);
        app.dispatch(TrackerEvent::TrajectoryLoaded {
            identifier: Identifier::from("A1"),
            result: Ok(vec![
                json!({"LATITUDE": 40.0, "LONGITUDE": -100.0, "TIMESTAMP": "2014-08-15 00:00:00"}),
                json!({"LATITUDE": 41.0, "LONGITUDE": -99.0, "TIMESTAMP": "2014-08-15 06:00:00"}),
            ]),
        });

        let map = app.map.current().expect("map is built");
        assert_eq!(map.polylines().len(), 1);
        assert_eq!(app.summary.as_ref().map(|s| s.valid_samples), Some(2));
    }

    #[tokio::test]
    async fn fuzzy_filter_ranks_matches() {
        let mut app = test_app();
        load_identifiers(&mut app, &["Anser-17", "Branta-02", "Anser-2"]);
        app.open_dropdown();
        app.dropdown.filter = "br".to_string();

        assert_eq!(app.filtered_identifiers(), vec![1]);

        app.dropdown.filter.clear();
        assert_eq!(app.filtered_identifiers(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn confirming_dropdown_changes_selection() {
        let mut app = test_app();
        load_identifiers(&mut app, &["A1", "A2"]);
        app.open_dropdown();
        app.dropdown.highlighted = 1;
        app.confirm_dropdown();

        assert!(!app.dropdown.open);
        assert_eq!(app.tracker.selected(), Some(&Identifier::from("A2")));
    }
}
