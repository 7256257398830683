use std::fmt;

use serde_json::Value;

use crate::api::FetchError;
use crate::sample::Identifier;

/// Where the selection/trajectory flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No identifiers loaded.
    Idle,
    /// Identifiers loaded, no trajectory stored.
    Ready,
    /// Trajectory request in flight.
    Loading,
    /// Trajectory stored.
    Rendered,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Ready => write!(f, "Ready"),
            Self::Loading => write!(f, "Loading"),
            Self::Rendered => write!(f, "Rendered"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TrackerEvent {
    IdentifiersLoaded(Result<Vec<Identifier>, FetchError>),
    SelectionChanged(Identifier),
    TrajectoryLoaded {
        identifier: Identifier,
        result: Result<Vec<Value>, FetchError>,
    },
}

/// Follow-up work requested by [`TrackerState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchTrajectory(Identifier),
}

/// Identifier list, selection and trajectory of one tracking view.
#[derive(Debug, Clone)]
pub struct TrackerState {
    identifiers: Vec<Identifier>,
    // Only the first entry is ever used.
    selection: Vec<Identifier>,
    trajectory: Vec<Value>,
    phase: Phase,
    revision: u64,
}

impl TrackerState {
    pub const fn new() -> Self {
        Self {
            identifiers: Vec::new(),
            selection: Vec::new(),
            trajectory: Vec::new(),
            phase: Phase::Idle,
            revision: 0,
        }
    }

    pub fn identifiers(&self) -> &[Identifier] {
        &self.identifiers
    }

    pub fn selected(&self) -> Option<&Identifier> {
        self.selection.first()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected()?;
        self.identifiers.iter().position(|id| id == selected)
    }

    pub fn trajectory(&self) -> &[Value] {
        &self.trajectory
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Bumped every time the trajectory is replaced, including by an empty
    /// one after a failure.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply(&mut self, event: TrackerEvent) -> Option<Command> {
        match event {
            TrackerEvent::IdentifiersLoaded(result) => self.identifiers_loaded(result),
            TrackerEvent::SelectionChanged(identifier) => self.select(identifier),
            TrackerEvent::TrajectoryLoaded { identifier, result } => {
                self.trajectory_loaded(&identifier, result);
                None
            }
        }
    }

    fn identifiers_loaded(&mut self, result: Result<Vec<Identifier>, FetchError>) -> Option<Command> {
        match result {
            Ok(identifiers) => {
                log::info!("Loaded {} identifiers", identifiers.len());
                self.identifiers = identifiers;
                match self.identifiers.first().cloned() {
                    Some(first) => self.select(first),
                    None => {
                        self.phase = Phase::Idle;
                        None
                    }
                }
            }
            Err(error) => {
                log::error!("Error fetching identifiers: {error}");
                self.identifiers.clear();
                self.phase = Phase::Idle;
                None
            }
        }
    }

    fn select(&mut self, identifier: Identifier) -> Option<Command> {
        log::debug!("Selected identifier {identifier}");
        self.selection = vec![identifier.clone()];
        self.phase = Phase::Loading;
        Some(Command::FetchTrajectory(identifier))
    }

    fn trajectory_loaded(&mut self, identifier: &Identifier, result: Result<Vec<Value>, FetchError>) {
        if self.selected() != Some(identifier) {
            log::debug!("Discarding stale trajectory for {identifier}");
            return;
        }

        self.trajectory = match result {
            Ok(records) => {
                log::info!("Loaded {} trajectory records for {identifier}", records.len());
                records
            }
            Err(error) => {
                log::error!("Error fetching trajectory data for {identifier}: {error}");
                Vec::new()
            }
        };
        self.revision += 1;
        self.phase = if self.trajectory.is_empty() {
            Phase::Ready
        } else {
            Phase::Rendered
        };
    }
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new()
    }
}
