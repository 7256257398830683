// Shared model and map logic for the bird tracks viewer

pub mod api;
pub mod geo;
pub mod map;
pub mod sample;
pub mod scene;
pub mod state;
pub mod summary;

pub use api::{Endpoints, FetchError};
pub use geo::{bearing, segment_bearings, Bounds, LatLon};
pub use map::{render_trajectory, MapProvider, MapSlot, MapView};
pub use sample::{valid_samples, Identifier, TrajectorySample};
pub use scene::{SceneMap, SceneProvider, Viewport};
pub use state::{Command, Phase, TrackerEvent, TrackerState};
pub use summary::TrackSummary;
