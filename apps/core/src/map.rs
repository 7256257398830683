//! Drawing contract for the trajectory map and the renderer built on it.
//!
//! A map instance is released by dropping it. [`MapSlot`] owns the single
//! live instance and drops it before building the next one.

use serde_json::Value;

use crate::geo::{segment_bearings, LatLon};
use crate::sample::valid_samples;
use crate::state::TrackerState;

/// Initial view: North America.
pub const DEFAULT_CENTER: LatLon = LatLon::new(37.8, -96.9);
pub const DEFAULT_ZOOM: u8 = 4;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const POLYLINE_BLUE: Self = Self(0x33, 0x88, 0xff);
    pub const ARROW_RED: Self = Self(0xff, 0x00, 0x00);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl TileLayer {
    pub fn openstreetmap() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolylineStyle {
    pub color: Rgb,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            color: Rgb::POLYLINE_BLUE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub pixel_size: f64,
    /// Filled triangle instead of two open barbs.
    pub polygon: bool,
    pub color: Rgb,
}

/// Repeated arrow heads along a polyline. `bearings[i]` is the heading of
/// segment `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub offset_px: f64,
    pub repeat_px: f64,
    pub symbol: ArrowHead,
    pub bearings: Vec<f64>,
}

impl Decoration {
    pub const fn arrows(bearings: Vec<f64>) -> Self {
        Self {
            offset_px: 10.0,
            repeat_px: 150.0,
            symbol: ArrowHead {
                pixel_size: 8.0,
                polygon: false,
                color: Rgb::ARROW_RED,
            },
            bearings,
        }
    }
}

pub type LayerId = usize;

pub trait MapView {
    fn add_tile_layer(&mut self, layer: TileLayer);
    fn add_polyline(&mut self, points: Vec<LatLon>, style: PolylineStyle) -> LayerId;
    fn add_decorator(&mut self, polyline: LayerId, decoration: Decoration);
}

pub trait MapProvider {
    type Map: MapView;

    fn create_map(&mut self, center: LatLon, zoom: u8) -> Self::Map;
}

/// Builds a map for `records`, or `None` when no record is valid.
pub fn render_trajectory<P: MapProvider>(provider: &mut P, records: &[Value]) -> Option<P::Map> {
    let samples = valid_samples(records);
    if samples.is_empty() {
        log::error!("No valid trajectory data found.");
        return None;
    }
    log::debug!(
        "Rendering {} of {} trajectory records",
        samples.len(),
        records.len()
    );

    let mut map = provider.create_map(DEFAULT_CENTER, DEFAULT_ZOOM);
    map.add_tile_layer(TileLayer::openstreetmap());

    let points: Vec<LatLon> = samples.iter().map(|sample| sample.position).collect();
    let bearings = segment_bearings(&points);
    let line = map.add_polyline(points, PolylineStyle::default());
    map.add_decorator(line, Decoration::arrows(bearings));

    Some(map)
}

/// Owner of the live map instance.
#[derive(Debug)]
pub struct MapSlot<M> {
    current: Option<M>,
    revision: Option<u64>,
}

impl<M: MapView> MapSlot<M> {
    pub const fn new() -> Self {
        Self {
            current: None,
            revision: None,
        }
    }

    pub const fn current(&self) -> Option<&M> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut M> {
        self.current.as_mut()
    }

    /// Rebuilds the map when the trajectory revision moved. Returns whether
    /// a rebuild happened.
    pub fn sync<P>(&mut self, state: &TrackerState, provider: &mut P) -> bool
    where
        P: MapProvider<Map = M>,
    {
        if self.revision == Some(state.revision()) {
            return false;
        }

        self.clear();
        self.revision = Some(state.revision());
        if !state.trajectory().is_empty() {
            self.current = render_trajectory(provider, state.trajectory());
        }
        true
    }

    pub fn clear(&mut self) {
        // Drop before anything replaces it.
        drop(self.current.take());
    }
}

impl<M: MapView> Default for MapSlot<M> {
    fn default() -> Self {
        Self::new()
    }
}
