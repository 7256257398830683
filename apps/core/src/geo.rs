use serde::Serialize;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_in_range(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// South-west and north-east corners of a set of points or of a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn around(points: impl IntoIterator<Item = LatLon>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                None => Self {
                    south: point.lat,
                    west: point.lon,
                    north: point.lat,
                    east: point.lon,
                },
                Some(bounds) => Self {
                    south: bounds.south.min(point.lat),
                    west: bounds.west.min(point.lon),
                    north: bounds.north.max(point.lat),
                    east: bounds.east.max(point.lon),
                },
            })
        })
    }

    /// Grows every side by `margin` degrees.
    pub fn expanded(self, margin: f64) -> Self {
        Self {
            south: self.south - margin,
            west: self.west - margin,
            north: self.north + margin,
            east: self.east + margin,
        }
    }

    pub fn contains(&self, point: LatLon) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lon)
    }
}

/// Initial great-circle bearing from `from` to `to`, in degrees within [0, 360).
///
/// Identical points give `atan2(0, 0)`, i.e. a heading of 0.
pub fn bearing(from: LatLon, to: LatLon) -> f64 {
    let start_lat = from.lat.to_radians();
    let end_lat = to.lat.to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let y = delta_lon.sin() * end_lat.cos();
    let x = start_lat
        .cos()
        .mul_add(end_lat.sin(), -(start_lat.sin() * end_lat.cos() * delta_lon.cos()));

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Bearings of every consecutive pair, in path order.
pub fn segment_bearings(points: &[LatLon]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| bearing(pair[0], pair[1]))
        .collect()
}

pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = ((degrees % 360.0) + 360.0) % 360.0;
    // 360 - epsilon can round up to exactly 360
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
