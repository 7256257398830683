//! In-memory implementation of the drawing contract.
//!
//! Front ends paint a [`SceneMap`] onto whatever canvas they have: the
//! viewport supplies the visible bounds and the scene supplies line
//! segments in geographic coordinates.
//!
//! The projection is equirectangular: one pixel scale for latitude and
//! longitude, which is also how the canvases draw. Arrow heads therefore
//! turn with the on-screen direction of their segment, not with the
//! great-circle bearing.

use crate::geo::{Bounds, LatLon};
use crate::map::{
    Decoration, LayerId, MapProvider, MapView, PolylineStyle, Rgb, TileLayer, DEFAULT_CENTER,
    DEFAULT_ZOOM,
};

pub const TILE_SIZE_PX: f64 = 256.0;
pub const VIEW_WIDTH_PX: f64 = 800.0;
pub const VIEW_HEIGHT_PX: f64 = 600.0;
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// Half the angle between the two barbs of an arrow head.
const ARROW_HALF_ANGLE_DEG: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: u8,
}

impl Viewport {
    pub const fn new(center: LatLon, zoom: u8) -> Self {
        Self { center, zoom }
    }

    pub fn pixels_per_degree(&self) -> f64 {
        TILE_SIZE_PX * f64::from(1_u32 << self.zoom.min(MAX_ZOOM)) / 360.0
    }

    pub fn lon_span(&self) -> f64 {
        VIEW_WIDTH_PX / self.pixels_per_degree()
    }

    /// `aspect` is height over width of the drawing area.
    pub fn lat_span(&self, aspect: f64) -> f64 {
        self.lon_span() * aspect
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.lon_span() / 2.0;
        [self.center.lon - half, self.center.lon + half]
    }

    pub fn y_bounds(&self, aspect: f64) -> [f64; 2] {
        let half = self.lat_span(aspect) / 2.0;
        [self.center.lat - half, self.center.lat + half]
    }

    pub fn visible_bounds(&self, aspect: f64) -> Bounds {
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds(aspect);
        Bounds {
            south,
            west,
            north,
            east,
        }
    }

    /// Moves the center by a fraction of the visible span.
    pub fn pan(&mut self, east_fraction: f64, north_fraction: f64) {
        let default_aspect = VIEW_HEIGHT_PX / VIEW_WIDTH_PX;
        let lon = east_fraction.mul_add(self.lon_span(), self.center.lon);
        let lat = north_fraction.mul_add(self.lat_span(default_aspect), self.center.lat);
        self.center = LatLon::new(lat.clamp(-90.0, 90.0), wrap_longitude(lon));
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.saturating_add(1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    ((lon + 180.0).rem_euclid(360.0)) - 180.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<LatLon>,
    pub style: PolylineStyle,
}

/// One arrow head: two barbs ending at `tip`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGlyph {
    pub tip: LatLon,
    pub left: LatLon,
    pub right: LatLon,
    pub bearing: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SceneProvider;

impl MapProvider for SceneProvider {
    type Map = SceneMap;

    fn create_map(&mut self, center: LatLon, zoom: u8) -> SceneMap {
        SceneMap {
            initial: Viewport::new(center, zoom),
            viewport: Viewport::new(center, zoom),
            tile_layers: Vec::new(),
            polylines: Vec::new(),
            decorations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneMap {
    initial: Viewport,
    pub viewport: Viewport,
    tile_layers: Vec<TileLayer>,
    polylines: Vec<Polyline>,
    decorations: Vec<(LayerId, Decoration)>,
}

impl SceneMap {
    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tile_layers
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn reset_view(&mut self) {
        self.viewport = self.initial;
    }

    /// Arrow heads visible in a drawing area of the given `aspect` (height
    /// over width). Spacing is measured in pixels, so zooming changes how
    /// many arrows fit on the line.
    pub fn arrow_glyphs(&self, aspect: f64) -> Vec<ArrowGlyph> {
        let scale = self.viewport.pixels_per_degree();
        let visible = self.viewport.visible_bounds(aspect);
        self.decorations
            .iter()
            .filter_map(|(layer, decoration)| {
                self.polylines
                    .get(*layer)
                    .map(|line| place_arrows(&line.points, decoration, scale, Some(&visible)))
            })
            .flatten()
            .collect()
    }
}

impl MapView for SceneMap {
    fn add_tile_layer(&mut self, layer: TileLayer) {
        self.tile_layers.push(layer);
    }

    fn add_polyline(&mut self, points: Vec<LatLon>, style: PolylineStyle) -> LayerId {
        self.polylines.push(Polyline { points, style });
        self.polylines.len() - 1
    }

    fn add_decorator(&mut self, polyline: LayerId, decoration: Decoration) {
        self.decorations.push((polyline, decoration));
    }
}

/// Walks the line in pixel space and drops an arrow at `offset`, then every
/// `repeat` pixels. Each arrow keeps the bearing of the segment it lands on
/// and is drawn along that segment's on-screen direction.
///
/// With `visible` set, arrows outside those bounds are skipped without being
/// built; the ones that remain sit exactly where the full walk puts them.
pub fn place_arrows(
    points: &[LatLon],
    decoration: &Decoration,
    scale: f64,
    visible: Option<&Bounds>,
) -> Vec<ArrowGlyph> {
    let repeat = decoration.repeat_px;
    // A single arrow is never worth clipping.
    let visible = visible
        .filter(|_| repeat > 0.0)
        .map(|bounds| bounds.expanded(decoration.symbol.pixel_size / scale));

    let mut glyphs = Vec::new();
    let mut target = decoration.offset_px;
    let mut travelled = 0.0;

    for (index, pair) in points.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        let dx = (end.lon - start.lon) * scale;
        let dy = (end.lat - start.lat) * scale;
        let length = dx.hypot(dy);
        if length <= f64::EPSILON {
            continue;
        }
        let segment_end = travelled + length;

        let window = match &visible {
            None => Some((travelled, segment_end)),
            Some(bounds) => clip_segment(start, end, bounds)
                .map(|(t0, t1)| (t0.mul_add(length, travelled), t1.mul_add(length, travelled))),
        };

        if let Some((from, to)) = window {
            target = skip_to(target, repeat, from);
            let bearing = decoration.bearings.get(index).copied().unwrap_or(0.0);
            let heading = dx.atan2(dy).to_degrees();

            while target <= to {
                let t = (target - travelled) / length;
                let tip = LatLon::new(
                    t.mul_add(end.lat - start.lat, start.lat),
                    t.mul_add(end.lon - start.lon, start.lon),
                );
                glyphs.push(arrow_glyph(tip, heading, bearing, decoration, scale));

                if repeat <= 0.0 {
                    return glyphs;
                }
                target += repeat;
            }
        }

        // Arrows clipped off the end of this segment still use up their slot.
        target = skip_to(target, repeat, segment_end);
        if repeat > 0.0 && target <= segment_end {
            target += repeat;
        }
        travelled = segment_end;
    }

    glyphs
}

/// First of `target + k * repeat` (k >= 0) that is not below `floor`.
fn skip_to(target: f64, repeat: f64, floor: f64) -> f64 {
    if target >= floor || repeat <= 0.0 {
        return target;
    }
    ((floor - target) / repeat).ceil().mul_add(repeat, target)
}

/// Parameter range `[t0, t1]` of the segment lying inside `bounds`
/// (Liang-Barsky), in degrees.
fn clip_segment(start: LatLon, end: LatLon, bounds: &Bounds) -> Option<(f64, f64)> {
    let dx = end.lon - start.lon;
    let dy = end.lat - start.lat;
    let edges = [
        (-dx, start.lon - bounds.west),
        (dx, bounds.east - start.lon),
        (-dy, start.lat - bounds.south),
        (dy, bounds.north - start.lat),
    ];

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in edges {
        if p.abs() < f64::EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

/// `heading` is the on-screen direction of the segment, clockwise from
/// north, in degrees.
fn arrow_glyph(
    tip: LatLon,
    heading: f64,
    bearing: f64,
    decoration: &Decoration,
    scale: f64,
) -> ArrowGlyph {
    let size = decoration.symbol.pixel_size / scale;
    let barb = |offset_deg: f64| {
        // Barbs point back along the heading.
        let angle = (heading + 180.0 + offset_deg).to_radians();
        LatLon::new(
            angle.cos().mul_add(size, tip.lat),
            angle.sin().mul_add(size, tip.lon),
        )
    };

    ArrowGlyph {
        tip,
        left: barb(ARROW_HALF_ANGLE_DEG),
        right: barb(-ARROW_HALF_ANGLE_DEG),
        bearing,
        color: decoration.symbol.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::segment_bearings;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    fn eastward_line(scale: f64, length_px: f64) -> Vec<LatLon> {
        vec![LatLon::new(0.0, 0.0), LatLon::new(0.0, length_px / scale)]
    }

    #[test]
    fn default_view_covers_north_america() {
        let viewport = Viewport::default();
        let [west, east] = viewport.x_bounds();
        let [south, north] = viewport.y_bounds(VIEW_HEIGHT_PX / VIEW_WIDTH_PX);

        assert!(west < -120.0 && east > -75.0, "{west}..{east}");
        assert!(south < 25.0 && north > 50.0, "{south}..{north}");
    }

    #[test]
    fn arrows_repeat_at_fixed_pixel_spacing() {
        let scale = Viewport::default().pixels_per_degree();
        let points = eastward_line(scale, 400.0);
        let decoration = Decoration::arrows(segment_bearings(&points));

        let glyphs = place_arrows(&points, &decoration, scale, None);
        let positions: Vec<f64> = glyphs.iter().map(|g| g.tip.lon * scale).collect();

        assert_eq!(positions.len(), 3);
        assert_close(positions[0], 10.0);
        assert_close(positions[1], 160.0);
        assert_close(positions[2], 310.0);
        assert!(glyphs.iter().all(|g| (g.bearing - 90.0).abs() < 1e-9));
    }

    #[test]
    fn arrows_follow_the_bearing_of_their_segment() {
        let scale = Viewport::default().pixels_per_degree();
        let corner = 100.0 / scale;
        let points = vec![
            LatLon::new(0.0, 0.0),
            LatLon::new(0.0, corner),
            LatLon::new(corner * 3.0, corner),
        ];
        let decoration = Decoration::arrows(segment_bearings(&points));

        let glyphs = place_arrows(&points, &decoration, scale, None);

        assert_eq!(glyphs.len(), 3);
        assert!((glyphs[0].bearing - 90.0).abs() < 1e-6);
        assert!(glyphs[1].bearing < 1e-6);
        assert!(glyphs[2].bearing < 1e-6);
    }

    #[test]
    fn barbs_trail_behind_the_tip() {
        let scale = Viewport::default().pixels_per_degree();
        let points = eastward_line(scale, 50.0);
        let decoration = Decoration::arrows(segment_bearings(&points));

        let glyph = place_arrows(&points, &decoration, scale, None)[0];

        assert!(glyph.left.lon < glyph.tip.lon);
        assert!(glyph.right.lon < glyph.tip.lon);
        // Heading east, the left barb sits on the north side.
        assert!(glyph.left.lat > glyph.tip.lat);
        assert!(glyph.right.lat < glyph.tip.lat);
        let barb_px = (glyph.tip.lon - glyph.left.lon).hypot(glyph.tip.lat - glyph.left.lat) * scale;
        assert_close(barb_px, 8.0);
    }

    #[test]
    fn high_latitude_arrows_point_along_the_drawn_line() {
        let scale = Viewport::default().pixels_per_degree();
        let points = vec![LatLon::new(70.0, 20.0), LatLon::new(72.0, 26.0)];
        let decoration = Decoration::arrows(segment_bearings(&points));

        let glyph = place_arrows(&points, &decoration, scale, None)[0];

        let drawn = 6.0_f64.atan2(2.0).to_degrees();
        let mid_lat = (glyph.left.lat + glyph.right.lat) / 2.0;
        let mid_lon = (glyph.left.lon + glyph.right.lon) / 2.0;
        let axis = (glyph.tip.lon - mid_lon).atan2(glyph.tip.lat - mid_lat).to_degrees();
        assert!((axis - drawn).abs() < 1e-6, "axis {axis}, line {drawn}");

        // The great-circle bearing is kept for the record, and differs here.
        assert_close(glyph.bearing, decoration.bearings[0]);
        assert!((glyph.bearing - drawn).abs() > 20.0);
    }

    #[test]
    fn deep_zoom_builds_only_visible_arrows() {
        let points = vec![LatLon::new(50.0, 0.0), LatLon::new(50.0, 40.0)];
        let mut map = SceneProvider.create_map(DEFAULT_CENTER, DEFAULT_ZOOM);
        let line = map.add_polyline(points.clone(), PolylineStyle::default());
        map.add_decorator(line, Decoration::arrows(segment_bearings(&points)));
        map.viewport = Viewport::new(LatLon::new(50.0, 20.0), MAX_ZOOM);

        let aspect = VIEW_HEIGHT_PX / VIEW_WIDTH_PX;
        let glyphs = map.arrow_glyphs(aspect);

        // 800 px of line in view, one arrow per 150 px.
        assert!((4..=7).contains(&glyphs.len()), "{} arrows", glyphs.len());
        let margin = 8.0 / map.viewport.pixels_per_degree();
        let visible = map.viewport.visible_bounds(aspect).expanded(margin);
        assert!(glyphs.iter().all(|g| visible.contains(g.tip)));

        // Still on the 150 px grid that starts 10 px into the line.
        let scale = map.viewport.pixels_per_degree();
        for glyph in &glyphs {
            let along = glyph.tip.lon * scale - 10.0;
            let steps = along / 150.0;
            assert!((steps - steps.round()).abs() < 1e-6, "{steps}");
        }
    }

    #[test]
    fn clipping_keeps_the_arrows_of_the_full_walk() {
        let viewport = Viewport::new(LatLon::new(51.0, 6.0), 7);
        let scale = viewport.pixels_per_degree();
        let points = vec![
            LatLon::new(50.0, 0.0),
            LatLon::new(50.0, 10.0),
            LatLon::new(55.0, 12.0),
        ];
        let decoration = Decoration::arrows(segment_bearings(&points));
        let visible = viewport.visible_bounds(0.75);

        let clipped = place_arrows(&points, &decoration, scale, Some(&visible));
        let expected: Vec<ArrowGlyph> = place_arrows(&points, &decoration, scale, None)
            .into_iter()
            .filter(|g| visible.expanded(8.0 / scale).contains(g.tip))
            .collect();

        assert!(!expected.is_empty());
        assert_eq!(clipped.len(), expected.len());
        for (got, want) in clipped.iter().zip(&expected) {
            assert!((got.tip.lat - want.tip.lat).abs() * scale < 1e-6);
            assert!((got.tip.lon - want.tip.lon).abs() * scale < 1e-6);
            assert_close(got.bearing, want.bearing);
        }
    }

    #[test]
    fn segments_outside_the_view_clip_to_nothing() {
        let bounds = Bounds {
            south: 0.0,
            west: 0.0,
            north: 1.0,
            east: 1.0,
        };
        let outside = clip_segment(LatLon::new(2.0, 0.0), LatLon::new(2.0, 1.0), &bounds);
        assert_eq!(outside, None);

        let (t0, t1) = clip_segment(LatLon::new(0.5, -1.0), LatLon::new(0.5, 2.0), &bounds)
            .expect("crosses the box");
        assert_close(t0, 1.0 / 3.0);
        assert_close(t1, 2.0 / 3.0);
    }

    #[test]
    fn degenerate_lines_get_no_arrows() {
        let point = LatLon::new(10.0, 10.0);
        let decoration = Decoration::arrows(vec![0.0]);
        assert!(place_arrows(&[point, point], &decoration, 10.0, None).is_empty());
        assert!(place_arrows(&[point], &decoration, 10.0, None).is_empty());
    }

    #[test]
    fn zoom_and_pan_stay_in_bounds() {
        let mut viewport = Viewport::default();
        for _ in 0..30 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.zoom, MAX_ZOOM);
        for _ in 0..30 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.zoom, MIN_ZOOM);

        viewport.pan(0.0, 10.0);
        assert_close(viewport.center.lat, 90.0);
        viewport.center = LatLon::new(0.0, 179.0);
        viewport.zoom = 4;
        viewport.pan(0.1, 0.0);
        assert!(viewport.center.lon < -170.0);
    }

    #[test]
    fn reset_returns_to_creation_view() {
        let mut map = SceneProvider.create_map(DEFAULT_CENTER, DEFAULT_ZOOM);
        map.viewport.zoom_in();
        map.viewport.pan(0.2, 0.2);
        map.reset_view();
        assert_eq!(map.viewport, Viewport::default());
    }
}
