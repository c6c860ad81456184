//! Spatial-query capability of the host map renderer.
//!
//! The renderer owns hit-testing against its rendered vector tiles; this crate
//! only consumes the features it returns. Queries are request/response and are
//! issued one at a time. Hosts whose bridge is asynchronous resolve the call
//! before handing the result back.

use std::fmt;

use crate::feature::Feature;
use crate::geom::Coord;

/// Screen position in pixels, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Screen rectangle in pixels; corners in any order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Normalized rectangle spanning both points.
    pub fn spanning(a: ScreenPoint, b: ScreenPoint) -> Self {
        Self {
            min: ScreenPoint::new(a.x.min(b.x), a.y.min(b.y)),
            max: ScreenPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Split into `n × n` cells, each grown by `overlap` pixels on every side.
    pub fn grid(&self, n: usize, overlap: f64) -> Vec<ScreenRect> {
        let n = n.max(1);
        let (cw, ch) = (self.width() / n as f64, self.height() / n as f64);
        let mut cells = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let x0 = self.min.x + col as f64 * cw;
                let y0 = self.min.y + row as f64 * ch;
                cells.push(ScreenRect {
                    min: ScreenPoint::new(x0 - overlap, y0 - overlap),
                    max: ScreenPoint::new(x0 + cw + overlap, y0 + ch + overlap),
                });
            }
        }
        cells
    }
}

/// Failure of the query step. Geometry never produces errors.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The renderer has no query bridge (map not mounted, style not loaded).
    Unavailable,
    Failed { reason: String },
}

impl QueryError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "spatial query unavailable"),
            Self::Failed { reason } => write!(f, "spatial query failed: {reason}"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Query-by-point, query-by-rectangle and coordinate-to-screen, as exposed by
/// MapLibre / Mapbox / react-native-maps style renderers.
///
/// `layer_ids` restricts hits to those style layers; an empty slice means all layers.
pub trait SpatialQuery {
    fn features_at_point(
        &self,
        point: ScreenPoint,
        layer_ids: &[String],
    ) -> Result<Vec<Feature>, QueryError>;

    fn features_in_rect(
        &self,
        rect: ScreenRect,
        layer_ids: &[String],
    ) -> Result<Vec<Feature>, QueryError>;

    fn to_screen(&self, coord: Coord) -> Result<ScreenPoint, QueryError>;
}

/// Offset probes around a tap: every `(dx, dy)` pair from `offsets`, center excluded.
pub fn probe_points(center: ScreenPoint, offsets: &[f64]) -> Vec<ScreenPoint> {
    let mut out = Vec::with_capacity(offsets.len() * offsets.len());
    for &dx in offsets {
        for &dy in offsets {
            if dx == 0.0 && dy == 0.0 {
                continue;
            }
            out.push(center.offset(dx, dy));
        }
    }
    out
}
