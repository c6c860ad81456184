//! Coordinate and ring types.
//!
//! - `Position`: a raw GeoJSON position as delivered by a renderer query; may be
//!   malformed (fewer than 2 components, non-finite values).
//! - `Coord`: a validated `(lng, lat)` pair in degrees.
//! - `Ring`: ordered positions of one polygon boundary; closure is not required.

use nalgebra::Vector2;

/// Raw position `[lng, lat, ...]`; extra components (altitude) are ignored.
pub type Position = Vec<f64>;
/// Polygon boundary as raw positions.
pub type Ring = Vec<Position>;
/// Local planar point in meters. Only comparable with points projected from the same origin.
pub type Projected = Vector2<f64>;

/// Geographic coordinate in degrees, always longitude first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coord {
    pub lng: f64,
    pub lat: f64,
}

impl Coord {
    #[inline]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Validate a raw position. `None` for fewer than 2 components or non-finite values.
    #[inline]
    pub fn from_position(p: &[f64]) -> Option<Self> {
        match p {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some(Self::new(*lng, *lat)),
            _ => None,
        }
    }

    #[inline]
    pub fn to_position(self) -> Position {
        vec![self.lng, self.lat]
    }
}

impl From<(f64, f64)> for Coord {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self::new(lng, lat)
    }
}

/// Usable coordinates of a ring, malformed positions dropped, order kept.
pub fn usable_coords(ring: &[Position]) -> Vec<Coord> {
    ring.iter().filter_map(|p| Coord::from_position(p)).collect()
}

/// Build a ring from `(lng, lat)` pairs.
pub fn ring_from(points: &[(f64, f64)]) -> Ring {
    points.iter().map(|&(lng, lat)| vec![lng, lat]).collect()
}

/// Axis-aligned bounds in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Coord,
    pub max: Coord,
}

impl Bounds {
    /// Bounds of the usable coordinates; `None` when there are none.
    pub fn of_ring(ring: &[Position]) -> Option<Self> {
        let mut it = ring.iter().filter_map(|p| Coord::from_position(p));
        let first = it.next()?;
        let mut b = Bounds {
            min: first,
            max: first,
        };
        for c in it {
            b.min.lng = b.min.lng.min(c.lng);
            b.min.lat = b.min.lat.min(c.lat);
            b.max.lng = b.max.lng.max(c.lng);
            b.max.lat = b.max.lat.max(c.lat);
        }
        Some(b)
    }

    #[inline]
    pub fn center(&self) -> Coord {
        Coord::new(
            (self.min.lng + self.max.lng) / 2.0,
            (self.min.lat + self.max.lat) / 2.0,
        )
    }

    #[inline]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.lng <= other.max.lng
            && other.min.lng <= self.max.lng
            && self.min.lat <= other.max.lat
            && other.min.lat <= self.max.lat
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.lng >= self.min.lng && c.lng <= self.max.lng && c.lat >= self.min.lat && c.lat <= self.max.lat
    }
}

/// Bbox midpoint of a ring (not a true centroid). `None` when no coordinate is usable.
pub fn ring_center(ring: &[Position]) -> Option<Coord> {
    Bounds::of_ring(ring).map(|b| b.center())
}
