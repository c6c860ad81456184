//! Distances, containment and area over raw rings.
//!
//! Conventions
//! - Malformed positions are skipped, never reported.
//! - Rings are treated as implicitly closed: the last usable vertex connects back
//!   to the first for containment, area and boundary distance.
//! - Empty rings (no usable vertex): distance `+∞`, area `0`, containment `false`.

use super::frame::LocalFrame;
use super::types::{usable_coords, Coord, Position, Projected};

/// Euclidean distance from `p` to the segment `[a, b]` in a shared plane.
///
/// The projection parameter is clamped to `[0, 1]`; zero-length segments reduce
/// to point distance.
#[inline]
pub(crate) fn planar_segment_distance(p: Projected, a: Projected, b: Projected) -> f64 {
    let v = b - a;
    let w = p - a;
    let c1 = v.dot(&w);
    if c1 <= 0.0 {
        return w.norm();
    }
    let c2 = v.dot(&v);
    if c2 <= c1 {
        return (p - b).norm();
    }
    let t = c1 / c2;
    (p - (a + v * t)).norm()
}

/// Distance in meters from `point` to segment `[a, b]`, all projected through `origin`.
pub fn distance_point_to_segment(origin: Coord, point: Coord, a: Coord, b: Coord) -> f64 {
    let frame = LocalFrame::new(origin);
    planar_segment_distance(frame.project(point), frame.project(a), frame.project(b))
}

fn contains_coords(point: Coord, ring: &[Coord]) -> bool {
    if ring.is_empty() {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lng, ring[i].lat);
        let (xj, yj) = (ring[j].lng, ring[j].lat);
        // The straddle check guarantees yi != yj, so the slope term is finite.
        if (yi > point.lat) != (yj > point.lat)
            && point.lng < (xj - xi) * (point.lat - yi) / (yj - yi) + xi
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Ray-casting parity test in raw degrees.
pub fn point_in_polygon(point: Coord, ring: &[Position]) -> bool {
    contains_coords(point, &usable_coords(ring))
}

/// Distance in meters from `point` to the ring, measured in a frame at `point`.
///
/// Returns `0` when the point is inside, `+∞` for an empty ring.
pub fn distance_point_to_ring(point: Coord, ring: &[Position]) -> f64 {
    distance_in_frame(&LocalFrame::new(point), point, ring)
}

/// `distance_point_to_ring` with an explicit frame, for batches sharing one origin.
pub fn distance_in_frame(frame: &LocalFrame, point: Coord, ring: &[Position]) -> f64 {
    let coords = usable_coords(ring);
    if coords.is_empty() {
        return f64::INFINITY;
    }
    if contains_coords(point, &coords) {
        return 0.0;
    }
    let p = frame.project(point);
    let projected: Vec<Projected> = coords.iter().map(|&c| frame.project(c)).collect();
    let n = projected.len();
    (0..n)
        .map(|i| planar_segment_distance(p, projected[i], projected[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Unsigned shoelace area in square meters, projected through `origin`.
pub fn polygon_area(origin: Coord, ring: &[Position]) -> f64 {
    area_in_frame(&LocalFrame::new(origin), ring)
}

/// `polygon_area` with an explicit frame.
pub fn area_in_frame(frame: &LocalFrame, ring: &[Position]) -> f64 {
    signed_area(frame, ring).abs()
}

/// Shoelace sum / 2 in `frame`. Positive for counter-clockwise rings.
fn signed_area(frame: &LocalFrame, ring: &[Position]) -> f64 {
    let projected: Vec<Projected> = usable_coords(ring)
        .into_iter()
        .map(|c| frame.project(c))
        .collect();
    signed_area_planar(&projected)
}

pub(crate) fn signed_area_planar(pts: &[Projected]) -> f64 {
    if pts.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        sum += pts[j].x * pts[i].y - pts[i].x * pts[j].y;
        j = i;
    }
    sum / 2.0
}
