//! Outward miter offset of a footprint ring.
//!
//! Used to lift a highlight overlay off the building it covers. Buffering
//! compounds: buffer each raw selection exactly once.

use super::frame::LocalFrame;
use super::measure::signed_area_planar;
use super::types::{usable_coords, Bounds, Position, Projected, Ring};
use crate::cfg::MITER_LIMIT;

/// Grow `ring` outward by `margin_m` meters.
///
/// Vertices move along the bisector of their adjacent edge normals; sharp
/// corners are capped at `MITER_LIMIT × margin`. Degenerate rings (fewer than
/// three distinct vertices, zero area) and non-positive margins are returned
/// unchanged. A closed input stays closed.
pub fn buffer_ring(ring: &[Position], margin_m: f64) -> Ring {
    if margin_m.is_nan() || margin_m <= 0.0 {
        return ring.to_vec();
    }
    let coords = usable_coords(ring);
    let Some(bounds) = Bounds::of_ring(ring) else {
        return ring.to_vec();
    };
    let closed = coords.len() > 1 && coords.first() == coords.last();
    let frame = LocalFrame::new(bounds.center());

    let mut pts: Vec<Projected> = Vec::with_capacity(coords.len());
    for c in &coords {
        let p = frame.project(*c);
        if pts.last().map_or(true, |q: &Projected| (p - q).norm() > 1e-9) {
            pts.push(p);
        }
    }
    if pts.len() > 1 && (pts[0] - pts[pts.len() - 1]).norm() <= 1e-9 {
        pts.pop();
    }
    if pts.len() < 3 {
        return ring.to_vec();
    }
    let area = signed_area_planar(&pts);
    if area == 0.0 {
        return ring.to_vec();
    }
    // Outward normal of edge e is (e.y, -e.x) for counter-clockwise rings.
    let side = area.signum();
    let outward = |e: Projected| Projected::new(e.y, -e.x).normalize() * side;

    let n = pts.len();
    let mut out: Ring = Vec::with_capacity(n + 1);
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        let n1 = outward(cur - prev);
        let n2 = outward(next - cur);
        let bis = n1 + n2;
        let (dir, len) = if bis.norm() < 1e-12 {
            (n1, margin_m)
        } else {
            let dir = bis.normalize();
            let cos_half = dir.dot(&n1);
            let len = if cos_half > 0.0 {
                (margin_m / cos_half).min(margin_m * MITER_LIMIT)
            } else {
                margin_m * MITER_LIMIT
            };
            (dir, len)
        };
        out.push(frame.unproject(cur + dir * len).to_position());
    }
    if closed {
        let first = out[0].clone();
        out.push(first);
    }
    out
}
