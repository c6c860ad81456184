//! Equirectangular local frame.
//!
//! Maps degrees to meters around one origin: `x = Δlng · 111320 · cos(lat₀)`,
//! `y = Δlat · 111320`. Valid for building-scale distances only. Near the poles
//! `cos(lat₀) → 0` and longitude differences collapse to ~0 m; this is accepted.
//!
//! All measurements in one batch (e.g. every candidate of one tap) must share a
//! single frame. Nothing checks this; mixing origins silently skews distances.

use super::types::{Coord, Projected};
use crate::cfg::METERS_PER_DEGREE_LAT;

/// Projection scoped to one origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalFrame {
    origin: Coord,
    m_per_deg_lng: f64,
}

impl LocalFrame {
    pub fn new(origin: Coord) -> Self {
        Self {
            origin,
            m_per_deg_lng: METERS_PER_DEGREE_LAT * origin.lat.to_radians().cos(),
        }
    }

    #[inline]
    pub fn origin(&self) -> Coord {
        self.origin
    }

    #[inline]
    pub fn project(&self, p: Coord) -> Projected {
        Projected::new(
            (p.lng - self.origin.lng) * self.m_per_deg_lng,
            (p.lat - self.origin.lat) * METERS_PER_DEGREE_LAT,
        )
    }

    /// Inverse of `project`. Longitude is left at the origin when the frame has
    /// collapsed (polar origin).
    #[inline]
    pub fn unproject(&self, v: Projected) -> Coord {
        let dlng = if self.m_per_deg_lng.abs() > f64::EPSILON {
            v.x / self.m_per_deg_lng
        } else {
            0.0
        };
        Coord::new(
            self.origin.lng + dlng,
            self.origin.lat + v.y / METERS_PER_DEGREE_LAT,
        )
    }
}

/// One-shot projection of `point` relative to `origin`.
#[inline]
pub fn project(origin: Coord, point: Coord) -> Projected {
    LocalFrame::new(origin).project(point)
}
