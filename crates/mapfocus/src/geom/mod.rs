//! Local-plane geometry over lng/lat rings.
//!
//! Purpose
//! - Project building-scale coordinates to meters around one origin and measure
//!   rings there: point–segment and point–ring distance, containment, area.
//! - Produce stable dedup keys for rings seen through overlapping queries.
//! - Grow a footprint by a small margin for highlight overlays.
//!
//! Scope
//! - Flat-earth approximation only; no geodesics, no antimeridian or pole handling.
//! - Only outer rings are measured. Holes are ignored everywhere.
//!
//! Code cross-refs: `LocalFrame`, `Coord`, `Ring`, `select::select_nearest_building`

mod buffer;
mod frame;
mod key;
mod measure;
mod types;

pub use crate::cfg::DEFAULT_KEY_PRECISION;
pub use buffer::buffer_ring;
pub use frame::{project, LocalFrame};
pub use key::ring_key;
pub use measure::{
    area_in_frame, distance_in_frame, distance_point_to_ring, distance_point_to_segment,
    point_in_polygon, polygon_area,
};
pub use types::{ring_center, ring_from, usable_coords, Bounds, Coord, Position, Projected, Ring};
