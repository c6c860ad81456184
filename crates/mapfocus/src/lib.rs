//! Building focus for vector-tile maps.
//!
//! Given the features a map renderer returns for a tap (or for a rectangle
//! around a location), decide which building the user meant, measure it and
//! produce a slightly grown highlight footprint.
//!
//! Layout
//! - `geom`: local-plane projection, distances, containment, area, ring keys, buffering.
//! - `feature`, `classify`: the feature model and the "is this a building" chain.
//! - `select`: nearest-building selection, MultiPolygon resolution, radius scan.
//! - `query`, `viewport`, `memory`: the renderer's spatial-query seam and an
//!   in-memory stand-in for it.
//! - `focus`, `layers`: tap coordination and building-layer detection.
//! - `rand`: seeded footprints for benches and tests.
//!
//! API Policy
//! - Internal crate; the CLI is the only consumer. Breaking changes are fine
//!   when they make the code clearer.

pub mod api;
pub mod cfg;
pub mod classify;
pub mod feature;
pub mod focus;
pub mod geom;
pub mod layers;
pub mod memory;
pub mod query;
pub mod rand;
pub mod select;
pub mod viewport;

#[cfg(test)]
mod testutil;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::FocusCfg;
pub use feature::{Feature, Geometry};
pub use geom::Coord;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::FocusCfg;
    pub use crate::classify::BuildingClassifier;
    pub use crate::feature::{Feature, FeatureId, Geometry, Properties};
    pub use crate::focus::{BuildingFocus, FocusOutcome, PressEvent};
    pub use crate::geom::{Coord, LocalFrame, Ring};
    pub use crate::query::{QueryError, ScreenPoint, ScreenRect, SpatialQuery};
    pub use crate::select::{enumerate_buildings_in_radius, select_nearest_building, Selection};
}
