//! Flat re-export surface for the CLI and ad-hoc tools.
//!
//! Not a stable API; names move when the modules move.

// Geometry
pub use crate::geom::{
    buffer_ring, distance_point_to_ring, distance_point_to_segment, point_in_polygon,
    polygon_area, project, ring_center, ring_key, Bounds, Coord, LocalFrame, Position, Ring,
    DEFAULT_KEY_PRECISION,
};
// Features and classification
pub use crate::classify::{BuildingClassifier, BuildingPredicate};
pub use crate::feature::{Feature, FeatureId, Geometry, PolygonRings, Properties};
// Selection
pub use crate::select::{
    enumerate_buildings_in_radius, resolve_multipolygon, select_nearest_building, Scored,
    Selection,
};
// Renderer seam
pub use crate::focus::{BuildingFocus, FocusOutcome, Focused, PressEvent, PressTicket};
pub use crate::layers::{active_layer_ids, detect_building_layers, StyleLayer};
pub use crate::memory::MemorySource;
pub use crate::query::{QueryError, ScreenPoint, ScreenRect, SpatialQuery};
pub use crate::viewport::Viewport;
// Configuration and synthetic data
pub use crate::cfg::FocusCfg;
pub use crate::rand::{draw_block, draw_footprint, FootprintCfg, ReplayToken};
