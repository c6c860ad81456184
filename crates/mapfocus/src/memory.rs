//! In-memory `SpatialQuery` over a static feature list.
//!
//! Stands in for a live renderer in the CLI, tests and benches. A point hit is
//! containment in any part's outer ring; a rectangle hit is bbox overlap with
//! any outer ring. Only areal features are ever returned. Results keep the
//! order of the backing list.

use crate::feature::Feature;
use crate::geom::{point_in_polygon, Bounds, Coord};
use crate::query::{QueryError, ScreenPoint, ScreenRect, SpatialQuery};
use crate::viewport::Viewport;

#[derive(Clone, Debug)]
pub struct MemorySource {
    features: Vec<Feature>,
    viewport: Viewport,
}

impl MemorySource {
    pub fn new(features: Vec<Feature>, viewport: Viewport) -> Self {
        Self { features, viewport }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn in_layers(f: &Feature, layer_ids: &[String]) -> bool {
        layer_ids.is_empty()
            || f.layer_id
                .as_ref()
                .is_some_and(|id| layer_ids.iter().any(|l| l == id))
    }

    fn collect(&self, layer_ids: &[String], hit: impl Fn(&Feature) -> bool) -> Vec<Feature> {
        self.features
            .iter()
            .filter(|f| Self::in_layers(f, layer_ids) && hit(f))
            .cloned()
            .collect()
    }
}

impl SpatialQuery for MemorySource {
    fn features_at_point(
        &self,
        point: ScreenPoint,
        layer_ids: &[String],
    ) -> Result<Vec<Feature>, QueryError> {
        let at = self.viewport.to_coord(point);
        Ok(self.collect(layer_ids, |f| {
            f.outer_rings().iter().any(|r| point_in_polygon(at, r))
        }))
    }

    fn features_in_rect(
        &self,
        rect: ScreenRect,
        layer_ids: &[String],
    ) -> Result<Vec<Feature>, QueryError> {
        let a = self.viewport.to_coord(rect.min);
        let b = self.viewport.to_coord(rect.max);
        let area = Bounds {
            min: Coord::new(a.lng.min(b.lng), a.lat.min(b.lat)),
            max: Coord::new(a.lng.max(b.lng), a.lat.max(b.lat)),
        };
        Ok(self.collect(layer_ids, |f| {
            f.outer_rings()
                .iter()
                .filter_map(|r| Bounds::of_ring(r))
                .any(|b| b.intersects(&area))
        }))
    }

    fn to_screen(&self, coord: Coord) -> Result<ScreenPoint, QueryError> {
        let p = self.viewport.to_screen(coord);
        if p.x.is_finite() && p.y.is_finite() {
            Ok(p)
        } else {
            Err(QueryError::failed(format!(
                "cannot project ({}, {})",
                coord.lng, coord.lat
            )))
        }
    }
}
