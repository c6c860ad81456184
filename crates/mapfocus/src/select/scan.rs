use std::collections::HashSet;

use super::{scored_order, Scored};
use crate::cfg::FocusCfg;
use crate::classify::BuildingClassifier;
use crate::feature::{Feature, Geometry};
use crate::geom::{area_in_frame, distance_in_frame, ring_key, Coord, LocalFrame, Projected};
use crate::query::{QueryError, ScreenRect, SpatialQuery};

/// Every building part within `radius_m` of `center`, nearest first.
///
/// The square around the radius is mapped to screen space and queried as a
/// grid of overlapping rectangles (`cfg.scan_grid`, `cfg.scan_overlap_px`), so
/// the same ring usually comes back several times; rings are deduplicated by
/// `ring_key`. MultiPolygon parts are returned as separate single-part
/// features. A failing sub-query aborts the scan with that error.
pub fn enumerate_buildings_in_radius<Q: SpatialQuery + ?Sized>(
    center: Coord,
    radius_m: f64,
    query: &Q,
    layer_ids: &[String],
    classifier: &BuildingClassifier,
    cfg: &FocusCfg,
) -> Result<Vec<Scored>, QueryError> {
    let frame = LocalFrame::new(center);
    let r = radius_m.max(0.0);
    let sw = query.to_screen(frame.unproject(Projected::new(-r, -r)))?;
    let ne = query.to_screen(frame.unproject(Projected::new(r, r)))?;
    let cells = ScreenRect::spanning(sw, ne).grid(cfg.scan_grid, cfg.scan_overlap_px);

    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<Scored> = Vec::new();
    let mut returned = 0usize;
    for cell in cells {
        let features = query.features_in_rect(cell, layer_ids)?;
        returned += features.len();
        for feature in features.iter().filter(|f| classifier.is_building(f)) {
            for part in split_parts(feature) {
                let Some(ring) = part.outer_rings().first().copied() else {
                    continue;
                };
                let key = ring_key(ring, cfg.key_precision);
                if !seen.insert(key.clone()) {
                    continue;
                }
                let distance_m = distance_in_frame(&frame, center, ring);
                if distance_m.is_nan() || distance_m > r {
                    continue;
                }
                let area_m2 = area_in_frame(&frame, ring);
                out.push(Scored {
                    feature: part,
                    distance_m,
                    area_m2,
                    key,
                });
            }
        }
    }
    out.sort_by(scored_order);
    tracing::debug!(
        radius_m = r,
        returned,
        unique = seen.len(),
        within = out.len(),
        "radius scan"
    );
    Ok(out)
}

/// One single-part feature per polygon part.
fn split_parts(feature: &Feature) -> Vec<Feature> {
    match &feature.geometry {
        Some(Geometry::MultiPolygon(parts)) => parts
            .iter()
            .map(|rings| feature.with_geometry(Geometry::Polygon(rings.clone())))
            .collect(),
        Some(Geometry::Polygon(_)) => vec![feature.clone()],
        _ => Vec::new(),
    }
}
