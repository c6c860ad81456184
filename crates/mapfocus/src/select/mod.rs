//! Building disambiguation: pick one footprint out of a renderer query result.
//!
//! Purpose
//! - Reduce a set of candidate features to the building nearest a reference
//!   point (tap or device location), with a deterministic tie-break.
//! - Rewrite a winning MultiPolygon to the single part the user most likely meant.
//! - Enumerate every building within a radius, deduplicated across overlapping
//!   sub-queries (`scan`).
//!
//! Ordering
//! - (1) distance, more than `distance_tie_m` closer wins outright;
//! - (2) on a distance near-tie, more than `area_tie_m2` smaller wins;
//! - (3) on a near-tie in both, the lexicographically smaller ring key wins.
//!
//! Candidates are folded in canonical order (ring key, distance, area, id),
//! so the result does not depend on the order the renderer returned them in.
//!
//! All candidates of one call are measured in a single `LocalFrame` at the
//! reference point.

mod scan;

pub use scan::enumerate_buildings_in_radius;

use std::cmp::Ordering;

use crate::cfg::FocusCfg;
use crate::classify::BuildingClassifier;
use crate::feature::{Feature, Geometry};
use crate::geom::{
    area_in_frame, distance_in_frame, ring_center, ring_key, Coord, LocalFrame, Ring,
};

/// A building footprint with its measurements relative to a reference point.
#[derive(Clone, Debug, PartialEq)]
pub struct Scored {
    pub feature: Feature,
    /// Meters from the reference point to the outer ring; `0` when inside.
    pub distance_m: f64,
    pub area_m2: f64,
    /// Ring key of the measured outer ring.
    pub key: String,
}

/// Result of single-building selection.
pub type Selection = Scored;

/// Measurements of one outer ring.
#[derive(Clone, Debug)]
struct RingScore {
    distance_m: f64,
    area_m2: f64,
    key: String,
}

impl RingScore {
    fn measure(
        frame: &LocalFrame,
        reference: Coord,
        ring: &Ring,
        precision: usize,
    ) -> Option<Self> {
        let distance_m = distance_in_frame(frame, reference, ring);
        if !distance_m.is_finite() {
            return None;
        }
        Some(Self {
            distance_m,
            area_m2: area_in_frame(frame, ring),
            key: ring_key(ring, precision),
        })
    }

    /// Whether `self` replaces `best` under the distance → area → key ordering.
    fn beats(&self, best: &RingScore, cfg: &FocusCfg) -> bool {
        if self.distance_m < best.distance_m - cfg.distance_tie_m {
            return true;
        }
        if (self.distance_m - best.distance_m).abs() > cfg.distance_tie_m {
            return false;
        }
        if self.area_m2 < best.area_m2 - cfg.area_tie_m2 {
            return true;
        }
        if (self.area_m2 - best.area_m2).abs() > cfg.area_tie_m2 {
            return false;
        }
        self.key < best.key
    }

    /// Input-independent order used before folding with `beats`.
    fn canonical(&self, other: &RingScore) -> Ordering {
        self.key
            .cmp(&other.key)
            .then(self.distance_m.total_cmp(&other.distance_m))
            .then(self.area_m2.total_cmp(&other.area_m2))
    }
}

/// Best-scoring outer ring of a feature (MultiPolygon parts compete independently).
fn score_feature(
    frame: &LocalFrame,
    reference: Coord,
    feature: &Feature,
    cfg: &FocusCfg,
) -> Option<RingScore> {
    let mut scores: Vec<RingScore> = feature
        .outer_rings()
        .into_iter()
        .filter_map(|ring| RingScore::measure(frame, reference, ring, cfg.key_precision))
        .collect();
    scores.sort_by(RingScore::canonical);
    scores
        .into_iter()
        .reduce(|best, s| if s.beats(&best, cfg) { s } else { best })
}

fn id_text(f: &Feature) -> String {
    f.id.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Select the building nearest `reference` among `candidates`.
///
/// Non-building and non-areal features are skipped. A winning MultiPolygon is
/// rewritten to its nearest part (`resolve_multipolygon`); the reported
/// distance, area and key describe the returned geometry. `None` when no
/// candidate qualifies, which is the normal outcome for a tap on open ground.
pub fn select_nearest_building(
    reference: Coord,
    candidates: &[Feature],
    classifier: &BuildingClassifier,
    cfg: &FocusCfg,
) -> Option<Selection> {
    let frame = LocalFrame::new(reference);
    let mut scored: Vec<(&Feature, RingScore)> = candidates
        .iter()
        .filter(|f| classifier.is_building(f))
        .filter_map(|feature| {
            let score = score_feature(&frame, reference, feature, cfg)?;
            tracing::trace!(
                id = ?feature.id,
                distance_m = score.distance_m,
                area_m2 = score.area_m2,
                "candidate"
            );
            Some((feature, score))
        })
        .collect();
    // `beats` has tie windows and is not transitive; fold in a fixed order so
    // the renderer's ordering never changes the winner.
    scored.sort_by(|(fa, a), (fb, b)| {
        a.canonical(b)
            .then_with(|| id_text(fa).cmp(&id_text(fb)))
    });
    let (winner, score) = scored
        .into_iter()
        .reduce(|best, cur| if cur.1.beats(&best.1, cfg) { cur } else { best })?;
    let feature = resolve_multipolygon(winner, reference);
    let score = score_feature(&frame, reference, &feature, cfg).unwrap_or(score);
    tracing::debug!(
        id = ?feature.id,
        distance_m = score.distance_m,
        area_m2 = score.area_m2,
        "selected building"
    );
    Some(Scored {
        feature,
        distance_m: score.distance_m,
        area_m2: score.area_m2,
        key: score.key,
    })
}

/// Rewrite a MultiPolygon feature to the single part whose bbox center is
/// closest to `reference`.
///
/// Closeness is plain Euclidean distance in degrees, which is enough for a
/// coarse choice between parts of one building. The input is left untouched;
/// other geometry kinds, and MultiPolygons without a usable part, come back as
/// clones.
pub fn resolve_multipolygon(feature: &Feature, reference: Coord) -> Feature {
    let Some(Geometry::MultiPolygon(parts)) = &feature.geometry else {
        return feature.clone();
    };
    let nearest = parts
        .iter()
        .filter_map(|rings| {
            let c = ring_center(rings.first()?)?;
            let d2 = (c.lng - reference.lng).powi(2) + (c.lat - reference.lat).powi(2);
            Some((rings, d2))
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    match nearest {
        Some((rings, _)) => feature.with_geometry(Geometry::Polygon(rings.clone())),
        None => feature.clone(),
    }
}

/// Ascending distance, then area, then ring key.
pub(crate) fn scored_order(a: &Scored, b: &Scored) -> Ordering {
    a.distance_m
        .total_cmp(&b.distance_m)
        .then(a.area_m2.total_cmp(&b.area_m2))
        .then_with(|| a.key.cmp(&b.key))
}

#[cfg(test)]
mod tests;
