use super::*;
use crate::feature::Properties;
use crate::geom::ring_from;
use crate::query::{QueryError, ScreenPoint, ScreenRect, SpatialQuery};
use crate::testutil::{building, origin, rect_m, square_m};
use std::cell::Cell;

fn select(reference: Coord, candidates: &[Feature]) -> Option<Selection> {
    select_nearest_building(
        reference,
        candidates,
        &BuildingClassifier::default(),
        &FocusCfg::default(),
    )
}

fn polygon_of(f: &Feature) -> &Ring {
    match &f.geometry {
        Some(Geometry::Polygon(rings)) => &rings[0],
        other => panic!("expected polygon, got {other:?}"),
    }
}

#[test]
fn tap_inside_equator_square() {
    let sq = ring_from(&[(0.0, 0.0), (0.001, 0.0), (0.001, 0.001), (0.0, 0.001)]);
    let s = select(Coord::new(0.0005, 0.0005), &[building(1, sq)]).unwrap();
    assert_eq!(s.distance_m, 0.0);
    let expected = 111.32 * 111.32;
    assert!((s.area_m2 - expected).abs() / expected < 0.02, "area {}", s.area_m2);
}

#[test]
fn multipolygon_resolves_to_nearest_part() {
    let frame = LocalFrame::new(origin());
    let near = square_m(&frame, 15.0, 0.0, 10.0);
    let far = square_m(&frame, -55.0, 0.0, 10.0);
    let f = building(3, Vec::new())
        .with_geometry(Geometry::MultiPolygon(vec![vec![far], vec![near.clone()]]));
    let s = select(origin(), &[f]).unwrap();
    assert!((s.distance_m - 10.0).abs() < 1e-6, "distance {}", s.distance_m);
    assert_eq!(polygon_of(&s.feature), &near);
    assert!((s.area_m2 - 100.0).abs() < 1e-6);
}

#[test]
fn distance_near_tie_prefers_smaller_area() {
    let frame = LocalFrame::new(origin());
    // 5.0 m away, 100 m²
    let big = building(1, square_m(&frame, 10.0, 0.0, 10.0));
    // 5.3 m away, 50 m²
    let small = building(2, rect_m(&frame, 7.8, 0.0, 5.0, 10.0));
    for pair in [[big.clone(), small.clone()], [small.clone(), big.clone()]] {
        let s = select(origin(), &pair).unwrap();
        assert_eq!(s.feature.id, small.id);
        assert!((s.distance_m - 5.3).abs() < 1e-6);
        assert!((s.area_m2 - 50.0).abs() < 1e-6);
    }
}

#[test]
fn clear_distance_lead_beats_smaller_area() {
    let frame = LocalFrame::new(origin());
    let near_big = building(1, square_m(&frame, 10.0, 0.0, 10.0));
    let far_small = building(2, square_m(&frame, 0.0, 8.0, 4.0));
    let s = select(origin(), &[far_small, near_big]).unwrap();
    assert_eq!(s.feature.id, Some(crate::feature::FeatureId::Int(1)));
}

#[test]
fn full_tie_falls_back_to_ring_key() {
    let frame = LocalFrame::new(origin());
    let west = building(1, square_m(&frame, -10.0, 0.0, 10.0));
    let east = building(2, square_m(&frame, 10.0, 0.0, 10.0));
    let kw = ring_key(polygon_of(&west), 6);
    let ke = ring_key(polygon_of(&east), 6);
    let expected = if kw < ke { &west } else { &east };
    for pair in [[west.clone(), east.clone()], [east.clone(), west.clone()]] {
        let s = select(origin(), &pair).unwrap();
        assert_eq!(s.feature.id, expected.id);
        assert_eq!(s.key, kw.clone().min(ke.clone()));
    }
}

#[test]
fn chained_near_ties_pick_the_same_building_in_every_order() {
    let frame = LocalFrame::new(origin());
    // each neighbour pair is a distance near-tie, the outer pair is not
    let a = building(1, square_m(&frame, 6.0, 0.0, 10.0)); // 1.0 m, 100 m²
    let b = building(2, rect_m(&frame, 0.0, 3.9, 10.0, 5.0)); // 1.4 m, 50 m²
    let c = building(3, rect_m(&frame, -2.8, 0.0, 2.0, 5.0)); // 1.8 m, 10 m²
    let all = [a, b, c];
    let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    let picks: Vec<_> = orders
        .iter()
        .map(|o| {
            let candidates: Vec<Feature> = o.iter().map(|&i| all[i].clone()).collect();
            select(origin(), &candidates).unwrap().feature.id
        })
        .collect();
    assert!(picks.iter().all(|id| *id == picks[0]), "{picks:?}");
}

#[test]
fn multipolygon_part_order_does_not_change_the_score() {
    let frame = LocalFrame::new(origin());
    let p1 = vec![square_m(&frame, 6.0, 0.0, 10.0)];
    let p2 = vec![rect_m(&frame, 0.0, 3.9, 10.0, 5.0)];
    let p3 = vec![rect_m(&frame, -2.8, 0.0, 2.0, 5.0)];
    let fwd = building(1, Vec::new())
        .with_geometry(Geometry::MultiPolygon(vec![p1.clone(), p2.clone(), p3.clone()]));
    let rev = building(1, Vec::new()).with_geometry(Geometry::MultiPolygon(vec![p3, p2, p1]));
    let s1 = select(origin(), &[fwd]).unwrap();
    let s2 = select(origin(), &[rev]).unwrap();
    assert_eq!(s1.key, s2.key);
    assert_eq!(s1.feature.geometry, s2.feature.geometry);
}

#[test]
fn empty_and_non_building_candidates_give_none() {
    assert!(select(origin(), &[]).is_none());

    let frame = LocalFrame::new(origin());
    let water = Feature {
        id: None,
        layer_id: Some("water".into()),
        source_layer: None,
        geometry: Some(Geometry::Polygon(vec![square_m(&frame, 0.0, 0.0, 50.0)])),
        properties: Properties::new(),
    };
    let line = building(2, Vec::new())
        .with_geometry(Geometry::LineString(square_m(&frame, 0.0, 0.0, 5.0)));
    let empty_ring = building(3, Vec::new());
    assert!(select(origin(), &[water.clone(), line, empty_ring]).is_none());

    let house = building(4, square_m(&frame, 30.0, 0.0, 10.0));
    let s = select(origin(), &[water, house]).unwrap();
    assert_eq!(s.feature.id, Some(crate::feature::FeatureId::Int(4)));
    assert!((s.distance_m - 25.0).abs() < 1e-6);
}

#[test]
fn candidates_are_not_mutated() {
    let frame = LocalFrame::new(origin());
    let multi = building(1, Vec::new()).with_geometry(Geometry::MultiPolygon(vec![
        vec![square_m(&frame, 15.0, 0.0, 10.0)],
        vec![square_m(&frame, -40.0, 0.0, 10.0)],
    ]));
    let candidates = vec![multi, building(2, square_m(&frame, 0.0, 60.0, 10.0))];
    let before = candidates.clone();
    let _ = select(origin(), &candidates);
    assert_eq!(candidates, before);
}

#[test]
fn resolve_passes_through_non_multipolygons() {
    let frame = LocalFrame::new(origin());
    let f = building(1, square_m(&frame, 0.0, 0.0, 10.0));
    assert_eq!(resolve_multipolygon(&f, origin()), f);

    let broken = building(2, Vec::new()).with_geometry(Geometry::MultiPolygon(vec![vec![]]));
    assert_eq!(resolve_multipolygon(&broken, origin()), broken);
}

/// Returns every canned feature for every rectangle, like an over-eager tile query.
struct Canned {
    features: Vec<Feature>,
    calls: Cell<usize>,
    fail: bool,
}

impl Canned {
    fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            calls: Cell::new(0),
            fail: false,
        }
    }
}

impl SpatialQuery for Canned {
    fn features_at_point(
        &self,
        _point: ScreenPoint,
        _layer_ids: &[String],
    ) -> Result<Vec<Feature>, QueryError> {
        Ok(Vec::new())
    }

    fn features_in_rect(
        &self,
        _rect: ScreenRect,
        _layer_ids: &[String],
    ) -> Result<Vec<Feature>, QueryError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(QueryError::failed("tile not loaded"));
        }
        Ok(self.features.clone())
    }

    fn to_screen(&self, coord: Coord) -> Result<ScreenPoint, QueryError> {
        Ok(ScreenPoint::new(coord.lng * 1e5, -coord.lat * 1e5))
    }
}

fn scan_fixture() -> Vec<Feature> {
    let frame = LocalFrame::new(origin());
    let water = Feature {
        id: None,
        layer_id: Some("water".into()),
        source_layer: None,
        geometry: Some(Geometry::Polygon(vec![square_m(&frame, 0.0, 0.0, 20.0)])),
        properties: Properties::new(),
    };
    vec![
        building(1, square_m(&frame, 15.0, 0.0, 10.0)),
        building(2, square_m(&frame, 90.0, 0.0, 10.0)),
        building(3, Vec::new()).with_geometry(Geometry::MultiPolygon(vec![
            vec![square_m(&frame, 0.0, -35.0, 10.0)],
            vec![square_m(&frame, 0.0, 25.0, 10.0)],
        ])),
        water,
    ]
}

#[test]
fn radius_scan_dedups_splits_and_cuts() {
    let q = Canned::new(scan_fixture());
    let cfg = FocusCfg::default();
    let found = enumerate_buildings_in_radius(
        origin(),
        50.0,
        &q,
        &["building".to_string()],
        &BuildingClassifier::default(),
        &cfg,
    )
    .unwrap();

    assert_eq!(q.calls.get(), cfg.scan_grid * cfg.scan_grid);
    let distances: Vec<f64> = found.iter().map(|s| s.distance_m).collect();
    assert_eq!(distances.len(), 3, "{distances:?}");
    for (d, want) in distances.iter().zip([10.0, 20.0, 30.0]) {
        assert!((d - want).abs() < 1e-6, "{distances:?}");
    }
    assert!(found
        .iter()
        .all(|s| matches!(s.feature.geometry, Some(Geometry::Polygon(_)))));
    assert_eq!(found[1].feature.id, found[2].feature.id);
    assert_eq!(found[1].key, ring_key(polygon_of(&found[1].feature), 6));
}

#[test]
fn radius_scan_propagates_query_failure() {
    let mut q = Canned::new(scan_fixture());
    q.fail = true;
    let err = enumerate_buildings_in_radius(
        origin(),
        50.0,
        &q,
        &[],
        &BuildingClassifier::default(),
        &FocusCfg::default(),
    )
    .unwrap_err();
    assert_eq!(err, QueryError::failed("tile not loaded"));
    assert_eq!(q.calls.get(), 1);
}
