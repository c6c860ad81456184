//! Tap-to-focus coordinator.
//!
//! Purpose
//! - Turn a map press into at most one selected building and a camera target.
//! - Gather candidates from the press event, else a point query, else an offset
//!   probe grid around the press; then select, resolve and optionally buffer.
//!
//! Behaviour
//! - Fail-soft: a failing spatial query is logged and leaves the current
//!   selection untouched.
//! - Every press takes a ticket from `begin_press`; only the latest ticket may
//!   change the selection. Older results come back as `FocusOutcome::Stale`.
//! - The ticket is checked once, on entry to `handle_press`. Hosts that bridge an
//!   async renderer call take the ticket before awaiting it, then pass the
//!   resolved features back through `PressEvent::features` with that ticket.
//! - A press that finds no building clears the selection.
//!
//! Code cross-refs: `select::select_nearest_building`, `query::probe_points`

use crate::cfg::FocusCfg;
use crate::classify::BuildingClassifier;
use crate::feature::Feature;
use crate::geom::Coord;
use crate::query::{probe_points, QueryError, ScreenPoint, SpatialQuery};
use crate::select::{resolve_multipolygon, select_nearest_building};

/// A press on the map as delivered by the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PressEvent {
    /// Features the renderer attached to the event itself, if any.
    pub features: Vec<Feature>,
    pub screen_point: Option<ScreenPoint>,
    /// Geographic position of the press.
    pub coordinate: Option<Coord>,
}

/// Identifies one press; issued by `BuildingFocus::begin_press`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PressTicket(u64);

/// The currently focused building.
#[derive(Clone, Debug, PartialEq)]
pub struct Focused {
    pub feature: Feature,
    /// Camera target: feature center, else the press coordinate.
    pub center: Option<Coord>,
    /// Distance from the press, when the press carried a coordinate.
    pub distance_m: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FocusOutcome {
    Selected(Focused),
    /// No building under the press; the selection was cleared.
    Cleared,
    /// A newer press was started; nothing changed.
    Stale,
    /// The spatial query failed; the previous selection was kept.
    QueryFailed(QueryError),
}

#[derive(Clone, Debug)]
pub struct BuildingFocus {
    classifier: BuildingClassifier,
    cfg: FocusCfg,
    layer_ids: Vec<String>,
    selected: Option<Focused>,
    latest: u64,
}

impl BuildingFocus {
    pub fn new(classifier: BuildingClassifier, cfg: FocusCfg, layer_ids: Vec<String>) -> Self {
        Self {
            classifier,
            cfg,
            layer_ids,
            selected: None,
            latest: 0,
        }
    }

    pub fn selected(&self) -> Option<&Focused> {
        self.selected.as_ref()
    }

    pub fn layer_ids(&self) -> &[String] {
        &self.layer_ids
    }

    /// Replace the layer ids used for queries (e.g. after the style reloads).
    pub fn set_layer_ids(&mut self, layer_ids: Vec<String>) {
        self.layer_ids = layer_ids;
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Start a press. Any ticket issued earlier becomes stale.
    pub fn begin_press(&mut self) -> PressTicket {
        self.latest += 1;
        PressTicket(self.latest)
    }

    pub fn is_current(&self, ticket: PressTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Resolve a press into a selection. See the module docs for the stages.
    pub fn handle_press<Q: SpatialQuery + ?Sized>(
        &mut self,
        ticket: PressTicket,
        event: &PressEvent,
        query: &Q,
    ) -> FocusOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "tap: stale press");
            return FocusOutcome::Stale;
        }
        let candidates = match self.gather(event, query) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%err, "tap: spatial query failed, keeping selection");
                return FocusOutcome::QueryFailed(err);
            }
        };
        let Some(focused) = self.pick(event, &candidates) else {
            tracing::debug!(candidates = candidates.len(), "tap: no building");
            self.selected = None;
            return FocusOutcome::Cleared;
        };
        tracing::debug!(id = ?focused.feature.id, center = ?focused.center, "tap: focused");
        self.selected = Some(focused.clone());
        FocusOutcome::Selected(focused)
    }

    fn gather<Q: SpatialQuery + ?Sized>(
        &self,
        event: &PressEvent,
        query: &Q,
    ) -> Result<Vec<Feature>, QueryError> {
        if !event.features.is_empty() {
            tracing::debug!(count = event.features.len(), "tap: using event features");
            return Ok(event.features.clone());
        }
        let Some(point) = event.screen_point else {
            tracing::debug!("tap: no feature source");
            return Ok(Vec::new());
        };
        let direct = query.features_at_point(point, &self.layer_ids)?;
        tracing::debug!(count = direct.len(), x = point.x, y = point.y, "tap: point query");
        if !direct.is_empty() {
            return Ok(direct);
        }
        let mut samples = Vec::new();
        for probe in probe_points(point, &self.cfg.probe_offsets_px) {
            samples.extend(query.features_at_point(probe, &self.layer_ids)?);
        }
        tracing::debug!(count = samples.len(), "tap: offset probes");
        Ok(samples)
    }

    fn pick(&self, event: &PressEvent, candidates: &[Feature]) -> Option<Focused> {
        let (feature, distance_m) = match event.coordinate {
            Some(at) => {
                let s = select_nearest_building(at, candidates, &self.classifier, &self.cfg)?;
                (s.feature, Some(s.distance_m))
            }
            None => {
                // Renderer order decides; a MultiPolygon keeps its first part.
                let first = candidates.iter().find(|f| self.classifier.is_building(f))?;
                let feature = match first.center() {
                    Some(c) => resolve_multipolygon(first, c),
                    None => first.clone(),
                };
                (feature, None)
            }
        };
        let feature = if self.cfg.buffer_selection {
            feature.buffered(self.cfg.buffer_margin_m)
        } else {
            feature
        };
        let center = feature.center().or(event.coordinate);
        Some(Focused {
            feature,
            center,
            distance_m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureId, Geometry};
    use crate::geom::{polygon_area, LocalFrame};
    use crate::query::ScreenRect;
    use crate::testutil::{building, origin, square_m, with_height};
    use std::cell::RefCell;

    /// Answers point queries from a script keyed by exact screen position.
    #[derive(Default)]
    struct Scripted {
        hits: Vec<(ScreenPoint, Vec<Feature>)>,
        fail: bool,
        asked: RefCell<Vec<ScreenPoint>>,
    }

    impl SpatialQuery for Scripted {
        fn features_at_point(
            &self,
            point: ScreenPoint,
            _layer_ids: &[String],
        ) -> Result<Vec<Feature>, QueryError> {
            self.asked.borrow_mut().push(point);
            if self.fail {
                return Err(QueryError::Unavailable);
            }
            Ok(self
                .hits
                .iter()
                .filter(|(p, _)| *p == point)
                .flat_map(|(_, f)| f.clone())
                .collect())
        }

        fn features_in_rect(
            &self,
            _rect: ScreenRect,
            _layer_ids: &[String],
        ) -> Result<Vec<Feature>, QueryError> {
            Ok(Vec::new())
        }

        fn to_screen(&self, _coord: Coord) -> Result<ScreenPoint, QueryError> {
            Err(QueryError::Unavailable)
        }
    }

    fn focus() -> BuildingFocus {
        BuildingFocus::new(
            BuildingClassifier::default(),
            FocusCfg::default(),
            vec!["building".into()],
        )
    }

    fn id_of(outcome: &FocusOutcome) -> Option<FeatureId> {
        match outcome {
            FocusOutcome::Selected(f) => f.feature.id.clone(),
            _ => None,
        }
    }

    #[test]
    fn event_features_skip_the_query() {
        let frame = LocalFrame::new(origin());
        let mut bf = focus();
        let q = Scripted::default();
        let ev = PressEvent {
            features: vec![building(1, square_m(&frame, 0.0, 0.0, 10.0))],
            screen_point: Some(ScreenPoint::new(5.0, 5.0)),
            coordinate: Some(origin()),
        };
        let t = bf.begin_press();
        let out = bf.handle_press(t, &ev, &q);
        assert_eq!(id_of(&out), Some(FeatureId::Int(1)));
        assert!(q.asked.borrow().is_empty());
        let sel = bf.selected().unwrap();
        assert_eq!(sel.distance_m, Some(0.0));
        let c = sel.center.unwrap();
        assert!((c.lng - origin().lng).abs() < 1e-9 && (c.lat - origin().lat).abs() < 1e-9);
    }

    #[test]
    fn empty_point_query_falls_back_to_probes() {
        let frame = LocalFrame::new(origin());
        let tap = ScreenPoint::new(100.0, 100.0);
        let q = Scripted {
            hits: vec![
                (tap.offset(10.0, 0.0), vec![building(2, square_m(&frame, 20.0, 0.0, 10.0))]),
                (tap.offset(-10.0, -10.0), vec![building(3, square_m(&frame, 8.0, 0.0, 4.0))]),
            ],
            ..Default::default()
        };
        let mut bf = focus();
        let ev = PressEvent {
            screen_point: Some(tap),
            coordinate: Some(origin()),
            ..Default::default()
        };
        let t = bf.begin_press();
        let out = bf.handle_press(t, &ev, &q);
        // center + 8 probes
        assert_eq!(q.asked.borrow().len(), 9);
        assert_eq!(id_of(&out), Some(FeatureId::Int(3)));
    }

    #[test]
    fn without_coordinate_first_building_wins() {
        let frame = LocalFrame::new(origin());
        let tap = ScreenPoint::new(0.0, 0.0);
        let water = Feature {
            layer_id: Some("water".into()),
            ..building(9, square_m(&frame, 0.0, 0.0, 50.0))
        };
        let multi = building(4, Vec::new()).with_geometry(Geometry::MultiPolygon(vec![
            vec![square_m(&frame, 40.0, 0.0, 10.0)],
            vec![square_m(&frame, 0.0, 0.0, 10.0)],
        ]));
        let q = Scripted {
            hits: vec![(tap, vec![water, multi, building(5, square_m(&frame, 0.0, 0.0, 6.0))])],
            ..Default::default()
        };
        let mut bf = focus();
        let ev = PressEvent {
            screen_point: Some(tap),
            ..Default::default()
        };
        let t = bf.begin_press();
        let FocusOutcome::Selected(sel) = bf.handle_press(t, &ev, &q) else {
            panic!("expected a selection");
        };
        assert_eq!(sel.feature.id, Some(FeatureId::Int(4)));
        assert_eq!(sel.distance_m, None);
        // first part kept, centered 40 m east
        let c = sel.center.unwrap();
        let x = frame.project(c).x;
        assert!((x - 40.0).abs() < 1e-3, "x {x}");
        assert!(matches!(sel.feature.geometry, Some(Geometry::Polygon(_))));
    }

    #[test]
    fn selection_is_buffered_once() {
        let frame = LocalFrame::new(origin());
        let mut bf = focus();
        let ev = PressEvent {
            features: vec![with_height(building(1, square_m(&frame, 0.0, 0.0, 10.0)), 6.0)],
            coordinate: Some(origin()),
            ..Default::default()
        };
        let t = bf.begin_press();
        bf.handle_press(t, &ev, &Scripted::default());
        let sel = bf.selected().unwrap();
        let Some(Geometry::Polygon(rings)) = &sel.feature.geometry else {
            panic!("expected polygon");
        };
        let area = polygon_area(origin(), &rings[0]);
        assert!((area - 10.4 * 10.4).abs() < 0.1, "area {area}");
        let h = sel.feature.properties["render_height"].as_f64().unwrap();
        assert!((h - 6.2).abs() < 1e-9);

        let mut plain = BuildingFocus::new(
            BuildingClassifier::default(),
            FocusCfg {
                buffer_selection: false,
                ..FocusCfg::default()
            },
            Vec::new(),
        );
        let t = plain.begin_press();
        plain.handle_press(t, &ev, &Scripted::default());
        assert_eq!(plain.selected().unwrap().feature, ev.features[0]);
    }

    #[test]
    fn query_failure_keeps_previous_selection() {
        let frame = LocalFrame::new(origin());
        let mut bf = focus();
        let first = PressEvent {
            features: vec![building(1, square_m(&frame, 0.0, 0.0, 10.0))],
            coordinate: Some(origin()),
            ..Default::default()
        };
        let t = bf.begin_press();
        bf.handle_press(t, &first, &Scripted::default());

        let broken = Scripted {
            fail: true,
            ..Default::default()
        };
        let second = PressEvent {
            screen_point: Some(ScreenPoint::new(1.0, 1.0)),
            coordinate: Some(origin()),
            ..Default::default()
        };
        let t = bf.begin_press();
        let out = bf.handle_press(t, &second, &broken);
        assert_eq!(out, FocusOutcome::QueryFailed(QueryError::Unavailable));
        assert_eq!(bf.selected().unwrap().feature.id, Some(FeatureId::Int(1)));
    }

    #[test]
    fn miss_clears_and_stale_ticket_is_ignored() {
        let frame = LocalFrame::new(origin());
        let mut bf = focus();
        let hit = PressEvent {
            features: vec![building(1, square_m(&frame, 0.0, 0.0, 10.0))],
            coordinate: Some(origin()),
            ..Default::default()
        };
        let old = bf.begin_press();
        let new = bf.begin_press();
        assert!(!bf.is_current(old));
        assert_eq!(bf.handle_press(old, &hit, &Scripted::default()), FocusOutcome::Stale);
        assert!(bf.selected().is_none());

        bf.handle_press(new, &hit, &Scripted::default());
        assert!(bf.selected().is_some());

        let t = bf.begin_press();
        let miss = PressEvent {
            screen_point: Some(ScreenPoint::new(3.0, 3.0)),
            coordinate: Some(origin()),
            ..Default::default()
        };
        assert_eq!(bf.handle_press(t, &miss, &Scripted::default()), FocusOutcome::Cleared);
        assert!(bf.selected().is_none());
    }

    #[test]
    fn late_async_result_for_an_older_press_is_dropped() {
        let frame = LocalFrame::new(origin());
        let mut bf = focus();
        let q = Scripted::default();

        // both presses start before either renderer call resolves
        let first = bf.begin_press();
        let second = bf.begin_press();
        let near = PressEvent {
            features: vec![building(2, square_m(&frame, 0.0, 0.0, 10.0))],
            coordinate: Some(origin()),
            ..Default::default()
        };
        let out = bf.handle_press(second, &near, &q);
        assert_eq!(id_of(&out), Some(FeatureId::Int(2)));

        let late = PressEvent {
            features: vec![building(1, square_m(&frame, 40.0, 0.0, 10.0))],
            coordinate: Some(origin()),
            ..Default::default()
        };
        assert_eq!(bf.handle_press(first, &late, &q), FocusOutcome::Stale);
        assert_eq!(bf.selected().unwrap().feature.id, Some(FeatureId::Int(2)));
        assert!(q.asked.borrow().is_empty());
    }
}
