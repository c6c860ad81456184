//! "Is this a building?" over heterogeneous vector-tile schemas.
//!
//! No single signal works across renderer backends, so classification is an
//! ordered list of independent predicates evaluated with short-circuit OR.
//! New backends register another predicate instead of editing existing ones.
//! Only Polygon/MultiPolygon features are ever considered.

use serde_json::Value;

use crate::feature::Feature;

/// A single classification signal.
pub type BuildingPredicate = fn(&Feature) -> bool;

/// Style or source layer named like a building layer
/// (`building`, `building-3d`, `3d-buildings`, MapLibre `*-extrusion` layers).
pub fn layer_named_building(f: &Feature) -> bool {
    f.layer_name()
        .is_some_and(|id| id.contains("building") || id.contains("extrusion"))
}

/// OpenMapTiles / Mapbox streets: extruded buildings carry a numeric `render_height`.
pub fn has_render_height(f: &Feature) -> bool {
    f.properties.get("render_height").is_some_and(Value::is_number)
}

/// Mapbox streets v8 `extrude` flag; delivered as `true` or the string `"true"`.
pub fn extrude_flag(f: &Feature) -> bool {
    match f.properties.get("extrude") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

/// Generic schemas tag buildings via `class` or `type`.
pub fn class_or_type_building(f: &Feature) -> bool {
    ["class", "type"]
        .iter()
        .any(|k| f.properties.get(*k).and_then(Value::as_str) == Some("building"))
}

/// Ordered, extensible building classifier.
#[derive(Clone)]
pub struct BuildingClassifier {
    predicates: Vec<(&'static str, BuildingPredicate)>,
}

impl std::fmt::Debug for BuildingClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.predicate_names()).finish()
    }
}

impl Default for BuildingClassifier {
    fn default() -> Self {
        Self {
            predicates: vec![
                ("layer_name", layer_named_building as BuildingPredicate),
                ("render_height", has_render_height),
                ("extrude", extrude_flag),
                ("class_or_type", class_or_type_building),
            ],
        }
    }
}

impl BuildingClassifier {
    /// Classifier with no predicates; matches nothing until predicates are registered.
    pub fn empty() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Append a predicate; it is evaluated after all earlier ones.
    pub fn register(mut self, name: &'static str, predicate: BuildingPredicate) -> Self {
        self.predicates.push((name, predicate));
        self
    }

    /// Name of the first predicate that matches, if the feature is areal.
    pub fn matched_by(&self, f: &Feature) -> Option<&'static str> {
        if !f.is_areal() {
            return None;
        }
        self.predicates
            .iter()
            .find(|(_, p)| p(f))
            .map(|(name, _)| *name)
    }

    pub fn is_building(&self, f: &Feature) -> bool {
        self.matched_by(f).is_some()
    }

    pub fn predicate_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.predicates.iter().map(|(name, _)| *name)
    }
}
