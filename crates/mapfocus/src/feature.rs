//! Vector-tile features as returned by a renderer's spatial query.
//!
//! A `Feature` is an immutable input value. Transforms (`resolve_multipolygon`,
//! `buffered`) return new features and never mutate the one they were given.

use serde_json::{Map, Value};

use crate::geom::{buffer_ring, ring_center, Coord, Position, Ring};

/// Free-form property bag; schema varies by renderer and tile provider.
pub type Properties = Map<String, Value>;

/// Polygon rings: index 0 is the outer ring, the rest are holes (ignored here).
pub type PolygonRings = Vec<Ring>;

/// Opaque feature identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeatureId {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(PolygonRings),
    MultiPolygon(Vec<PolygonRings>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub id: Option<FeatureId>,
    /// Style layer id the renderer matched (`layer.id`).
    pub layer_id: Option<String>,
    /// Vector-tile source layer (`sourceLayer` / `sourceLayerID`).
    pub source_layer: Option<String>,
    pub geometry: Option<Geometry>,
    pub properties: Properties,
}

impl Feature {
    /// Layer identifier used for classification: style layer first, then source layer.
    pub fn layer_name(&self) -> Option<&str> {
        self.layer_id.as_deref().or(self.source_layer.as_deref())
    }

    /// True for Polygon and MultiPolygon geometry; nothing else can be a building.
    pub fn is_areal(&self) -> bool {
        matches!(
            self.geometry,
            Some(Geometry::Polygon(_)) | Some(Geometry::MultiPolygon(_))
        )
    }

    /// Outer rings of every polygon part, in order. Empty for non-areal geometry.
    pub fn outer_rings(&self) -> Vec<&Ring> {
        match &self.geometry {
            Some(Geometry::Polygon(rings)) => rings.first().into_iter().collect(),
            Some(Geometry::MultiPolygon(parts)) => {
                parts.iter().filter_map(|rings| rings.first()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Bbox midpoint of the outer ring (first part for MultiPolygons).
    pub fn center(&self) -> Option<Coord> {
        match &self.geometry {
            Some(Geometry::Polygon(rings)) => ring_center(rings.first()?),
            Some(Geometry::MultiPolygon(parts)) => ring_center(parts.first()?.first()?),
            _ => None,
        }
    }

    /// Copy of this feature with a different geometry; id, layer and properties kept.
    pub fn with_geometry(&self, geometry: Geometry) -> Feature {
        Feature {
            geometry: Some(geometry),
            ..self.clone()
        }
    }

    /// Grow every outer ring by `margin_m` and raise a numeric `render_height` by
    /// the same amount. Holes are kept as they are. Applying this twice compounds.
    pub fn buffered(&self, margin_m: f64) -> Feature {
        let grow = |rings: &PolygonRings| -> PolygonRings {
            rings
                .iter()
                .enumerate()
                .map(|(i, r)| if i == 0 { buffer_ring(r, margin_m) } else { r.clone() })
                .collect()
        };
        let geometry = match &self.geometry {
            Some(Geometry::Polygon(rings)) => Some(Geometry::Polygon(grow(rings))),
            Some(Geometry::MultiPolygon(parts)) => {
                Some(Geometry::MultiPolygon(parts.iter().map(grow).collect()))
            }
            other => other.clone(),
        };
        let mut properties = self.properties.clone();
        if margin_m > 0.0 {
            if let Some(h) = properties.get("render_height").and_then(Value::as_f64) {
                properties.insert("render_height".into(), Value::from(h + margin_m));
            }
        }
        Feature {
            geometry,
            properties,
            ..self.clone()
        }
    }
}
