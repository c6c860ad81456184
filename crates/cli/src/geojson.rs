//! GeoJSON FeatureCollection and style-layer I/O.
//!
//! Accepts the shapes renderers emit from `queryRenderedFeatures`: a plain
//! FeatureCollection whose features may carry `layer.id` and `sourceLayer`.

use anyhow::{Context, Result};
use mapfocus::api::{Feature, FeatureId, Geometry, Properties, StyleLayer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", content = "coordinates")]
enum GeoGeometry {
    Point(Vec<f64>),
    LineString(Vec<Vec<f64>>),
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

#[derive(Debug, Deserialize, Serialize)]
struct LayerRef {
    id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeoFeature {
    #[serde(rename = "type", default = "feature_tag")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_geometry")]
    geometry: Option<GeoGeometry>,
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layer: Option<LayerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_layer: Option<String>,
}

fn feature_tag() -> String {
    "Feature".to_string()
}

/// Geometry types the selector cannot use (MultiLineString, MultiPoint,
/// GeometryCollection, malformed coordinates) become `None` instead of failing the file.
fn lenient_geometry<'de, D>(d: D) -> std::result::Result<Option<GeoGeometry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Some(raw) = Option::<Value>::deserialize(d)? else {
        return Ok(None);
    };
    match serde_json::from_value(raw) {
        Ok(geom) => Ok(Some(geom)),
        Err(err) => {
            tracing::debug!(%err, "unsupported geometry dropped");
            Ok(None)
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<GeoFeature>,
}

#[derive(Debug, Deserialize)]
struct StyleDoc {
    #[serde(default)]
    layers: Vec<StyleLayerDoc>,
}

#[derive(Debug, Deserialize)]
struct StyleLayerDoc {
    id: String,
    #[serde(rename = "type", default)]
    kind: String,
}

/// Integer ids stay numeric. Any other number (`1.5`, `1e20`) is kept as its
/// JSON text in `FeatureId::Str` and is written back as a string.
fn id_from_json(v: Value) -> Option<FeatureId> {
    match v {
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => FeatureId::Int(i),
            None => FeatureId::Str(n.to_string()),
        }),
        Value::String(s) => Some(FeatureId::Str(s)),
        _ => None,
    }
}

impl From<GeoFeature> for Feature {
    fn from(g: GeoFeature) -> Self {
        Feature {
            id: g.id.and_then(id_from_json),
            layer_id: g.layer.map(|l| l.id),
            source_layer: g.source_layer,
            geometry: g.geometry.map(|geom| match geom {
                GeoGeometry::Point(p) => Geometry::Point(p),
                GeoGeometry::LineString(l) => Geometry::LineString(l),
                GeoGeometry::Polygon(r) => Geometry::Polygon(r),
                GeoGeometry::MultiPolygon(m) => Geometry::MultiPolygon(m),
            }),
            properties: g.properties.unwrap_or_default(),
        }
    }
}

impl From<&Feature> for GeoFeature {
    fn from(f: &Feature) -> Self {
        GeoFeature {
            kind: feature_tag(),
            id: f.id.as_ref().map(|id| match id {
                FeatureId::Int(i) => Value::from(*i),
                FeatureId::Str(s) => Value::from(s.as_str()),
            }),
            geometry: f.geometry.as_ref().map(|geom| match geom {
                Geometry::Point(p) => GeoGeometry::Point(p.clone()),
                Geometry::LineString(l) => GeoGeometry::LineString(l.clone()),
                Geometry::Polygon(r) => GeoGeometry::Polygon(r.clone()),
                Geometry::MultiPolygon(m) => GeoGeometry::MultiPolygon(m.clone()),
            }),
            properties: Some(f.properties.clone()),
            layer: f.layer_id.clone().map(|id| LayerRef { id }),
            source_layer: f.source_layer.clone(),
        }
    }
}

pub fn parse_features(text: &str) -> Result<Vec<Feature>> {
    let fc: FeatureCollection =
        serde_json::from_str(text).context("parsing GeoJSON FeatureCollection")?;
    Ok(fc.features.into_iter().map(Feature::from).collect())
}

pub fn read_features(path: &Path) -> Result<Vec<Feature>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_features(&text).with_context(|| format!("in {}", path.display()))
}

pub fn read_style_layers(path: &Path) -> Result<Vec<StyleLayer>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: StyleDoc = serde_json::from_str(&text)
        .with_context(|| format!("parsing style {}", path.display()))?;
    Ok(doc
        .layers
        .into_iter()
        .map(|l| StyleLayer::new(l.id, l.kind))
        .collect())
}

pub fn to_geojson(f: &Feature) -> Result<Value> {
    serde_json::to_value(GeoFeature::from(f)).context("serializing feature")
}
