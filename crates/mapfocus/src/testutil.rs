//! Fixtures shared by unit tests: footprints laid out in meters around an origin.

use crate::feature::{Feature, FeatureId, Geometry, Properties};
use crate::geom::{Coord, LocalFrame, Projected, Ring};
use serde_json::json;

/// Closed counter-clockwise axis-aligned rectangle centered at `(cx, cy)` meters.
pub fn rect_m(frame: &LocalFrame, cx: f64, cy: f64, w: f64, h: f64) -> Ring {
    let (hw, hh) = (w / 2.0, h / 2.0);
    [
        (cx - hw, cy - hh),
        (cx + hw, cy - hh),
        (cx + hw, cy + hh),
        (cx - hw, cy + hh),
        (cx - hw, cy - hh),
    ]
    .iter()
    .map(|&(x, y)| frame.unproject(Projected::new(x, y)).to_position())
    .collect()
}

pub fn square_m(frame: &LocalFrame, cx: f64, cy: f64, side: f64) -> Ring {
    rect_m(frame, cx, cy, side, side)
}

pub fn building(id: i64, ring: Ring) -> Feature {
    Feature {
        id: Some(FeatureId::Int(id)),
        layer_id: Some("building".into()),
        source_layer: None,
        geometry: Some(Geometry::Polygon(vec![ring])),
        properties: Properties::new(),
    }
}

pub fn with_height(mut f: Feature, h: f64) -> Feature {
    f.properties.insert("render_height".into(), json!(h));
    f
}

pub fn origin() -> Coord {
    Coord::new(34.4949, 49.5440)
}
