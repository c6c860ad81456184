//! Building layer detection over a map style's layer list.

/// Layer ids tried when the style exposes no recognizable building layer.
pub const FALLBACK_BUILDING_LAYERS: [&str; 4] =
    ["building", "building-3d", "3d-buildings", "building-extrusion"];

/// One entry of a style's `layers` array; only `id` and `type` matter here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleLayer {
    pub id: String,
    pub kind: String,
}

impl StyleLayer {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }

    pub fn is_building(&self) -> bool {
        self.id.contains("building") || self.kind.contains("fill-extrusion")
    }
}

/// Ids of style layers that render buildings, in style order.
pub fn detect_building_layers(layers: &[StyleLayer]) -> Vec<String> {
    layers
        .iter()
        .filter(|l| l.is_building())
        .map(|l| l.id.clone())
        .collect()
}

/// Detected building layers, or `FALLBACK_BUILDING_LAYERS` when none match.
pub fn active_layer_ids(layers: &[StyleLayer]) -> Vec<String> {
    let found = detect_building_layers(layers);
    if found.is_empty() {
        tracing::debug!(layers = layers.len(), "no building layer in style, using fallbacks");
        return FALLBACK_BUILDING_LAYERS.iter().map(|s| s.to_string()).collect();
    }
    found
}
