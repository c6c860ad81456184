//! Seeded building footprints for benches and tests.
//!
//! Model
//! - A footprint is a rectangle of random width and depth, rotated by a random
//!   angle, with each corner nudged by a bounded jitter. It is laid out in
//!   meters inside a `LocalFrame` and returned as a closed lng/lat ring.
//! - A block is a `rows × cols` grid of footprints on a fixed pitch.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG, so
//!   any single draw can be regenerated without replaying the ones before it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::feature::{Feature, FeatureId, Geometry, Properties};
use crate::geom::{LocalFrame, Projected, Ring};

/// Footprint sampler configuration. Ranges are inclusive `(min, max)`.
#[derive(Clone, Copy, Debug)]
pub struct FootprintCfg {
    pub width_m: (f64, f64),
    pub depth_m: (f64, f64),
    /// Rotation drawn from `[-max_rotation_rad, max_rotation_rad]`.
    pub max_rotation_rad: f64,
    /// Per-corner jitter on both axes, meters.
    pub corner_jitter_m: f64,
    pub height_m: (f64, f64),
}

impl Default for FootprintCfg {
    fn default() -> Self {
        Self {
            width_m: (8.0, 30.0),
            depth_m: (8.0, 20.0),
            max_rotation_rad: 0.3,
            corner_jitter_m: 0.5,
            height_m: (3.0, 40.0),
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    pub fn next(self) -> Self {
        Self {
            index: self.index.wrapping_add(1),
            ..self
        }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

fn in_range<R: Rng>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    let lo = lo.max(0.0);
    let hi = hi.max(lo);
    lo + rng.gen::<f64>() * (hi - lo)
}

fn draw_ring<R: Rng>(
    rng: &mut R,
    cfg: &FootprintCfg,
    frame: &LocalFrame,
    at: Projected,
) -> Ring {
    let hw = in_range(rng, cfg.width_m).max(0.5) / 2.0;
    let hd = in_range(rng, cfg.depth_m).max(0.5) / 2.0;
    let rot = (rng.gen::<f64>() * 2.0 - 1.0) * cfg.max_rotation_rad.abs();
    let (s, c) = rot.sin_cos();
    // jitter stays below half the short side so the ring never self-intersects
    let j = cfg.corner_jitter_m.abs().min(hw.min(hd) * 0.45);
    let mut ring: Ring = [(-hw, -hd), (hw, -hd), (hw, hd), (-hw, hd)]
        .iter()
        .map(|&(x, y)| {
            let x = x + (rng.gen::<f64>() * 2.0 - 1.0) * j;
            let y = y + (rng.gen::<f64>() * 2.0 - 1.0) * j;
            let p = at + Projected::new(c * x - s * y, s * x + c * y);
            frame.unproject(p).to_position()
        })
        .collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    ring
}

/// One closed counter-clockwise footprint centered `at` meters from the frame origin.
pub fn draw_footprint(
    cfg: &FootprintCfg,
    frame: &LocalFrame,
    at: Projected,
    tok: ReplayToken,
) -> Ring {
    let mut rng = tok.to_std_rng();
    draw_ring(&mut rng, cfg, frame, at)
}

/// A `rows × cols` block of building features around the frame origin.
///
/// Footprint `k` (row-major) uses token index `tok.index + k` and gets id `k`.
/// Features carry layer `building` and a numeric `render_height`.
pub fn draw_block(
    cfg: &FootprintCfg,
    frame: &LocalFrame,
    rows: usize,
    cols: usize,
    pitch_m: f64,
    tok: ReplayToken,
) -> Vec<Feature> {
    let x0 = -(cols.saturating_sub(1) as f64) * pitch_m / 2.0;
    let y0 = -(rows.saturating_sub(1) as f64) * pitch_m / 2.0;
    let mut out = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let k = (r * cols + c) as u64;
            let mut rng = ReplayToken::new(tok.seed, tok.index.wrapping_add(k)).to_std_rng();
            let at = Projected::new(x0 + c as f64 * pitch_m, y0 + r as f64 * pitch_m);
            let ring = draw_ring(&mut rng, cfg, frame, at);
            let mut properties = Properties::new();
            properties.insert(
                "render_height".into(),
                serde_json::Value::from(in_range(&mut rng, cfg.height_m)),
            );
            out.push(Feature {
                id: Some(FeatureId::Int(k as i64)),
                layer_id: Some("building".into()),
                source_layer: None,
                geometry: Some(Geometry::Polygon(vec![ring])),
                properties,
            });
        }
    }
    out
}
