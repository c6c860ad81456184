use std::fmt::Write;

use super::types::usable_coords;
use super::types::Position;

/// Canonical dedup key `"lng,lat;lng,lat;..."` at fixed decimal precision.
///
/// Two rings are treated as the same ring iff their keys are equal. Rings that
/// straddle a rounding boundary may get distinct keys; that is tolerated.
pub fn ring_key(ring: &[Position], precision: usize) -> String {
    let mut out = String::new();
    for (i, c) in usable_coords(ring).into_iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        push_fixed(&mut out, c.lng, precision);
        out.push(',');
        push_fixed(&mut out, c.lat, precision);
    }
    out
}

fn push_fixed(out: &mut String, v: f64, precision: usize) {
    let start = out.len();
    // Writing into a String cannot fail.
    let _ = write!(out, "{v:.precision$}");
    // "-0.000000" and "0.000000" name the same rounded value.
    if out[start..].starts_with('-') && out[start + 1..].bytes().all(|b| b == b'0' || b == b'.') {
        out.remove(start);
    }
}
