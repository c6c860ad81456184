//! Constants and tunables for building selection.
//!
//! Policy
//! - Geometry constants are fixed. The selection thresholds live in `FocusCfg`
//!   so hosts and the CLI can override them without touching call sites.
//! - Threshold values stabilize selection against tile-query noise; only the
//!   ordering distance → area → ring key is load-bearing.

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
/// Decimal places used when formatting ring keys.
pub const DEFAULT_KEY_PRECISION: usize = 6;

pub(crate) const DISTANCE_TIE_M: f64 = 0.5;
pub(crate) const AREA_TIE_M2: f64 = 1.0;
pub(crate) const BUFFER_MARGIN_M: f64 = 0.2;
/// Miter length cap for buffered corners, as a multiple of the margin.
pub(crate) const MITER_LIMIT: f64 = 4.0;

/// Selection, probing and buffering configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusCfg {
    /// Candidates closer than `best - distance_tie_m` win outright.
    pub distance_tie_m: f64,
    /// On a distance near-tie, a candidate must be this much smaller to win.
    pub area_tie_m2: f64,
    /// Outward growth applied to a selected footprint (and its height).
    pub buffer_margin_m: f64,
    /// Whether the tap coordinator buffers the selection before storing it.
    pub buffer_selection: bool,
    pub key_precision: usize,
    /// Pixel offsets probed on both axes around a tap when the direct query is empty.
    pub probe_offsets_px: Vec<f64>,
    /// Radius scans split the query rectangle into `scan_grid × scan_grid` cells.
    pub scan_grid: usize,
    /// Each scan cell is grown by this many pixels so neighbours overlap.
    pub scan_overlap_px: f64,
}

impl Default for FocusCfg {
    fn default() -> Self {
        Self {
            distance_tie_m: DISTANCE_TIE_M,
            area_tie_m2: AREA_TIE_M2,
            buffer_margin_m: BUFFER_MARGIN_M,
            buffer_selection: true,
            key_precision: DEFAULT_KEY_PRECISION,
            probe_offsets_px: vec![-10.0, 0.0, 10.0],
            scan_grid: 3,
            scan_overlap_px: 8.0,
        }
    }
}
