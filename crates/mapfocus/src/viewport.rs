//! Web-Mercator viewport: screen pixels ↔ lng/lat.
//!
//! Uses 512-px tiles (MapLibre/Mapbox GL convention), so the world is
//! `512 · 2^zoom` pixels wide. Screen origin is the top-left corner of a
//! `width × height` view centered on `center`. Latitudes are clamped to the
//! Mercator limit. No rotation or pitch.

use std::f64::consts::PI;

use crate::geom::Coord;
use crate::query::ScreenPoint;

pub const TILE_SIZE_PX: f64 = 512.0;
/// Latitude where the square Web-Mercator world ends.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: Coord,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: Coord, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    #[inline]
    pub fn world_size(&self) -> f64 {
        TILE_SIZE_PX * self.zoom.exp2()
    }

    /// Fractional world position in `[0, 1]²`, y growing southwards.
    fn unit(c: Coord) -> (f64, f64) {
        let lat = c.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        let x = (c.lng + 180.0) / 360.0;
        let y = (1.0 - lat.tan().asinh() / PI) / 2.0;
        (x, y)
    }

    pub fn to_screen(&self, c: Coord) -> ScreenPoint {
        let ws = self.world_size();
        let (x, y) = Self::unit(c);
        let (cx, cy) = Self::unit(self.center);
        ScreenPoint::new(
            (x - cx) * ws + self.width / 2.0,
            (y - cy) * ws + self.height / 2.0,
        )
    }

    pub fn to_coord(&self, p: ScreenPoint) -> Coord {
        let ws = self.world_size();
        let (cx, cy) = Self::unit(self.center);
        let x = cx + (p.x - self.width / 2.0) / ws;
        let y = cy + (p.y - self.height / 2.0) / ws;
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
        Coord::new(x * 360.0 - 180.0, lat)
    }

    /// Ground meters covered by one pixel at the view center.
    pub fn meters_per_pixel(&self) -> f64 {
        const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;
        EARTH_CIRCUMFERENCE_M * self.center.lat.to_radians().cos() / self.world_size()
    }
}
