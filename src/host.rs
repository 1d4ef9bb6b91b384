//! The values a render reads from its host player.

use std::num::NonZeroU32;

/// Width, tile limit, pixel ratio and duration, queried at the start of every render.
pub trait Host {
    /// Scrollable virtual width in CSS pixels.
    fn scroll_width(&self) -> f64;

    /// Visible rendering width in CSS pixels, used by [`crate::config::Layout::Fill`].
    fn fill_width(&self) -> f64;

    /// Largest width a single tile may have, in CSS pixels.
    fn max_tile_width(&self) -> NonZeroU32;

    /// Device pixels per CSS pixel. The renderer clamps it with [`clamp_pixel_ratio`].
    fn pixel_ratio(&self) -> f64;

    /// Total duration in seconds. Zero or negative means nothing is loaded.
    fn duration(&self) -> f64;
}

/// Ratios below 1 and non-finite ratios are treated as 1.
pub fn clamp_pixel_ratio(pixel_ratio: f64) -> f64 {
    if pixel_ratio.is_finite() {
        pixel_ratio.max(1.0)
    } else {
        1.0
    }
}

/// A host described by plain values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticHost {
    pub scroll_width: f64,
    pub fill_width: f64,
    pub max_tile_width: NonZeroU32,
    pub pixel_ratio: f64,
    pub duration: f64,
}

/// Browsers refuse canvases much wider than this.
pub const DEFAULT_MAX_TILE_WIDTH: u32 = 4000;

impl StaticHost {
    pub fn new(width: f64, duration: f64) -> Self {
        Self {
            scroll_width: width,
            fill_width: width,
            max_tile_width: NonZeroU32::new(DEFAULT_MAX_TILE_WIDTH).unwrap_or(NonZeroU32::MIN),
            pixel_ratio: 1.0,
            duration,
        }
    }

    pub fn with_max_tile_width(mut self, max_tile_width: NonZeroU32) -> Self {
        self.max_tile_width = max_tile_width;
        self
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }
}

impl Host for StaticHost {
    fn scroll_width(&self) -> f64 {
        self.scroll_width
    }

    fn fill_width(&self) -> f64 {
        self.fill_width
    }

    fn max_tile_width(&self) -> NonZeroU32 {
        self.max_tile_width
    }

    fn pixel_ratio(&self) -> f64 {
        clamp_pixel_ratio(self.pixel_ratio)
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_host_defaults() {
        let host = StaticHost::new(2500.0, 10.0);
        assert_eq!(host.max_tile_width().get(), DEFAULT_MAX_TILE_WIDTH);
        assert_eq!(host.fill_width(), 2500.0);
        assert_eq!(host.pixel_ratio(), 1.0);
    }

    #[test]
    fn test_static_host_clamps_pixel_ratio() {
        assert_eq!(StaticHost::new(1.0, 1.0).with_pixel_ratio(0.5).pixel_ratio(), 1.0);
        assert_eq!(StaticHost::new(1.0, 1.0).with_pixel_ratio(f64::NAN).pixel_ratio(), 1.0);
        assert_eq!(StaticHost::new(1.0, 1.0).with_pixel_ratio(2.0).pixel_ratio(), 2.0);
    }
}
