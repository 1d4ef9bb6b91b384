//! # Virtual Canvas
//!
//! Drawing primitives in virtual device-pixel coordinates over a [`TileSet`]. Callers
//! never see tile boundaries: a rectangle crossing a boundary is cut into one
//! slice per tile, and a label is handed whole to every tile it may overlap so
//! each tile's own clipping keeps just its part.
//!
//! Drawing is best effort. A tile whose context is unavailable is skipped and the
//! remaining tiles are still drawn.

use crate::surface::{FontSpec, SurfaceFactory};
use crate::tiles::TileSet;
use embedded_graphics::pixelcolor::Rgb888;
use tracing::trace;

/// Width assumed for a label when deciding which tiles it reaches.
///
/// Labels are not measured. A label wider than this can lose its tail at a
/// tile boundary; ruler labels are short enough that this has not mattered.
pub const APPROX_TEXT_WIDTH: f64 = 100.0;

pub struct VirtualCanvas<'a, F: SurfaceFactory> {
    tiles: &'a mut TileSet<F>,
    approx_text_width: f64,
}

impl<'a, F: SurfaceFactory> VirtualCanvas<'a, F> {
    pub fn new(tiles: &'a mut TileSet<F>) -> Self {
        Self::with_text_width(tiles, APPROX_TEXT_WIDTH)
    }

    pub fn with_text_width(tiles: &'a mut TileSet<F>, approx_text_width: f64) -> Self {
        Self {
            tiles,
            approx_text_width,
        }
    }

    /// Broadcast the fill color to every tile.
    pub fn set_fill_style(&mut self, color: Rgb888) {
        for tile in self.tiles.iter_mut() {
            if let Some(ctx) = tile.context() {
                ctx.set_fill_style(color);
            }
        }
    }

    /// Broadcast the label font to every tile.
    pub fn set_font(&mut self, font: &FontSpec) {
        for tile in self.tiles.iter_mut() {
            if let Some(ctx) = tile.context() {
                ctx.set_font(font);
            }
        }
    }

    /// Fill `[x, x + width) × [y, y + height)`, giving each tile the slice that
    /// falls inside its horizontal span.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if !(x.is_finite() && width.is_finite()) {
            trace!(x, width, "non-finite rect, skipping");
            return;
        }
        for tile in self.tiles.iter_mut() {
            let geometry = *tile.geometry();
            let left = geometry.device_left;
            let x1 = x.max(left);
            let x2 = (x + width).min(left + geometry.device_width as f64);
            if x1 >= x2 {
                continue;
            }
            match tile.context() {
                Some(ctx) => ctx.fill_rect(x1 - left, y, x2 - x1, height),
                None => trace!(tile = geometry.index, "context unavailable, skipping rect"),
            }
        }
    }

    /// Draw `text` starting at virtual `x` on every tile it may overlap.
    ///
    /// The text is never split; each tile receives the whole string shifted into
    /// its local coordinates (the same origin [`VirtualCanvas::fill_rect`] uses)
    /// and clips the rest.
    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        if !x.is_finite() {
            trace!(x, "non-finite text position, skipping");
            return;
        }
        for tile in self.tiles.iter_mut() {
            let geometry = *tile.geometry();
            let left = geometry.device_left;
            if left > x + self.approx_text_width {
                break;
            }
            if left + geometry.device_width as f64 > x {
                match tile.context() {
                    Some(ctx) => ctx.fill_text(text, x - left, y),
                    None => trace!(tile = geometry.index, "context unavailable, skipping text"),
                }
            }
        }
    }
}
