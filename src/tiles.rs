//! # Tile Allocation
//!
//! A [`TileSet`] owns the tiles that together stand in for one unbounded canvas.
//! Tiles are kept left to right in a `Vec`, so a tile's index is also its position:
//! tile `i` starts at `i * max_tile_width` and every tile but the last is exactly
//! `max_tile_width` wide.
//!
//! ```text
//!  virtual x:  0          1000        2000     2500
//!              |  tile 0   |  tile 1   | tile 2 |
//!              |  1000 px  |  1000 px  | 500 px |
//! ```
//!
//! Growing appends surfaces created by the [`SurfaceFactory`]; shrinking pops and
//! disposes them. Nothing else ever creates or removes a tile.

use crate::surface::{DrawContext, Surface, SurfaceFactory, TileGeometry};
use std::num::NonZeroU32;
use tracing::debug;

/// One tile: its surface and where it sits.
pub struct Tile<S> {
    surface: S,
    geometry: TileGeometry,
}

impl<S: Surface> Tile<S> {
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    pub(crate) fn context(&mut self) -> Option<&mut dyn DrawContext> {
        self.surface.context()
    }
}

/// Round a host-reported width up to whole pixels. Non-positive or non-finite
/// widths become zero.
pub fn whole_pixels(width: f64) -> u32 {
    if width.is_finite() && width > 0.0 {
        width.ceil().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Whole device pixels covering `css` CSS pixels.
fn device_pixels(css: u32, pixel_ratio: f64) -> u32 {
    (css as f64 * pixel_ratio).round() as u32
}

/// Number of tiles needed to cover `total_width` pixels.
pub fn required_tiles(total_width: u32, max_tile_width: NonZeroU32) -> usize {
    total_width.div_ceil(max_tile_width.get()) as usize
}

/// Ordered, exclusively owned set of tiles.
pub struct TileSet<F: SurfaceFactory> {
    factory: F,
    tiles: Vec<Tile<F::Surface>>,
}

impl<F: SurfaceFactory> TileSet<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            tiles: Vec::new(),
        }
    }

    /// Grow or shrink until exactly `ceil(total_width / max_tile_width)` tiles exist.
    ///
    /// New tiles get provisional full-width geometry; [`TileSet::layout`] fixes it up.
    pub fn ensure_capacity(&mut self, total_width: u32, max_tile_width: NonZeroU32) {
        let required = required_tiles(total_width, max_tile_width);
        let before = self.tiles.len();

        while self.tiles.len() < required {
            let index = self.tiles.len();
            let left = index as u32 * max_tile_width.get();
            let surface = self.factory.create(index);
            self.tiles.push(Tile {
                surface,
                geometry: TileGeometry {
                    index,
                    left,
                    width: max_tile_width.get(),
                    height: 0,
                    device_left: left as f64,
                    device_width: max_tile_width.get(),
                    device_height: 0,
                },
            });
        }

        while self.tiles.len() > required {
            if let Some(mut tile) = self.tiles.pop() {
                tile.surface.dispose();
            }
        }

        if before != required {
            debug!(before, after = required, total_width, "resized tile set");
        }
    }

    /// Size and position every tile for `total_width` CSS pixels.
    ///
    /// Device geometry is in whole pixels. Every full tile is
    /// `round(max_tile_width * pixel_ratio)` device pixels wide and tile `i` starts
    /// at `i` times that, so tiles abut exactly at any ratio. The backing height
    /// gets one extra CSS pixel so fractional ratios do not clip the bottom row.
    pub fn layout(
        &mut self,
        total_width: u32,
        max_tile_width: NonZeroU32,
        pixel_ratio: f64,
        visual_height: u32,
    ) {
        let max = max_tile_width.get();
        let count = self.tiles.len();
        let device_max = device_pixels(max, pixel_ratio);
        let device_height = device_pixels(visual_height + 1, pixel_ratio);

        for (index, tile) in self.tiles.iter_mut().enumerate() {
            let (width, device_width) = if index + 1 == count {
                let width = total_width.saturating_sub(max * (count as u32 - 1));
                (width, device_pixels(width, pixel_ratio))
            } else {
                (max, device_max)
            };
            tile.geometry = TileGeometry {
                index,
                left: index as u32 * max,
                width,
                height: visual_height,
                device_left: index as f64 * device_max as f64,
                device_width,
                device_height,
            };
            tile.surface.resize(&tile.geometry);
        }
    }

    /// Dispose every tile.
    pub fn clear(&mut self) {
        for mut tile in self.tiles.drain(..) {
            tile.surface.dispose();
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile<F::Surface>> {
        self.tiles.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile<F::Surface>> {
        self.tiles.iter_mut()
    }

    pub fn widths(&self) -> Vec<u32> {
        self.tiles.iter().map(|t| t.geometry.width).collect()
    }

    pub fn offsets(&self) -> Vec<u32> {
        self.tiles.iter().map(|t| t.geometry.left).collect()
    }

    /// Sum of tile widths in CSS pixels.
    pub fn total_width(&self) -> u32 {
        self.tiles.iter().map(|t| t.geometry.width).sum()
    }

    /// Device-pixel width of the whole strip, the extent of virtual coordinates.
    pub fn device_width(&self) -> u32 {
        self.tiles.iter().map(|t| t.geometry.device_width).sum()
    }
}

impl<F: SurfaceFactory> Drop for TileSet<F> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingFactory;

    fn max(width: u32) -> NonZeroU32 {
        NonZeroU32::new(width).unwrap()
    }

    #[test]
    fn test_whole_pixels() {
        assert_eq!(whole_pixels(2500.0), 2500);
        assert_eq!(whole_pixels(2499.2), 2500);
        assert_eq!(whole_pixels(0.0), 0);
        assert_eq!(whole_pixels(-10.0), 0);
        assert_eq!(whole_pixels(f64::NAN), 0);
    }

    #[test]
    fn test_three_tiles_for_2500_px() {
        let mut tiles = TileSet::new(RecordingFactory::new());
        tiles.ensure_capacity(2500, max(1000));
        tiles.layout(2500, max(1000), 1.0, 20);

        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles.widths(), vec![1000, 1000, 500]);
        assert_eq!(tiles.offsets(), vec![0, 1000, 2000]);
        assert_eq!(tiles.total_width(), 2500);
        let last = tiles.iter().last().unwrap().geometry();
        assert_eq!(last.device_height, 21);
        assert_eq!(last.height, 20);
    }

    #[test]
    fn test_pixel_ratio_scales_device_geometry() {
        let mut tiles = TileSet::new(RecordingFactory::new());
        tiles.ensure_capacity(1500, max(1000));
        tiles.layout(1500, max(1000), 2.0, 20);

        let geometries: Vec<_> = tiles.iter().map(|t| *t.geometry()).collect();
        assert_eq!(geometries[0].device_width, 2000);
        assert_eq!(geometries[1].device_width, 1000);
        assert_eq!(geometries[1].device_left, 2000.0);
        assert_eq!(geometries[1].device_height, 42);
        assert_eq!(
            tiles.iter().next().unwrap().surface().geometry(),
            Some(&geometries[0])
        );
    }

    #[test]
    fn test_fractional_ratio_keeps_tiles_adjacent() {
        let mut tiles = TileSet::new(RecordingFactory::new());
        tiles.ensure_capacity(11011, max(1001));
        tiles.layout(11011, max(1001), 1.5, 20);

        let geometries: Vec<_> = tiles.iter().map(|t| *t.geometry()).collect();
        assert_eq!(geometries.len(), 11);
        // 1001 * 1.5 = 1501.5 rounds to a whole 1502 for every full tile
        assert!(geometries[..10].iter().all(|g| g.device_width == 1502));
        assert_eq!(geometries[10].device_width, 1502);
        for pair in geometries.windows(2) {
            assert_eq!(pair[0].device_left + pair[0].device_width as f64, pair[1].device_left);
        }
        assert_eq!(geometries[10].device_left, 15020.0);
        assert_eq!(tiles.device_width(), 11 * 1502);
        assert_eq!(geometries[0].device_height, 32);
    }

    #[test]
    fn test_shrink_disposes_removed_tiles() {
        let factory = RecordingFactory::new();
        let mut tiles = TileSet::new(factory.clone());
        tiles.ensure_capacity(5000, max(1000));
        assert_eq!(factory.attached(), 5);

        tiles.ensure_capacity(1200, max(1000));
        assert_eq!(tiles.len(), 2);
        assert_eq!(factory.attached(), 2);

        tiles.ensure_capacity(0, max(1000));
        assert!(tiles.is_empty());
        assert_eq!(factory.attached(), 0);
    }

    #[test]
    fn test_exact_multiple_has_no_partial_tile() {
        let mut tiles = TileSet::new(RecordingFactory::new());
        tiles.ensure_capacity(3000, max(1000));
        tiles.layout(3000, max(1000), 1.0, 20);
        assert_eq!(tiles.widths(), vec![1000, 1000, 1000]);
    }

    #[test]
    fn test_drop_disposes_everything() {
        let factory = RecordingFactory::new();
        {
            let mut tiles = TileSet::new(factory.clone());
            tiles.ensure_capacity(2500, max(1000));
            assert_eq!(factory.attached(), 3);
        }
        assert_eq!(factory.attached(), 0);
    }
}
