//! Property-based invariant tests for tiling and rectangle splitting.
//!
//! 1. Tile count is `ceil(total / max)` for any width, zero included.
//! 2. Tile widths partition the total; only the last tile may be narrower, and
//!    device geometry is whole pixels with tiles abutting at any pixel ratio.
//! 3. A rectangle crossing one boundary becomes two adjacent slices whose union
//!    is the original rectangle.
//! 4. Any rectangle is drawn only inside tile bounds and loses exactly the part
//!    outside the strip; a strip-wide rectangle covers every tile with no gap.
//! 5. A tick and a label at the same virtual x land on the same tile-local x.

use crate::canvas::VirtualCanvas;
use crate::recording::{DrawCall, RecordingFactory};
use crate::surface::TileGeometry;
use crate::tiles::{required_tiles, TileSet};
use proptest::prelude::*;
use std::num::NonZeroU32;

// ── Helpers ─────────────────────────────────────────────────────────────

fn laid_out(
    total: u32,
    max: u32,
    pixel_ratio: f64,
) -> (RecordingFactory, TileSet<RecordingFactory>) {
    let factory = RecordingFactory::new();
    let mut tiles = TileSet::new(factory.clone());
    let max = NonZeroU32::new(max).unwrap();
    tiles.ensure_capacity(total, max);
    tiles.layout(total, max, pixel_ratio, 20);
    (factory, tiles)
}

fn geometries(tiles: &TileSet<RecordingFactory>) -> Vec<TileGeometry> {
    tiles.iter().map(|t| *t.geometry()).collect()
}

fn rects(factory: &RecordingFactory) -> Vec<(usize, f64, f64)> {
    factory
        .calls()
        .into_iter()
        .filter_map(|c| match c.call {
            DrawCall::FillRect { x, width, .. } => Some((c.tile, x, width)),
            _ => None,
        })
        .collect()
}

fn texts(factory: &RecordingFactory) -> Vec<(usize, f64)> {
    factory
        .calls()
        .into_iter()
        .filter_map(|c| match c.call {
            DrawCall::FillText { x, .. } => Some((c.tile, x)),
            _ => None,
        })
        .collect()
}

/// Common device pixel ratios, fractional ones included.
fn pixel_ratio() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(1.0),
        Just(1.25),
        Just(1.5),
        Just(2.0),
        Just(2.625),
    ]
}

/// Odd tile widths make `max * ratio` fractional for most ratios.
fn odd_max(range: std::ops::Range<u32>) -> impl Strategy<Value = u32> {
    range.prop_map(|m| m | 1)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Tile count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tile_count_matches_required(
        total in 0u32..20_000,
        max in 1u32..5_000,
        previous in 0u32..20_000,
    ) {
        let factory = RecordingFactory::new();
        let mut tiles = TileSet::new(factory.clone());
        let max = NonZeroU32::new(max).unwrap();

        // Start from an arbitrary earlier size to exercise growing and shrinking
        tiles.ensure_capacity(previous, max);
        tiles.ensure_capacity(total, max);

        let expected = total.div_ceil(max.get()) as usize;
        prop_assert_eq!(tiles.len(), expected);
        prop_assert_eq!(required_tiles(total, max), expected);
        prop_assert_eq!(factory.attached(), expected);
        if total == 0 {
            prop_assert!(tiles.is_empty());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Width partition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn widths_partition_total(
        total in 1u32..50_000,
        max in odd_max(1..5_000),
        ratio in pixel_ratio(),
    ) {
        let (_, tiles) = laid_out(total, max, ratio);
        let widths = tiles.widths();

        prop_assert_eq!(widths.iter().map(|&w| w as u64).sum::<u64>(), total as u64);
        let (last, rest) = widths.split_last().unwrap();
        prop_assert!(rest.iter().all(|&w| w == max));
        prop_assert!(*last >= 1 && *last <= max);

        for (index, offset) in tiles.offsets().into_iter().enumerate() {
            prop_assert_eq!(offset, index as u32 * max);
        }
    }

    #[test]
    fn device_tiles_abut_without_gap_or_overlap(
        total in 1u32..50_000,
        max in odd_max(1..5_000),
        ratio in pixel_ratio(),
    ) {
        let (_, tiles) = laid_out(total, max, ratio);
        let geometries = geometries(&tiles);

        prop_assert_eq!(geometries[0].device_left, 0.0);
        for pair in geometries.windows(2) {
            prop_assert_eq!(pair[0].device_left + pair[0].device_width as f64, pair[1].device_left);
        }
        let (last, rest) = geometries.split_last().unwrap();
        prop_assert!(rest.iter().all(|g| g.device_width == rest[0].device_width));
        prop_assert!(last.device_width >= 1);
        if let Some(full) = rest.first() {
            prop_assert!(last.device_width <= full.device_width);
        }
        prop_assert_eq!(
            last.device_left + last.device_width as f64,
            tiles.device_width() as f64
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Rectangle split across exactly one boundary
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rect_across_one_boundary_splits_exactly(
        max in odd_max(2..2_000),
        count in 2u32..8,
        ratio in pixel_ratio(),
        boundary_seed in 0u32..1_000,
        left_seed in 0u32..10_000,
        right_seed in 0u32..10_000,
    ) {
        let total = max * count;
        let (factory, mut tiles) = laid_out(total, max, ratio);
        let geometries = geometries(&tiles);
        let device_max = geometries[0].device_width;

        let boundary = 1 + boundary_seed % (count - 1);
        let left_part = 1 + left_seed % device_max;
        let right_part = 1 + right_seed % geometries[boundary as usize].device_width;
        let edge = geometries[boundary as usize].device_left;
        let x = edge - left_part as f64;
        let width = (left_part + right_part) as f64;

        VirtualCanvas::new(&mut tiles).fill_rect(x, 0.0, width, 20.0);

        let drawn = rects(&factory);
        prop_assert_eq!(drawn.len(), 2);
        let (tile_a, xa, wa) = drawn[0];
        let (tile_b, xb, wb) = drawn[1];
        prop_assert_eq!(tile_a + 1, tile_b);
        prop_assert_eq!(tile_b, boundary as usize);

        // Back in virtual coordinates the slices are contiguous and cover the rect
        let start_a = geometries[tile_a].device_left + xa;
        let start_b = geometries[tile_b].device_left + xb;
        prop_assert_eq!(start_a, x);
        prop_assert_eq!(start_a + wa, start_b);
        prop_assert_eq!(start_b, edge);
        prop_assert_eq!(wa + wb, width);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Any rectangle stays inside tile bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rect_slices_stay_inside_tiles(
        total in 1u32..20_000,
        max in odd_max(1..3_000),
        ratio in pixel_ratio(),
        x in -5_000i32..60_000,
        width in 0u32..10_000,
    ) {
        let (factory, mut tiles) = laid_out(total, max, ratio);
        let geometries = geometries(&tiles);
        let extent = tiles.device_width() as f64;
        let (x, width) = (x as f64, width as f64);

        VirtualCanvas::new(&mut tiles).fill_rect(x, 0.0, width, 20.0);

        let mut covered = 0.0;
        for (tile, local_x, slice) in rects(&factory) {
            prop_assert!(local_x >= 0.0);
            prop_assert!(slice > 0.0);
            prop_assert!(local_x + slice <= geometries[tile].device_width as f64);
            covered += slice;
        }
        let expected = ((x + width).min(extent) - x.max(0.0)).max(0.0);
        prop_assert_eq!(covered, expected);
    }

    #[test]
    fn strip_wide_rect_fills_every_tile_once(
        total in 1u32..20_000,
        max in odd_max(1..3_000),
        ratio in pixel_ratio(),
    ) {
        let (factory, mut tiles) = laid_out(total, max, ratio);
        let geometries = geometries(&tiles);
        let extent = tiles.device_width() as f64;

        VirtualCanvas::new(&mut tiles).fill_rect(0.0, 0.0, extent, 20.0);

        let drawn = rects(&factory);
        prop_assert_eq!(drawn.len(), geometries.len());
        for ((tile, local_x, slice), geometry) in drawn.into_iter().zip(&geometries) {
            prop_assert_eq!(tile, geometry.index);
            prop_assert_eq!(local_x, 0.0);
            prop_assert_eq!(slice, geometry.device_width as f64);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Ticks and labels share one origin per tile
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tick_and_label_land_on_same_local_x(
        total in 1u32..20_000,
        max in odd_max(1..3_000),
        ratio in pixel_ratio(),
        position in 0.0f64..1.0,
    ) {
        let (factory, mut tiles) = laid_out(total, max, ratio);
        let geometries = geometries(&tiles);
        let x = (position * tiles.device_width() as f64).floor();

        let mut canvas = VirtualCanvas::new(&mut tiles);
        canvas.fill_rect(x, 0.0, 1.0, 20.0);
        canvas.fill_text("7", x, 20.0);

        let ticks = rects(&factory);
        let labels = texts(&factory);
        prop_assert_eq!(ticks.len(), 1);
        let (tick_tile, tick_x, _) = ticks[0];
        prop_assert!(labels.contains(&(tick_tile, tick_x)));
        for (tile, local_x) in labels {
            prop_assert_eq!(local_x, x - geometries[tile].device_left);
        }
    }
}
