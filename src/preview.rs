//! Terminal preview of rendered framebuffer tiles.
//!
//! Each output column covers `pixels_per_column` device pixels across the whole
//! strip, so tile boundaries are invisible in the preview just as on screen.

use crate::framebuffer::FrameBufferFactory;
use crate::tiles::TileSet;

/// Render the strip as rows of characters, top row first.
///
/// A cell is `'#'` if any pixel inside it is painted. Disposed or unsized tiles
/// contribute blank cells.
pub fn ascii_rows(tiles: &TileSet<FrameBufferFactory>, pixels_per_column: u32, rows: u32) -> Vec<String> {
    let pixels_per_column = pixels_per_column.max(1);
    let rows = rows.max(1);

    let canvases: Vec<_> = tiles
        .iter()
        .map(|tile| (tile.geometry().device_width, tile.surface().canvas()))
        .collect();
    let strip_width = tiles.device_width();
    let strip_height = canvases
        .iter()
        .filter_map(|(_, canvas)| canvas.map(|c| c.height()))
        .max()
        .unwrap_or(0);
    if strip_width == 0 || strip_height == 0 {
        return Vec::new();
    }

    let columns = strip_width.div_ceil(pixels_per_column);
    let row_height = strip_height.div_ceil(rows);

    // Map a strip-wide x to (canvas, local x)
    let locate = |x: u32| {
        let mut left = 0;
        for (width, canvas) in &canvases {
            if x < left + width {
                return canvas.map(|c| (c, x - left));
            }
            left += width;
        }
        None
    };

    (0..rows)
        .map(|row| {
            (0..columns)
                .map(|column| {
                    let xs = column * pixels_per_column..((column + 1) * pixels_per_column).min(strip_width);
                    let ys = row * row_height..((row + 1) * row_height).min(strip_height);
                    let painted = xs.clone().any(|x| {
                        locate(x).is_some_and(|(canvas, local_x)| {
                            ys.clone().any(|y| canvas.pixel(local_x, y).is_some())
                        })
                    });
                    if painted {
                        '#'
                    } else {
                        ' '
                    }
                })
                .collect()
        })
        .collect()
}
