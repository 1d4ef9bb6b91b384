//! # Tile Ruler Core Library
//!
//! Renders a timeline ruler (tick marks and labels) onto a strip that may be far
//! wider than any single drawing surface the host allows. The strip is tiled
//! across fixed-maximum-width surfaces and drawing happens through primitives that
//! behave as if one unbounded canvas existed.
//!
//! ## Design Philosophy
//!
//! ### Virtual Coordinates
//! - **One coordinate space**: callers position ticks and labels in virtual device
//!   pixels; tile boundaries never leak into the timeline logic
//! - **Exact rectangle splitting**: a tick straddling a boundary is cut into slices
//!   whose union is the original rectangle
//! - **Clipped text**: labels are drawn whole on every tile they may touch and each
//!   tile clips its own part
//!
//! ### Stateless Rendering
//! Every render re-derives tiles, scale and marks from the host and the config.
//! Nothing survives between renders except the tiles themselves, so rendering is
//! idempotent and a new render simply replaces the previous picture.
//!
//! ### Data Flow
//! 1. **Host**: scroll width, tile limit, pixel ratio and duration ([`host`])
//! 2. **Tiles**: grow/shrink and lay out the tile set ([`tiles`])
//! 3. **Marks**: timestamps from label policies become [`LabelPoint`]s ([`labels`])
//! 4. **Draw**: ticks and labels go through the virtual canvas ([`canvas`]) onto
//!    whatever surfaces the mount provides ([`surface`], [`framebuffer`], [`recording`])
//!
//! ## Core Types
//! - [`LabelPoint`]: one mark of one render
//! - [`MarkClass`]: which pass a mark belongs to

// Module declarations
pub mod canvas;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod host;
pub mod interaction;
pub mod labels;
pub mod preview;
pub mod recording;
pub mod schedule;
pub mod surface;
pub mod tiles;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::StripError;
pub use timeline::{RenderSummary, TimelineStrip};

/// A mark positioned on the strip.
///
/// Built and thrown away within a single render.
///
/// # Example
/// ```
/// use tile_ruler_lib::labels::{label_points, Scale};
///
/// let scale = Scale { duration: 10.0, pixels_per_second: 100.0, offset: 0.0 };
/// let points = label_points(&[0.0, 1.0], &scale);
///
/// assert_eq!(points[1].index, 1);
/// assert_eq!(points[1].x, 100.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPoint {
    /// Position within its sequence
    pub index: usize,
    /// Timestamp in seconds, before the offset is applied
    pub seconds: f64,
    /// Virtual x in device pixels
    pub x: f64,
}

/// The classes of marks, in drawing order.
///
/// Later classes are drawn over earlier ones, so primary marks win where
/// positions coincide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkClass {
    /// Tick only, shorter than labelled ticks
    Unlabeled,
    /// Fine subdivisions, e.g. beats
    Secondary,
    /// Coarse subdivisions, e.g. measures
    Primary,
}
