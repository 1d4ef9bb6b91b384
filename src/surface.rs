//! # Tile Surfaces
//!
//! The traits in this module are the only contact the ruler has with whatever
//! actually holds pixels. A [`Mount`] resolves the configured container into a
//! [`SurfaceFactory`] (the wrapper the tiles live under), the factory creates one
//! [`Surface`] per tile, and each surface hands out a [`DrawContext`] for as long
//! as it is alive.
//!
//! Coordinates passed to a [`DrawContext`] are tile-local device pixels. Anything
//! drawn outside the surface is clipped by the surface itself.

use embedded_graphics::pixelcolor::Rgb888;
use std::collections::HashMap;
use std::fmt;

/// Font descriptor in device pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
}

impl FontSpec {
    pub fn new(family: &str, size: f64) -> Self {
        Self {
            family: family.to_string(),
            size,
        }
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size, self.family)
    }
}

/// Placement of one tile, computed by [`crate::tiles::TileSet::layout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGeometry {
    pub index: usize,
    /// Left edge in CSS pixels (`index * max_tile_width`)
    pub left: u32,
    /// Width in CSS pixels
    pub width: u32,
    /// Visual height in CSS pixels
    pub height: u32,
    /// Left edge in device pixels, the origin of this tile in virtual coordinates
    pub device_left: f64,
    pub device_width: u32,
    /// Backing height in device pixels, one CSS pixel taller than `height`
    pub device_height: u32,
}

/// The drawing state of a single tile.
pub trait DrawContext {
    fn set_fill_style(&mut self, color: Rgb888);
    fn set_font(&mut self, font: &FontSpec);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Draw `text` with its alphabetic baseline at `y`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// A fixed-size drawing surface backing one tile.
pub trait Surface {
    /// Apply new geometry. Like a canvas, resizing clears previous content.
    fn resize(&mut self, geometry: &TileGeometry);

    /// The drawing context, or `None` if the surface is disposed or its
    /// context cannot be obtained right now.
    fn context(&mut self) -> Option<&mut dyn DrawContext>;

    /// Release the backing resource and detach from the parent.
    ///
    /// Disposing an already detached surface does nothing.
    fn dispose(&mut self);
}

/// Creates tile surfaces as children of the wrapper it represents.
pub trait SurfaceFactory {
    type Surface: Surface;

    fn create(&mut self, index: usize) -> Self::Surface;
}

/// Resolves a container selector into the wrapper tiles are attached beneath.
pub trait Mount {
    type Factory: SurfaceFactory;

    fn resolve(&mut self, selector: &str) -> Option<Self::Factory>;
}

/// Named mount points. Resolving a selector takes its factory out of the map.
impl<F: SurfaceFactory> Mount for HashMap<String, F> {
    type Factory = F;

    fn resolve(&mut self, selector: &str) -> Option<F> {
        self.remove(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingFactory;

    #[test]
    fn test_font_spec_formats_like_css() {
        assert_eq!(FontSpec::new("Arial", 10.0).to_string(), "10px Arial");
        assert_eq!(FontSpec::new("monospace", 12.5).to_string(), "12.5px monospace");
    }

    #[test]
    fn test_hash_map_mount_resolves_once() {
        let mut mounts = HashMap::from([("#timeline".to_string(), RecordingFactory::default())]);
        assert!(mounts.resolve("#missing").is_none());
        assert!(mounts.resolve("#timeline").is_some());
        assert!(mounts.resolve("#timeline").is_none());
    }
}
