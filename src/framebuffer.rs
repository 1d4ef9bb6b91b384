//! In-memory raster tiles.
//!
//! A [`Canvas`] is an `embedded-graphics` draw target, so tick marks and labels are
//! drawn with the same `Rectangle` and `Text` primitives any display driver would
//! accept. Pixels never written stay transparent (`None`).

use crate::surface::{DrawContext, FontSpec, Surface, SurfaceFactory, TileGeometry};
use core::convert::Infallible;
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10, FONT_7X13, FONT_9X15},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::Text,
};

/// Bitmap fonts available to labels, keyed by glyph height.
const FONTS: [&MonoFont<'static>; 4] = [&FONT_6X10, &FONT_7X13, &FONT_9X15, &FONT_10X20];

/// Pick the bundled font whose glyph height is closest to `size` device pixels.
///
/// Only the size of a [`FontSpec`] matters; the family cannot be honoured by
/// bitmap fonts.
pub fn mono_font_for(size: f64) -> &'static MonoFont<'static> {
    FONTS
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (a.character_size.height as f64 - size).abs();
            let db = (b.character_size.height as f64 - size).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(&FONT_6X10)
}

/// Pixel buffer of one tile plus its drawing state.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Option<Rgb888>>,
    fill: Rgb888,
    font: &'static MonoFont<'static>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width as usize * height as usize],
            fill: Rgb888::BLACK,
            font: &FONT_6X10,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// True if any pixel in column `x` has been painted.
    pub fn column_painted(&self, x: u32) -> bool {
        (0..self.height).any(|y| self.pixel(x, y).is_some())
    }

    pub fn painted_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    fn index_of(&self, point: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(point.x).ok()?, u32::try_from(point.y).ok()?);
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(index) = self.index_of(point) {
                self.pixels[index] = Some(color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        self.draw_iter(area.points().map(|point| Pixel(point, color)))
    }
}

impl DrawContext for Canvas {
    fn set_fill_style(&mut self, color: Rgb888) {
        self.fill = color;
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.font = mono_font_for(font.size);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (left, right) = (x.round(), (x + width).round());
        let (top, bottom) = (y.round(), (y + height).round());
        if right <= left || bottom <= top {
            return;
        }
        let rect = Rectangle::new(
            Point::new(left as i32, top as i32),
            Size::new((right - left) as u32, (bottom - top) as u32),
        );
        rect.into_styled(PrimitiveStyle::with_fill(self.fill))
            .draw(self)
            .ok();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let style = MonoTextStyle::new(self.font, self.fill);
        Text::new(text, Point::new(x.round() as i32, y.round() as i32), style)
            .draw(self)
            .ok();
    }
}

/// A tile surface backed by a [`Canvas`]. Disposal drops the canvas.
pub struct FrameBufferSurface {
    canvas: Option<Canvas>,
    disposed: bool,
}

impl FrameBufferSurface {
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }
}

impl Surface for FrameBufferSurface {
    fn resize(&mut self, geometry: &TileGeometry) {
        if self.disposed {
            return;
        }
        self.canvas = Some(Canvas::new(geometry.device_width, geometry.device_height));
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        self.canvas.as_mut().map(|canvas| canvas as &mut dyn DrawContext)
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.canvas = None;
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameBufferFactory;

impl SurfaceFactory for FrameBufferFactory {
    type Surface = FrameBufferSurface;

    fn create(&mut self, _index: usize) -> FrameBufferSurface {
        FrameBufferSurface {
            canvas: None,
            disposed: false,
        }
    }
}
