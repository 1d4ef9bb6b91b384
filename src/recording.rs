//! Surfaces that log every primitive they receive instead of rasterizing it.
//!
//! The log is shared by all surfaces created from one [`RecordingFactory`], in
//! the order calls were forwarded, so a whole render can be compared call by call.

use crate::config::HexColor;
use crate::surface::{DrawContext, FontSpec, Surface, SurfaceFactory, TileGeometry};
use embedded_graphics::pixelcolor::Rgb888;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// One primitive as seen by a tile, in tile-local device pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    SetFillStyle { color: String },
    SetFont { font: String },
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    FillText { text: String, x: f64, y: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordedCall {
    pub tile: usize,
    #[serde(flatten)]
    pub call: DrawCall,
}

pub type DrawLog = Rc<RefCell<Vec<RecordedCall>>>;

/// Creates [`RecordingSurface`]s sharing one log.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    log: DrawLog,
    failing: Rc<RefCell<HashSet<usize>>>,
    attached: Rc<Cell<usize>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call recorded so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    /// Number of surfaces created and not yet disposed.
    pub fn attached(&self) -> usize {
        self.attached.get()
    }

    /// Make the context of tile `index` unavailable until restored.
    pub fn fail_context(&self, index: usize) {
        self.failing.borrow_mut().insert(index);
    }

    pub fn restore_context(&self, index: usize) {
        self.failing.borrow_mut().remove(&index);
    }
}

impl SurfaceFactory for RecordingFactory {
    type Surface = RecordingSurface;

    fn create(&mut self, index: usize) -> RecordingSurface {
        self.attached.set(self.attached.get() + 1);
        RecordingSurface {
            index,
            log: Rc::clone(&self.log),
            failing: Rc::clone(&self.failing),
            attached: Rc::clone(&self.attached),
            geometry: None,
            disposed: false,
        }
    }
}

pub struct RecordingSurface {
    index: usize,
    log: DrawLog,
    failing: Rc<RefCell<HashSet<usize>>>,
    attached: Rc<Cell<usize>>,
    geometry: Option<TileGeometry>,
    disposed: bool,
}

impl RecordingSurface {
    pub fn geometry(&self) -> Option<&TileGeometry> {
        self.geometry.as_ref()
    }

    fn record(&self, call: DrawCall) {
        self.log.borrow_mut().push(RecordedCall {
            tile: self.index,
            call,
        });
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, geometry: &TileGeometry) {
        self.geometry = Some(*geometry);
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        if self.disposed || self.failing.borrow().contains(&self.index) {
            return None;
        }
        Some(self)
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.geometry = None;
        self.attached.set(self.attached.get().saturating_sub(1));
    }
}

impl DrawContext for RecordingSurface {
    fn set_fill_style(&mut self, color: Rgb888) {
        self.record(DrawCall::SetFillStyle {
            color: HexColor(color).to_string(),
        });
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.record(DrawCall::SetFont {
            font: font.to_string(),
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(DrawCall::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.record(DrawCall::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_context_is_unavailable_until_restored() {
        let mut factory = RecordingFactory::new();
        let mut surface = factory.create(3);
        factory.fail_context(3);
        assert!(surface.context().is_none());
        factory.restore_context(3);
        assert!(surface.context().is_some());
    }

    #[test]
    fn test_double_dispose_is_a_no_op() {
        let mut factory = RecordingFactory::new();
        let mut a = factory.create(0);
        let _b = factory.create(1);
        assert_eq!(factory.attached(), 2);
        a.dispose();
        a.dispose();
        assert_eq!(factory.attached(), 1);
        assert!(a.context().is_none());
    }

    #[test]
    fn test_calls_serialize_with_op_tag() {
        let call = RecordedCall {
            tile: 1,
            call: DrawCall::FillRect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 20.0,
            },
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["op"], "fill_rect");
        assert_eq!(json["tile"], 1);
        assert_eq!(json["height"], 20.0);
    }
}
