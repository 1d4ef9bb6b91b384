//! Click passthrough: the only event the ruler emits.

use tracing::trace;

type Listener = Box<dyn FnMut(f64)>;

/// Fans a click on the strip out to listeners as a fraction of the strip width.
#[derive(Default)]
pub struct ClickRouter {
    listeners: Vec<Listener>,
}

impl ClickRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(f64) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Emit `x / total_width` once to every listener and return it.
    ///
    /// Nothing is emitted when the strip has no width.
    pub fn click(&mut self, x: f64, total_width: f64) -> Option<f64> {
        if total_width.is_nan() || total_width <= 0.0 || !x.is_finite() {
            return None;
        }
        let progress = x / total_width;
        trace!(x, total_width, progress, "timeline click");
        for listener in &mut self.listeners {
            listener(progress);
        }
        Some(progress)
    }
}
