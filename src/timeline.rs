//! # Timeline Rendering
//!
//! [`TimelineStrip`] owns the tile set and turns host state plus label policies
//! into draw calls. Each [`TimelineStrip::render`] call starts from scratch:
//!
//! 1. Resolve the duration (config override first, then the host). A
//!    non-positive duration is the idle state and nothing is touched.
//! 2. Grow or shrink the tile set to the host's scroll width and lay it out.
//! 3. Derive pixels-per-second from the width chosen by [`Layout`].
//! 4. Draw unlabeled notches, then secondary marks, then primary marks, so
//!    primary marks end up on top wherever classes share a position.
//!
//! Rendering twice with unchanged inputs produces the same tiles and the same
//! draw calls.

use crate::canvas::VirtualCanvas;
use crate::config::{Config, Layout, RenderStyle};
use crate::error::StripError;
use crate::host::{clamp_pixel_ratio, Host};
use crate::interaction::ClickRouter;
use crate::labels::{label_points, IndexFormatter, LabelFormatter, LabelTimes, Scale};
use crate::surface::{Mount, SurfaceFactory};
use crate::tiles::{whole_pixels, TileSet};
use crate::{LabelPoint, MarkClass};
use tracing::debug;

/// Width of a tick mark in device pixels.
const TICK_WIDTH: f64 = 1.0;

/// What a render did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderSummary {
    /// Duration was zero or negative; nothing was drawn
    Idle,
    Drawn {
        tiles: usize,
        pixels_per_second: f64,
        marks: usize,
    },
}

pub struct TimelineStrip<H: Host, F: SurfaceFactory> {
    config: Config,
    host: H,
    tiles: TileSet<F>,
    times: Box<dyn LabelTimes>,
    formatter: Box<dyn LabelFormatter>,
    clicks: ClickRouter,
}

impl<H: Host, F: SurfaceFactory> TimelineStrip<H, F> {
    /// Build a strip attached to the container named by `config.container`.
    ///
    /// Fails if the config is invalid or the container cannot be resolved.
    pub fn new<M>(
        config: Config,
        host: H,
        mount: &mut M,
        times: impl LabelTimes + 'static,
    ) -> Result<Self, StripError>
    where
        M: Mount<Factory = F>,
    {
        config.validate()?;
        let factory = mount
            .resolve(&config.container)
            .ok_or_else(|| StripError::NoContainer(config.container.clone()))?;
        debug!(container = %config.container, "timeline strip attached");
        Ok(Self {
            config,
            host,
            tiles: TileSet::new(factory),
            times: Box::new(times),
            formatter: Box::new(IndexFormatter),
            clicks: ClickRouter::new(),
        })
    }

    /// Replace the label formatter.
    pub fn with_formatter(mut self, formatter: impl LabelFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn render(&mut self) -> RenderSummary {
        let duration = self
            .config
            .timeline
            .duration
            .unwrap_or_else(|| self.host.duration());
        if duration.is_nan() || duration <= 0.0 {
            debug!(duration, "no duration, skipping render");
            return RenderSummary::Idle;
        }

        let max_tile_width = self.host.max_tile_width();
        let pixel_ratio = clamp_pixel_ratio(self.host.pixel_ratio());
        let total_width = whole_pixels(self.host.scroll_width());
        self.tiles.ensure_capacity(total_width, max_tile_width);
        self.tiles.layout(
            total_width,
            max_tile_width,
            pixel_ratio,
            self.config.timeline.height,
        );

        let css_width = match self.config.layout {
            Layout::Scrolling => total_width as f64,
            Layout::Fill => self.host.fill_width(),
        };
        let scale = Scale {
            duration,
            pixels_per_second: css_width * pixel_ratio / duration,
            offset: self.config.timeline.offset,
        };
        if !scale.pixels_per_second.is_finite() || scale.pixels_per_second <= 0.0 {
            debug!(css_width, duration, "no drawable width, skipping marks");
            return RenderSummary::Drawn {
                tiles: self.tiles.len(),
                pixels_per_second: 0.0,
                marks: 0,
            };
        }

        let mut canvas =
            VirtualCanvas::with_text_width(&mut self.tiles, self.config.timeline.approx_label_width);
        let mut marks = 0;
        for class in [MarkClass::Unlabeled, MarkClass::Secondary, MarkClass::Primary] {
            let times = match class {
                MarkClass::Unlabeled => self.times.unlabeled(&scale),
                MarkClass::Secondary => self.times.secondary(&scale),
                MarkClass::Primary => self.times.primary(&scale),
            };
            let points = label_points(&times, &scale);
            let style = self.config.render_style(class, pixel_ratio);
            draw_marks(&mut canvas, class, &points, &style, &*self.formatter, &scale);
            marks += points.len();
        }

        let summary = RenderSummary::Drawn {
            tiles: self.tiles.len(),
            pixels_per_second: scale.pixels_per_second,
            marks,
        };
        debug!(?summary, total_width, pixel_ratio, "rendered timeline");
        summary
    }

    /// Report a click at `x` CSS pixels from the strip's left edge.
    pub fn click(&mut self, x: f64) -> Option<f64> {
        let total_width = self.tiles.total_width() as f64;
        self.clicks.click(x, total_width)
    }

    pub fn on_click(&mut self, listener: impl FnMut(f64) + 'static) {
        self.clicks.subscribe(listener);
    }

    /// Dispose every tile. The next render recreates them.
    pub fn teardown(&mut self) {
        debug!(tiles = self.tiles.len(), "tearing down timeline strip");
        self.tiles.clear();
    }

    pub fn tiles(&self) -> &TileSet<F> {
        &self.tiles
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

/// One pass: every tick in `style.tick_color`, then every label.
fn draw_marks<F: SurfaceFactory>(
    canvas: &mut VirtualCanvas<'_, F>,
    class: MarkClass,
    points: &[LabelPoint],
    style: &RenderStyle,
    formatter: &dyn LabelFormatter,
    scale: &Scale,
) {
    if points.is_empty() {
        return;
    }

    canvas.set_fill_style(style.tick_color);
    for point in points {
        canvas.fill_rect(point.x, 0.0, TICK_WIDTH, style.tick_height);
    }

    if class == MarkClass::Unlabeled {
        return;
    }
    canvas.set_font(&style.font);
    canvas.set_fill_style(style.label_color);
    for point in points {
        let text = formatter.format(point.seconds, scale.pixels_per_second, point.index);
        canvas.fill_text(&text, point.x + style.label_padding, style.tick_height);
    }
}
