//! # Tile Ruler Entry Point
//!
//! Renders a timeline ruler for a given strip width and duration, either into
//! in-memory framebuffer tiles (printed as an ASCII preview) or into a recording
//! of the draw calls (printed as JSON). A `--zoom` burst replays a series of
//! widths through the debounced scheduler the way a player would on resize.

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::PathBuf;
use tile_ruler_lib::config::{Config, CONFIG_FILE};
use tile_ruler_lib::framebuffer::FrameBufferFactory;
use tile_ruler_lib::host::{StaticHost, DEFAULT_MAX_TILE_WIDTH};
use tile_ruler_lib::labels::{ClockFormatter, IntervalTimes};
use tile_ruler_lib::preview::ascii_rows;
use tile_ruler_lib::recording::RecordingFactory;
use tile_ruler_lib::schedule::run_debounced;
use tile_ruler_lib::surface::SurfaceFactory;
use tile_ruler_lib::{RenderSummary, TimelineStrip};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Render a tiled timeline ruler.
#[derive(Parser, Debug)]
#[command(name = "tile-ruler")]
#[command(about = "Render a timeline ruler across fixed-width tiles")]
struct Args {
    /// Config file to load (missing or invalid files fall back to defaults)
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Scrollable strip width in CSS pixels
    #[arg(long, default_value_t = 1000.0)]
    width: f64,

    /// Visible width in CSS pixels for the fill layout (defaults to --width)
    #[arg(long)]
    fill_width: Option<f64>,

    /// Largest width of a single tile in CSS pixels
    #[arg(long, default_value_t = DEFAULT_MAX_TILE_WIDTH)]
    max_tile_width: u32,

    /// Device pixels per CSS pixel
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Duration in seconds; zero or negative renders nothing
    #[arg(long, default_value_t = 60.0)]
    duration: f64,

    /// Comma-separated widths replayed as a resize burst after the first render
    #[arg(long, value_delimiter = ',')]
    zoom: Vec<f64>,

    /// Print the recorded draw calls as JSON instead of a preview
    #[arg(long)]
    json: bool,

    /// Device pixels per preview column
    #[arg(long, default_value_t = 10)]
    ascii: u32,
}

impl Args {
    fn host(&self) -> Result<StaticHost> {
        let max_tile_width = NonZeroU32::new(self.max_tile_width)
            .context("--max-tile-width must be greater than zero")?;
        let mut host = StaticHost::new(self.width, self.duration)
            .with_max_tile_width(max_tile_width)
            .with_pixel_ratio(self.pixel_ratio);
        if let Some(fill_width) = self.fill_width {
            host.fill_width = fill_width;
        }
        Ok(host)
    }
}

/// Mount a strip on `factory`, render once, then replay the zoom burst.
async fn render_strip<F: SurfaceFactory>(
    args: &Args,
    config: Config,
    factory: F,
) -> Result<TimelineStrip<StaticHost, F>> {
    let debounce = config.timeline.debounce_ms.map(Duration::from_millis);
    let mut mounts = HashMap::from([(config.container.clone(), factory)]);
    let mut strip = TimelineStrip::new(config, args.host()?, &mut mounts, IntervalTimes)?
        .with_formatter(ClockFormatter);

    log_summary(strip.render());

    if !args.zoom.is_empty() {
        let (tx, rx) = mpsc::channel(args.zoom.len());
        for &width in &args.zoom {
            tx.send(width).await?;
        }
        drop(tx);

        let renders = run_debounced(rx, debounce, |width| {
            strip.host_mut().scroll_width = width;
            log_summary(strip.render());
        })
        .await;
        info!(requests = args.zoom.len(), renders, "zoom burst settled");
    }

    Ok(strip)
}

fn log_summary(summary: RenderSummary) {
    match summary {
        RenderSummary::Idle => info!("nothing to render"),
        RenderSummary::Drawn {
            tiles,
            pixels_per_second,
            marks,
        } => info!(tiles, pixels_per_second, marks, "rendered"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the preview or JSON
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    if args.json {
        let factory = RecordingFactory::new();
        let _strip = render_strip(&args, config, factory.clone()).await?;
        println!("{}", serde_json::to_string_pretty(&factory.calls())?);
    } else {
        let rows = config.timeline.height;
        let strip = render_strip(&args, config, FrameBufferFactory).await?;
        for row in ascii_rows(strip.tiles(), args.ascii, rows.min(10)) {
            println!("{}", row.trim_end());
        }
    }

    Ok(())
}
