//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tile-ruler.toml file.
//! Every recognised option is enumerated here and defaulted once; a [`Config`] is never
//! mutated after the strip that owns it is constructed.

use crate::error::StripError;
use crate::surface::FontSpec;
use crate::MarkClass;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "tile-ruler.toml";

/// Application configuration loaded from tile-ruler.toml
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Selector of the mount point the tile wrapper is attached beneath
    pub container: String,
    /// Which host width drives the pixels-per-second scale
    pub layout: Layout,
    /// Geometry and timing of the ruler
    pub timeline: TimelineConfig,
    /// Colors and label font
    pub style: StyleConfig,
}

/// Layout policy deciding the width that pixels-per-second is derived from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Use the full scrollable width of the tile set
    #[default]
    Scrolling,
    /// Use the host's visible rendering width (no horizontal scrolling)
    Fill,
}

/// Ruler geometry and timing
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Visual height of every tile in CSS pixels
    pub height: u32,
    /// Height of unlabeled notches as a percentage of `height`
    pub notch_percent_height: u8,
    /// Horizontal gap between a tick and its label in CSS pixels
    pub label_padding: f64,
    /// Explicit duration in seconds; when absent the host is asked
    pub duration: Option<f64>,
    /// Shift applied to every timestamp in seconds, may be negative
    pub offset: f64,
    /// Quiet period before a burst of resize/zoom signals re-renders; `None` disables
    pub debounce_ms: Option<u64>,
    /// Assumed label width in device pixels used to pick the tiles a label touches
    pub approx_label_width: f64,
}

/// Tick and label colors plus label font
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StyleConfig {
    pub primary_color: HexColor,
    pub secondary_color: HexColor,
    pub unlabeled_color: HexColor,
    pub primary_font_color: HexColor,
    pub secondary_font_color: HexColor,
    pub font_family: String,
    /// Font size in CSS pixels
    pub font_size: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            container: "#timeline".to_string(),
            layout: Layout::default(),
            timeline: TimelineConfig::default(),
            style: StyleConfig::default(),
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            height: 20,
            notch_percent_height: 90,
            label_padding: 5.0,
            duration: None,
            offset: 0.0,
            debounce_ms: None,
            approx_label_width: 100.0,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            primary_color: HexColor(Rgb888::BLACK),
            secondary_color: HexColor(Rgb888::new(0xc0, 0xc0, 0xc0)),
            unlabeled_color: HexColor(Rgb888::new(0xc0, 0xc0, 0xc0)),
            primary_font_color: HexColor(Rgb888::BLACK),
            secondary_font_color: HexColor(Rgb888::BLACK),
            font_family: "Arial".to_string(),
            font_size: 10.0,
        }
    }
}

/// Styling for one pass of marks, fixed for the duration of a render.
///
/// All lengths are in device pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    pub tick_color: Rgb888,
    pub label_color: Rgb888,
    pub font: FontSpec,
    pub tick_height: f64,
    pub label_padding: f64,
}

impl Config {
    /// Load configuration from tile-ruler.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), container = %config.container, "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, StripError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save current configuration to tile-ruler.toml
    pub fn save(&self) -> Result<(), StripError> {
        self.save_to_path(CONFIG_FILE)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), StripError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Reject values no render could make sense of.
    ///
    /// A negative `duration` override is accepted: it selects the idle state.
    pub fn validate(&self) -> Result<(), StripError> {
        let invalid = |reason: &str| Err(StripError::InvalidConfig(reason.to_string()));

        if self.container.trim().is_empty() {
            return invalid("container selector is empty");
        }
        let t = &self.timeline;
        if t.height == 0 {
            return invalid("timeline.height must be positive");
        }
        if t.notch_percent_height > 100 {
            return invalid("timeline.notch_percent_height must be within 0..=100");
        }
        if !t.label_padding.is_finite() || !t.offset.is_finite() {
            return invalid("timeline.label_padding and timeline.offset must be finite");
        }
        if t.duration.is_some_and(|d| !d.is_finite()) {
            return invalid("timeline.duration must be finite");
        }
        if !(t.approx_label_width.is_finite() && t.approx_label_width >= 0.0) {
            return invalid("timeline.approx_label_width must be a non-negative number");
        }
        if !(self.style.font_size.is_finite() && self.style.font_size > 0.0) {
            return invalid("style.font_size must be positive");
        }
        Ok(())
    }

    /// Resolve the per-pass style for `class` at the given device pixel ratio.
    pub fn render_style(&self, class: MarkClass, pixel_ratio: f64) -> RenderStyle {
        let full_height = self.timeline.height as f64 * pixel_ratio;
        let style = &self.style;
        let (tick_color, label_color, tick_height) = match class {
            MarkClass::Primary => (style.primary_color, style.primary_font_color, full_height),
            MarkClass::Secondary => (style.secondary_color, style.secondary_font_color, full_height),
            MarkClass::Unlabeled => (
                style.unlabeled_color,
                style.secondary_font_color,
                full_height * self.timeline.notch_percent_height as f64 / 100.0,
            ),
        };
        RenderStyle {
            tick_color: tick_color.0,
            label_color: label_color.0,
            font: FontSpec::new(&style.font_family, style.font_size * pixel_ratio),
            tick_height,
            label_padding: self.timeline.label_padding * pixel_ratio,
        }
    }
}

/// A color written as `#rgb` or `#rrggbb` in the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub Rgb888);

impl TryFrom<String> for HexColor {
    type Error = StripError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for HexColor {
    type Err = StripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || StripError::InvalidConfig(format!("not a hex color: {s:?}"));
        let digits = s.strip_prefix('#').ok_or_else(bad)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| bad());
        match digits.len() {
            3 => {
                let r = channel(&digits[0..1])? * 17;
                let g = channel(&digits[1..2])? * 17;
                let b = channel(&digits[2..3])? * 17;
                Ok(HexColor(Rgb888::new(r, g, b)))
            }
            6 => Ok(HexColor(Rgb888::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ))),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.r(), self.0.g(), self.0.b())
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}
