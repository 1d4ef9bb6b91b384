//! # Label Policies
//!
//! Where marks go and what they say is decided outside the renderer. A
//! [`LabelTimes`] supplies the timestamps of each mark class, a [`LabelFormatter`]
//! turns a timestamp into label text, and [`label_points`] maps timestamps to
//! virtual x positions.

use crate::LabelPoint;

/// The seconds-to-pixels mapping of one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    /// Total duration in seconds, always positive
    pub duration: f64,
    /// Device pixels per second
    pub pixels_per_second: f64,
    /// Seconds added to every timestamp before scaling
    pub offset: f64,
}

impl Scale {
    pub fn x_for(&self, seconds: f64) -> f64 {
        self.pixels_per_second * (seconds + self.offset)
    }
}

/// Map `times` to label points, keeping their order.
pub fn label_points(times: &[f64], scale: &Scale) -> Vec<LabelPoint> {
    times
        .iter()
        .enumerate()
        .map(|(index, &seconds)| LabelPoint {
            index,
            seconds,
            x: scale.x_for(seconds),
        })
        .collect()
}

/// Supplies the timestamps of each mark class.
///
/// Sequences may be empty and need not be sorted; marks are drawn in the order given.
pub trait LabelTimes {
    fn primary(&self, scale: &Scale) -> Vec<f64>;
    fn secondary(&self, scale: &Scale) -> Vec<f64>;

    /// Ticks drawn without labels, under everything else.
    fn unlabeled(&self, _scale: &Scale) -> Vec<f64> {
        Vec::new()
    }
}

/// Fixed timestamp lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedTimes {
    pub primary: Vec<f64>,
    pub secondary: Vec<f64>,
}

impl FixedTimes {
    pub fn new(primary: Vec<f64>, secondary: Vec<f64>) -> Self {
        Self { primary, secondary }
    }
}

impl LabelTimes for FixedTimes {
    fn primary(&self, _scale: &Scale) -> Vec<f64> {
        self.primary.clone()
    }

    fn secondary(&self, _scale: &Scale) -> Vec<f64> {
        self.secondary.clone()
    }
}

/// Timestamps produced by two zero-argument closures, e.g. measures and beats
/// from a host tempo map.
pub struct FnTimes<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FnTimes<P, S>
where
    P: Fn() -> Vec<f64>,
    S: Fn() -> Vec<f64>,
{
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P, S> LabelTimes for FnTimes<P, S>
where
    P: Fn() -> Vec<f64>,
    S: Fn() -> Vec<f64>,
{
    fn primary(&self, _scale: &Scale) -> Vec<f64> {
        (self.primary)()
    }

    fn secondary(&self, _scale: &Scale) -> Vec<f64> {
        (self.secondary)()
    }
}

/// Evenly spaced notches whose spacing follows the zoom level.
///
/// Notch `i` sits at `i * interval` seconds. Every `primary_every`-th notch is
/// primary, every `secondary_every`-th remaining one is secondary, and the rest
/// are unlabeled.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalTimes;

/// Zoom level below which notches are spread further apart.
const MIN_PIXELS_PER_NOTCH: f64 = 25.0;

impl IntervalTimes {
    /// Seconds between notches.
    pub fn interval(pixels_per_second: f64) -> f64 {
        let pps = pixels_per_second;
        if pps >= MIN_PIXELS_PER_NOTCH {
            1.0
        } else if pps * 5.0 >= MIN_PIXELS_PER_NOTCH {
            5.0
        } else if pps * 15.0 >= MIN_PIXELS_PER_NOTCH {
            15.0
        } else {
            (0.5 / pps).ceil() * 60.0
        }
    }

    pub fn primary_every(pixels_per_second: f64) -> usize {
        if pixels_per_second >= MIN_PIXELS_PER_NOTCH {
            10
        } else if pixels_per_second * 5.0 >= MIN_PIXELS_PER_NOTCH {
            6
        } else {
            4
        }
    }

    pub fn secondary_every(pixels_per_second: f64) -> usize {
        if pixels_per_second >= MIN_PIXELS_PER_NOTCH {
            5
        } else {
            2
        }
    }

    fn notches(scale: &Scale) -> impl Iterator<Item = (usize, f64)> {
        let pps = scale.pixels_per_second;
        let interval = if pps > 0.0 && pps.is_finite() {
            Self::interval(pps)
        } else {
            f64::INFINITY
        };
        let total_seconds = scale.duration.floor() + 1.0;
        let count = (total_seconds / interval).ceil();
        let count = if count.is_finite() && count > 0.0 {
            count as usize
        } else {
            0
        };
        (0..count).map(move |i| (i, i as f64 * interval))
    }

    fn select(scale: &Scale, keep: impl Fn(usize, usize, usize) -> bool) -> Vec<f64> {
        let primary = Self::primary_every(scale.pixels_per_second);
        let secondary = Self::secondary_every(scale.pixels_per_second);
        Self::notches(scale)
            .filter(|&(i, _)| keep(i, primary, secondary))
            .map(|(_, seconds)| seconds)
            .collect()
    }
}

impl LabelTimes for IntervalTimes {
    fn primary(&self, scale: &Scale) -> Vec<f64> {
        Self::select(scale, |i, p, _| i % p == 0)
    }

    fn secondary(&self, scale: &Scale) -> Vec<f64> {
        Self::select(scale, |i, p, s| i % p != 0 && i % s == 0)
    }

    fn unlabeled(&self, scale: &Scale) -> Vec<f64> {
        Self::select(scale, |i, p, s| i % p != 0 && i % s != 0)
    }
}

/// Turns a mark into its label text.
pub trait LabelFormatter {
    fn format(&self, seconds: f64, pixels_per_second: f64, index: usize) -> String;
}

impl<F> LabelFormatter for F
where
    F: Fn(f64, f64, usize) -> String,
{
    fn format(&self, seconds: f64, pixels_per_second: f64, index: usize) -> String {
        self(seconds, pixels_per_second, index)
    }
}

/// Labels marks `1`, `2`, `3`, ... in sequence order.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexFormatter;

impl LabelFormatter for IndexFormatter {
    fn format(&self, _seconds: f64, _pixels_per_second: f64, index: usize) -> String {
        (index + 1).to_string()
    }
}

/// `m:ss` past the first minute, plain seconds (to the millisecond) before it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClockFormatter;

impl LabelFormatter for ClockFormatter {
    fn format(&self, seconds: f64, _pixels_per_second: f64, _index: usize) -> String {
        if seconds / 60.0 > 1.0 {
            let minutes = (seconds / 60.0).trunc() as u64;
            let secs = (seconds % 60.0).trunc() as u64;
            format!("{minutes}:{secs:02}")
        } else {
            let rounded = (seconds * 1000.0).round() / 1000.0;
            // avoid "-0"
            let rounded = if rounded == 0.0 { 0.0 } else { rounded };
            rounded.to_string()
        }
    }
}
