//! Circadian projection of sleep intervals onto a clock face.
//!
//! Angle encodes time of day (0 at midnight, a full turn per day) and radius
//! encodes elapsed calendar time within a [`Window`], so a shifting sleep
//! rhythm draws as a spiral.
//!
//! # Algorithm Summary
//!
//! 1. Each sleep interval becomes an `Asleep` arc from its start to its stop.
//! 2. Each gap between consecutive intervals becomes an `Awake` arc.
//! 3. An arc whose end falls on a later calendar date than its start gets a
//!    full turn added to its end angle, so it sweeps forward through midnight.
//! 4. Points are interpolated linearly in (angle, radius) space.
//!
//! Intervals must already be sorted by start time; nothing is re-sorted or
//! validated here. Unsorted input produces arcs that run backwards.

use std::f64::consts::TAU;

use chrono::{Days, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::SleepInterval;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Projection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The window has no positive width, so radius is undefined.
    #[error("invalid date window: {min} to {max} has no positive width")]
    InvalidWindow {
        min: NaiveDateTime,
        max: NaiveDateTime,
    },
    /// An arc needs at least its two endpoints.
    #[error("at least 2 samples per segment are required, got {samples}")]
    TooFewSamples { samples: usize },
}

/// Geometry of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Radius of the window start.
    /// Default: 0.5.
    pub r_min: f64,

    /// Radius of the window end.
    /// Default: 1.0.
    pub r_max: f64,

    /// Points sampled per segment, endpoints included.
    /// Default: 100.
    pub samples: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            r_min: 0.5,
            r_max: 1.0,
            samples: 100,
        }
    }
}

/// Whether a segment covers a sleep or the wake period after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Asleep,
    Awake,
}

/// A sample on the clock face. `angle` is in radians and may exceed a full
/// turn for arcs that cross midnight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    pub angle: f64,
    pub radius: f64,
}

/// A drawable arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub points: Vec<PolarPoint>,
}

/// The half-open date range `[min, max)` mapped onto `[r_min, r_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    min: NaiveDateTime,
    max: NaiveDateTime,
}

impl Window {
    /// Creates a window, rejecting zero-width and reversed ranges.
    pub fn new(min: NaiveDateTime, max: NaiveDateTime) -> Result<Self, ProjectionError> {
        if (max - min).num_milliseconds() <= 0 {
            return Err(ProjectionError::InvalidWindow { min, max });
        }
        Ok(Self { min, max })
    }

    /// The smallest whole-day window holding every interval: midnight of the
    /// earliest start up to the midnight after the latest stop.
    pub fn covering(intervals: &[SleepInterval]) -> Option<Self> {
        let first = intervals.iter().map(|s| s.start).min()?;
        let last = intervals.iter().map(SleepInterval::stop).max()?;

        let min = first.date().and_hms_opt(0, 0, 0)?;
        let max = last
            .date()
            .checked_add_days(Days::new(1))?
            .and_hms_opt(0, 0, 0)?;

        Some(Self { min, max })
    }

    pub const fn min(&self) -> NaiveDateTime {
        self.min
    }

    pub const fn max(&self) -> NaiveDateTime {
        self.max
    }

    /// Elapsed fraction of the window at `t`: 0 at `min`, 1 at `max`.
    /// Not clamped for times outside the window.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self, t: NaiveDateTime) -> f64 {
        let elapsed = (t - self.min).num_milliseconds() as f64;
        let span = (self.max - self.min).num_milliseconds() as f64;
        elapsed / span
    }

    /// Radius of `t`, linear in elapsed time.
    pub fn radius(&self, t: NaiveDateTime, config: &ProjectionConfig) -> f64 {
        lerp(config.r_min, config.r_max, self.fraction(t))
    }
}

/// Clock angle of `t` in radians, ignoring the date.
pub fn angle(t: NaiveDateTime) -> f64 {
    f64::from(t.hour() * 60 + t.minute()) * TAU / MINUTES_PER_DAY
}

/// Exact at both ends: `lerp(a, b, 0.0) == a` and `lerp(a, b, 1.0) == b`.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a.mul_add(1.0 - t, b * t)
}

/// Turns sleep intervals into asleep/awake arcs.
#[derive(Debug, Clone)]
pub struct CircadianProjector {
    config: ProjectionConfig,
}

impl CircadianProjector {
    pub const fn new(config: ProjectionConfig) -> Result<Self, ProjectionError> {
        if config.samples < 2 {
            return Err(ProjectionError::TooFewSamples {
                samples: config.samples,
            });
        }
        Ok(Self { config })
    }

    pub const fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Projects `intervals` over the window `[min, max)`.
    pub fn project(
        &self,
        intervals: &[SleepInterval],
        min: NaiveDateTime,
        max: NaiveDateTime,
    ) -> Result<Vec<Segment>, ProjectionError> {
        let window = Window::new(min, max)?;
        Ok(self.project_within(intervals, &window))
    }

    /// Projects `intervals` over an already validated window.
    ///
    /// Emits segments in chronological order: asleep, awake, asleep, ...,
    /// ending with the last sleep. `k` intervals give `k` asleep and `k - 1`
    /// awake segments.
    pub fn project_within(&self, intervals: &[SleepInterval], window: &Window) -> Vec<Segment> {
        let mut segments = Vec::with_capacity((2 * intervals.len()).saturating_sub(1));

        for (idx, interval) in intervals.iter().enumerate() {
            let stop = interval.stop();
            segments.push(self.arc(SegmentKind::Asleep, interval.start, stop, window));

            if let Some(next) = intervals.get(idx + 1) {
                segments.push(self.arc(SegmentKind::Awake, stop, next.start, window));
            }
        }

        tracing::debug!(
            intervals = intervals.len(),
            segments = segments.len(),
            window_start = %window.min,
            window_end = %window.max,
            "projected sleep intervals"
        );

        segments
    }

    #[allow(clippy::cast_precision_loss)]
    fn arc(
        &self,
        kind: SegmentKind,
        start: NaiveDateTime,
        stop: NaiveDateTime,
        window: &Window,
    ) -> Segment {
        let angle_start = angle(start);
        let mut angle_stop = angle(stop);
        if stop.date() > start.date() {
            angle_stop += TAU;
        }

        let radius_start = window.radius(start, &self.config);
        let radius_stop = window.radius(stop, &self.config);

        let last = (self.config.samples - 1) as f64;
        let points = (0..self.config.samples)
            .map(|i| {
                let t = i as f64 / last;
                PolarPoint {
                    angle: lerp(angle_start, angle_stop, t),
                    radius: lerp(radius_start, radius_stop, t),
                }
            })
            .collect();

        Segment { kind, points }
    }
}
