//! Plot command for drawing a subject's sleep rhythm.

use anyhow::{Context, Result};
use bt_core::{CircadianProjector, SleepInterval, Subject, Window};
use chrono::NaiveDate;

use crate::Config;
use crate::render::SegmentSink;

/// Explicit `[from, to)` day range for the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Loads the subject's sleeps, projects them and hands the segments to
/// `sink`. Returns the number of segments written.
///
/// Sleeps are sorted by start time first; exports are not guaranteed to be
/// chronological.
pub fn run(
    config: &Config,
    subject: Subject,
    range: Option<DayRange>,
    sink: &mut dyn SegmentSink,
) -> Result<usize> {
    let projector =
        CircadianProjector::new(config.projection).context("invalid projection config")?;

    let mut sleeps = config
        .store(subject)
        .sleeps(subject)
        .with_context(|| format!("failed to load sleep data for {subject}"))?;
    sleeps.sort_by_key(|s| s.start);

    let segments = match range {
        Some(range) => {
            let min = midnight(range.from)?;
            let max = midnight(range.to)?;
            let in_range: Vec<SleepInterval> = sleeps
                .into_iter()
                .filter(|s| s.start >= min && s.start < max)
                .collect();
            projector
                .project(&in_range, min, max)
                .context("failed to project sleep intervals")?
        }
        None => match Window::covering(&sleeps) {
            Some(window) => projector.project_within(&sleeps, &window),
            None => {
                tracing::warn!(%subject, "no sleep data to plot");
                Vec::new()
            }
        },
    };

    sink.write_segments(&segments).context("failed to write plot")?;
    Ok(segments.len())
}

fn midnight(date: NaiveDate) -> Result<chrono::NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid date: {date}"))
}
