//! Stats command for printing per-category statistics.
//!
//! Blocks are grouped by category, then by subject:
//!
//! ```text
//! Lily Diapers:
//! 	Wet = 412
//! 	...
//! Evie Diapers:
//! 	...
//! Lily Sleeps:
//! 	...
//! ```

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use bt_core::{
    DiaperSummary, DurationStats, NursingSummary, SleepSummary, Subject,
};
use bt_store::EventKind;
use serde::Serialize;

use crate::Config;

/// Every statistic computed for one subject. Categories that were not
/// requested are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectStats {
    pub subject: Subject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diapers: Option<DiaperSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleeps: Option<SleepSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nursing: Option<NursingSummary>,
}

/// Loads and summarizes the requested categories for one subject.
pub fn collect(config: &Config, subject: Subject, kinds: &[EventKind]) -> Result<SubjectStats> {
    let store = config.store(subject);
    let mut stats = SubjectStats {
        subject,
        diapers: None,
        sleeps: None,
        nursing: None,
    };

    for kind in kinds {
        let context = || format!("failed to load {kind} data for {subject}");
        match kind {
            EventKind::Diaper => {
                let events = store.diapers(subject).with_context(context)?;
                stats.diapers = Some(DiaperSummary::from_events(&events));
            }
            EventKind::Sleep => {
                let intervals = store.sleeps(subject).with_context(context)?;
                stats.sleeps = Some(SleepSummary::from_intervals(&intervals));
            }
            EventKind::Nursing => {
                let sessions = store.nursings(subject).with_context(context)?;
                stats.nursing = Some(NursingSummary::from_sessions(&sessions));
            }
        }
    }

    Ok(stats)
}

/// Formats the human-readable statistics.
pub fn format_stats(stats: &[SubjectStats]) -> String {
    let mut output = String::new();

    for s in stats {
        if let Some(diapers) = &s.diapers {
            writeln!(output, "{} Diapers:", s.subject).unwrap();
            for (status, count) in &diapers.by_status {
                writeln!(output, "\t{status} = {count}").unwrap();
            }
            writeln!(output, "\tTotal = {}", diapers.total).unwrap();
        }
    }

    for s in stats {
        if let Some(sleeps) = &s.sleeps {
            writeln!(output, "{} Sleeps:", s.subject).unwrap();
            write_duration_stats(&mut output, "", &sleeps.sleeps);
        }
    }

    for s in stats {
        if let Some(nursing) = &s.nursing {
            writeln!(output, "{} Nursings:", s.subject).unwrap();
            write_duration_stats(&mut output, "", &nursing.sessions);
            write_duration_stats(&mut output, "Left ", &nursing.left);
            write_duration_stats(&mut output, "Right ", &nursing.right);
            writeln!(output, "\tBoth Count: {}", nursing.both_sides).unwrap();
        }
    }

    output
}

fn write_duration_stats(output: &mut String, prefix: &str, stats: &DurationStats) {
    writeln!(output, "\t{prefix}Count: {}", stats.count).unwrap();
    writeln!(output, "\t{prefix}Total: {} minutes", stats.total_minutes).unwrap();
    match stats.range {
        Some(range) => {
            writeln!(output, "\t{prefix}Shortest: {} minutes", range.min).unwrap();
            writeln!(output, "\t{prefix}Longest: {} minutes", range.max).unwrap();
        }
        None => {
            writeln!(output, "\t{prefix}Shortest: n/a").unwrap();
            writeln!(output, "\t{prefix}Longest: n/a").unwrap();
        }
    }
}

/// Runs the stats command.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    subjects: &[Subject],
    kinds: &[EventKind],
    json: bool,
) -> Result<()> {
    let stats = subjects
        .iter()
        .map(|subject| collect(config, *subject, kinds))
        .collect::<Result<Vec<_>>>()?;

    if json {
        for s in &stats {
            writeln!(writer, "{}", serde_json::to_string(s)?)?;
        }
    } else {
        write!(writer, "{}", format_stats(&stats))?;
    }

    Ok(())
}
