//! Per-category statistics for one subject.
//!
//! These are the numbers printed by `bt stats`. Range statistics are only
//! requested over non-empty subsets; an empty subset reports `range: None`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::{Extrema, count_where, extrema, filter, partition_by_category, total};
use crate::event::{DiaperEvent, DiaperStatus, NursingSession, SleepInterval};

/// Count, sum and range of a duration field over some events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationStats {
    pub count: usize,
    pub total_minutes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Extrema>,
}

impl DurationStats {
    fn of<E>(events: &[E], field: impl Fn(&E) -> u32 + Copy) -> Self {
        Self {
            count: events.len(),
            total_minutes: total(events, field),
            range: extrema(events, field).ok(),
        }
    }
}

/// Diaper changes counted per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiaperSummary {
    pub by_status: BTreeMap<DiaperStatus, usize>,
    pub total: usize,
}

impl DiaperSummary {
    pub fn from_events(events: &[DiaperEvent]) -> Self {
        let by_status: BTreeMap<_, _> = partition_by_category(events)
            .into_iter()
            .map(|(status, bucket)| (status, bucket.len()))
            .collect();
        let total = by_status.values().sum();

        Self { by_status, total }
    }
}

/// Sleep count and duration range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SleepSummary {
    pub sleeps: DurationStats,
}

impl SleepSummary {
    pub fn from_intervals(intervals: &[SleepInterval]) -> Self {
        Self {
            sleeps: DurationStats::of(intervals, |s| s.duration_minutes),
        }
    }
}

/// Nursing statistics overall and per side.
///
/// A side counts a session when that side's duration is positive, so a
/// two-sided session is counted on both sides and in `both_sides`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NursingSummary {
    pub sessions: DurationStats,
    pub left: DurationStats,
    pub right: DurationStats,
    pub both_sides: usize,
}

impl NursingSummary {
    pub fn from_sessions(sessions: &[NursingSession]) -> Self {
        let left = filter(sessions, |n| n.left_minutes > 0);
        let right = filter(sessions, |n| n.right_minutes > 0);

        Self {
            sessions: DurationStats::of(sessions, |n| n.total_minutes),
            left: DurationStats::of(&left, |n| n.left_minutes),
            right: DurationStats::of(&right, |n| n.right_minutes),
            both_sides: count_where(sessions, |n| n.left_minutes > 0 && n.right_minutes > 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, NaiveDateTime};

    use crate::event::{NursingSide, Subject};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn nursing(side: NursingSide, left: u32, right: u32, total: u32) -> NursingSession {
        NursingSession {
            subject: Subject::Lily,
            timestamp: at(4),
            start_side: side,
            left_minutes: left,
            right_minutes: right,
            total_minutes: total,
        }
    }

    #[test]
    fn diaper_summary_lists_every_status() {
        let events = vec![
            DiaperEvent {
                subject: Subject::Lily,
                timestamp: at(1),
                status: DiaperStatus::Wet,
            },
            DiaperEvent {
                subject: Subject::Lily,
                timestamp: at(5),
                status: DiaperStatus::Wet,
            },
            DiaperEvent {
                subject: Subject::Lily,
                timestamp: at(9),
                status: DiaperStatus::Dirty,
            },
        ];

        let summary = DiaperSummary::from_events(&events);

        assert_eq!(summary.total, 3);
        assert_eq!(
            summary.by_status.keys().copied().collect::<Vec<_>>(),
            vec![
                DiaperStatus::Wet,
                DiaperStatus::Dirty,
                DiaperStatus::Mixed,
                DiaperStatus::Dry
            ]
        );
        assert_eq!(summary.by_status[&DiaperStatus::Wet], 2);
        assert_eq!(summary.by_status[&DiaperStatus::Dry], 0);
    }

    #[test]
    fn sleep_summary_reports_range() {
        let intervals = vec![
            SleepInterval {
                subject: Subject::Lily,
                start: at(1),
                duration_minutes: 45,
            },
            SleepInterval {
                subject: Subject::Lily,
                start: at(3),
                duration_minutes: 1_200,
            },
        ];

        let summary = SleepSummary::from_intervals(&intervals);

        assert_eq!(summary.sleeps.count, 2);
        assert_eq!(summary.sleeps.total_minutes, 1_245);
        assert_eq!(summary.sleeps.range, Some(Extrema { min: 45, max: 1_200 }));
    }

    #[test]
    fn empty_sleeps_have_no_range() {
        let summary = SleepSummary::from_intervals(&[]);
        assert_eq!(summary.sleeps.count, 0);
        assert_eq!(summary.sleeps.range, None);
    }

    #[test]
    fn nursing_summary_splits_sides() {
        let sessions = vec![
            nursing(NursingSide::Left, 12, 0, 12),
            nursing(NursingSide::Right, 4, 8, 13),
            nursing(NursingSide::Left, 7, 0, 7),
        ];

        let summary = NursingSummary::from_sessions(&sessions);

        assert_eq!(summary.sessions.count, 3);
        assert_eq!(summary.sessions.total_minutes, 32);
        assert_eq!(summary.sessions.range, Some(Extrema { min: 7, max: 13 }));

        assert_eq!(summary.left.count, 3);
        assert_eq!(summary.left.total_minutes, 23);
        assert_eq!(summary.left.range, Some(Extrema { min: 4, max: 12 }));

        assert_eq!(summary.right.count, 1);
        assert_eq!(summary.right.range, Some(Extrema { min: 8, max: 8 }));

        assert_eq!(summary.both_sides, 1);
    }

    #[test]
    fn nursing_summary_tolerates_empty_side() {
        let sessions = vec![nursing(NursingSide::Left, 10, 0, 10)];

        let summary = NursingSummary::from_sessions(&sessions);

        assert_eq!(summary.right.count, 0);
        assert_eq!(summary.right.total_minutes, 0);
        assert_eq!(summary.right.range, None);
        assert_eq!(summary.both_sides, 0);
    }
}
