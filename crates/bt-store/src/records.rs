//! Row layouts of the CSV exports and their conversion into events.

use std::fmt;
use std::str::FromStr;

use bt_core::{
    DiaperEvent, NursingSession, SleepInterval, Subject, Timestamped, UnknownLabel,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default timestamp pattern of the exports, e.g. `07/01/25 9:05 PM`.
pub const DEFAULT_TIME_FORMAT: &str = "%m/%d/%y %I:%M %p";

/// Event category, one export file per category and subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Diaper,
    Sleep,
    Nursing,
}

impl EventKind {
    /// Suffix of the export file name (`<Subject>_<suffix>.csv`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Diaper => "diaper",
            Self::Sleep => "sleep",
            Self::Nursing => "nursing",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field of a row could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column {column:?}: {message}")]
pub struct FieldError {
    pub column: &'static str,
    pub message: String,
}

/// An event type that can be read from an export.
pub trait Record: Sized + Timestamped {
    /// Which export file holds this record type.
    const KIND: EventKind;

    /// Raw row as deserialized by `csv`.
    type Row: DeserializeOwned;

    /// Converts a row. Returns `Ok(None)` for incomplete rows that should be
    /// skipped rather than read as zero.
    fn from_row(row: Self::Row, time_format: &str) -> Result<Option<Self>, FieldError>;
}

#[derive(Debug, Deserialize)]
pub struct DiaperRow {
    #[serde(rename = "Baby")]
    baby: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Status")]
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct SleepRow {
    #[serde(rename = "Baby")]
    baby: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Duration (min)")]
    duration: String,
}

#[derive(Debug, Deserialize)]
pub struct NursingRow {
    #[serde(rename = "Baby")]
    baby: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Start side")]
    start_side: String,
    #[serde(rename = "Left duration (min)")]
    left: String,
    #[serde(rename = "Right Duration (min)")]
    right: String,
    #[serde(rename = "Total (min)")]
    total: String,
}

impl Record for DiaperEvent {
    const KIND: EventKind = EventKind::Diaper;
    type Row = DiaperRow;

    fn from_row(row: DiaperRow, time_format: &str) -> Result<Option<Self>, FieldError> {
        Ok(Some(Self {
            subject: parse_tag("Baby", &row.baby)?,
            timestamp: parse_timestamp("Time", &row.time, time_format)?,
            status: parse_tag("Status", &row.status)?,
        }))
    }
}

impl Record for SleepInterval {
    const KIND: EventKind = EventKind::Sleep;
    type Row = SleepRow;

    fn from_row(row: SleepRow, time_format: &str) -> Result<Option<Self>, FieldError> {
        let Some(duration_minutes) = parse_minutes("Duration (min)", &row.duration)? else {
            return Ok(None);
        };

        Ok(Some(Self {
            subject: parse_tag::<Subject>("Baby", &row.baby)?,
            start: parse_timestamp("Time", &row.time, time_format)?,
            duration_minutes,
        }))
    }
}

impl Record for NursingSession {
    const KIND: EventKind = EventKind::Nursing;
    type Row = NursingRow;

    fn from_row(row: NursingRow, time_format: &str) -> Result<Option<Self>, FieldError> {
        let Some(total_minutes) = parse_minutes("Total (min)", &row.total)? else {
            return Ok(None);
        };

        let session = Self {
            subject: parse_tag("Baby", &row.baby)?,
            timestamp: parse_timestamp("Time", &row.time, time_format)?,
            start_side: parse_tag("Start side", &row.start_side)?,
            left_minutes: parse_minutes("Left duration (min)", &row.left)?.unwrap_or(0),
            right_minutes: parse_minutes("Right Duration (min)", &row.right)?.unwrap_or(0),
            total_minutes,
        };

        let sides = u64::from(session.left_minutes) + u64::from(session.right_minutes);
        if sides != u64::from(session.total_minutes) {
            tracing::debug!(
                timestamp = %session.timestamp,
                left = session.left_minutes,
                right = session.right_minutes,
                total = session.total_minutes,
                "nursing total differs from left + right"
            );
        }

        Ok(Some(session))
    }
}

fn parse_timestamp(
    column: &'static str,
    value: &str,
    time_format: &str,
) -> Result<NaiveDateTime, FieldError> {
    NaiveDateTime::parse_from_str(value, time_format).map_err(|e| FieldError {
        column,
        message: format!("invalid timestamp {value:?}: {e}"),
    })
}

/// Parses a minute count, tolerating thousands separators. Empty means the
/// value was not recorded.
fn parse_minutes(column: &'static str, value: &str) -> Result<Option<u32>, FieldError> {
    if value.is_empty() {
        return Ok(None);
    }

    value
        .replace(',', "")
        .parse()
        .map(Some)
        .map_err(|e| FieldError {
            column,
            message: format!("invalid minutes {value:?}: {e}"),
        })
}

fn parse_tag<T>(column: &'static str, value: &str) -> Result<T, FieldError>
where
    T: FromStr<Err = UnknownLabel>,
{
    value.parse().map_err(|e: UnknownLabel| FieldError {
        column,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use bt_core::{DiaperStatus, NursingSide};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_export_timestamps() {
        let ts = parse_timestamp("Time", "07/01/25 9:05 PM", DEFAULT_TIME_FORMAT).unwrap();
        assert_eq!(ts, at(2025, 7, 1, 21, 5));

        let ts = parse_timestamp("Time", "12/31/21 12:30 AM", DEFAULT_TIME_FORMAT).unwrap();
        assert_eq!(ts, at(2021, 12, 31, 0, 30));
    }

    #[test]
    fn rejects_bad_timestamp() {
        let err = parse_timestamp("Time", "2025-07-01 21:05", DEFAULT_TIME_FORMAT).unwrap_err();
        assert_eq!(err.column, "Time");
        assert!(err.message.contains("2025-07-01 21:05"));
    }

    #[test]
    fn minutes_strip_thousands_separators() {
        assert_eq!(parse_minutes("Duration (min)", "1,234"), Ok(Some(1_234)));
        assert_eq!(parse_minutes("Duration (min)", "45"), Ok(Some(45)));
        assert_eq!(parse_minutes("Duration (min)", ""), Ok(None));
    }

    #[test]
    fn minutes_reject_garbage() {
        assert!(parse_minutes("Total (min)", "ten").is_err());
        assert!(parse_minutes("Total (min)", "-3").is_err());
    }

    #[test]
    fn sleep_row_with_empty_duration_is_skipped() {
        let row = SleepRow {
            baby: "Lily".into(),
            time: "05/02/22 1:15 PM".into(),
            duration: String::new(),
        };
        assert_eq!(SleepInterval::from_row(row, DEFAULT_TIME_FORMAT), Ok(None));
    }

    #[test]
    fn nursing_sides_default_to_zero() {
        let row = NursingRow {
            baby: "Evie".into(),
            time: "03/04/25 2:40 AM".into(),
            start_side: "Right".into(),
            left: String::new(),
            right: "14".into(),
            total: "14".into(),
        };

        let session = NursingSession::from_row(row, DEFAULT_TIME_FORMAT)
            .unwrap()
            .unwrap();

        assert_eq!(session.start_side, NursingSide::Right);
        assert_eq!(session.left_minutes, 0);
        assert_eq!(session.right_minutes, 14);
        assert_eq!(session.timestamp, at(2025, 3, 4, 2, 40));
    }

    #[test]
    fn nursing_row_without_total_is_skipped() {
        let row = NursingRow {
            baby: "Evie".into(),
            time: "03/04/25 2:40 AM".into(),
            start_side: "Left".into(),
            left: "5".into(),
            right: String::new(),
            total: String::new(),
        };
        assert_eq!(NursingSession::from_row(row, DEFAULT_TIME_FORMAT), Ok(None));
    }

    #[test]
    fn diaper_row_rejects_unknown_status() {
        let row = DiaperRow {
            baby: "Lily".into(),
            time: "05/02/22 1:15 PM".into(),
            status: "Soaked".into(),
        };
        let err = DiaperEvent::from_row(row, DEFAULT_TIME_FORMAT).unwrap_err();
        assert_eq!(err.column, "Status");
    }

    #[test]
    fn diaper_row_converts() {
        let row = DiaperRow {
            baby: "Lily".into(),
            time: "05/02/22 1:15 PM".into(),
            status: "Dirty".into(),
        };
        let event = DiaperEvent::from_row(row, DEFAULT_TIME_FORMAT).unwrap().unwrap();
        assert_eq!(event.subject, Subject::Lily);
        assert_eq!(event.status, DiaperStatus::Dirty);
    }
}
