//! Event loading for baby tracker analytics.
//!
//! Reads the per-subject CSV exports of the tracking app. Each subject has
//! one file per category in the data directory:
//!
//! ```text
//! <data_dir>/Lily_diaper.csv
//! <data_dir>/Lily_sleep.csv
//! <data_dir>/Lily_nursing.csv
//! ```
//!
//! Files are opened, parsed in full and closed within one call. Records come
//! back in file order; nothing is sorted. The first malformed row aborts the
//! load with [`StoreError::Parse`].

mod records;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use bt_core::{DiaperEvent, NursingSession, SleepInterval, Subject, Timestamped};
use chrono::NaiveDateTime;
use thiserror::Error;

pub use records::{DEFAULT_TIME_FORMAT, EventKind, FieldError, Record};

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The export could not be opened or read.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A row is malformed or a required column is missing.
    #[error("invalid record in {} at line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

/// Loads events for one subject at a time from a directory of exports.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
    time_format: String,
    cutoff: Option<NaiveDateTime>,
}

impl Store {
    /// Creates a store reading from `data_dir` with the default time format
    /// and no cutoff.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            cutoff: None,
        }
    }

    /// Overrides the `chrono` pattern used for the `Time` column.
    #[must_use]
    pub fn with_time_format(mut self, time_format: impl Into<String>) -> Self {
        self.time_format = time_format.into();
        self
    }

    /// Keeps only events strictly before `cutoff`.
    #[must_use]
    pub const fn with_cutoff(mut self, cutoff: Option<NaiveDateTime>) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the export holding `kind` events for `subject`.
    pub fn source_path(&self, subject: Subject, kind: EventKind) -> PathBuf {
        self.data_dir.join(format!("{subject}_{kind}.csv"))
    }

    pub fn diapers(&self, subject: Subject) -> Result<Vec<DiaperEvent>, StoreError> {
        self.load(subject)
    }

    pub fn sleeps(&self, subject: Subject) -> Result<Vec<SleepInterval>, StoreError> {
        self.load(subject)
    }

    pub fn nursings(&self, subject: Subject) -> Result<Vec<NursingSession>, StoreError> {
        self.load(subject)
    }

    /// Reads every complete record of type `T` for `subject`, applying the
    /// cutoff.
    pub fn load<T: Record>(&self, subject: Subject) -> Result<Vec<T>, StoreError> {
        let path = self.source_path(subject, T::KIND);
        let file = File::open(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        let parsed = read_records::<T, _>(file, &path, &self.time_format)?;
        let read = parsed.records.len();
        let records = before(parsed.records, self.cutoff);

        tracing::debug!(
            path = ?path,
            kind = T::KIND.as_str(),
            read,
            skipped = parsed.skipped,
            cut_off = read - records.len(),
            "loaded export"
        );

        Ok(records)
    }
}

/// Keeps events with a timestamp strictly before `cutoff`, in order.
pub fn before<E: Timestamped>(events: Vec<E>, cutoff: Option<NaiveDateTime>) -> Vec<E> {
    match cutoff {
        None => events,
        Some(cutoff) => events
            .into_iter()
            .filter(|e| e.timestamp() < cutoff)
            .collect(),
    }
}

/// Records read from one export.
#[derive(Debug)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    /// Rows dropped because a required value was empty.
    pub skipped: usize,
}

/// Parses an export from any reader. `path` is only used in errors.
pub fn read_records<T: Record, R: Read>(
    reader: R,
    path: &Path,
    time_format: &str,
) -> Result<Parsed<T>, StoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(|e| csv_error(path, e))?.clone();

    let mut records = Vec::new();
    let mut skipped = 0;
    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map_or(0, csv::Position::line);

        let row: T::Row = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(path, e))?;
        match T::from_row(row, time_format) {
            Ok(Some(event)) => records.push(event),
            Ok(None) => skipped += 1,
            Err(e) => {
                return Err(StoreError::Parse {
                    path: path.to_path_buf(),
                    line,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(Parsed { records, skipped })
}

fn csv_error(path: &Path, err: csv::Error) -> StoreError {
    let line = err.position().map_or(0, csv::Position::line);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => StoreError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => StoreError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use bt_core::{DiaperStatus, NursingSide};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn parse<T: Record>(input: &str) -> Result<Parsed<T>, StoreError> {
        read_records(Cursor::new(input), Path::new("test.csv"), DEFAULT_TIME_FORMAT)
    }

    const SLEEP_CSV: &str = "\
Baby,Time,Duration (min),Note
Lily,05/01/22 8:00 PM,600,
Lily,05/02/22 7:00 AM,,nap in progress
Lily,05/02/22 9:30 AM,\"1,080\",long one
Lily,05/03/22 8:15 PM,45,
";

    #[test]
    fn sleep_export_skips_incomplete_rows() {
        let parsed = parse::<SleepInterval>(SLEEP_CSV).unwrap();

        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.records[0].start, at(2022, 5, 1, 20, 0));
        assert_eq!(parsed.records[1].duration_minutes, 1_080);
        assert_eq!(parsed.records[2].duration_minutes, 45);
    }

    #[test]
    fn diaper_export_parses_statuses() {
        let input = "\
Baby,Time,Status
Evie,06/30/25 11:59 PM,Wet
Evie,07/01/25 3:10 AM,Mixed
";
        let parsed = parse::<DiaperEvent>(input).unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].timestamp, at(2025, 6, 30, 23, 59));
        assert_eq!(parsed.records[1].status, DiaperStatus::Mixed);
    }

    #[test]
    fn nursing_export_parses_sides() {
        let input = "\
Baby,Time,Start side,Left duration (min),Right Duration (min),Total (min)
Evie,07/01/25 1:00 AM,Left,12,8,20
Evie,07/01/25 4:00 AM,Right,,15,15
Evie,07/01/25 7:00 AM,Left,,,
";
        let parsed = parse::<NursingSession>(input).unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records[1].start_side, NursingSide::Right);
        assert_eq!(parsed.records[1].left_minutes, 0);
    }

    #[test]
    fn bad_timestamp_reports_line_and_column() {
        let input = "\
Baby,Time,Status
Evie,06/30/25 11:59 PM,Wet
Evie,yesterday,Dirty
";
        let err = parse::<DiaperEvent>(input).unwrap_err();

        match err {
            StoreError::Parse { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("\"Time\""), "{message}");
            }
            StoreError::Io { .. } => panic!("expected parse error"),
        }
    }

    #[test]
    fn missing_column_is_a_parse_error() {
        let input = "\
Baby,Time
Lily,05/01/22 8:00 PM
";
        let err = parse::<SleepInterval>(input).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("test.csv"));
    }

    #[test]
    fn header_only_export_is_empty() {
        let parsed = parse::<SleepInterval>("Baby,Time,Duration (min)\n").unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn cutoff_is_exclusive() {
        let parsed = parse::<SleepInterval>(SLEEP_CSV).unwrap();

        let kept = before(parsed.records, Some(at(2022, 5, 2, 9, 30)));

        assert_eq!(kept.len(), 1);
        assert!(kept.iter().all(|s| s.start < at(2022, 5, 2, 9, 30)));
    }

    #[test]
    fn cutoff_is_monotonic() {
        let records = parse::<SleepInterval>(SLEEP_CSV).unwrap().records;
        let bounds = [
            at(2022, 4, 1, 0, 0),
            at(2022, 5, 1, 20, 0),
            at(2022, 5, 1, 20, 1),
            at(2022, 5, 3, 0, 0),
            at(2022, 6, 1, 0, 0),
        ];

        let counts: Vec<usize> = bounds
            .iter()
            .map(|b| before(records.clone(), Some(*b)).len())
            .collect();

        assert_eq!(counts, vec![0, 0, 1, 2, 3]);
        assert_eq!(before(records.clone(), None).len(), records.len());
    }

    #[test]
    fn missing_export_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let store = Store::new(temp.path());

        let err = store.sleeps(Subject::Evie).unwrap_err();

        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().contains("Evie_sleep.csv"));
    }

    #[test]
    fn store_reads_subject_files_with_cutoff() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("Lily_sleep.csv"), SLEEP_CSV).unwrap();

        let all = Store::new(temp.path()).sleeps(Subject::Lily).unwrap();
        let early = Store::new(temp.path())
            .with_cutoff(Some(at(2022, 5, 3, 0, 0)))
            .sleeps(Subject::Lily)
            .unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(early.len(), 2);
    }

    #[test]
    fn custom_time_format() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("Evie_diaper.csv"),
            "Baby,Time,Status\nEvie,2025-07-01 03:10,Dry\n",
        )
        .unwrap();

        let events = Store::new(temp.path())
            .with_time_format("%Y-%m-%d %H:%M")
            .diapers(Subject::Evie)
            .unwrap();

        assert_eq!(events[0].timestamp, at(2025, 7, 1, 3, 10));
    }

    #[test]
    fn source_path_uses_subject_label() {
        let store = Store::new("/exports");
        assert_eq!(
            store.source_path(Subject::Lily, EventKind::Nursing),
            PathBuf::from("/exports/Lily_nursing.csv")
        );
    }
}
