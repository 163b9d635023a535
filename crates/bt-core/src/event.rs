//! Event records exported by the tracking app.
//!
//! Every record is an immutable value built once from an export row. Closed
//! tags (subject, diaper status, nursing side) carry their canonical label so
//! they round-trip with the tabular source.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a label does not name any variant of a closed tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {label:?}")]
pub struct UnknownLabel {
    /// Which tag was being parsed (e.g. "diaper status").
    pub kind: &'static str,
    /// The rejected input.
    pub label: String,
}

/// A closed set of values that events can be partitioned by.
pub trait Category: Copy + Ord + fmt::Debug + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];
}

/// An event that belongs to exactly one value of a closed category.
pub trait Categorized {
    type Category: Category;

    /// Returns the category this event falls into.
    fn category(&self) -> Self::Category;
}

/// An event anchored at a single point in time.
pub trait Timestamped {
    /// Returns when the event happened (for intervals, when it started).
    fn timestamp(&self) -> NaiveDateTime;
}

/// Generates a closed tag enum with label conversions and string serde.
macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Canonical label as written in the export.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl Category for $name {
            const ALL: &'static [Self] = &[$( Self::$variant ),+];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $label => Ok(Self::$variant), )+
                    _ => Err(UnknownLabel {
                        kind: $kind,
                        label: s.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_label_enum!(
    /// A tracked child. Used as a partition key only.
    Subject, "subject" {
        Lily => "Lily",
        Evie => "Evie",
    }
);

define_label_enum!(
    /// What a diaper change found.
    DiaperStatus, "diaper status" {
        Wet => "Wet",
        Dirty => "Dirty",
        Mixed => "Mixed",
        Dry => "Dry",
    }
);

define_label_enum!(
    /// Which side a nursing session started on.
    NursingSide, "nursing side" {
        Left => "Left",
        Right => "Right",
    }
);

/// A single diaper change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaperEvent {
    pub subject: Subject,
    pub timestamp: NaiveDateTime,
    pub status: DiaperStatus,
}

/// A recorded sleep, from `start` for `duration_minutes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepInterval {
    pub subject: Subject,
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
}

impl SleepInterval {
    /// When the subject woke up.
    pub fn stop(&self) -> NaiveDateTime {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// A nursing session.
///
/// `total_minutes` is taken as exported. It is not required to equal
/// `left_minutes + right_minutes`; exports routinely disagree by a minute or
/// two and some sessions only record a total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NursingSession {
    pub subject: Subject,
    pub timestamp: NaiveDateTime,
    pub start_side: NursingSide,
    pub left_minutes: u32,
    pub right_minutes: u32,
    pub total_minutes: u32,
}

impl Categorized for DiaperEvent {
    type Category = DiaperStatus;

    fn category(&self) -> DiaperStatus {
        self.status
    }
}

impl Categorized for NursingSession {
    type Category = NursingSide;

    fn category(&self) -> NursingSide {
        self.start_side
    }
}

impl Timestamped for DiaperEvent {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl Timestamped for SleepInterval {
    fn timestamp(&self) -> NaiveDateTime {
        self.start
    }
}

impl Timestamped for NursingSession {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}
