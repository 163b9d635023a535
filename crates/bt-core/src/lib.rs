//! Core domain logic for baby tracker analytics.
//!
//! This crate contains the fundamental types and logic for:
//! - Events: diaper changes, sleeps and nursing sessions
//! - Aggregation: partitioning and summarizing event collections
//! - Circadian projection: turning sleeps into clock-face arcs

pub mod aggregate;
pub mod circadian;
pub mod event;
pub mod summary;

pub use aggregate::{
    EmptyDatasetError, Extrema, count_where, extrema, filter, partition_by_category, total,
};
pub use circadian::{
    CircadianProjector, PolarPoint, ProjectionConfig, ProjectionError, Segment, SegmentKind,
    Window, angle,
};
pub use event::{
    Categorized, Category, DiaperEvent, DiaperStatus, NursingSession, NursingSide, SleepInterval,
    Subject, Timestamped, UnknownLabel,
};
pub use summary::{DiaperSummary, DurationStats, NursingSummary, SleepSummary};
