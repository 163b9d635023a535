//! Counting, summing and range statistics over event collections.
//!
//! Every function takes a slice of one record type and a field accessor, so
//! the same code serves diapers, sleeps and nursing sessions. Results are new
//! collections; inputs are never modified.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::event::{Categorized, Category};

/// A range statistic was requested over zero records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot compute extrema of an empty dataset")]
pub struct EmptyDatasetError;

/// Smallest and largest value of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extrema {
    pub min: u32,
    pub max: u32,
}

/// Groups events by category, keeping their relative order.
///
/// Every value of the closed category set gets a bucket, even when empty, so
/// the buckets always cover the input exactly once.
pub fn partition_by_category<E>(events: &[E]) -> BTreeMap<E::Category, Vec<E>>
where
    E: Categorized + Clone,
{
    let mut buckets: BTreeMap<E::Category, Vec<E>> = <E::Category as Category>::ALL
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect();

    for event in events {
        buckets
            .entry(event.category())
            .or_default()
            .push(event.clone());
    }

    buckets
}

/// Sums a numeric field. An empty slice sums to 0.
pub fn total<E>(events: &[E], field: impl Fn(&E) -> u32) -> u64 {
    events.iter().map(|e| u64::from(field(e))).sum()
}

/// Returns the smallest and largest value of a numeric field.
pub fn extrema<E>(events: &[E], field: impl Fn(&E) -> u32) -> Result<Extrema, EmptyDatasetError> {
    let mut values = events.iter().map(field);
    let first = values.next().ok_or(EmptyDatasetError)?;

    Ok(values.fold(Extrema { min: first, max: first }, |acc, v| Extrema {
        min: acc.min.min(v),
        max: acc.max.max(v),
    }))
}

/// Keeps the events matching `predicate`, in order.
pub fn filter<E: Clone>(events: &[E], predicate: impl Fn(&E) -> bool) -> Vec<E> {
    events.iter().filter(|&e| predicate(e)).cloned().collect()
}

/// Counts the events matching `predicate`.
pub fn count_where<E>(events: &[E], predicate: impl Fn(&E) -> bool) -> usize {
    events.iter().filter(|&e| predicate(e)).count()
}
