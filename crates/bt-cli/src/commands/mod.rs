//! CLI subcommand implementations.

pub mod plot;
pub mod stats;
