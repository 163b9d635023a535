//! Baby tracker analytics CLI library.
//!
//! This crate provides the CLI interface for the baby tracker analytics.

mod cli;
pub mod commands;
mod config;
pub mod render;

pub use cli::{CategoryArg, Cli, Commands, PlotFormat};
pub use config::Config;
