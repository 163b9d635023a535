//! Command-line argument definitions.

use std::path::PathBuf;

use bt_core::Subject;
use bt_store::EventKind;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// Baby tracker analytics.
///
/// Summarizes diaper, sleep and nursing exports and draws sleep rhythms on a
/// clock face.
#[derive(Debug, Parser)]
#[command(name = "bt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print per-category statistics.
    Stats {
        /// Only this subject (e.g. Lily).
        #[arg(long)]
        subject: Option<Subject>,

        /// Only this category.
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// Output as JSON, one object per subject.
        #[arg(long)]
        json: bool,
    },

    /// Draw a subject's sleep rhythm.
    Plot {
        /// Subject to plot (e.g. Evie).
        #[arg(long)]
        subject: Subject,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = PlotFormat::Svg)]
        format: PlotFormat,

        /// First day of the window (defaults to the first sleep's day).
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Day after the window (defaults to the day after the last wake-up).
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
}

/// Event category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Diaper,
    Sleep,
    Nursing,
}

impl From<CategoryArg> for EventKind {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Diaper => Self::Diaper,
            CategoryArg::Sleep => Self::Sleep,
            CategoryArg::Nursing => Self::Nursing,
        }
    }
}

/// Plot output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotFormat {
    /// Standalone SVG image.
    Svg,
    /// One JSON segment per line.
    Jsonl,
}
