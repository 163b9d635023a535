use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bt_core::{Category, Subject};
use bt_store::EventKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bt_cli::commands::{plot, stats};
use bt_cli::render::{JsonLinesSink, SegmentSink, SvgSink};
use bt_cli::{Cli, Commands, Config, PlotFormat};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Stats {
            subject,
            category,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let subjects = subject.map_or_else(|| Subject::ALL.to_vec(), |s| vec![s]);
            let kinds = category.map_or_else(
                || vec![EventKind::Diaper, EventKind::Sleep, EventKind::Nursing],
                |c| vec![c.into()],
            );
            stats::run(&mut io::stdout().lock(), &config, &subjects, &kinds, *json)?;
        }
        Some(Commands::Plot {
            subject,
            output,
            format,
            from,
            to,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let range = from
                .zip(*to)
                .map(|(from, to)| plot::DayRange { from, to });

            let writer = open_output(output.as_deref())?;
            let mut sink: Box<dyn SegmentSink> = match format {
                PlotFormat::Svg => Box::new(SvgSink::new(
                    writer,
                    config.style.clone(),
                    config.projection.r_max,
                )),
                PlotFormat::Jsonl => Box::new(JsonLinesSink::new(writer)),
            };

            let written = plot::run(&config, *subject, range, sink.as_mut())?;
            tracing::debug!(%subject, segments = written, "plot written");
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
