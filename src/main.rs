mod coerce;
mod error;
mod parser;
mod pipeline;
mod settings;
mod tables;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "timetable_csv", about = "Flatten a timetabling XML dataset into CSV tables")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the fourteen CSV tables (default)
    Convert {
        /// Input XML document (default: pu-fal07-c8.xml)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output directory (default: out_csv)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Count room/class definitions and references without writing anything
    Inspect {
        /// Input XML document (default: pu-fal07-c8.xml)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;

    let command = cli.command.unwrap_or(Commands::Convert {
        input: None,
        out_dir: None,
    });

    match command {
        Commands::Convert { input, out_dir } => {
            let settings = settings.with_overrides(input, out_dir);

            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {pos} records ({per_sec})")?,
            );
            pb.enable_steady_tick(Duration::from_millis(120));

            let counts = pipeline::convert(&settings, &pb)
                .with_context(|| format!("Extraction from {} failed", settings.input.display()))?;
            pb.finish_and_clear();

            counts.print();
            println!("CSVs written to: {}", settings.out_dir.display());
        }
        Commands::Inspect { input } => {
            let settings = settings.with_overrides(input, None);
            let tally = pipeline::inspect(&settings)
                .with_context(|| format!("Inspection of {} failed", settings.input.display()))?;
            tally.print();
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_elapsed(elapsed));
    }
    Ok(())
}

fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{:.1}s", d.as_secs_f64()),
        (0, _) => format!("{m}m {s}s"),
        _ => format!("{h}h {m}m {s}s"),
    }
}
