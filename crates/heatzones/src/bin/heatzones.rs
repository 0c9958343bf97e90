//! Offline companion CLI: inspect configurations, plan grids and run
//! hot-zone detection on already-captured composites.
//!
//! The live capture loop needs a real device behind [`MapDevice`] and is
//! driven from library code; this binary covers everything that works
//! from files alone.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use heatzones::{HarvestConfig, HotZoneDetector};
use heatzones::grid::GridPlanner;

#[derive(Parser)]
#[command(name = "heatzones", version, about = "Heat-overlay harvesting toolkit")]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the built-in default configuration as JSON.
    DefaultConfig,
    /// Plan the capture grid for a configuration and print it as JSON.
    Plan {
        /// Configuration file; omit to use the built-in defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Detect hot zones in a stitched composite image.
    Detect {
        /// Composite image (any format the `image` crate reads).
        composite: PathBuf,
        /// Configuration file; omit to use the built-in defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the zone list here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write a copy of the composite with zones outlined.
        #[arg(long)]
        annotate: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<HarvestConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => HarvestConfig::from_json_file(path)?,
        None => HarvestConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // -vv opens the log scope up to dependency targets as well.
    match cli.verbose {
        0 => heatzones::core::init_scoped(LevelFilter::Info, "heatzones")?,
        1 => heatzones::core::init_scoped(LevelFilter::Debug, "heatzones")?,
        _ => heatzones::core::init_with_level(LevelFilter::Trace)?,
    }

    match cli.command {
        Command::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&HarvestConfig::default())?);
        }
        Command::Plan { config } => {
            let config = load_config(config.as_ref())?;
            let planner = GridPlanner::new(config.screen, config.overlap, config.projection());
            let grid = planner.plan(config.bounds)?;
            println!("{}", serde_json::to_string_pretty(&grid)?);
        }
        Command::Detect {
            composite,
            config,
            output,
            annotate,
        } => {
            let config = load_config(config.as_ref())?;
            let image = image::open(&composite)?.to_rgb8();

            let detector = HotZoneDetector::new(config.detect.clone());
            let zones = detector.detect(&image, &config.bounds);

            let json = serde_json::to_string_pretty(&zones)?;
            match output {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{json}"),
            }
            if let Some(path) = annotate {
                detector.annotate(&image, &zones).save(path)?;
            }
        }
    }
    Ok(())
}
