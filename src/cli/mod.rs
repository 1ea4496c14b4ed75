use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use spectral_engine::config::EngineConfig;

mod compare;
mod demo;
mod info;
mod value_at;

/// spectral-inspect - inspect, query and compare spectrum snapshots
#[derive(Parser)]
#[command(name = "spectral-inspect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load engine settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a demo NMR spectrum snapshot
    Demo {
        /// Output snapshot path
        #[arg(value_name = "OUTPUT", default_value = "demo_nmr.spectrum.json")]
        output: PathBuf,
    },

    /// Display variables, parameters and sections of a snapshot
    Info {
        /// Input snapshot path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Look up the value at a position of the independent variable
    ValueAt {
        /// Input snapshot path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Position, in the internal unit of the independent variable
        #[arg(value_name = "X", allow_hyphen_values = true)]
        x: f64,

        /// Section to query (defaults to the active section)
        #[arg(short, long)]
        section: Option<usize>,
    },

    /// Compare two snapshots structurally
    Compare {
        /// First snapshot
        #[arg(value_name = "A")]
        first: PathBuf,

        /// Second snapshot
        #[arg(value_name = "B")]
        second: PathBuf,

        /// Relative tolerance (overrides the config file)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Demo { output } => demo::run(output),
        Commands::Info { file } => info::run(file),
        Commands::ValueAt { file, x, section } => value_at::run(file, x, section, config),
        Commands::Compare {
            first,
            second,
            tolerance,
        } => compare::run(first, second, tolerance, config),
    }
}
