//! Arbiter - Entry Point
//!
//! Configuration tooling for deployments embedding the Arbiter engine.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `arbiter check` | Load and validate the effective configuration |
//! | `arbiter show` | Print the effective configuration as TOML |
//! | `arbiter init <path>` | Write the default configuration to a file |

use arbiter::infrastructure::config::{AppConfig, ConfigLoader};
use arbiter::infrastructure::logging::init_logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Command line interface for Arbiter
#[derive(Parser, Debug)]
#[command(name = "arbiter")]
#[command(about = "Arbiter - provider selection and resilient execution")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate the effective configuration
    Check,
    /// Print the effective configuration as TOML
    Show,
    /// Write the default configuration to a file
    Init {
        /// Destination file
        path: PathBuf,
    },
}

fn load(config: Option<&PathBuf>) -> arbiter::Result<AppConfig> {
    let loader = match config {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    loader.load()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            let config = load(cli.config.as_ref())?;
            init_logging(&config.logging)?;
            info!(
                strategy = %config.routing.strategy,
                pipelines = config.pipelines.len(),
                "Configuration is valid"
            );
        }
        Command::Show => {
            let config = load(cli.config.as_ref())?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Command::Init { path } => {
            ConfigLoader::new().save_to_file(&AppConfig::default(), &path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
