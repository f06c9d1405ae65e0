//! geowall command line
//!
//! Applies one of the named image transformations to files on disk. Fetching
//! the map tile and installing the wallpaper are left to other tools.

mod batch;
mod config;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use config::Config;
use geowall_effect::Registry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "geowall", version, about = "Stylize map images with named effect pipelines")]
struct Cli {
    /// TOML config file (defaults to the per-user geowall.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the random effects, overrides the config file
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a transformation to one or more images
    Apply {
        /// Transformation name, see `geowall list`
        #[arg(short, long)]
        transform: Option<String>,

        /// Output file, or output directory when several inputs are given
        #[arg(short, long)]
        output: PathBuf,

        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// List the registered transformations
    List,

    /// Print the effective configuration as TOML
    Config,
}

/// Log lines look like `[12:30:01 INFO main.rs 42] message`.
fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.effects.seed = cli.seed;
    }

    match cli.command {
        Command::Config => print!("{}", config.to_toml()?),

        Command::List => {
            let registry = Registry::new(&config.effects)?;
            for (name, pipeline) in registry.iter() {
                println!("{:<15} {}", name, pipeline.describe());
            }
        }

        Command::Apply {
            transform,
            output,
            inputs,
        } => {
            let transform = transform.unwrap_or_else(|| config.transform.clone());
            let registry = Registry::new(&config.effects)?;

            if let [input] = inputs.as_slice() {
                registry.get(&transform)?;
                batch::process_file(&registry, &transform, input, &output)?;
            } else {
                let failed = batch::process_batch(&registry, &transform, &inputs, &output)?;
                if failed > 0 {
                    bail!("{failed} of {} images failed", inputs.len());
                }
            }
        }
    }

    Ok(())
}
