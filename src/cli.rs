//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::Parser;

use forklift::output::OutputConfig;

use crate::commands;

/// Forklift - harvest GitHub repositories from the open source commons
#[derive(Parser, Debug)]
#[command(name = "forklift")]
#[command(version, about)]
#[command(
    long_about = "Forklift - A tool to harvest and organize open source repositories.\n\
Select which repositories to collect and where to cultivate them locally.\n\
Uses SSH by default for easy development workflow."
)]
pub struct Cli {
    #[command(flatten)]
    harvest: commands::harvest::HarvestArgs,

    /// Colorize output (always, never, auto)
    #[arg(
        long,
        value_name = "WHEN",
        default_value = "auto",
        value_parser = ["always", "never", "auto"]
    )]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

impl Cli {
    /// Execute the harvest
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);
        commands::harvest::execute(self.harvest, output)
    }
}

/// Installs the logger; `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
