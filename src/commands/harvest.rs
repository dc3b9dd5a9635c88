//! Harvest command implementation
//!
//! Discovers the owner's repositories, asks which ones to take and clones
//! them. Individual clone failures are reported but do not change the exit
//! status; discovery failures, a declined SSH warning and an uncreatable
//! `--dest` do.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};

use forklift::config::{Protocol, RunConfiguration, DEFAULT_SSH_HOST};
use forklift::forge::{GitHubClient, DEFAULT_API_URL};
use forklift::harvester::Harvester;
use forklift::output::OutputConfig;
use forklift::prompt::Console;
use forklift::runner::Runner;
use forklift::setup::SystemSsh;

/// Arguments for a harvest
#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// GitHub user or organization whose repositories to harvest
    #[arg(value_name = "OWNER")]
    pub owner: String,

    /// GitHub personal access token (optional for public repos)
    #[arg(short, long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Destination directory (will prompt if not provided)
    #[arg(short, long, value_name = "PATH")]
    pub dest: Option<PathBuf>,

    /// Harvest repositories recursively with submodules
    #[arg(
        short,
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub recursive: bool,

    /// Use HTTPS instead of SSH for cloning (useful for read-only access)
    #[arg(long)]
    pub https: bool,

    /// Filter repositories by programming language (e.g., Go, Python, JavaScript)
    #[arg(short, long, value_name = "LANGUAGE")]
    pub language: Option<String>,

    /// Forge API base URL (for GitHub Enterprise: https://HOST/api/v3)
    #[arg(long, value_name = "URL", env = "FORKLIFT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// SSH endpoint checked before cloning over SSH
    #[arg(long, value_name = "HOST", default_value = DEFAULT_SSH_HOST)]
    pub ssh_host: String,
}

impl HarvestArgs {
    /// Freezes the parsed arguments into the run configuration.
    pub fn to_config(&self) -> RunConfiguration {
        let protocol = if self.https {
            Protocol::Https
        } else {
            Protocol::Ssh
        };

        RunConfiguration::new(&self.owner)
            .with_token(self.token.clone())
            .with_destination(self.dest.clone())
            .with_language(self.language.clone())
            .with_protocol(protocol)
            .with_recursive(self.recursive)
            .with_api_url(&self.api_url)
            .with_ssh_host(&self.ssh_host)
    }
}

/// Execute a harvest
pub fn execute(args: HarvestArgs, output: OutputConfig) -> Result<()> {
    let config = args.to_config();

    let source = GitHubClient::new(&config.api_url, config.token.as_deref())
        .context("Failed to set up the GitHub client")?;
    let harvester = Harvester::new(config.recursive);

    let mut runner = Runner::new(
        &config,
        source,
        harvester,
        Box::new(SystemSsh::new()),
        Console::stdio(),
        output,
    );
    runner.run()?;

    Ok(())
}
