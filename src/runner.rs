//! # Harvest Run
//!
//! The [`Runner`] sequences one harvest:
//!
//! 1. **SSH check** (unless HTTPS is configured): warn and ask before going
//!    on when no key exists or the forge rejects the key.
//! 2. **Discovery** of the owner's repositories.
//! 3. **Language pre-filter**, when configured.
//! 4. **Interactive selection** (see [`crate::selection`]).
//! 5. **Destination** resolution: the configured directory, or a prompt.
//! 6. **Cloning** each pick in selection order. A failed SSH clone whose git
//!    output mentions `ssh` is retried once over HTTPS. Every repository
//!    succeeds or fails on its own; nothing is rolled back.
//!
//! Empty results at steps 2–4 end the run quietly. Discovery errors, a
//! declined confirmation and an uncreatable configured destination are
//! returned as errors.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::config::{Protocol, RunConfiguration};
use crate::destination;
use crate::error::{Error, Result};
use crate::forge::{RepositoryRecord, RepositorySource};
use crate::harvester::{destination_for, Harvested, Harvester};
use crate::output::{OutputConfig, Status};
use crate::prompt::Console;
use crate::selection;
use crate::setup::{SshEnvironment, SshProbe};

const SSH_DOCS_URL: &str =
    "https://docs.github.com/en/authentication/connecting-to-github-with-ssh";

/// How one selected repository fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    /// Cloned with the configured protocol.
    Cloned,
    /// The SSH clone failed and the HTTPS retry succeeded.
    ClonedViaHttps,
    /// Failed; no retry was attempted.
    Failed { error: String },
    /// The SSH clone and its HTTPS retry both failed.
    FallbackFailed { error: String, retry_error: String },
}

impl CloneOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CloneOutcome::Cloned | CloneOutcome::ClonedViaHttps)
    }
}

/// Per-repository results of a run, in selection order.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub destination: Option<PathBuf>,
    pub outcomes: Vec<(String, CloneOutcome)>,
}

impl HarvestReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Runs one harvest against injected collaborators.
pub struct Runner<'a, S, R, W> {
    config: &'a RunConfiguration,
    source: S,
    harvester: Harvester,
    ssh: Box<dyn SshEnvironment>,
    console: Console<R, W>,
    output: OutputConfig,
}

impl<'a, S, R, W> Runner<'a, S, R, W>
where
    S: RepositorySource,
    R: BufRead,
    W: Write,
{
    pub fn new(
        config: &'a RunConfiguration,
        source: S,
        harvester: Harvester,
        ssh: Box<dyn SshEnvironment>,
        console: Console<R, W>,
        output: OutputConfig,
    ) -> Self {
        Self {
            config,
            source,
            harvester,
            ssh,
            console,
            output,
        }
    }

    /// Gives back the console, e.g. to inspect what was written.
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Runs the whole harvest.
    pub fn run(&mut self) -> Result<HarvestReport> {
        if self.config.protocol == Protocol::Ssh {
            self.check_ssh_setup()?;
        }

        let config = self.config;
        writeln!(
            self.console.out,
            "Discovering repositories for {}...",
            config.owner
        )?;
        let mut repos = self.source.discover(&config.owner)?;
        info!(
            "discovered {} repositories for {}",
            repos.len(),
            config.owner
        );

        if repos.is_empty() {
            writeln!(self.console.out, "No repositories found in the commons.")?;
            return Ok(HarvestReport::default());
        }

        if let Some(language) = &config.language {
            repos = selection::filter_by_language(&repos, language);
            writeln!(
                self.console.out,
                "Filtered to {} repositories using {}",
                repos.len(),
                language
            )?;
            if repos.is_empty() {
                writeln!(
                    self.console.out,
                    "No repositories found for language: {}",
                    language
                )?;
                return Ok(HarvestReport::default());
            }
        }

        let selected = selection::select_repositories(
            &repos,
            &mut self.console.input,
            &mut self.console.out,
            &self.output,
        )?;
        if selected.is_empty() {
            writeln!(self.console.out, "No repositories selected for harvest.")?;
            return Ok(HarvestReport::default());
        }

        let dest_dir = match &config.destination {
            Some(path) => destination::ensure_directory(path)?,
            None => destination::prompt_destination(&mut self.console)?,
        };

        let report = self.harvest_all(&selected, dest_dir)?;
        self.finish(&report)?;
        Ok(report)
    }

    fn check_ssh_setup(&mut self) -> Result<()> {
        if self.ssh.find_key().is_none() {
            let warning = self
                .output
                .status(Status::Warning, "WARNING: No SSH keys found in ~/.ssh/");
            writeln!(self.console.out, "{}", warning)?;
            writeln!(self.console.out, "Consider setting up SSH keys for GitHub:")?;
            writeln!(self.console.out, "   {}", SSH_DOCS_URL)?;
            writeln!(self.console.out, "   Or use --https flag for read-only access")?;
            writeln!(self.console.out)?;
            return self.confirm_or_abort("Exiting. Set up SSH keys or use --https flag.");
        }

        match self.ssh.probe(&self.config.ssh_host) {
            SshProbe::Authenticated => {
                let verified = self
                    .output
                    .status(Status::Success, "SSH connection to GitHub verified!");
                writeln!(self.console.out, "{}", verified)?;
                Ok(())
            }
            SshProbe::Failed => {
                let warning = self
                    .output
                    .status(Status::Warning, "WARNING: SSH connection to GitHub failed.");
                writeln!(self.console.out, "{}", warning)?;
                writeln!(
                    self.console.out,
                    "You may need to add your SSH key to GitHub or use --https flag"
                )?;
                writeln!(self.console.out)?;
                self.confirm_or_abort("Exiting. Fix SSH setup or use --https flag.")
            }
        }
    }

    fn confirm_or_abort(&mut self, abort_message: &str) -> Result<()> {
        if self.console.confirm("Continue anyway?")? {
            return Ok(());
        }
        Err(Error::Aborted {
            message: abort_message.to_string(),
        })
    }

    fn harvest_all(
        &mut self,
        selected: &[RepositoryRecord],
        dest_dir: PathBuf,
    ) -> Result<HarvestReport> {
        writeln!(
            self.console.out,
            "\nHarvesting {} repositories to {}...",
            selected.len(),
            dest_dir.display()
        )?;
        match self.config.protocol {
            Protocol::Https => {
                writeln!(self.console.out, "Using HTTPS for cloning (read-only friendly)")?
            }
            Protocol::Ssh => {
                writeln!(self.console.out, "Using SSH for cloning (development ready)")?
            }
        }

        let mut report = HarvestReport {
            destination: Some(dest_dir.clone()),
            outcomes: Vec::with_capacity(selected.len()),
        };

        for (i, repo) in selected.iter().enumerate() {
            writeln!(
                self.console.out,
                "\n[{}/{}] Harvesting {} ({})...",
                i + 1,
                selected.len(),
                repo.name,
                repo.language
            )?;
            let outcome = self.harvest_one(repo, &dest_dir)?;
            report.outcomes.push((repo.name.clone(), outcome));
        }

        Ok(report)
    }

    fn harvest_one(&mut self, repo: &RepositoryRecord, dest_dir: &Path) -> Result<CloneOutcome> {
        let config = self.config;
        let path = destination_for(dest_dir, &repo.name);
        let url = config.protocol.clone_url(repo);

        let error = match self.harvester.harvest(url, &path) {
            Ok(harvested) => {
                self.report_submodules(&harvested)?;
                self.line(Status::Success, &format!("Successfully harvested {}", repo.name))?;
                return Ok(CloneOutcome::Cloned);
            }
            Err(e) => e,
        };

        self.line(
            Status::Failure,
            &format!("FAILED to harvest {}: {}", repo.name, error),
        )?;

        if config.protocol != Protocol::Ssh || !error.is_ssh_failure() {
            return Ok(CloneOutcome::Failed {
                error: error.to_string(),
            });
        }

        writeln!(
            self.console.out,
            "  SSH failed, trying HTTPS for {}...",
            repo.name
        )?;
        match self.harvester.harvest(&repo.clone_url, &path) {
            Ok(harvested) => {
                self.report_submodules(&harvested)?;
                self.line(
                    Status::Success,
                    &format!("Successfully harvested {} via HTTPS", repo.name),
                )?;
                Ok(CloneOutcome::ClonedViaHttps)
            }
            Err(retry_error) => {
                self.line(
                    Status::Failure,
                    &format!("HTTPS also failed for {}: {}", repo.name, retry_error),
                )?;
                Ok(CloneOutcome::FallbackFailed {
                    error: error.to_string(),
                    retry_error: retry_error.to_string(),
                })
            }
        }
    }

    fn report_submodules(&mut self, harvested: &Harvested) -> Result<()> {
        if !harvested.submodules.is_empty() {
            writeln!(
                self.console.out,
                "  Cultivating {} submodule(s)...",
                harvested.submodules.len()
            )?;
            for submodule in &harvested.submodules {
                writeln!(self.console.out, "    - {}", submodule)?;
            }
        }
        if let Some(warning) = &harvested.submodule_warning {
            self.line(
                Status::Warning,
                &format!("WARNING: failed to cultivate submodules: {}", warning),
            )?;
        }
        Ok(())
    }

    fn line(&mut self, status: Status, message: &str) -> Result<()> {
        writeln!(self.console.out, "  {}", self.output.status(status, message))?;
        Ok(())
    }

    fn finish(&mut self, report: &HarvestReport) -> Result<()> {
        info!(
            "harvest finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        writeln!(
            self.console.out,
            "\nHarvest completed! Your open source garden is ready."
        )?;
        if self.config.protocol == Protocol::Ssh {
            writeln!(
                self.console.out,
                "NOTE: Repositories are cloned via SSH - ready for development and contributions!"
            )?;
        }
        Ok(())
    }
}
