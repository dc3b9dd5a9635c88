//! # Repository Harvesting
//!
//! The [`Harvester`] clones one repository to a destination path and, when
//! configured, brings its submodules along. Git itself is reached through the
//! [`GitOperations`] trait: [`SystemGit`] runs the system `git` executable,
//! which picks up SSH keys, credential helpers and any other authentication in
//! `~/.gitconfig`, while tests substitute a recording implementation.
//!
//! A harvest never touches an existing path: if the destination exists the
//! call fails before any git operation runs.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::{info, warn};

use crate::error::{Error, Result, SSH_MARKER};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target_dir`, which must not exist yet.
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Paths of the submodules declared by the working tree at `repo_dir`.
    fn list_submodules(&self, repo_dir: &Path) -> Result<Vec<String>>;

    /// Initializes and checks out all submodules, recursively.
    fn update_submodules(&self, repo_dir: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, backed by the `git` command.
pub struct SystemGit;

impl SystemGit {
    fn run(&self, repo_dir: &Path, args: &[&str]) -> Result<Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| Error::GitCommand {
                command: args.join(" "),
                path: repo_dir.to_path_buf(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::GitCommand {
                command: args.join(" "),
                path: repo_dir.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl GitOperations for SystemGit {
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
        // --quiet keeps "Cloning into '<path>'..." out of the error text
        let output = Command::new("git")
            .args(["clone", "--quiet", url])
            .arg(target_dir)
            // Fail instead of waiting on a credential prompt nobody sees
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| Error::GitClone {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::GitClone {
                url: url.to_string(),
                message: clone_failure_message(url, stderr),
            });
        }
        Ok(())
    }

    fn list_submodules(&self, repo_dir: &Path) -> Result<Vec<String>> {
        if !repo_dir.join(".gitmodules").is_file() {
            return Ok(Vec::new());
        }

        let output = self.run(
            repo_dir,
            &["config", "--file", ".gitmodules", "--get-regexp", r"^submodule\..*\.path$"],
        )?;
        Ok(parse_submodule_paths(&String::from_utf8_lossy(&output.stdout)))
    }

    fn update_submodules(&self, repo_dir: &Path) -> Result<()> {
        self.run(repo_dir, &["submodule", "update", "--init", "--recursive"])?;
        Ok(())
    }
}

/// OpenSSH output that means the transport failed before git could talk to
/// the remote.
const SSH_TRANSPORT_SIGNATURES: &[&str] = &[
    "Permission denied (publickey",
    "Host key verification failed",
    "kex_exchange_identification",
    "Connection closed by",
    "Connection reset by",
    "Connection timed out",
    "Could not resolve hostname",
];

/// Whether `url` is cloned over SSH (`ssh://...` or scp-like `user@host:path`).
pub fn is_ssh_url(url: &str) -> bool {
    if let Some((scheme, _)) = url.split_once("://") {
        return scheme == "ssh" || scheme == "git+ssh";
    }
    match (url.find('@'), url.find(':')) {
        (Some(at), Some(colon)) => at < colon,
        _ => false,
    }
}

/// Prefixes SSH transport failures with the `ssh:` marker so the fallback
/// recognizes them; other failures are returned as git printed them.
fn clone_failure_message(url: &str, stderr: String) -> String {
    let already_marked = stderr
        .lines()
        .any(|line| line.trim_start().starts_with(SSH_MARKER));
    let transport_failure = SSH_TRANSPORT_SIGNATURES
        .iter()
        .any(|signature| stderr.contains(signature));

    if is_ssh_url(url) && transport_failure && !already_marked {
        format!("{} {}", SSH_MARKER, stderr)
    } else {
        stderr
    }
}

/// Parses `git config --get-regexp` output (`submodule.<name>.path <path>`).
fn parse_submodule_paths(config_output: &str) -> Vec<String> {
    config_output
        .lines()
        .filter_map(|line| line.split_once(' '))
        .map(|(_, path)| path.trim().to_string())
        .filter(|path| !path.is_empty())
        .collect()
}

/// What a successful harvest brought along.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Harvested {
    /// Submodule paths that were materialized
    pub submodules: Vec<String>,
    /// Why submodules could not be materialized, if they could not
    pub submodule_warning: Option<String>,
}

/// Clones repositories, optionally with their submodules.
pub struct Harvester {
    git_ops: Box<dyn GitOperations>,
    recursive: bool,
}

impl Harvester {
    /// Creates a `Harvester` using the system `git` command.
    pub fn new(recursive: bool) -> Self {
        Self::with_operations(Box::new(SystemGit), recursive)
    }

    /// Creates a `Harvester` with a custom `GitOperations` implementation.
    pub fn with_operations(git_ops: Box<dyn GitOperations>, recursive: bool) -> Self {
        Self { git_ops, recursive }
    }

    /// Clones `url` to `path`, then materializes submodules if recursive.
    ///
    /// Fails with [`Error::DestinationExists`] without running git when
    /// `path` already exists. A submodule failure does not fail the harvest;
    /// it is logged and returned in [`Harvested::submodule_warning`].
    pub fn harvest(&self, url: &str, path: &Path) -> Result<Harvested> {
        if path.exists() {
            return Err(Error::DestinationExists {
                path: path.to_path_buf(),
            });
        }

        info!("cloning {} into {}", url, path.display());
        self.git_ops.clone_repository(url, path)?;

        if !self.recursive {
            return Ok(Harvested::default());
        }

        match self.cultivate_submodules(path) {
            Ok(submodules) => Ok(Harvested {
                submodules,
                submodule_warning: None,
            }),
            Err(e) => {
                warn!("failed to cultivate submodules in {}: {}", path.display(), e);
                Ok(Harvested {
                    submodules: Vec::new(),
                    submodule_warning: Some(e.to_string()),
                })
            }
        }
    }

    fn cultivate_submodules(&self, path: &Path) -> Result<Vec<String>> {
        let submodules = self.git_ops.list_submodules(path)?;
        if submodules.is_empty() {
            return Ok(submodules);
        }
        info!("updating {} submodule(s) in {}", submodules.len(), path.display());
        self.git_ops.update_submodules(path)?;
        Ok(submodules)
    }
}

/// Where a repository named `name` lands under `dest_dir`.
pub fn destination_for(dest_dir: &Path, name: &str) -> PathBuf {
    dest_dir.join(name)
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::{Arc, Mutex};

    /// A git stand-in that records calls and fails on configured URLs.
    #[derive(Clone, Default)]
    pub struct RecordingGit {
        pub clones: Arc<Mutex<Vec<(String, PathBuf)>>>,
        pub updates: Arc<Mutex<Vec<PathBuf>>>,
        /// URL -> error text returned by `clone_repository`
        pub clone_failures: Arc<Mutex<HashMap<String, String>>>,
        pub submodules: Vec<String>,
        pub submodule_failure: Option<String>,
    }

    impl RecordingGit {
        pub fn fail_clone(self, url: &str, message: &str) -> Self {
            self.clone_failures
                .lock()
                .unwrap()
                .insert(url.to_string(), message.to_string());
            self
        }

        pub fn cloned_urls(&self) -> Vec<String> {
            self.clones
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    impl GitOperations for RecordingGit {
        fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
            self.clones
                .lock()
                .unwrap()
                .push((url.to_string(), target_dir.to_path_buf()));
            if let Some(message) = self.clone_failures.lock().unwrap().get(url) {
                return Err(Error::GitClone {
                    url: url.to_string(),
                    message: message.clone(),
                });
            }
            fs::create_dir_all(target_dir)?;
            Ok(())
        }

        fn list_submodules(&self, _repo_dir: &Path) -> Result<Vec<String>> {
            Ok(self.submodules.clone())
        }

        fn update_submodules(&self, repo_dir: &Path) -> Result<()> {
            self.updates.lock().unwrap().push(repo_dir.to_path_buf());
            match &self.submodule_failure {
                Some(message) => Err(Error::GitCommand {
                    command: "submodule update --init --recursive".to_string(),
                    path: repo_dir.to_path_buf(),
                    stderr: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }
}
