//! SSH readiness checks run before an SSH harvest.
//!
//! Looks for a conventional key file in `~/.ssh` and, if one exists, probes
//! the forge with `ssh -T`. GitHub answers a successful authentication with
//! exit status 1 ("no shell access"), so only other statuses count as failure.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

/// Key file names checked in the SSH directory.
pub const KEY_FILES: &[&str] = &["id_rsa", "id_ed25519", "id_ecdsa"];

/// Outcome of the connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SshProbe {
    Authenticated,
    Failed,
}

/// The first conventional key present in `ssh_dir`.
pub fn find_ssh_key(ssh_dir: &Path) -> Option<PathBuf> {
    KEY_FILES
        .iter()
        .map(|name| ssh_dir.join(name))
        .find(|path| path.is_file())
}

/// `~/.ssh`, if a home directory is known.
pub fn default_ssh_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh"))
}

/// Classifies the exit code of `ssh -T`.
///
/// `None` means the process was killed by a signal.
pub fn classify_exit(code: Option<i32>) -> SshProbe {
    match code {
        Some(0) | Some(1) => SshProbe::Authenticated,
        _ => SshProbe::Failed,
    }
}

/// Attempts an SSH login to `host` without a TTY or interactive prompts.
pub fn probe(host: &str) -> SshProbe {
    let status = Command::new("ssh")
        .args(["-T", "-o", "BatchMode=yes", host])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) => {
            debug!("ssh -T {} exited with {:?}", host, status.code());
            classify_exit(status.code())
        }
        Err(e) => {
            debug!("could not run ssh: {}", e);
            SshProbe::Failed
        }
    }
}

/// Trait for the local SSH environment - allows mocking in tests
pub trait SshEnvironment {
    /// A usable private key, if any.
    fn find_key(&self) -> Option<PathBuf>;

    /// Checks that `host` accepts our key.
    fn probe(&self, host: &str) -> SshProbe;
}

/// The default implementation of `SshEnvironment`: the user's `~/.ssh` and
/// the system `ssh` client.
pub struct SystemSsh {
    ssh_dir: Option<PathBuf>,
}

impl SystemSsh {
    pub fn new() -> Self {
        Self {
            ssh_dir: default_ssh_dir(),
        }
    }
}

impl Default for SystemSsh {
    fn default() -> Self {
        Self::new()
    }
}

impl SshEnvironment for SystemSsh {
    fn find_key(&self) -> Option<PathBuf> {
        self.ssh_dir.as_deref().and_then(find_ssh_key)
    }

    fn probe(&self, host: &str) -> SshProbe {
        probe(host)
    }
}
