//! # Error Handling
//!
//! This module defines the centralized error type for the `forklift`
//! library. It uses `thiserror` to build an `Error` enum covering every
//! failure the harvest pipeline can report, with enough context (owner, URL,
//! path, git output) for the user to act on it.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes: forge API failures,
//!   network failures, git clone failures, destination conflicts, aborted
//!   prompts and wrapped I/O errors.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Per-repository failures (`GitClone`, `DestinationExists`) are reported and
//! skipped by the run controller; the remaining variants end the run.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for forklift operations
#[derive(Error, Debug)]
pub enum Error {
    /// The forge API answered with a non-success status.
    ///
    /// Includes the HTTP status, the response body and an optional hint.
    #[error("Forge API error ({status}) for {owner}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Api {
        owner: String,
        status: u16,
        message: String,
        /// Optional hint for how to resolve the API failure
        hint: Option<String>,
    },

    /// The forge could not be reached or its response could not be read.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// `git clone` failed. `message` carries git's own output verbatim.
    #[error("Git clone error for {url}: {message}")]
    GitClone { url: String, message: String },

    /// A git command other than clone failed.
    #[error("Git command failed in {}: {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// The clone target already exists; nothing was attempted.
    #[error("directory {} already exists", path.display())]
    DestinationExists { path: PathBuf },

    /// The destination directory could not be created.
    #[error("Error creating directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user declined to continue at a confirmation prompt.
    #[error("{message}")]
    Aborted { message: String },

    /// An interactive prompt failed.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Whether this failure came from the SSH transport, which makes an
    /// HTTPS retry worthwhile.
    ///
    /// Transport failures carry a line starting with `ssh:`, either from
    /// OpenSSH itself or added by [`crate::harvester::SystemGit`]. Other
    /// mentions of `ssh`, such as in a repository name, do not count.
    pub fn is_ssh_failure(&self) -> bool {
        match self {
            Error::GitClone { message, .. } => message
                .lines()
                .any(|line| line.trim_start().starts_with(SSH_MARKER)),
            _ => false,
        }
    }
}

/// Prefix marking an SSH transport failure in a clone error message.
pub const SSH_MARKER: &str = "ssh:";

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
