//! # Run Configuration
//!
//! Everything a harvest run needs to know, fixed once at startup and passed by
//! reference to every component: who to discover, how to authenticate, where
//! to put the clones, which transport to use and whether submodules follow.

use std::path::PathBuf;

use crate::forge::{RepositoryRecord, DEFAULT_API_URL};

/// Default SSH endpoint probed before an SSH harvest.
pub const DEFAULT_SSH_HOST: &str = "git@github.com";

/// Transport used for clone URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// Secure shell; needs a key registered with the forge.
    #[default]
    Ssh,
    /// HTTPS; read-only friendly, no key setup required.
    Https,
}

impl Protocol {
    /// Picks the record's URL for this transport.
    pub fn clone_url<'a>(&self, repo: &'a RepositoryRecord) -> &'a str {
        match self {
            Protocol::Ssh => &repo.ssh_url,
            Protocol::Https => &repo.clone_url,
        }
    }
}

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    /// User or organization whose repositories are listed
    pub owner: String,
    pub token: Option<String>,
    /// Destination directory; prompted for when absent
    pub destination: Option<PathBuf>,
    /// Language pre-filter applied before interactive selection
    pub language: Option<String>,
    pub protocol: Protocol,
    /// Materialize submodules after each clone
    pub recursive: bool,
    pub api_url: String,
    pub ssh_host: String,
}

impl RunConfiguration {
    /// Creates a configuration with defaults for everything but the owner.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            token: None,
            destination: None,
            language: None,
            protocol: Protocol::default(),
            recursive: true,
            api_url: DEFAULT_API_URL.to_string(),
            ssh_host: DEFAULT_SSH_HOST.to_string(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = non_empty(token);
        self
    }

    pub fn with_destination(mut self, destination: Option<PathBuf>) -> Self {
        self.destination = destination.filter(|d| !d.as_os_str().is_empty());
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = non_empty(language);
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_ssh_host(mut self, ssh_host: impl Into<String>) -> Self {
        self.ssh_host = ssh_host.into();
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
