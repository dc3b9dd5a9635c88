//! # Repository Discovery
//!
//! This module lists the repositories an account owns on the forge. The
//! rest of the application only sees the [`RepositorySource`] trait and the
//! [`RepositoryRecord`] snapshots it returns, so the interactive selection and
//! the clone loop can be driven by an in-memory source in tests.
//!
//! [`GitHubClient`] is the production source. It pages through
//! `GET /users/{owner}/repos` (most recently updated first), following the
//! `Link: <...>; rel="next"` header until the last page, and drops forks.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Language recorded when the forge could not detect one.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Default GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repositories requested per page (the API maximum).
const PER_PAGE: u32 = 100;

/// An immutable snapshot of one repository as returned by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub name: String,
    pub description: String,
    /// HTTPS clone URL
    pub clone_url: String,
    /// SSH clone URL
    pub ssh_url: String,
    pub language: String,
    pub stars: u64,
    /// Size in KB as reported by the forge
    pub size: u64,
}

/// Trait for repository discovery - allows driving the run from memory in tests
pub trait RepositorySource {
    /// Lists the owner's repositories, most recently updated first, forks excluded.
    fn discover(&self, owner: &str) -> Result<Vec<RepositoryRecord>>;
}

/// Repository payload as the GitHub REST API serializes it.
#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    #[serde(default)]
    description: Option<String>,
    clone_url: String,
    ssh_url: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    fork: bool,
}

impl From<ApiRepository> for RepositoryRecord {
    fn from(repo: ApiRepository) -> Self {
        let language = repo
            .language
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

        Self {
            name: repo.name,
            description: repo.description.unwrap_or_default(),
            clone_url: repo.clone_url,
            ssh_url: repo.ssh_url,
            language,
            stars: repo.stargazers_count,
            size: repo.size,
        }
    }
}

/// Converts one page of API results, skipping forks.
fn records_from_page(page: Vec<ApiRepository>) -> Vec<RepositoryRecord> {
    page.into_iter()
        .filter(|repo| !repo.fork)
        .map(RepositoryRecord::from)
        .collect()
}

/// Extracts the `rel="next"` target from a `Link` response header.
pub fn next_page_url(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| param.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

/// Builds the first-page URL for an owner's repository listing.
pub fn first_page_url(api_url: &str, owner: &str) -> Result<Url> {
    let mut url = Url::parse(api_url)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(["users", owner, "repos"]);
    url.query_pairs_mut()
        .append_pair("per_page", &PER_PAGE.to_string())
        .append_pair("sort", "updated")
        .append_pair("direction", "desc");
    Ok(url)
}

/// Discovery against the GitHub REST API.
pub struct GitHubClient {
    client: Client,
    api_url: String,
}

impl GitHubClient {
    /// Creates a client for `api_url`. Without a token only public
    /// repositories are visible and the anonymous rate limit applies.
    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                    Error::Network {
                        url: api_url.to_string(),
                        message: format!("invalid token: {}", e),
                    }
                })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(concat!("forklift/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Network {
                url: api_url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    fn fetch_page(&self, owner: &str, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(|e| Error::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().unwrap_or_default();
        let hint = match status.as_u16() {
            404 => Some(format!("No user or organization named '{}' was found", owner)),
            401 => Some("The token was rejected; check that it is valid".to_string()),
            403 | 429 => {
                Some("The API rate limit may be exhausted; pass --token to raise it".to_string())
            }
            _ => None,
        };
        Err(Error::Api {
            owner: owner.to_string(),
            status: status.as_u16(),
            message,
            hint,
        })
    }

    fn collect_pages(&self, owner: &str, spinner: &ProgressBar) -> Result<Vec<RepositoryRecord>> {
        let mut records = Vec::new();
        let mut next = Some(first_page_url(&self.api_url, owner)?.to_string());
        let mut page_number = 0;

        while let Some(url) = next {
            page_number += 1;
            spinner.set_message(format!(
                "Fetching page {} of {}'s repositories",
                page_number, owner
            ));

            let response = self.fetch_page(owner, &url)?;
            next = response
                .headers()
                .get(header::LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_page_url);

            let page: Vec<ApiRepository> = response.json().map_err(|e| Error::Network {
                url: url.clone(),
                message: format!("unexpected response body: {}", e),
            })?;
            debug!("page {} returned {} repositories", page_number, page.len());
            records.extend(records_from_page(page));
        }

        Ok(records)
    }
}

impl RepositorySource for GitHubClient {
    fn discover(&self, owner: &str) -> Result<Vec<RepositoryRecord>> {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.collect_pages(owner, &spinner);
        spinner.finish_and_clear();
        result
    }
}
