//! # Forklift Library
//!
//! This library discovers the repositories an account owns on GitHub, lets
//! the user choose some of them interactively, and clones the chosen ones to
//! local disk, optionally with their submodules. It is used by the `forklift`
//! command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use forklift::forge::RepositoryRecord;
//! use forklift::selection::{parse_selection, select_dev};
//!
//! let repo = |name: &str, language: &str| RepositoryRecord {
//!     name: name.to_string(),
//!     description: String::new(),
//!     clone_url: format!("https://github.com/octocat/{}.git", name),
//!     ssh_url: format!("git@github.com:octocat/{}.git", name),
//!     language: language.to_string(),
//!     stars: 0,
//!     size: 0,
//! };
//! let repos = vec![repo("api", "Go"), repo("site", "HTML"), repo("cli", "Go")];
//!
//! // "2-3" picks the second and third entries (zero-based 1 and 2)
//! assert_eq!(parse_selection("2-3", repos.len()), vec![1, 2]);
//!
//! // "dev" drops documentation and web repositories
//! let dev: Vec<_> = select_dev(&repos).into_iter().map(|r| r.name).collect();
//! assert_eq!(dev, vec!["api", "cli"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Discovery (`forge`)**: The `RepositorySource` trait and its GitHub
//!   implementation, returning `RepositoryRecord` snapshots.
//! - **Selection (`selection`, `display`)**: The selection language (numbers,
//!   ranges, `all`, `dev`, language names) and the listing it works on.
//! - **Harvesting (`harvester`)**: Cloning through the system `git`, with
//!   submodules.
//! - **Run control (`runner`, `config`, `setup`, `destination`, `prompt`)**:
//!   Sequencing a run from the SSH check to the last clone.

pub mod config;
pub mod destination;
pub mod display;
pub mod error;
pub mod forge;
pub mod harvester;
pub mod output;
pub mod prompt;
pub mod runner;
pub mod selection;
pub mod setup;

#[cfg(test)]
mod selection_proptest;
