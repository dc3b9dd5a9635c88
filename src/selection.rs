//! # Interactive Selection
//!
//! Lets the user pick which discovered repositories to harvest. Each input
//! line is interpreted, in priority order, as:
//!
//! 1. an empty line: finish with what has been picked so far;
//! 2. `all`: take every repository currently listed;
//! 3. `dev`: take the repositories that look like development projects
//!    (see [`select_dev`]);
//! 4. a language name matching at least one listed repository
//!    (case-insensitive): narrow the listing to that language and start over;
//! 5. a comma-separated list of 1-based numbers and `a-b` ranges, added to the
//!    picks. Malformed or out-of-range parts are skipped.
//!
//! Because a language match is tried before numbers, a repository whose
//! language is literally a numeral shadows that number.
//!
//! Picks keep the order they were added in and are de-duplicated by name.

use std::io::{BufRead, Write};

use log::debug;

use crate::display;
use crate::error::Result;
use crate::forge::RepositoryRecord;
use crate::output::OutputConfig;

/// Name and description fragments that mark a repository as not being a
/// development project.
const NON_DEV_KEYWORDS: &[&str] = &["docs", "documentation", "website", "blog", "awesome-"];

/// Languages that mark a repository as not being a development project.
const NON_DEV_LANGUAGES: &[&str] = &["html", "css"];

/// What one line of selection input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCommand {
    /// Stop and return the picks so far.
    Finish,
    /// Return every listed repository.
    All,
    /// Return the development-project subset.
    Dev,
    /// Restart on the repositories written in `query`'s language.
    Language {
        query: String,
        matches: Vec<RepositoryRecord>,
    },
    /// Add the repositories at these zero-based positions.
    Indices(Vec<usize>),
}

/// Interprets one line against the currently listed repositories.
pub fn interpret(line: &str, candidates: &[RepositoryRecord]) -> SelectionCommand {
    let line = line.trim();
    match line {
        "" => SelectionCommand::Finish,
        "all" => SelectionCommand::All,
        "dev" => SelectionCommand::Dev,
        _ => {
            let matches = filter_by_language(candidates, line);
            if matches.is_empty() {
                SelectionCommand::Indices(parse_selection(line, candidates.len()))
            } else {
                SelectionCommand::Language {
                    query: line.to_string(),
                    matches,
                }
            }
        }
    }
}

/// Parses numbers and ranges into zero-based indices, in input order.
///
/// `max_len` is the size of the listing; anything outside `1..=max_len` is
/// dropped, as is any part that is not a number or a well-formed range.
pub fn parse_selection(input: &str, max_len: usize) -> Vec<usize> {
    let mut indices = Vec::new();

    for part in input.split(',') {
        let part = part.trim();

        if part.contains('-') {
            let bounds: Vec<&str> = part.split('-').collect();
            if bounds.len() != 2 {
                continue;
            }
            let (Ok(start), Ok(end)) = (
                bounds[0].trim().parse::<usize>(),
                bounds[1].trim().parse::<usize>(),
            ) else {
                continue;
            };
            if start >= 1 && start <= end && end <= max_len {
                indices.extend(start - 1..end);
            }
        } else if let Ok(number) = part.parse::<usize>() {
            if number >= 1 && number <= max_len {
                indices.push(number - 1);
            }
        }
    }

    indices
}

/// Repositories whose language equals `language`, ignoring case.
pub fn filter_by_language(repos: &[RepositoryRecord], language: &str) -> Vec<RepositoryRecord> {
    let target = language.trim().to_lowercase();
    repos
        .iter()
        .filter(|repo| repo.language.to_lowercase() == target)
        .cloned()
        .collect()
}

/// Whether a repository looks like a development project rather than docs,
/// a website, a blog or a curated list.
pub fn is_dev_repository(repo: &RepositoryRecord) -> bool {
    let name = repo.name.to_lowercase();
    let description = repo.description.to_lowercase();
    let language = repo.language.to_lowercase();

    let has_keyword = NON_DEV_KEYWORDS
        .iter()
        .any(|keyword| name.contains(keyword) || description.contains(keyword));

    !has_keyword && !NON_DEV_LANGUAGES.contains(&language.as_str())
}

/// The development-project subset, in listing order.
pub fn select_dev(repos: &[RepositoryRecord]) -> Vec<RepositoryRecord> {
    repos
        .iter()
        .filter(|repo| is_dev_repository(repo))
        .cloned()
        .collect()
}

/// Repositories picked so far in one selection session.
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    chosen: Vec<RepositoryRecord>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `repo` unless one with the same name is already picked.
    ///
    /// Returns `false` when it was already there.
    pub fn add(&mut self, repo: &RepositoryRecord) -> bool {
        if self.contains(&repo.name) {
            return false;
        }
        self.chosen.push(repo.clone());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.chosen.iter().any(|chosen| chosen.name == name)
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn into_vec(self) -> Vec<RepositoryRecord> {
        self.chosen
    }
}

/// Runs the interactive selection over `repos`.
///
/// Lines are read from `input` until one ends the session; end of input
/// counts as an empty line. The listing and all feedback go to `out`.
pub fn select_repositories<R: BufRead, W: Write>(
    repos: &[RepositoryRecord],
    input: &mut R,
    out: &mut W,
    output: &OutputConfig,
) -> Result<Vec<RepositoryRecord>> {
    let mut candidates = repos.to_vec();

    'listing: loop {
        display::write_listing(out, output, &candidates)?;
        let mut state = SelectionState::new();

        loop {
            write!(out, "\nEnter your harvest selection: ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(state.into_vec());
            }

            match interpret(&line, &candidates) {
                SelectionCommand::Finish => return Ok(state.into_vec()),
                SelectionCommand::All => return Ok(candidates),
                SelectionCommand::Dev => {
                    let dev = select_dev(&candidates);
                    writeln!(
                        out,
                        "Selected {} repositories that appear to be development projects",
                        dev.len()
                    )?;
                    return Ok(dev);
                }
                SelectionCommand::Language { query, matches } => {
                    writeln!(out, "Filtered to {} {} repositories", matches.len(), query)?;
                    debug!("restarting selection on {} {} repositories", matches.len(), query);
                    candidates = matches;
                    continue 'listing;
                }
                SelectionCommand::Indices(indices) => {
                    for index in indices {
                        let repo = &candidates[index];
                        if state.add(repo) {
                            writeln!(out, "  Added to harvest: {} ({})", repo.name, repo.language)?;
                        } else {
                            writeln!(out, "  Already selected: {}", repo.name)?;
                        }
                    }
                    if !state.is_empty() {
                        writeln!(
                            out,
                            "\nCurrently selected {} repositories for harvest.",
                            state.len()
                        )?;
                    }
                }
            }
        }
    }
}
