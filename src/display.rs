//! # Listing Display
//!
//! Renders a candidate collection for the interactive selection: a
//! language-frequency histogram followed by a numbered listing with the
//! language, star count and a shortened description of every repository.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::forge::{RepositoryRecord, UNKNOWN_LANGUAGE};
use crate::output::OutputConfig;

/// Descriptions longer than this are shortened.
const DESCRIPTION_LIMIT: usize = 50;

/// Characters kept when a description is shortened, before the ellipsis.
const DESCRIPTION_KEEP: usize = 47;

/// Instructions printed under the listing.
pub const SELECTION_HELP: &str = "\
Harvest selection options:
  - Enter numbers separated by commas (e.g., 1,3,5)
  - Enter ranges (e.g., 1-5)
  - Enter 'all' to harvest all repositories
  - Enter 'dev' to select only development repositories
  - Enter a language name (e.g., 'go', 'python') to filter by language
  - Press Enter to finish selection";

/// Number of repositories per language, most common first.
///
/// Languages with equal counts are ordered by name so the output is stable.
pub fn language_stats(repos: &[RepositoryRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for repo in repos {
        let language = if repo.language.is_empty() {
            UNKNOWN_LANGUAGE
        } else {
            repo.language.as_str()
        };
        *counts.entry(language).or_default() += 1;
    }

    let mut stats: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(language, count)| (language.to_string(), count))
        .collect();
    stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    stats
}

/// `★N` below a thousand, `★N.Nk` from a thousand on, nothing for zero.
pub fn format_stars(stars: u64) -> String {
    match stars {
        0 => String::new(),
        1..=999 => format!("★{}", stars),
        _ => format!("★{:.1}k", stars as f64 / 1000.0),
    }
}

/// Shortens long descriptions and substitutes a placeholder for empty ones.
pub fn truncate_description(description: &str) -> String {
    if description.is_empty() {
        return "No description available".to_string();
    }
    if description.chars().count() > DESCRIPTION_LIMIT {
        let kept: String = description.chars().take(DESCRIPTION_KEEP).collect();
        format!("{}...", kept)
    } else {
        description.to_string()
    }
}

/// One numbered listing row; `index` is zero-based.
pub fn format_listing_line(index: usize, repo: &RepositoryRecord) -> String {
    let language = if repo.language.is_empty() {
        UNKNOWN_LANGUAGE
    } else {
        repo.language.as_str()
    };
    format!(
        "{:2}. {:<25} {:<12} {:<8} {}",
        index + 1,
        repo.name,
        language,
        format_stars(repo.stars),
        truncate_description(&repo.description)
    )
}

/// Writes the language histogram.
pub fn write_language_stats<W: Write>(
    out: &mut W,
    output: &OutputConfig,
    repos: &[RepositoryRecord],
) -> io::Result<()> {
    writeln!(out, "{}", output.heading("Language distribution:"))?;
    for (language, count) in language_stats(repos) {
        let noun = if count == 1 {
            "repository"
        } else {
            "repositories"
        };
        writeln!(out, "   {}: {} {}", language, count, noun)?;
    }
    Ok(())
}

/// Writes the histogram, the numbered listing and the selection help.
pub fn write_listing<W: Write>(
    out: &mut W,
    output: &OutputConfig,
    repos: &[RepositoryRecord],
) -> io::Result<()> {
    writeln!(out)?;
    write_language_stats(out, output, repos)?;
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        output.heading(&format!("Found {} repositories in the commons:", repos.len()))
    )?;
    writeln!(out)?;
    for (index, repo) in repos.iter().enumerate() {
        writeln!(out, "{}", format_listing_line(index, repo))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", SELECTION_HELP)?;
    Ok(())
}
