//! Resolves the directory repositories are harvested into.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::prompt::Console;

const PROMPT: &str =
    "Enter destination directory for your harvest (or press Enter for current directory)";

/// Expands a leading `~/` to `home`. Other inputs are returned unchanged.
pub fn expand_home(input: &str, home: Option<&Path>) -> PathBuf {
    match (input.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(input),
    }
}

/// Creates `path` (and its parents) if needed.
pub fn ensure_directory(path: &Path) -> Result<PathBuf> {
    fs::create_dir_all(path).map_err(|source| Error::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

/// Asks for a destination until one can be created.
///
/// An empty answer, or end of input, selects the current directory.
pub fn prompt_destination<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<PathBuf> {
    let home = dirs::home_dir();

    loop {
        writeln!(console.out)?;
        let answer = console.read_line(PROMPT)?.unwrap_or_default();
        if answer.is_empty() {
            return Ok(std::env::current_dir()?);
        }

        let expanded = expand_home(&answer, home.as_deref());
        let absolute = match std::path::absolute(&expanded) {
            Ok(path) => path,
            Err(e) => {
                writeln!(console.out, "Invalid path: {}", e)?;
                continue;
            }
        };

        match ensure_directory(&absolute) {
            Ok(path) => {
                debug!("harvest destination: {}", path.display());
                return Ok(path);
            }
            Err(e) => writeln!(console.out, "{}", e)?,
        }
    }
}
