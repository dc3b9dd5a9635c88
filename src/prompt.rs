//! Line-oriented console used for every question the harvest asks.
//!
//! On a terminal, yes/no questions and free-text prompts go through
//! `dialoguer`. When stdin is piped, the console falls back to reading plain
//! lines so the tool stays scriptable, and end of input is treated as an
//! empty answer.

use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use crate::error::Result;

/// Input and output streams plus whether a human is at a terminal.
pub struct Console<R, W> {
    pub input: R,
    pub out: W,
    interactive: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    /// The process's stdin and stdout. Uses dialoguer prompts only when
    /// both are terminals.
    ///
    /// Reads go through std's own stdin buffer so nothing typed ahead is held
    /// back from dialoguer.
    pub fn stdio() -> Self {
        let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
        Self::new(io::stdin().lock(), io::stdout(), interactive)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W, interactive: bool) -> Self {
        Self {
            input,
            out,
            interactive,
        }
    }

    /// Reads one trimmed line after showing `prompt`; `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if self.interactive {
            let answer: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;
            return Ok(Some(answer.trim().to_string()));
        }

        write!(self.out, "{}: ", prompt)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks a yes/no question that defaults to no.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.interactive {
            return Ok(Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()?);
        }

        let answer = self
            .read_line(&format!("{} (y/N)", prompt))?
            .unwrap_or_default()
            .to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
