//! # Output Configuration
//!
//! Controls how harvest progress is rendered: colored status markers on a
//! capable terminal, plain bracketed markers everywhere else.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;

use console::Style;

/// Kinds of status line the harvest prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
    Warning,
}

impl Status {
    fn symbols(self) -> (&'static str, &'static str) {
        match self {
            Status::Success => ("✅", "[OK]"),
            Status::Failure => ("❌", "[FAILED]"),
            Status::Warning => ("⚠️ ", "[WARN]"),
        }
    }

    fn style(self) -> Style {
        match self {
            Status::Success => Style::new().green(),
            Status::Failure => Style::new().red().bold(),
            Status::Warning => Style::new().yellow(),
        }
    }
}

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `always` forces colors on (overriding `NO_COLOR`), `never` forces them
    /// off, anything else detects support from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// The marker printed in front of a status line.
    pub fn marker(&self, status: Status) -> &'static str {
        let (fancy, plain) = status.symbols();
        emoji(self, fancy, plain)
    }

    /// Formats `message` as a status line, colored when enabled.
    pub fn status(&self, status: Status, message: &str) -> String {
        let line = format!("{} {}", self.marker(status), message);
        if self.use_color {
            status.style().force_styling(true).apply_to(line).to_string()
        } else {
            line
        }
    }

    /// Emphasizes a heading, bold when colors are enabled.
    pub fn heading(&self, text: &str) -> String {
        if self.use_color {
            Style::new()
                .bold()
                .force_styling(true)
                .apply_to(text)
                .to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}
