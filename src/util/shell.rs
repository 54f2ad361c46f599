//! Centralized shell output.
//!
//! The Shell provides a unified API for CLI status output: right-aligned
//! colored status prefixes in the usual build-tool style. Commands never
//! format or color messages themselves.

use std::fmt::Display;
use std::io::{self, IsTerminal};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    /// Default: status messages
    #[default]
    Normal,
    /// --verbose: status messages plus debug logging
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Finished,

    // In-progress statuses (cyan)
    Compiling,
    Packaging,
    Resolving,

    // Warning statuses (yellow)
    Warning,

    // Error status (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Compiling => "Compiling",
            Status::Packaging => "Packaging",
            Status::Resolving => "Resolving",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished => "\x1b[1;32m",
            Status::Compiling | Status::Packaging | Status::Resolving => "\x1b[1;36m",
            Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Alignment width for status prefixes.
const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
        }
    }

    /// Create a shell from CLI flags.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Shell::new(verbosity, color)
    }

    /// Check if shell is in quiet mode.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Check if shell is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`, to stderr.
    /// In quiet mode, only Error status is printed.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() && status != Status::Error {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Never)
    }
}
