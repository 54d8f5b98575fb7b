//! Output verbosity levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much diagnostic output the tool produces.
///
/// Levels are ordered: `Quiet < Minimal < Normal < Verbose < Diagnostic`,
/// so callers can gate output with a comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// No output except errors.
    Quiet,
    /// Only warnings and the final result.
    Minimal,
    /// Standard output.
    #[default]
    Normal,
    /// Extra progress detail.
    Verbose,
    /// Everything, including tool argument lines.
    Diagnostic,
}

impl Verbosity {
    /// Canonical lowercase name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Minimal => "minimal",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a verbosity string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verbosity '{0}' (expected quiet, minimal, normal, verbose or diagnostic)")]
pub struct ParseVerbosityError(pub String);

impl FromStr for Verbosity {
    type Err = ParseVerbosityError;

    /// Parses a level name. Single-letter abbreviations are accepted and
    /// matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "q" | "quiet" => Ok(Verbosity::Quiet),
            "m" | "minimal" => Ok(Verbosity::Minimal),
            "n" | "normal" => Ok(Verbosity::Normal),
            "v" | "verbose" => Ok(Verbosity::Verbose),
            "d" | "diagnostic" => Ok(Verbosity::Diagnostic),
            other => Err(ParseVerbosityError(other.to_string())),
        }
    }
}
