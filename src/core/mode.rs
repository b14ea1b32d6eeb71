//! Play mode shared by both participants of a race

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Guess policy forwarded to the suggestion collaborator
///
/// The race core never interprets the mode; it only threads the selected
/// value through to every suggestion request of a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Any well-formed guess may be suggested
    #[default]
    #[serde(rename = "easy", alias = "permissive")]
    Permissive,
    /// Suggestions must stay consistent with every verdict so far
    #[serde(rename = "hard", alias = "constrained")]
    Constrained,
}

impl Mode {
    /// Wire name used by the remote suggestion service
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permissive => "easy",
            Self::Constrained => "hard",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Permissive => Self::Constrained,
            Self::Constrained => Self::Permissive,
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "permissive" => Ok(Self::Permissive),
            "hard" | "constrained" => Ok(Self::Constrained),
            other => Err(format!("unknown mode {other:?} (expected easy or hard)")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
