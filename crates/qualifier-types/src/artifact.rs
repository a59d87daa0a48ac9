//! Query artifacts and the parity choice between them.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which of the two precomputed artifacts was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactChoice {
    /// Odd identifiers.
    A,
    /// Even identifiers.
    B,
}

impl fmt::Display for ArtifactChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactChoice::A => write!(f, "A"),
            ArtifactChoice::B => write!(f, "B"),
        }
    }
}

/// Detailed outcome of the selector, kept for dry-run reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Every digit of the identifier, in order.
    pub digits: String,
    /// The trailing digits that were parsed (at most two).
    pub suffix: String,
    pub value: u32,
    pub choice: ArtifactChoice,
}

/// A loaded artifact: trimmed text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub choice: ArtifactChoice,
    pub source: PathBuf,
    pub content: String,
}

impl Artifact {
    /// Wrap raw resource text, trimming surrounding whitespace.
    pub fn from_raw(choice: ArtifactChoice, source: PathBuf, raw: &str) -> Self {
        Self {
            choice,
            source,
            content: raw.trim().to_string(),
        }
    }
}
