//! Parity-based artifact selection.
//!
//! Pure: no I/O, and the same identifier always yields the same choice.

use qualifier_types::artifact::{ArtifactChoice, Selection};
use qualifier_types::error::SelectorError;

/// Pick an artifact from a registration identifier.
///
/// Keeps the ASCII digits of `identifier`, parses the last two (or the only
/// one), and maps odd to [`ArtifactChoice::A`] and even to [`ArtifactChoice::B`].
pub fn select_artifact(identifier: &str) -> Result<ArtifactChoice, SelectorError> {
    explain_selection(identifier).map(|selection| selection.choice)
}

/// Like [`select_artifact`], but returns the intermediate digits as well.
pub fn explain_selection(identifier: &str) -> Result<Selection, SelectorError> {
    let digits: String = identifier.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(SelectorError::NoDigits {
            identifier: identifier.to_string(),
        });
    }

    // Digits are ASCII, so byte slicing is on char boundaries.
    let suffix = &digits[digits.len().saturating_sub(2)..];
    let value = suffix
        .bytes()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));

    let choice = if value % 2 == 1 {
        ArtifactChoice::A
    } else {
        ArtifactChoice::B
    };

    Ok(Selection {
        suffix: suffix.to_string(),
        digits,
        value,
        choice,
    })
}
