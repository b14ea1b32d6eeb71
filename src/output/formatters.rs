//! Formatting utilities for terminal output

use crate::core::{Verdict, VerdictSequence, Word};
use crate::race::TURN_LIMIT;
use colored::{ColoredString, Colorize};

/// One letter as a colored tile
#[must_use]
pub fn tile(letter: char, verdict: Verdict) -> ColoredString {
    let text = format!(" {} ", letter.to_ascii_uppercase()).bold();
    match verdict {
        Verdict::Hit => text.black().on_green(),
        Verdict::Present => text.black().on_yellow(),
        Verdict::Miss => text.white().on_bright_black(),
    }
}

/// A scored guess as a row of colored tiles
#[must_use]
pub fn verdict_row(guess: &Word, verdict: &VerdictSequence) -> String {
    guess
        .text()
        .chars()
        .zip(verdict.verdicts())
        .map(|(letter, &v)| tile(letter, v).to_string())
        .collect()
}

/// A hidden bot row: played but not yet revealed
#[must_use]
pub fn redacted_row() -> String {
    "   ".on_bright_black().to_string().repeat(crate::core::WORD_LENGTH)
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max) * width as f64) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Turns used out of the turn limit as a bar
#[must_use]
pub fn turns_bar(turns: usize, width: usize) -> String {
    create_progress_bar(turns as f64, TURN_LIMIT as f64, width)
}

/// "1 guess" / "3 guesses"
#[must_use]
pub fn plural_guesses(count: usize) -> String {
    if count == 1 {
        "1 guess".to_string()
    } else {
        format!("{count} guesses")
    }
}
