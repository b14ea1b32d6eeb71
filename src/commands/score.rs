//! One-off scoring through the configured backend

use super::with_spinner;
use crate::clients::{ScoringClient, ScoringError, bounded};
use crate::core::{VerdictSequence, Word};
use anyhow::{Context, Result};
use std::time::Duration;

/// Score `guess` against `secret`
///
/// # Errors
///
/// Returns an error if either word is malformed or the scorer fails.
pub async fn score_guess(
    scorer: &dyn ScoringClient,
    guess: &str,
    secret: &str,
    limit: Option<Duration>,
) -> Result<(Word, VerdictSequence)> {
    let guess = Word::new(guess).with_context(|| format!("invalid guess {guess:?}"))?;
    let secret = Word::new(secret).with_context(|| format!("invalid secret {secret:?}"))?;

    let verdict = with_spinner(
        "Scoring...",
        bounded(limit, scorer.score(&guess, &secret), ScoringError::TimedOut),
    )
    .await?;
    Ok((guess, verdict))
}
