//! In-process collaborators
//!
//! Used for offline play and as deterministic stand-ins in tests.

use super::{ScoringClient, SecretSupplier, SuggestionClient};
use super::{ScoringError, SuggestionError, SupplyError};
use crate::core::{Mode, VerdictSequence, Word};
use crate::race::GuessRecord;
use crate::solver::{Solver, Suggestion};
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// Draws a uniformly random secret from a word list
pub struct WordListSecrets {
    answers: Vec<Word>,
}

impl WordListSecrets {
    #[must_use]
    pub const fn new(answers: Vec<Word>) -> Self {
        Self { answers }
    }
}

#[async_trait]
impl SecretSupplier for WordListSecrets {
    async fn fetch_secret(&self) -> Result<Word, SupplyError> {
        self.answers
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| SupplyError::Unavailable("answer list is empty".to_string()))
    }
}

/// Always supplies the same secret (practice rounds)
pub struct FixedSecret(pub Word);

#[async_trait]
impl SecretSupplier for FixedSecret {
    async fn fetch_secret(&self) -> Result<Word, SupplyError> {
        Ok(self.0.clone())
    }
}

/// Scores with the standard duplicate-aware rules
pub struct LocalScorer;

#[async_trait]
impl ScoringClient for LocalScorer {
    async fn score(&self, guess: &Word, secret: &Word) -> Result<VerdictSequence, ScoringError> {
        Ok(VerdictSequence::score(guess, secret))
    }
}

/// Runs the expected-remaining solver off the async thread
pub struct LocalSuggester {
    solver: Arc<Solver>,
}

impl LocalSuggester {
    #[must_use]
    pub fn new(guess_pool: Vec<Word>, answers: Vec<Word>) -> Self {
        Self {
            solver: Arc::new(Solver::new(guess_pool, answers)),
        }
    }

    /// Full suggestion including candidate statistics
    pub async fn suggestion(
        &self,
        history: &[GuessRecord],
        mode: Mode,
        sample_budget: NonZeroU32,
    ) -> Result<Suggestion, SuggestionError> {
        let solver = Arc::clone(&self.solver);
        let history = history.to_vec();

        let suggestion = tokio::task::spawn_blocking(move || {
            solver.suggest(&history, mode, sample_budget, &mut rand::rng())
        })
        .await
        .map_err(|e| SuggestionError::Transport(format!("solver task failed: {e}")))?
        .ok_or(SuggestionError::NoCandidates)?;

        debug!(
            guess = %suggestion.guess,
            candidates = suggestion.candidates,
            expected = suggestion.expected_remaining,
            "local suggestion"
        );
        Ok(suggestion)
    }
}

#[async_trait]
impl SuggestionClient for LocalSuggester {
    async fn suggest(
        &self,
        history: &[GuessRecord],
        mode: Mode,
        sample_budget: NonZeroU32,
    ) -> Result<Word, SuggestionError> {
        self.suggestion(history, mode, sample_budget)
            .await
            .map(|s| s.guess)
    }
}
