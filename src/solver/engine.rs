//! In-process suggestion engine

use super::expected::{expected_remaining, select_best_guess};
use crate::core::{Mode, VerdictSequence, Word};
use crate::race::GuessRecord;
use rand::Rng;
use rand::seq::IndexedRandom;
use rustc_hash::FxHashSet;
use std::num::NonZeroU32;

/// Candidates evaluated per guess, at most
const EVAL_CAP: usize = 600;

/// Smallest permissive guess pool before candidates are added
const MIN_POOL: usize = 100;

/// Outcome of one suggestion request
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub guess: Word,
    /// Candidates consistent with the history before this guess
    pub candidates: usize,
    /// Expected candidates left after playing `guess`
    pub expected_remaining: f64,
}

/// Suggests guesses from a fixed guess pool and answer list
pub struct Solver {
    guess_pool: Vec<Word>,
    answers: Vec<Word>,
}

impl Solver {
    /// Create a solver over the given word lists
    ///
    /// # Parameters
    /// - `guess_pool`: words the solver may guess in permissive mode
    /// - `answers`: words that may be the secret
    #[must_use]
    pub const fn new(guess_pool: Vec<Word>, answers: Vec<Word>) -> Self {
        Self {
            guess_pool,
            answers,
        }
    }

    /// Answers consistent with every record in `history`
    #[must_use]
    pub fn candidates(&self, history: &[GuessRecord]) -> Vec<&Word> {
        self.answers
            .iter()
            .filter(|&candidate| {
                history
                    .iter()
                    .all(|record| VerdictSequence::score(&record.guess, candidate) == record.verdict)
            })
            .collect()
    }

    #[must_use]
    pub fn count_candidates(&self, history: &[GuessRecord]) -> usize {
        self.candidates(history).len()
    }

    /// Suggest the next guess for `history`
    ///
    /// Constrained mode only guesses candidates. Permissive mode samples up to
    /// `min(sample_budget, max(100, n/2))` words from the guess pool and adds
    /// every candidate. Returns `None` when no candidate is consistent with
    /// the history.
    pub fn suggest<R: Rng + ?Sized>(
        &self,
        history: &[GuessRecord],
        mode: Mode,
        sample_budget: NonZeroU32,
        rng: &mut R,
    ) -> Option<Suggestion> {
        let candidates = self.candidates(history);
        let total = candidates.len();

        if total <= 1 {
            return candidates.first().map(|&only| Suggestion {
                guess: only.clone(),
                candidates: 1,
                expected_remaining: 1.0,
            });
        }

        let candidate_set: FxHashSet<&Word> = candidates.iter().copied().collect();

        let pool: Vec<&Word> = match mode {
            Mode::Constrained => candidates.clone(),
            Mode::Permissive => {
                let budget = usize::try_from(sample_budget.get()).unwrap_or(usize::MAX);
                let limit = budget.min(MIN_POOL.max(total / 2));

                let mut pool: Vec<&Word> = if self.guess_pool.len() > limit {
                    self.guess_pool.choose_multiple(rng, limit).collect()
                } else {
                    self.guess_pool.iter().collect()
                };
                let sampled: FxHashSet<&Word> = pool.iter().copied().collect();
                pool.extend(candidates.iter().copied().filter(|c| !sampled.contains(c)));
                pool
            }
        };

        let sample: Vec<&Word> = if total > EVAL_CAP {
            candidates.choose_multiple(rng, EVAL_CAP).copied().collect()
        } else {
            candidates.clone()
        };

        let (best, _) = select_best_guess(&pool, &sample, total, &candidate_set)?;

        Some(Suggestion {
            guess: best.clone(),
            candidates: total,
            expected_remaining: expected_remaining(best, &candidates, total),
        })
    }
}
