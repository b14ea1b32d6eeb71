//! One participant's append-only guess history

use crate::core::{VerdictSequence, Word};
use thiserror::Error;

/// Turn cap shared by the human and the bot
pub const TURN_LIMIT: usize = 6;

/// A scored guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRecord {
    pub guess: Word,
    pub verdict: VerdictSequence,
}

impl GuessRecord {
    #[must_use]
    pub const fn new(guess: Word, verdict: VerdictSequence) -> Self {
        Self { guess, verdict }
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.verdict.is_solved()
    }
}

/// Why a record was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("track is already solved")]
    AlreadySolved,
    #[error("track already holds {} guesses", TURN_LIMIT)]
    Full,
}

/// Ordered guess history for one participant
///
/// Holds at most [`TURN_LIMIT`] records and nothing after a solved one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    records: Vec<GuessRecord>,
}

impl Track {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    ///
    /// # Errors
    ///
    /// Refuses the record if the track is already solved or full; the track is
    /// left unchanged.
    pub fn append(&mut self, record: GuessRecord) -> Result<(), TrackError> {
        if self.is_solved() {
            return Err(TrackError::AlreadySolved);
        }
        if self.records.len() >= TURN_LIMIT {
            return Err(TrackError::Full);
        }
        self.records.push(record);
        Ok(())
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.records.last().is_some_and(GuessRecord::is_solved)
    }

    #[must_use]
    pub fn turns_used(&self) -> usize {
        self.records.len()
    }

    /// Solved or out of turns
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.is_solved() || self.records.len() >= TURN_LIMIT
    }

    #[must_use]
    pub fn records(&self) -> &[GuessRecord] {
        &self.records
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
