//! Race orchestration
//!
//! A [`RaceController`] owns one session: the secret, the mode, both tracks
//! and the generation token. Presentation drives it through three commands
//! (`start`, `submit`, `set_mode`) and reads it through [`RaceSnapshot`].
//!
//! # Fencing
//!
//! Every `start()` bumps the generation. The autonomous loop captures the
//! generation it was launched with and re-checks it, under the session lock,
//! immediately before each track mutation. A loop from an older round
//! therefore stops at its next check and never writes into the new round.

mod bot;
mod controller;
mod error;
mod human;
#[cfg(test)]
pub(crate) mod testing;
mod track;

pub use controller::{DEFAULT_SAMPLE_BUDGET, RaceController, RaceSettings};
pub use error::RaceError;
pub use track::{GuessRecord, TURN_LIMIT, Track, TrackError};

use crate::core::{Mode, Word};
use std::fmt;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No secret committed, both tracks empty
    #[default]
    Idle,
    /// Fenced and cleared, waiting for the secret
    Starting,
    /// Secret committed, both tracks may receive records
    Running,
    /// Human track closed; bot track revealed and frozen
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Finished => "finished",
        })
    }
}

/// What the autonomous side of the current round is doing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BotStatus {
    #[default]
    Idle,
    Thinking,
    Solved,
    OutOfTurns,
    /// A collaborator call failed; the loop gave up for this round
    Failed(String),
    /// The round ended before the bot did
    Stopped,
}

impl BotStatus {
    /// The loop is no longer producing records
    #[must_use]
    pub const fn is_done(&self) -> bool {
        !matches!(self, Self::Idle | Self::Thinking)
    }
}

/// Result of [`RaceController::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The round is running under `generation`
    Started { generation: u64 },
    /// A later `start()` overtook this one; its secret was discarded
    Superseded,
}

/// Why a submission was dropped without effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Not exactly five characters after trimming
    WrongLength,
    NotRunning,
    TrackClosed,
    /// A restart happened while the guess was being scored
    Superseded,
}

/// Result of [`RaceController::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted {
        record: GuessRecord,
        /// This record ended the round
        finished: bool,
    },
    Ignored(IgnoreReason),
}

/// Read-only view of a session for presentation
///
/// Bot records and the secret are only present once the round is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceSnapshot {
    pub state: SessionState,
    pub mode: Mode,
    pub generation: u64,
    pub human: Vec<GuessRecord>,
    pub bot_turns: usize,
    pub bot_status: BotStatus,
    pub bot: Option<Vec<GuessRecord>>,
    pub secret: Option<Word>,
    pub last_error: Option<String>,
}

/// Who won a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceOutcome {
    Human,
    Bot,
    /// Both solved in the same number of turns
    Tie,
    Nobody,
}

impl RaceSnapshot {
    /// Winner by fewest turns to solve; `None` until the round is finished
    #[must_use]
    pub fn outcome(&self) -> Option<RaceOutcome> {
        let bot = self.bot.as_deref()?;
        let human_turns = self.human_solved().then_some(self.human.len());
        let bot_turns = self.bot_solved().then_some(bot.len());

        Some(match (human_turns, bot_turns) {
            (Some(h), Some(b)) if h < b => RaceOutcome::Human,
            (Some(h), Some(b)) if h > b => RaceOutcome::Bot,
            (Some(_), Some(_)) => RaceOutcome::Tie,
            (Some(_), None) => RaceOutcome::Human,
            (None, Some(_)) => RaceOutcome::Bot,
            (None, None) => RaceOutcome::Nobody,
        })
    }

    #[must_use]
    pub fn human_solved(&self) -> bool {
        self.human.last().is_some_and(GuessRecord::is_solved)
    }

    #[must_use]
    pub fn bot_solved(&self) -> bool {
        self.bot
            .as_deref()
            .and_then(<[GuessRecord]>::last)
            .is_some_and(GuessRecord::is_solved)
    }
}
