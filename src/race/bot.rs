//! Autonomous loop driver

use super::track::{GuessRecord, TURN_LIMIT};
use super::{RaceController, RaceError};
use crate::clients::{ScoringError, SuggestionError, bounded};
use crate::core::{Mode, Word};
use tracing::{debug, info, warn};

/// Play one round against `secret` until solved, out of turns or fenced out
///
/// The loop keeps its own history and never reads the human track. Liveness
/// is checked after every suspension point and again, atomically, when the
/// record is appended.
pub(super) async fn run(controller: RaceController, secret: Word, mode: Mode, generation: u64) {
    let settings = *controller.settings();
    let collaborators = controller.collaborators().clone();
    let mut history: Vec<GuessRecord> = Vec::with_capacity(TURN_LIMIT);

    for turn in 1..=TURN_LIMIT {
        if !controller.is_live(generation) {
            debug!(generation, turn, "bot fenced out");
            return;
        }

        let suggested = bounded(
            settings.call_timeout,
            collaborators
                .suggester
                .suggest(&history, mode, settings.sample_budget),
            SuggestionError::TimedOut,
        )
        .await;
        let guess = match suggested {
            Ok(guess) => guess,
            Err(e) => return give_up(&controller, generation, turn, &e.into()),
        };

        if !controller.is_live(generation) {
            debug!(generation, turn, "bot fenced out after suggestion");
            return;
        }

        let scored = bounded(
            settings.call_timeout,
            collaborators.scorer.score(&guess, &secret),
            ScoringError::TimedOut,
        )
        .await;
        let verdict = match scored {
            Ok(verdict) => verdict,
            Err(e) => return give_up(&controller, generation, turn, &e.into()),
        };

        let record = GuessRecord::new(guess, verdict);
        debug!(generation, turn, guess = %record.guess, verdict = %record.verdict, "bot guess");
        let solved = record.is_solved();
        if !controller.append_bot(generation, record.clone()) {
            if solved {
                info!(generation, turns = turn, "bot solved");
            } else if turn == TURN_LIMIT {
                info!(generation, "bot out of turns");
            } else {
                debug!(generation, turn, "bot fenced out at append");
            }
            return;
        }
        history.push(record);
    }
}

fn give_up(controller: &RaceController, generation: u64, turn: usize, error: &RaceError) {
    warn!(generation, turn, error = %error, "bot stopped");
    controller.bot_failed(generation, error);
}
