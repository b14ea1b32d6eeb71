//! Human turn handling

use super::track::GuessRecord;
use super::{IgnoreReason, RaceController, RaceError, SessionState, SubmitOutcome};
use crate::clients::{ScoringError, bounded};
use crate::core::{WORD_LENGTH, Word};
use tracing::{debug, info, warn};

impl RaceController {
    /// Score one human guess and append it to the human track
    ///
    /// Input of the wrong length, or a submission outside a running round, is
    /// ignored rather than rejected. The round finishes when the guess solves
    /// it or uses the last turn.
    ///
    /// # Errors
    ///
    /// [`RaceError::Scoring`] if the guess could not be scored. Nothing is
    /// appended and the caller may resubmit.
    pub async fn submit(&self, raw: &str) -> Result<SubmitOutcome, RaceError> {
        let input = raw.trim();
        if input.chars().count() != WORD_LENGTH {
            return Ok(SubmitOutcome::Ignored(IgnoreReason::WrongLength));
        }

        let (generation, secret) = {
            let session = self.lock();
            if session.state != SessionState::Running {
                return Ok(SubmitOutcome::Ignored(IgnoreReason::NotRunning));
            }
            if session.human.is_closed() {
                return Ok(SubmitOutcome::Ignored(IgnoreReason::TrackClosed));
            }
            let Some(secret) = session.secret.clone() else {
                return Ok(SubmitOutcome::Ignored(IgnoreReason::NotRunning));
            };
            (session.generation, secret)
        };

        let guess =
            Word::new(input).map_err(|e| ScoringError::Malformed(format!("{input:?}: {e}")))?;

        let scored = bounded(
            self.settings().call_timeout,
            self.collaborators().scorer.score(&guess, &secret),
            ScoringError::TimedOut,
        )
        .await;

        let verdict = match scored {
            Ok(verdict) => verdict,
            Err(e) => {
                let error = RaceError::from(e);
                warn!(generation, guess = %guess, error = %error, "human guess not scored");
                self.record_error(generation, &error);
                return Err(error);
            }
        };

        let record = GuessRecord::new(guess, verdict);
        let outcome = self.update(|session| {
            if session.generation != generation {
                return SubmitOutcome::Ignored(IgnoreReason::Superseded);
            }
            if session.state != SessionState::Running {
                return SubmitOutcome::Ignored(IgnoreReason::NotRunning);
            }
            if session.human.append(record.clone()).is_err() {
                return SubmitOutcome::Ignored(IgnoreReason::TrackClosed);
            }
            session.last_error = None;

            let finished = session.human.is_closed();
            if finished {
                session.finish();
            }
            SubmitOutcome::Accepted { record, finished }
        });

        match &outcome {
            SubmitOutcome::Accepted { record, finished } => {
                debug!(generation, guess = %record.guess, verdict = %record.verdict, "human guess");
                if *finished {
                    info!(generation, solved = record.is_solved(), "round finished");
                }
            }
            SubmitOutcome::Ignored(reason) => {
                debug!(generation, ?reason, "human guess dropped after scoring");
            }
        }
        Ok(outcome)
    }
}
