//! Session authority: lifecycle, secret, mode and generation token

use super::track::{GuessRecord, Track};
use super::{BotStatus, RaceError, RaceSnapshot, SessionState, StartOutcome, bot};
use crate::clients::{Collaborators, SupplyError, bounded};
use crate::core::{Mode, Word};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Sample budget forwarded to the suggestion collaborator by default
pub const DEFAULT_SAMPLE_BUDGET: NonZeroU32 = match NonZeroU32::new(800) {
    Some(budget) => budget,
    None => unreachable!(),
};

/// Per-round knobs fixed at controller construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceSettings {
    /// Mode of the first round; later rounds keep whatever `set_mode` chose
    pub mode: Mode,
    pub sample_budget: NonZeroU32,
    /// Bound on every collaborator call; `None` waits indefinitely
    pub call_timeout: Option<Duration>,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            sample_budget: DEFAULT_SAMPLE_BUDGET,
            call_timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Mutable session state, only touched under the lock
#[derive(Debug, Default)]
pub(super) struct Session {
    pub(super) state: SessionState,
    pub(super) mode: Mode,
    pub(super) generation: u64,
    pub(super) secret: Option<Word>,
    pub(super) human: Track,
    pub(super) bot: Track,
    pub(super) bot_status: BotStatus,
    pub(super) last_error: Option<String>,
}

impl Session {
    /// A loop or submission tagged `generation` may still write
    pub(super) fn is_live(&self, generation: u64) -> bool {
        self.generation == generation && self.state == SessionState::Running
    }

    /// Close the round after a human record
    pub(super) fn finish(&mut self) {
        self.state = SessionState::Finished;
        if !self.bot_status.is_done() {
            self.bot_status = BotStatus::Stopped;
        }
    }
}

struct Shared {
    session: Mutex<Session>,
    collaborators: Collaborators,
    settings: RaceSettings,
    revision: watch::Sender<u64>,
}

/// Handle to one race session
///
/// Cheap to clone; all clones drive the same session. The lock is never held
/// across an `.await`.
#[derive(Clone)]
pub struct RaceController {
    shared: Arc<Shared>,
}

impl RaceController {
    #[must_use]
    pub fn new(collaborators: Collaborators, settings: RaceSettings) -> Self {
        let session = Session {
            mode: settings.mode,
            ..Session::default()
        };
        let (revision, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                collaborators,
                settings,
                revision,
            }),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &RaceSettings {
        &self.shared.settings
    }

    pub(super) fn collaborators(&self) -> &Collaborators {
        &self.shared.collaborators
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, Session> {
        // Transitions are single assignments, so a poisoned session is still coherent
        self.shared
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the session and notify watchers
    pub(super) fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let result = f(&mut self.lock());
        self.shared.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
        result
    }

    /// Revision counter bumped on every mutation
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.lock().mode
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Consistent view of the session
    #[must_use]
    pub fn snapshot(&self) -> RaceSnapshot {
        let session = self.lock();
        let finished = session.state == SessionState::Finished;
        RaceSnapshot {
            state: session.state,
            mode: session.mode,
            generation: session.generation,
            human: session.human.records().to_vec(),
            bot_turns: session.bot.turns_used(),
            bot_status: session.bot_status.clone(),
            bot: finished.then(|| session.bot.records().to_vec()),
            secret: session.secret.clone().filter(|_| finished),
            last_error: session.last_error.clone(),
        }
    }

    /// Begin a new round
    ///
    /// Fences out any loop still running, clears both tracks, fetches a
    /// secret and launches the autonomous loop for the new generation.
    ///
    /// # Errors
    ///
    /// [`RaceError::Supply`] if no secret could be obtained; the session
    /// returns to `Idle`.
    pub async fn start(&self) -> Result<StartOutcome, RaceError> {
        let generation = self.update(|session| {
            session.generation += 1;
            session.state = SessionState::Starting;
            session.secret = None;
            session.human.clear();
            session.bot.clear();
            session.bot_status = BotStatus::Idle;
            session.last_error = None;
            session.generation
        });
        info!(generation, "starting race");

        let fetched = bounded(
            self.shared.settings.call_timeout,
            self.shared.collaborators.secrets.fetch_secret(),
            SupplyError::TimedOut,
        )
        .await;

        let secret = match fetched {
            Ok(secret) => secret,
            Err(e) => {
                let current = self.update(|session| {
                    if session.generation != generation {
                        return false;
                    }
                    session.state = SessionState::Idle;
                    session.last_error = Some(e.to_string());
                    true
                });
                if !current {
                    debug!(generation, "superseded start lost its secret request");
                    return Ok(StartOutcome::Superseded);
                }
                warn!(generation, error = %e, "secret unavailable");
                return Err(e.into());
            }
        };

        let mode = self.update(|session| {
            if session.generation != generation {
                return None;
            }
            session.secret = Some(secret.clone());
            session.state = SessionState::Running;
            session.bot_status = BotStatus::Thinking;
            Some(session.mode)
        });
        let Some(mode) = mode else {
            debug!(generation, "start overtaken, discarding secret");
            return Ok(StartOutcome::Superseded);
        };

        info!(generation, %mode, "race running");
        tokio::spawn(bot::run(self.clone(), secret, mode, generation));
        Ok(StartOutcome::Started { generation })
    }

    /// Change the mode for the next round
    ///
    /// # Errors
    ///
    /// [`RaceError::ModeLocked`] while a round is starting or running.
    pub fn set_mode(&self, mode: Mode) -> Result<(), RaceError> {
        self.update(|session| match session.state {
            SessionState::Starting | SessionState::Running => Err(RaceError::ModeLocked),
            SessionState::Idle | SessionState::Finished => {
                session.mode = mode;
                Ok(())
            }
        })?;
        debug!(%mode, "mode set");
        Ok(())
    }

    /// Append a bot record if `generation` is still live
    ///
    /// Returns `false` when the loop has been fenced out or its track closed.
    pub(super) fn append_bot(&self, generation: u64, record: GuessRecord) -> bool {
        self.update(|session| {
            if !session.is_live(generation) {
                return false;
            }
            if session.bot.append(record).is_err() {
                return false;
            }
            if session.bot.is_solved() {
                session.bot_status = BotStatus::Solved;
            } else if session.bot.is_closed() {
                session.bot_status = BotStatus::OutOfTurns;
            }
            !session.bot.is_closed()
        })
    }

    pub(super) fn is_live(&self, generation: u64) -> bool {
        self.lock().is_live(generation)
    }

    /// Record that this generation's loop gave up
    pub(super) fn bot_failed(&self, generation: u64, error: &RaceError) {
        self.update(|session| {
            if session.is_live(generation) {
                session.bot_status = BotStatus::Failed(error.to_string());
            }
        });
    }

    pub(super) fn record_error(&self, generation: u64, error: &RaceError) {
        self.update(|session| {
            if session.generation == generation {
                session.last_error = Some(error.to_string());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::SuggestionError;
    use crate::race::testing::{FakeScorer, FakeSecrets, FakeSuggester, collaborators, wait_for, word};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn controller(
        secrets: FakeSecrets,
        scorer: &Arc<FakeScorer>,
        suggester: &Arc<FakeSuggester>,
        settings: RaceSettings,
    ) -> RaceController {
        RaceController::new(
            collaborators(secrets, Arc::clone(scorer), Arc::clone(suggester)),
            settings,
        )
    }

    #[tokio::test]
    async fn new_controller_is_idle() {
        let ctl = controller(
            FakeSecrets::fixed("crane"),
            &Arc::new(FakeScorer::open()),
            &Arc::new(FakeSuggester::gated(&[])),
            RaceSettings::default(),
        );

        let snap = ctl.snapshot();
        assert_eq!(snap.state, SessionState::Idle);
        assert_eq!(snap.generation, 0);
        assert!(snap.human.is_empty());
        assert_eq!(snap.bot_turns, 0);
        assert_eq!(snap.bot, None);
        assert_eq!(snap.secret, None);
    }

    #[tokio::test]
    async fn start_commits_secret_and_runs() {
        let ctl = controller(
            FakeSecrets::fixed("crane"),
            &Arc::new(FakeScorer::open()),
            &Arc::new(FakeSuggester::gated(&[])),
            RaceSettings::default(),
        );

        let outcome = ctl.start().await.unwrap();
        assert_eq!(outcome, StartOutcome::Started { generation: 1 });

        let snap = ctl.snapshot();
        assert_eq!(snap.state, SessionState::Running);
        assert_eq!(snap.bot_status, BotStatus::Thinking);
        // The secret stays hidden while running
        assert_eq!(snap.secret, None);
    }

    #[tokio::test]
    async fn supply_failure_reverts_to_idle() {
        let secrets = FakeSecrets::sequence(vec![
            Err(SupplyError::Unavailable("down".to_string())),
            Ok(word("crane")),
        ]);
        let ctl = controller(
            secrets,
            &Arc::new(FakeScorer::open()),
            &Arc::new(FakeSuggester::gated(&[])),
            RaceSettings::default(),
        );

        let err = ctl.start().await.unwrap_err();
        assert_eq!(
            err,
            RaceError::Supply(SupplyError::Unavailable("down".to_string()))
        );
        let snap = ctl.snapshot();
        assert_eq!(snap.state, SessionState::Idle);
        assert!(snap.last_error.is_some());

        // Retrying start is the recovery path
        assert!(matches!(
            ctl.start().await.unwrap(),
            StartOutcome::Started { .. }
        ));
        assert_eq!(ctl.state(), SessionState::Running);
        assert_eq!(ctl.snapshot().last_error, None);
    }

    #[tokio::test]
    async fn mode_is_locked_while_running() {
        let ctl = controller(
            FakeSecrets::fixed("crane"),
            &Arc::new(FakeScorer::open()),
            &Arc::new(FakeSuggester::gated(&[])),
            RaceSettings::default(),
        );

        ctl.set_mode(Mode::Constrained).unwrap();
        assert_eq!(ctl.mode(), Mode::Constrained);

        ctl.start().await.unwrap();
        assert_eq!(ctl.set_mode(Mode::Permissive), Err(RaceError::ModeLocked));
        assert_eq!(ctl.mode(), Mode::Constrained);

        ctl.submit("crane").await.unwrap();
        assert_eq!(ctl.state(), SessionState::Finished);
        ctl.set_mode(Mode::Permissive).unwrap();
        assert_eq!(ctl.mode(), Mode::Permissive);
    }

    #[tokio::test]
    async fn selected_mode_reaches_suggestions() {
        let suggester = Arc::new(FakeSuggester::open(&["crane"]));
        let ctl = controller(
            FakeSecrets::fixed("crane"),
            &Arc::new(FakeScorer::open()),
            &suggester,
            RaceSettings::default(),
        );

        ctl.set_mode(Mode::Constrained).unwrap();
        ctl.start().await.unwrap();
        wait_for(&ctl, |s| s.bot_status.is_done()).await;

        assert_eq!(suggester.modes(), vec![Mode::Constrained]);
    }

    #[tokio::test]
    async fn back_to_back_starts_fence_first_loop() {
        let scorer = Arc::new(FakeScorer::open());
        let suggester = Arc::new(FakeSuggester::open(&["slate", "crane"]));
        let ctl = controller(
            FakeSecrets::fixed("crane"),
            &scorer,
            &suggester,
            RaceSettings::default(),
        );

        // The first loop is spawned but has not run when the second start fences it
        ctl.start().await.unwrap();
        let second = ctl.start().await.unwrap();
        assert_eq!(second, StartOutcome::Started { generation: 2 });

        wait_for(&ctl, |s| s.bot_status == BotStatus::Solved).await;
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 2);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 2);

        ctl.submit("crane").await.unwrap();
        let bot = ctl.snapshot().bot.unwrap();
        let guesses: Vec<&str> = bot.iter().map(|r| r.guess.text()).collect();
        assert_eq!(guesses, ["slate", "crane"]);
    }

    #[tokio::test]
    async fn in_flight_suggestion_is_discarded_after_restart() {
        let scorer = Arc::new(FakeScorer::open());
        let suggester = Arc::new(FakeSuggester::gated(&["crane"]));
        let ctl = controller(
            FakeSecrets::fixed("crane"),
            &scorer,
            &suggester,
            RaceSettings::default(),
        );

        ctl.start().await.unwrap();
        suggester.entered.notified().await;

        ctl.start().await.unwrap();
        suggester.entered.notified().await;
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 2);

        suggester.release(2);
        wait_for(&ctl, |s| s.bot_status == BotStatus::Solved).await;

        // Only the second loop reached the scorer and the track
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.snapshot().bot_turns, 1);
    }

    #[tokio::test]
    async fn overtaken_start_reports_superseded() {
        let secrets = FakeSecrets::gated(vec![Ok(word("slate")), Ok(word("crane"))]);
        let gate = secrets.gate();
        let ctl = controller(
            secrets,
            &Arc::new(FakeScorer::open()),
            &Arc::new(FakeSuggester::gated(&[])),
            RaceSettings::default(),
        );

        let first = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.start().await }
        });
        wait_for(&ctl, |s| s.state == SessionState::Starting).await;

        let second = tokio::spawn({
            let ctl = ctl.clone();
            async move { ctl.start().await }
        });
        wait_for(&ctl, |s| s.generation == 2).await;

        gate.add_permits(2);
        assert_eq!(first.await.unwrap(), Ok(StartOutcome::Superseded));
        assert_eq!(
            second.await.unwrap(),
            Ok(StartOutcome::Started { generation: 2 })
        );

        // The surviving round plays against the second secret
        ctl.submit("crane").await.unwrap();
        let snap = ctl.snapshot();
        assert_eq!(snap.secret, Some(word("crane")));
        assert!(snap.human_solved());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_suggestion_times_out() {
        let suggester = Arc::new(FakeSuggester::gated(&["crane"]));
        let settings = RaceSettings {
            call_timeout: Some(Duration::from_secs(1)),
            ..RaceSettings::default()
        };
        let ctl = controller(
            FakeSecrets::fixed("crane"),
            &Arc::new(FakeScorer::open()),
            &suggester,
            settings,
        );

        ctl.start().await.unwrap();
        let snap = wait_for(&ctl, |s| matches!(s.bot_status, BotStatus::Failed(_))).await;
        assert_eq!(
            snap.bot_status,
            BotStatus::Failed(
                RaceError::from(SuggestionError::TimedOut(Duration::from_secs(1))).to_string()
            )
        );

        // The human can still finish; an empty bot board is revealed
        ctl.submit("crane").await.unwrap();
        let snap = ctl.snapshot();
        assert_eq!(snap.state, SessionState::Finished);
        assert_eq!(snap.bot, Some(Vec::new()));
    }

    #[tokio::test]
    async fn changes_are_signalled() {
        let ctl = controller(
            FakeSecrets::fixed("crane"),
            &Arc::new(FakeScorer::open()),
            &Arc::new(FakeSuggester::gated(&[])),
            RaceSettings::default(),
        );
        let mut rx = ctl.changes();

        ctl.start().await.unwrap();
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        ctl.submit("slate").await.unwrap();
        assert!(rx.has_changed().unwrap());
    }
}
