//! Scriptable collaborators for race tests

use crate::clients::{
    Collaborators, ScoringClient, ScoringError, SecretSupplier, SuggestionClient, SuggestionError,
    SupplyError,
};
use crate::core::{Mode, VerdictSequence, Word};
use crate::race::{GuessRecord, RaceController, RaceSnapshot};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

pub(crate) fn word(text: &str) -> Word {
    Word::new(text).unwrap()
}

/// Wait on a closed gate until the test adds permits
async fn pass(gate: &Semaphore) {
    gate.acquire().await.unwrap().forget();
}

pub(crate) struct FakeSecrets {
    queue: Mutex<VecDeque<Result<Word, SupplyError>>>,
    gate: Arc<Semaphore>,
}

impl FakeSecrets {
    /// Always returns `secret`
    pub(crate) fn fixed(secret: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::from([Ok(word(secret))])),
            gate: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
        }
    }

    /// Returns each entry once, in order; the last one repeats
    pub(crate) fn sequence(results: Vec<Result<Word, SupplyError>>) -> Self {
        Self {
            queue: Mutex::new(results.into()),
            gate: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
        }
    }

    /// Like `sequence`, but each call blocks until a permit is added to `gate()`
    pub(crate) fn gated(results: Vec<Result<Word, SupplyError>>) -> Self {
        Self {
            queue: Mutex::new(results.into()),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    pub(crate) fn gate(&self) -> Arc<Semaphore> {
        Arc::clone(&self.gate)
    }

    fn next(&self) -> Result<Word, SupplyError> {
        let mut queue = self.queue.lock().unwrap();
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        next.unwrap_or_else(|| Err(SupplyError::Unavailable("no secrets scripted".to_string())))
    }
}

#[async_trait]
impl SecretSupplier for FakeSecrets {
    async fn fetch_secret(&self) -> Result<Word, SupplyError> {
        // Taken before waiting so concurrent calls keep their queue order
        let next = self.next();
        pass(&self.gate).await;
        next
    }
}

/// Scores locally, optionally held behind a gate or failing once
pub(crate) struct FakeScorer {
    pub(crate) gate: Arc<Semaphore>,
    pub(crate) entered: Notify,
    pub(crate) calls: AtomicUsize,
    failure: Mutex<Option<ScoringError>>,
}

impl FakeScorer {
    pub(crate) fn open() -> Self {
        Self::with_permits(Semaphore::MAX_PERMITS)
    }

    pub(crate) fn gated() -> Self {
        Self::with_permits(0)
    }

    fn with_permits(permits: usize) -> Self {
        Self {
            gate: Arc::new(Semaphore::new(permits)),
            entered: Notify::new(),
            calls: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }

    pub(crate) fn fail_next(&self, error: ScoringError) {
        *self.failure.lock().unwrap() = Some(error);
    }
}

#[async_trait]
impl ScoringClient for FakeScorer {
    async fn score(&self, guess: &Word, secret: &Word) -> Result<VerdictSequence, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        pass(&self.gate).await;
        if let Some(error) = self.failure.lock().unwrap().take() {
            return Err(error);
        }
        Ok(VerdictSequence::score(guess, secret))
    }
}

/// Suggests `script[history.len()]`
pub(crate) struct FakeSuggester {
    script: Vec<Word>,
    failure: Option<SuggestionError>,
    gate: Arc<Semaphore>,
    pub(crate) entered: Notify,
    pub(crate) returned: Notify,
    pub(crate) calls: AtomicUsize,
    seen: Mutex<Vec<(usize, Mode)>>,
}

impl FakeSuggester {
    pub(crate) fn open(script: &[&str]) -> Self {
        Self::new(script, None, Semaphore::MAX_PERMITS)
    }

    /// Every call waits for [`release`](Self::release)
    pub(crate) fn gated(script: &[&str]) -> Self {
        Self::new(script, None, 0)
    }

    pub(crate) fn failing(error: SuggestionError) -> Self {
        Self::new(&[], Some(error), Semaphore::MAX_PERMITS)
    }

    fn new(script: &[&str], failure: Option<SuggestionError>, permits: usize) -> Self {
        Self {
            script: script.iter().map(|w| word(w)).collect(),
            failure,
            gate: Arc::new(Semaphore::new(permits)),
            entered: Notify::new(),
            returned: Notify::new(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    pub(crate) fn modes(&self) -> Vec<Mode> {
        self.seen.lock().unwrap().iter().map(|&(_, mode)| mode).collect()
    }

    pub(crate) fn history_lengths(&self) -> Vec<usize> {
        self.seen.lock().unwrap().iter().map(|&(len, _)| len).collect()
    }
}

#[async_trait]
impl SuggestionClient for FakeSuggester {
    async fn suggest(
        &self,
        history: &[GuessRecord],
        mode: Mode,
        _sample_budget: NonZeroU32,
    ) -> Result<Word, SuggestionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((history.len(), mode));
        self.entered.notify_one();
        pass(&self.gate).await;

        let result = match &self.failure {
            Some(error) => Err(error.clone()),
            None => self
                .script
                .get(history.len())
                .cloned()
                .ok_or(SuggestionError::NoCandidates),
        };
        self.returned.notify_one();
        result
    }
}

pub(crate) fn collaborators(
    secrets: FakeSecrets,
    scorer: Arc<FakeScorer>,
    suggester: Arc<FakeSuggester>,
) -> Collaborators {
    Collaborators {
        secrets: Arc::new(secrets),
        scorer,
        suggester,
    }
}

/// Wait until `done` holds for the controller's snapshot
pub(crate) async fn wait_for(
    controller: &RaceController,
    done: impl Fn(&RaceSnapshot) -> bool,
) -> RaceSnapshot {
    let mut changes = controller.changes();
    let wait = async {
        loop {
            let snapshot = controller.snapshot();
            if done(&snapshot) {
                return snapshot;
            }
            changes.changed().await.unwrap();
        }
    };
    tokio::time::timeout(Duration::from_secs(30), wait)
        .await
        .expect("race never reached the expected state")
}
