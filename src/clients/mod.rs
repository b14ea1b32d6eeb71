//! External collaborators of a race
//!
//! The race core only talks to these three traits. Two families implement
//! them: in-process ([`local`]) and the remote JSON service ([`http`]).

mod error;
pub mod http;
pub mod local;

pub use error::{ScoringError, SuggestionError, SupplyError};
pub use http::HttpBackend;
pub use local::{FixedSecret, LocalScorer, LocalSuggester, WordListSecrets};

use crate::core::{Mode, VerdictSequence, Word};
use crate::race::GuessRecord;
use async_trait::async_trait;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Supplies a fresh secret for each race
#[async_trait]
pub trait SecretSupplier: Send + Sync {
    async fn fetch_secret(&self) -> Result<Word, SupplyError>;
}

/// Scores a guess against a secret
///
/// Implementations must be deterministic for a given pair.
#[async_trait]
pub trait ScoringClient: Send + Sync {
    async fn score(&self, guess: &Word, secret: &Word) -> Result<VerdictSequence, ScoringError>;
}

/// Proposes the bot's next guess from its own history
#[async_trait]
pub trait SuggestionClient: Send + Sync {
    /// `sample_budget` bounds the remote search effort and is forwarded unchanged.
    async fn suggest(
        &self,
        history: &[GuessRecord],
        mode: Mode,
        sample_budget: NonZeroU32,
    ) -> Result<Word, SuggestionError>;
}

/// The three collaborators a controller needs
#[derive(Clone)]
pub struct Collaborators {
    pub secrets: Arc<dyn SecretSupplier>,
    pub scorer: Arc<dyn ScoringClient>,
    pub suggester: Arc<dyn SuggestionClient>,
}

impl Collaborators {
    /// In-process collaborators over the given word lists
    #[must_use]
    pub fn local(guess_pool: Vec<Word>, answers: Vec<Word>) -> Self {
        Self {
            secrets: Arc::new(WordListSecrets::new(answers.clone())),
            scorer: Arc::new(LocalScorer),
            suggester: Arc::new(LocalSuggester::new(guess_pool, answers)),
        }
    }

    /// All three collaborators served by one remote backend
    #[must_use]
    pub fn http(backend: HttpBackend) -> Self {
        let backend = Arc::new(backend);
        Self {
            secrets: backend.clone(),
            scorer: backend.clone(),
            suggester: backend,
        }
    }
}

/// Await a collaborator call, bounded by `limit` when set
///
/// Expiry is mapped through `on_timeout` into the caller's error type.
pub(crate) async fn bounded<T, E, F>(
    limit: Option<Duration>,
    call: F,
    on_timeout: impl FnOnce(Duration) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(on_timeout(limit))),
        None => call.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn bounded_maps_expiry() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, ScoringError>(VerdictSequence::SOLVED)
        };

        let result = bounded(Some(Duration::from_secs(1)), slow, ScoringError::TimedOut).await;
        assert_eq!(result, Err(ScoringError::TimedOut(Duration::from_secs(1))));
    }

    #[tokio::test]
    async fn bounded_without_limit_passes_through() {
        let fast = async { Err::<(), _>(SuggestionError::NoCandidates) };
        let result = bounded(None, fast, SuggestionError::TimedOut).await;
        assert_eq!(result, Err(SuggestionError::NoCandidates));
    }
}
