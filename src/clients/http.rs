//! Remote collaborators over the solver service's JSON API

use super::{ScoringClient, SecretSupplier, SuggestionClient};
use super::{ScoringError, SuggestionError, SupplyError};
use crate::core::{Mode, VerdictSequence, Word};
use crate::race::GuessRecord;
use crate::solver::Suggestion;
use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Deserialize)]
struct RandomAnswerResponse {
    answer: String,
}

#[derive(Debug, Serialize)]
struct FeedbackRequest<'a> {
    guess: &'a str,
    answer: &'a str,
}

#[derive(Debug, Deserialize)]
struct FeedbackResponse {
    pattern: String,
}

#[derive(Debug, Serialize)]
struct HistoryItem<'a> {
    guess: &'a str,
    pattern: String,
}

#[derive(Debug, Serialize)]
struct SolveRequest<'a> {
    history: Vec<HistoryItem<'a>>,
    mode: Mode,
    sample: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveResponse {
    next_guess: String,
    candidates: usize,
    expected_remaining: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    ok: bool,
}

/// Client for a remote solver service
///
/// One backend serves all three collaborator roles.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Reuse an existing client (connection pool, proxies)
    #[must_use]
    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Url::join drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> Result<Url, String> {
        self.base_url
            .join(name)
            .map_err(|e| format!("invalid endpoint {name}: {e}"))
    }

    /// Check that the service answers `GET /health` with `{"ok": true}`
    pub async fn health(&self) -> anyhow::Result<()> {
        let url = self.endpoint("health").map_err(anyhow::Error::msg)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            bail!("{url} returned {status}: {}", error_text(response).await);
        }

        let body: HealthResponse = response
            .json()
            .await
            .context("health response was not valid JSON")?;
        if !body.ok {
            bail!("{url} reported not ok");
        }
        Ok(())
    }

    /// Full suggestion including the service's candidate statistics
    pub async fn suggestion(
        &self,
        history: &[GuessRecord],
        mode: Mode,
        sample_budget: NonZeroU32,
    ) -> Result<Suggestion, SuggestionError> {
        let url = self.endpoint("solve").map_err(SuggestionError::Transport)?;
        let request = SolveRequest {
            history: history
                .iter()
                .map(|record| HistoryItem {
                    guess: record.guess.text(),
                    pattern: record.verdict.to_string(),
                })
                .collect(),
            mode,
            sample: sample_budget.get(),
        };

        debug!(turns = history.len(), %mode, "POST /solve");
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SuggestionError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST => {
                let message = error_text(response).await;
                if message.contains("No candidates") {
                    return Err(SuggestionError::NoCandidates);
                }
                return Err(SuggestionError::Transport(message));
            }
            status => {
                return Err(SuggestionError::Transport(format!(
                    "{status}: {}",
                    error_text(response).await
                )));
            }
        }

        let body: SolveResponse = response
            .json()
            .await
            .map_err(|e| SuggestionError::Transport(e.to_string()))?;
        let guess = Word::new(&body.next_guess)
            .map_err(|_| SuggestionError::InvalidGuess(body.next_guess.clone()))?;

        Ok(Suggestion {
            guess,
            candidates: body.candidates,
            expected_remaining: body.expected_remaining,
        })
    }
}

/// Extract the service's `{"error": ...}` message, falling back to the raw body
async fn error_text(response: Response) -> String {
    let raw = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&raw).map_or(raw, |body| body.error)
}

#[async_trait]
impl SecretSupplier for HttpBackend {
    async fn fetch_secret(&self) -> Result<Word, SupplyError> {
        let url = self.endpoint("random_answer").map_err(SupplyError::Unavailable)?;

        debug!("GET /random_answer");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SupplyError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "secret request rejected");
            return Err(SupplyError::Unavailable(format!(
                "{status}: {}",
                error_text(response).await
            )));
        }

        let body: RandomAnswerResponse = response
            .json()
            .await
            .map_err(|e| SupplyError::Unavailable(e.to_string()))?;
        Word::new(&body.answer).map_err(|_| SupplyError::InvalidSecret(body.answer))
    }
}

#[async_trait]
impl ScoringClient for HttpBackend {
    async fn score(&self, guess: &Word, secret: &Word) -> Result<VerdictSequence, ScoringError> {
        let url = self.endpoint("feedback").map_err(ScoringError::Transport)?;
        let request = FeedbackRequest {
            guess: guess.text(),
            answer: secret.text(),
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoringError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST => {
                return Err(ScoringError::Malformed(error_text(response).await));
            }
            status => {
                return Err(ScoringError::Transport(format!(
                    "{status}: {}",
                    error_text(response).await
                )));
            }
        }

        let body: FeedbackResponse = response
            .json()
            .await
            .map_err(|e| ScoringError::Transport(e.to_string()))?;
        body.pattern
            .parse()
            .map_err(|_| ScoringError::InvalidVerdict(body.pattern))
    }
}

#[async_trait]
impl SuggestionClient for HttpBackend {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> HttpBackend {
        HttpBackend::new(Url::parse(&server.uri()).unwrap())
    }

    fn budget() -> NonZeroU32 {
        NonZeroU32::new(800).unwrap()
    }

    #[test]
    fn base_path_is_kept_when_joining() {
        let backend = HttpBackend::new(Url::parse("http://localhost:5001/api").unwrap());
        assert_eq!(
            backend.endpoint("solve").unwrap().as_str(),
            "http://localhost:5001/api/solve"
        );
    }

    #[tokio::test]
    async fn fetches_random_answer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/random_answer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "CRANE"})))
            .expect(1)
            .mount(&server)
            .await;

        let secret = backend(&server).fetch_secret().await.unwrap();
        assert_eq!(secret.text(), "crane");
    }

    #[tokio::test]
    async fn rejects_malformed_secret() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/random_answer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "toolong"})))
            .mount(&server)
            .await;

        let result = backend(&server).fetch_secret().await;
        assert_eq!(result, Err(SupplyError::InvalidSecret("toolong".to_string())));
    }

    #[tokio::test]
    async fn scores_via_feedback_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(body_json(json!({"guess": "slate", "answer": "crane"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pattern": "BBGBG"})))
            .expect(1)
            .mount(&server)
            .await;

        let verdict = backend(&server)
            .score(&Word::new("slate").unwrap(), &Word::new("crane").unwrap())
            .await
            .unwrap();
        assert_eq!(verdict.to_string(), "BBGBG");
    }

    #[tokio::test]
    async fn bad_request_maps_to_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": "guess and answer must be 5 letters (a-z)"})),
            )
            .mount(&server)
            .await;

        let result = backend(&server)
            .score(&Word::new("slate").unwrap(), &Word::new("crane").unwrap())
            .await;
        assert_eq!(
            result,
            Err(ScoringError::Malformed(
                "guess and answer must be 5 letters (a-z)".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn invalid_pattern_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pattern": "GGX"})))
            .mount(&server)
            .await;

        let result = backend(&server)
            .score(&Word::new("slate").unwrap(), &Word::new("crane").unwrap())
            .await;
        assert_eq!(result, Err(ScoringError::InvalidVerdict("GGX".to_string())));
    }

    #[tokio::test]
    async fn solve_sends_history_mode_and_sample() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/solve"))
            .and(body_json(json!({
                "history": [{"guess": "slate", "pattern": "BBGBG"}],
                "mode": "hard",
                "sample": 800
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "nextGuess": "crane",
                "candidates": 4,
                "expectedRemaining": 1.5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let history = [GuessRecord::new(
            Word::new("slate").unwrap(),
            "BBGBG".parse().unwrap(),
        )];
        let suggestion = backend(&server)
            .suggestion(&history, Mode::Constrained, budget())
            .await
            .unwrap();

        assert_eq!(suggestion.guess.text(), "crane");
        assert_eq!(suggestion.candidates, 4);
        assert!((suggestion.expected_remaining - 1.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn exhausted_candidates_map_to_no_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/solve"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "No candidates remain (history inconsistent?)"
            })))
            .mount(&server)
            .await;

        let result = backend(&server)
            .suggest(&[], Mode::Permissive, budget())
            .await;
        assert_eq!(result, Err(SuggestionError::NoCandidates));
    }

    #[tokio::test]
    async fn server_error_maps_to_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/solve"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = backend(&server)
            .suggest(&[], Mode::Permissive, budget())
            .await;
        assert!(matches!(result, Err(SuggestionError::Transport(msg)) if msg.contains("boom")));
    }

    #[tokio::test]
    async fn health_check_accepts_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        assert!(backend(&server).health().await.is_ok());
    }

    #[tokio::test]
    async fn health_check_rejects_not_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": false})))
            .mount(&server)
            .await;

        assert!(backend(&server).health().await.is_err());
    }
}
