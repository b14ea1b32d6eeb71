//! One-off suggestion for a hand-entered history

use super::with_spinner;
use crate::clients::{HttpBackend, LocalSuggester, SuggestionError, bounded};
use crate::core::{Mode, VerdictSequence, Word};
use crate::race::{GuessRecord, TURN_LIMIT};
use crate::solver::Suggestion;
use anyhow::{Context, Result, bail};
use std::num::NonZeroU32;
use std::time::Duration;

/// Where a one-off suggestion comes from
pub enum SuggestionSource {
    Local(LocalSuggester),
    Http(HttpBackend),
}

impl SuggestionSource {
    /// Ask for the next guess, with candidate statistics
    ///
    /// # Errors
    ///
    /// Returns the collaborator's failure, or `TimedOut` once `limit` expires.
    pub async fn suggestion(
        &self,
        history: &[GuessRecord],
        mode: Mode,
        sample_budget: NonZeroU32,
        limit: Option<Duration>,
    ) -> Result<Suggestion, SuggestionError> {
        let call = async {
            match self {
                Self::Local(local) => local.suggestion(history, mode, sample_budget).await,
                Self::Http(backend) => backend.suggestion(history, mode, sample_budget).await,
            }
        };
        with_spinner("Thinking...", bounded(limit, call, SuggestionError::TimedOut)).await
    }
}

/// Parse `GUESS:PATTERN` arguments into a history
///
/// Patterns use `G`/`Y`/`B` (or `-`, `_` and the square emojis for gray).
///
/// # Errors
///
/// Returns an error naming the first malformed entry.
pub fn parse_history(entries: &[String]) -> Result<Vec<GuessRecord>> {
    if entries.len() > TURN_LIMIT {
        bail!("at most {TURN_LIMIT} guesses, got {}", entries.len());
    }

    entries
        .iter()
        .map(|entry| {
            let (guess, pattern) = entry
                .split_once(':')
                .with_context(|| format!("expected GUESS:PATTERN, got {entry:?}"))?;
            let guess = Word::new(guess).with_context(|| format!("invalid guess in {entry:?}"))?;
            let verdict: VerdictSequence = pattern
                .parse()
                .with_context(|| format!("invalid pattern in {entry:?}"))?;
            Ok(GuessRecord::new(guess, verdict))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::DEFAULT_SAMPLE_BUDGET;

    fn args(entries: &[&str]) -> Vec<String> {
        entries.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_mixed_symbol_styles() {
        let history = parse_history(&args(&["crane:BYB-g", "SLOTH:🟩⬜⬜⬜🟨"])).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].guess.text(), "crane");
        assert_eq!(history[0].verdict.to_string(), "BYBBG");
        assert_eq!(history[1].verdict.to_string(), "GBBBY");
    }

    #[test]
    fn reports_the_bad_entry() {
        let err = parse_history(&args(&["crane:GGGGG", "slate"])).unwrap_err();
        assert!(err.to_string().contains("\"slate\""));

        let err = parse_history(&args(&["crane:GGGXG"])).unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn rejects_more_than_six_guesses() {
        let entries = vec!["crane:BBBBB".to_string(); TURN_LIMIT + 1];
        assert!(parse_history(&entries).is_err());
    }

    #[tokio::test]
    async fn local_source_narrows_to_the_answer() {
        let words = crate::wordlists::loader::words_from_slice(&["crane", "slate", "trace"]);
        let source = SuggestionSource::Local(LocalSuggester::new(words.clone(), words));
        let history = parse_history(&args(&["crane:YGGBG", "slate:BBGYG"])).unwrap();

        let suggestion = source
            .suggestion(&history, Mode::Constrained, DEFAULT_SAMPLE_BUDGET, None)
            .await
            .unwrap();
        assert_eq!(suggestion.guess.text(), "trace");
        assert_eq!(suggestion.candidates, 1);
    }
}
