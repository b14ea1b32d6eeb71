//! Failures of the external collaborators

use std::time::Duration;
use thiserror::Error;

/// No secret could be obtained; the start attempt is abandoned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupplyError {
    #[error("secret supplier unavailable: {0}")]
    Unavailable(String),
    #[error("secret supplier returned an invalid word: {0}")]
    InvalidSecret(String),
    #[error("secret supplier timed out after {0:?}")]
    TimedOut(Duration),
}

/// A single guess could not be scored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("malformed guess: {0}")]
    Malformed(String),
    #[error("scoring service failed: {0}")]
    Transport(String),
    #[error("scoring service returned an invalid verdict: {0}")]
    InvalidVerdict(String),
    #[error("scoring service timed out after {0:?}")]
    TimedOut(Duration),
}

/// The bot could not get its next guess
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("no candidate words remain for this history")]
    NoCandidates,
    #[error("suggestion service failed: {0}")]
    Transport(String),
    #[error("suggestion service returned an invalid guess: {0}")]
    InvalidGuess(String),
    #[error("suggestion service timed out after {0:?}")]
    TimedOut(Duration),
}
