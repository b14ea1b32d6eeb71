//! Race-level error taxonomy

use crate::clients::{ScoringError, SuggestionError, SupplyError};
use thiserror::Error;

/// Errors surfaced by [`RaceController`](super::RaceController) commands
///
/// None of these leave the session inconsistent: tracks are only written
/// after a collaborator call succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaceError {
    #[error(transparent)]
    Supply(#[from] SupplyError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Suggestion(#[from] SuggestionError),
    #[error("mode can only be changed between races")]
    ModeLocked,
}
