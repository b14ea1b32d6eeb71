//! In-process suggestion engine
//!
//! Backs [`LocalSuggester`](crate::clients::LocalSuggester). The race core
//! never calls this directly; it only sees the suggestion trait.

mod engine;
mod expected;

pub use engine::{Solver, Suggestion};
pub use expected::{expected_remaining, select_best_guess};
