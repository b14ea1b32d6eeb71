//! Core domain types for a race
//!
//! Words, verdicts and the play mode. Everything here is pure and has no
//! knowledge of sessions, collaborators or rendering.

mod mode;
mod verdict;
mod word;

pub use mode::Mode;
pub use verdict::{Verdict, VerdictError, VerdictSequence};
pub use word::{WORD_LENGTH, Word, WordError};
