//! Terminal output formatting
//!
//! Colored boards and summaries for the text commands.

pub mod display;
pub mod formatters;

pub use display::{
    print_bot_progress, print_guess, print_race_summary, print_redacted_board, print_score,
    print_suggestion,
};
