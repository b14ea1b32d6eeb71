//! Command implementations
//!
//! The text-mode entry points behind `race`, `score`, `suggest` and `health`.

pub mod health;
pub mod race;
pub mod score;
pub mod suggest;

pub use health::run_health;
pub use race::{RaceCommand, run_race};
pub use score::score_guess;
pub use suggest::{SuggestionSource, parse_history};

use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// Show a spinner on stderr while `future` runs
pub(crate) async fn with_spinner<T>(message: &str, future: impl Future<Output = T>) -> T {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));

    let output = future.await;
    pb.finish_and_clear();
    output
}
