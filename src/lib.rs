//! Wordle Race
//!
//! A human and an autonomous bot race to the same hidden word. The bot's
//! guesses stay hidden until the human finishes, then both boards are revealed.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wordle_race::clients::Collaborators;
//! use wordle_race::race::{RaceController, RaceSettings};
//! use wordle_race::wordlists::WordLists;
//!
//! # async fn demo() -> Result<(), wordle_race::race::RaceError> {
//! let lists = WordLists::embedded();
//! let controller = RaceController::new(
//!     Collaborators::local(lists.guess_pool, lists.answers),
//!     RaceSettings::default(),
//! );
//!
//! controller.start().await?;
//! controller.submit("crane").await?;
//! println!("bot has played {} turns", controller.snapshot().bot_turns);
//! # Ok(())
//! # }
//! ```

// Core domain types
pub mod core;

// Session orchestration
pub mod race;

// Secret, scoring and suggestion collaborators
pub mod clients;

// In-process suggestion engine
pub mod solver;

// Word lists
pub mod wordlists;

// TOML configuration
pub mod config;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;
