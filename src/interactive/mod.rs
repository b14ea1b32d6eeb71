//! Interactive TUI interface
//!
//! Full-screen race: the human's board on the left, the bot's on the right.

mod app;
mod input;
mod rendering;

pub use app::{App, Message, MessageStyle, Pending, Statistics, TaskResult, mode_label, run_tui};
