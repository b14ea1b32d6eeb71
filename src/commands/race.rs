//! Text-mode race
//!
//! The same race as the TUI on plain stdin/stdout. The bot keeps playing in
//! the background while the prompt waits; its progress is shown as counts
//! only until the round finishes.

use super::with_spinner;
use crate::core::Mode;
use crate::output::{
    print_bot_progress, print_guess, print_race_summary, print_redacted_board,
};
use crate::race::{
    IgnoreReason, RaceController, RaceSnapshot, SessionState, StartOutcome, SubmitOutcome,
};
use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// A line typed at the race prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceCommand {
    New,
    Mode(Result<Mode, String>),
    Board,
    Quit,
    Guess(String),
    Empty,
}

impl RaceCommand {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Self::Empty;
        };

        match head.to_ascii_lowercase().as_str() {
            "new" | "n" => Self::New,
            "board" | "b" => Self::Board,
            "quit" | "q" | "exit" => Self::Quit,
            "mode" => Self::Mode(
                parts
                    .next()
                    .ok_or_else(|| "usage: mode easy|hard".to_string())
                    .and_then(str::parse),
            ),
            _ => Self::Guess(line.to_string()),
        }
    }
}

/// Run the text-mode race loop until `quit` or end of input
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub async fn run_race(controller: RaceController) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Wordle Race - You vs Bot                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Guess the hidden word before the bot does. Its guesses stay hidden");
    println!("until you solve the word or run out of turns.\n");
    println!("Commands: 'new' for a new race, 'mode easy|hard' between races,");
    println!("          'board' to show both boards, 'quit' to exit\n");

    start(&controller).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&controller.snapshot())?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match RaceCommand::parse(&line) {
            RaceCommand::Empty => {}
            RaceCommand::Quit => break,
            RaceCommand::New => start(&controller).await,
            RaceCommand::Board => print_board(&controller.snapshot()),
            RaceCommand::Mode(Ok(mode)) => match controller.set_mode(mode) {
                Ok(()) => println!("Mode set to {}\n", mode.as_str().bright_cyan()),
                Err(e) => println!("{}\n", e.to_string().red()),
            },
            RaceCommand::Mode(Err(e)) => println!("{}\n", e.red()),
            RaceCommand::Guess(guess) => submit(&controller, &guess).await,
        }
    }

    println!("\nThanks for racing! 👋\n");
    Ok(())
}

fn prompt(snapshot: &RaceSnapshot) -> Result<()> {
    let label = match snapshot.state {
        SessionState::Running => format!("Guess {}", snapshot.human.len() + 1),
        _ => "Command".to_string(),
    };
    print!("{}: ", label.bright_white().bold());
    std::io::stdout().flush()?;
    Ok(())
}

async fn start(controller: &RaceController) {
    match with_spinner("Fetching a secret...", controller.start()).await {
        Ok(StartOutcome::Started { generation }) => {
            debug!(generation, "race started");
            println!(
                "🔄 Race {generation} started ({} mode). Go!\n",
                controller.mode().as_str().bright_cyan()
            );
        }
        Ok(StartOutcome::Superseded) => {}
        Err(e) => println!("{}\n", format!("Could not start: {e} ('new' to retry)").red()),
    }
}

async fn submit(controller: &RaceController, guess: &str) {
    match with_spinner("Scoring...", controller.submit(guess)).await {
        Ok(SubmitOutcome::Accepted { record, finished }) => {
            let snapshot = controller.snapshot();
            print_guess(snapshot.human.len(), &record);
            if finished {
                print_race_summary(&snapshot);
                println!("\nType 'new' for another race.\n");
            } else {
                print_bot_progress(&snapshot);
                println!();
            }
        }
        Ok(SubmitOutcome::Ignored(reason)) => {
            let text = match reason {
                IgnoreReason::WrongLength => "Guesses are five letters.",
                IgnoreReason::NotRunning | IgnoreReason::TrackClosed => {
                    "No race running. Type 'new' to start one."
                }
                IgnoreReason::Superseded => "That guess belonged to the previous race.",
            };
            println!("{}\n", text.yellow());
        }
        Err(e) => println!("{}\n", format!("{e} (try again)").red()),
    }
}

fn print_board(snapshot: &RaceSnapshot) {
    if snapshot.state == SessionState::Finished {
        print_race_summary(snapshot);
        return;
    }

    println!("\n  {}", "You".bright_white().bold());
    for (i, record) in snapshot.human.iter().enumerate() {
        print_guess(i + 1, record);
    }
    println!("\n  {}", "Bot".bright_white().bold());
    print_redacted_board(snapshot.bot_turns);
    print_bot_progress(snapshot);
    println!();
}
