//! Display functions for command results

use super::formatters::{plural_guesses, redacted_row, turns_bar, verdict_row};
use crate::core::{VerdictSequence, Word};
use crate::race::{BotStatus, GuessRecord, RaceOutcome, RaceSnapshot, SessionState, TURN_LIMIT};
use crate::solver::Suggestion;
use colored::Colorize;

/// Print a single scored guess
pub fn print_guess(turn: usize, record: &GuessRecord) {
    println!(
        "  {}. {}  {}",
        turn.to_string().bright_black(),
        verdict_row(&record.guess, &record.verdict),
        record.verdict.to_emoji()
    );
}

/// Print the result of a one-off scoring call
pub fn print_score(guess: &Word, verdict: &VerdictSequence) {
    println!(
        "{}  {}  {}",
        verdict_row(guess, verdict),
        verdict.to_string().bright_white().bold(),
        verdict.to_emoji()
    );
}

/// Print a suggestion and, when known, the candidate statistics behind it
pub fn print_suggestion(suggestion: &Suggestion) {
    println!(
        "\n📊 Suggested guess: {}",
        suggestion.guess.text().to_uppercase().bright_yellow().bold()
    );
    println!("   Candidates:       {}", suggestion.candidates);
    println!(
        "   Expected remain:  {:.1} candidates",
        suggestion.expected_remaining
    );
}

/// Bot progress while the round is running: counts only
pub fn print_bot_progress(snapshot: &RaceSnapshot) {
    let status = match &snapshot.bot_status {
        BotStatus::Idle | BotStatus::Thinking => "guessing".bright_black(),
        BotStatus::Solved => "done".bright_black(),
        BotStatus::OutOfTurns => "out of turns".bright_black(),
        BotStatus::Failed(reason) => format!("stopped ({reason})").red(),
        BotStatus::Stopped => "stopped".bright_black(),
    };
    println!(
        "  Bot [{}] {}/{} {}",
        turns_bar(snapshot.bot_turns, TURN_LIMIT * 2).cyan(),
        snapshot.bot_turns,
        TURN_LIMIT,
        status
    );
}

/// Print the end-of-round summary with the revealed bot board
pub fn print_race_summary(snapshot: &RaceSnapshot) {
    if snapshot.state != SessionState::Finished {
        return;
    }

    println!("\n{}", "═".repeat(60).bright_cyan());
    if let Some(secret) = &snapshot.secret {
        println!(
            " The word was {}",
            secret.text().to_uppercase().bright_yellow().bold()
        );
    }
    println!("{}", "═".repeat(60).bright_cyan());

    println!("\n  {}", "You".bright_white().bold());
    for (i, record) in snapshot.human.iter().enumerate() {
        print_guess(i + 1, record);
    }

    println!("\n  {}", "Bot".bright_white().bold());
    let bot = snapshot.bot.as_deref().unwrap_or_default();
    if bot.is_empty() {
        println!("  {}", "(no guesses)".bright_black());
    }
    for (i, record) in bot.iter().enumerate() {
        print_guess(i + 1, record);
    }
    if let BotStatus::Failed(reason) = &snapshot.bot_status {
        println!("  {}", format!("bot stopped early: {reason}").red());
    }
    println!(
        "\n  Revealed! Bot took {}.",
        plural_guesses(bot.len()).bright_cyan()
    );

    let verdict = match snapshot.outcome() {
        Some(RaceOutcome::Human) => "🏆 You win!".bright_green().bold(),
        Some(RaceOutcome::Bot) => "🤖 The bot wins.".bright_red().bold(),
        Some(RaceOutcome::Tie) => "🤝 It's a tie.".bright_yellow().bold(),
        Some(RaceOutcome::Nobody) | None => "Nobody solved it.".bright_black().bold(),
    };
    println!("  {verdict}");
    println!("\n{}", "═".repeat(60).bright_cyan());
}

/// Print the hidden bot board: one gray row per bot turn so far
pub fn print_redacted_board(turns: usize) {
    for _ in 0..turns {
        println!("     {}", redacted_row());
    }
}
