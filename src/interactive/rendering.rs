//! TUI rendering with ratatui
//!
//! Two boards side by side: the human's, and the bot's redacted until reveal.

use super::app::{App, MessageStyle, Pending, mode_label};
use crate::core::{Verdict, WORD_LENGTH};
use crate::race::{BotStatus, GuessRecord, SessionState, TURN_LIMIT};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(15),    // Boards
            Constraint::Length(7),  // Messages
            Constraint::Length(3),  // Input area
            Constraint::Length(1),  // Status bar
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let boards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_human_board(f, app, boards[0]);
    render_bot_board(f, app, boards[1]);
    render_messages(f, app, chunks[2]);
    render_input(f, app, chunks[3]);
    render_status(f, app, chunks[4]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = match (&app.snapshot.state, &app.snapshot.secret) {
        (SessionState::Finished, Some(secret)) => {
            format!("🎯 WORDLE RACE - The word was {}", secret.text().to_uppercase())
        }
        _ => "🎯 WORDLE RACE - You vs Bot".to_string(),
    };
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn tile_style(verdict: Verdict) -> Style {
    let bg = match verdict {
        Verdict::Hit => Color::Green,
        Verdict::Present => Color::Yellow,
        Verdict::Miss => Color::DarkGray,
    };
    Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

fn record_line(record: &GuessRecord) -> Line<'static> {
    let mut spans = Vec::with_capacity(WORD_LENGTH * 2);
    for (letter, &verdict) in record.guess.text().chars().zip(record.verdict.verdicts()) {
        spans.push(Span::styled(
            format!(" {} ", letter.to_ascii_uppercase()),
            tile_style(verdict),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Played but hidden: gray tiles, no letters
fn redacted_line() -> Line<'static> {
    let tile = Span::styled("   ", Style::default().bg(Color::Gray));
    Line::from(
        std::iter::repeat_n([tile, Span::raw(" ")], WORD_LENGTH)
            .flatten()
            .collect::<Vec<_>>(),
    )
}

fn empty_line() -> Line<'static> {
    Line::from(Span::styled(
        " · ".repeat(WORD_LENGTH),
        Style::default().fg(Color::DarkGray),
    ))
}

fn typing_line(input: &str) -> Line<'static> {
    let letters: String = input
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .chain(std::iter::repeat('_'))
        .take(WORD_LENGTH)
        .map(|c| format!(" {c}  "))
        .collect();
    Line::from(Span::styled(
        letters,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn board_block(title: String, color: Color) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(color))
}

fn render_human_board(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;
    let mut lines: Vec<Line> = Vec::with_capacity(TURN_LIMIT * 2);

    for row in 0..TURN_LIMIT {
        let line = match snapshot.human.get(row) {
            Some(record) => record_line(record),
            None if row == snapshot.human.len() && snapshot.state == SessionState::Running => {
                typing_line(&app.input_buffer)
            }
            None => empty_line(),
        };
        lines.push(line);
        lines.push(Line::default());
    }

    let board = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(board_block(
            format!(" You {}/{} ", snapshot.human.len(), TURN_LIMIT),
            Color::White,
        ));
    f.render_widget(board, area);
}

fn render_bot_board(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;
    let mut lines: Vec<Line> = Vec::with_capacity(TURN_LIMIT * 2 + 1);

    for row in 0..TURN_LIMIT {
        let line = match &snapshot.bot {
            Some(revealed) => revealed.get(row).map_or_else(empty_line, record_line),
            None if row < snapshot.bot_turns => redacted_line(),
            None => empty_line(),
        };
        lines.push(line);
        lines.push(Line::default());
    }

    let status = match (&snapshot.state, &snapshot.bot_status) {
        (_, BotStatus::Failed(reason)) => Span::styled(
            format!("Bot stopped: {reason}"),
            Style::default().fg(Color::Red),
        ),
        (SessionState::Finished, _) => Span::styled(
            format!(
                "Revealed! Bot took {} guess{}.",
                snapshot.bot_turns,
                if snapshot.bot_turns == 1 { "" } else { "es" }
            ),
            Style::default().fg(Color::Green),
        ),
        (SessionState::Running, _) => Span::styled(
            "Bot is guessing… rows reveal after you finish.",
            Style::default().fg(Color::DarkGray),
        ),
        _ => Span::raw(""),
    };
    lines.push(Line::from(status));

    let board = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(board_block(
            format!(" Bot {}/{} ", snapshot.bot_turns, TURN_LIMIT),
            Color::Magenta,
        ));
    f.render_widget(board, area);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let messages: Vec<ListItem> = app
        .messages
        .iter()
        .rev()
        .take(5)
        .map(|msg| {
            let style = match msg.style {
                MessageStyle::Info => Style::default().fg(Color::White),
                MessageStyle::Success => Style::default().fg(Color::Green),
                MessageStyle::Error => Style::default().fg(Color::Red),
            };
            ListItem::new(msg.text.clone()).style(style)
        })
        .collect();

    let messages_list =
        List::new(messages).block(Block::default().title(" Messages ").borders(Borders::ALL));

    f.render_widget(messages_list, area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, color) = match (&app.pending, app.snapshot.state) {
        (Some(Pending::Starting), _) | (_, SessionState::Starting) => {
            (" Fetching a secret… ", Color::DarkGray)
        }
        (Some(Pending::Scoring(_)), _) => (" Scoring… ", Color::DarkGray),
        (None, SessionState::Running) => (" Your guess | Enter to submit ", Color::Yellow),
        (None, _) => (" Ctrl-N / F2 for a new race ", Color::Cyan),
    };

    let input = Paragraph::new(app.input_buffer.to_uppercase())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .style(Style::default().fg(color)),
        );

    f.render_widget(input, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(area);

    let mode_style = if app.is_running() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let mode = Paragraph::new(format!("Mode: {}", mode_label(app.snapshot.mode)))
        .alignment(Alignment::Center)
        .style(mode_style);
    f.render_widget(mode, chunks[0]);

    let stats = &app.stats;
    let stats_text = format!(
        "Races: {} | You {} - {} Bot | Ties {}",
        stats.races, stats.human_wins, stats.bot_wins, stats.ties
    );
    let stats = Paragraph::new(stats_text).alignment(Alignment::Center);
    f.render_widget(stats, chunks[1]);

    let help_text = if app.is_running() {
        "Esc: Quit | Enter: Submit | Ctrl-N: Restart"
    } else {
        "Esc: Quit | Ctrl-N/F2: New Race | Tab: Mode"
    };
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}
