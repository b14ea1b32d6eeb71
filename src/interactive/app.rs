//! TUI application state and logic

use super::input::InputPump;
use crate::core::{Mode, WORD_LENGTH};
use crate::race::{
    IgnoreReason, RaceController, RaceError, RaceOutcome, RaceSnapshot, SessionState,
    StartOutcome, SubmitOutcome,
};
use anyhow::Result;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tokio::sync::mpsc;
use tracing::debug;

/// Application state
pub struct App {
    controller: RaceController,
    pub snapshot: RaceSnapshot,
    pub input_buffer: String,
    pub messages: Vec<Message>,
    pub stats: Statistics,
    /// A command is awaiting its collaborator
    pub pending: Option<Pending>,
    pub should_quit: bool,
    results_tx: mpsc::UnboundedSender<TaskResult>,
    results_rx: mpsc::UnboundedReceiver<TaskResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    Starting,
    Scoring(String),
}

/// Completion of a command spawned off the UI loop
#[derive(Debug)]
pub enum TaskResult {
    Started(Result<StartOutcome, RaceError>),
    Submitted {
        guess: String,
        result: Result<SubmitOutcome, RaceError>,
    },
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub style: MessageStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Success,
    Error,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub races: usize,
    pub human_wins: usize,
    pub bot_wins: usize,
    pub ties: usize,
}

impl Statistics {
    fn record(&mut self, outcome: RaceOutcome) {
        self.races += 1;
        match outcome {
            RaceOutcome::Human => self.human_wins += 1,
            RaceOutcome::Bot => self.bot_wins += 1,
            RaceOutcome::Tie => self.ties += 1,
            RaceOutcome::Nobody => {}
        }
    }
}

impl App {
    #[must_use]
    pub fn new(controller: RaceController) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let snapshot = controller.snapshot();

        Self {
            controller,
            snapshot,
            input_buffer: String::new(),
            messages: vec![Message {
                text: "Race the bot to the same hidden word. Its guesses stay hidden until you finish."
                    .to_string(),
                style: MessageStyle::Info,
            }],
            stats: Statistics::default(),
            pending: None,
            should_quit: false,
            results_tx,
            results_rx,
        }
    }

    /// Pull the latest session state from the controller
    pub fn refresh(&mut self) {
        self.snapshot = self.controller.snapshot();
    }

    pub fn add_message(&mut self, text: &str, style: MessageStyle) {
        self.messages.push(Message {
            text: text.to_string(),
            style,
        });

        // Keep only last 5 messages
        if self.messages.len() > 5 {
            self.messages.remove(0);
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(
            self.snapshot.state,
            SessionState::Starting | SessionState::Running
        )
    }

    pub fn start_race(&mut self) {
        if self.pending == Some(Pending::Starting) {
            return;
        }
        self.pending = Some(Pending::Starting);
        self.input_buffer.clear();

        let controller = self.controller.clone();
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(TaskResult::Started(controller.start().await));
        });
    }

    pub fn submit_guess(&mut self) {
        if matches!(self.pending, Some(Pending::Scoring(_))) {
            return;
        }
        let guess = self.input_buffer.clone();
        if guess.len() != WORD_LENGTH {
            self.add_message("Guesses are five letters", MessageStyle::Error);
            return;
        }
        self.pending = Some(Pending::Scoring(guess.clone()));

        let controller = self.controller.clone();
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let result = controller.submit(&guess).await;
            let _ = tx.send(TaskResult::Submitted { guess, result });
        });
    }

    pub fn toggle_mode(&mut self) {
        let mode = self.snapshot.mode.toggled();
        match self.controller.set_mode(mode) {
            Ok(()) => self.add_message(&format!("Mode: {}", mode_label(mode)), MessageStyle::Info),
            Err(e) => self.add_message(&e.to_string(), MessageStyle::Error),
        }
        self.refresh();
    }

    /// Wait for the next spawned command to complete
    pub async fn next_result(&mut self) -> Option<TaskResult> {
        self.results_rx.recv().await
    }

    pub fn handle_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Started(result) => {
                if self.pending == Some(Pending::Starting) {
                    self.pending = None;
                }
                match result {
                    Ok(StartOutcome::Started { generation }) => {
                        debug!(generation, "race started");
                        self.add_message(
                            &format!("Race {generation} started. Go!"),
                            MessageStyle::Success,
                        );
                    }
                    Ok(StartOutcome::Superseded) => {}
                    Err(e) => self.add_message(
                        &format!("Could not start: {e} (Ctrl-N to retry)"),
                        MessageStyle::Error,
                    ),
                }
            }
            TaskResult::Submitted { guess, result } => {
                if matches!(&self.pending, Some(Pending::Scoring(g)) if *g == guess) {
                    self.pending = None;
                }
                match result {
                    Ok(SubmitOutcome::Accepted { finished, .. }) => {
                        // Keep anything typed while the guess was being scored
                        if self.input_buffer == guess {
                            self.input_buffer.clear();
                        }
                        self.refresh();
                        if finished {
                            self.announce_finish();
                        }
                    }
                    Ok(SubmitOutcome::Ignored(reason)) => {
                        let text = match reason {
                            IgnoreReason::WrongLength => "Guesses are five letters",
                            IgnoreReason::NotRunning | IgnoreReason::TrackClosed => {
                                "No race running. Ctrl-N starts one."
                            }
                            IgnoreReason::Superseded => "That guess belonged to the previous race",
                        };
                        self.add_message(text, MessageStyle::Info);
                    }
                    Err(e) => self.add_message(&format!("{e} (try again)"), MessageStyle::Error),
                }
            }
        }
        self.refresh();
    }

    fn announce_finish(&mut self) {
        let Some(outcome) = self.snapshot.outcome() else {
            return;
        };
        self.stats.record(outcome);

        let bot_guesses = self.snapshot.bot.as_ref().map_or(0, Vec::len);
        let (text, style) = match outcome {
            RaceOutcome::Human => ("🏆 You beat the bot!", MessageStyle::Success),
            RaceOutcome::Bot => ("🤖 The bot wins this one.", MessageStyle::Error),
            RaceOutcome::Tie => ("🤝 Dead heat!", MessageStyle::Info),
            RaceOutcome::Nobody => ("Nobody found it.", MessageStyle::Info),
        };
        self.add_message(text, style);
        self.add_message(
            &format!(
                "Revealed! Bot took {bot_guesses} guess{}. Ctrl-N for a new race.",
                if bot_guesses == 1 { "" } else { "es" }
            ),
            MessageStyle::Info,
        );
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only process key press events (fixes Windows double-input bug)
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.start_race();
            }
            KeyCode::F(2) => self.start_race(),
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.toggle_mode(),
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                if self.input_buffer.len() < WORD_LENGTH {
                    self.input_buffer.push(c.to_ascii_lowercase());
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Enter => self.submit_guess(),
            _ => {}
        }
    }
}

#[must_use]
pub const fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Permissive => "Easy (any valid guess)",
        Mode::Constrained => "Hard (candidates only)",
    }
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O error
/// during rendering or event handling.
pub async fn run_tui(app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<()> {
    let mut input = InputPump::new();
    let mut changes = app.controller.changes();
    app.start_race();

    let result = loop {
        app.refresh();
        if let Err(e) = terminal.draw(|f| super::rendering::ui(f, &app)) {
            break Err(e.into());
        }

        tokio::select! {
            event = input.recv() => match event {
                Some(Ok(Event::Key(key))) => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => break Err(e.into()),
                None => break Ok(()),
            },
            Some(result) = app.next_result() => app.handle_result(result),
            changed = changes.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    input.shutdown().await;
    result
}
