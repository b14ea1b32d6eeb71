//! Wordle Race - CLI
//!
//! Race an autonomous Wordle bot to the same hidden word, in a TUI or on
//! plain stdin/stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wordle_race::{
    clients::{Collaborators, FixedSecret, HttpBackend, LocalScorer, LocalSuggester, ScoringClient},
    commands::{SuggestionSource, parse_history, run_health, run_race, score_guess},
    config::{BackendKind, RaceConfig},
    core::{Mode, Word},
    interactive::{App, run_tui},
    output::{print_score, print_suggestion},
    race::RaceController,
    wordlists::WordLists,
};

#[derive(Parser)]
#[command(
    name = "wordle_race",
    about = "Race an autonomous Wordle bot to the same hidden word",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: $CONFIG_DIR/wordle_race/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Play mode: easy or hard
    #[arg(short, long, global = true)]
    mode: Option<Mode>,

    /// Sample budget forwarded with every suggestion request
    #[arg(long, global = true)]
    sample: Option<u32>,

    /// Collaborator backend: local or http
    #[arg(long, global = true, value_parser = parse_backend)]
    backend: Option<BackendKind>,

    /// Base URL of the remote solver service
    #[arg(long, global = true)]
    url: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Write logs to this file (the TUI otherwise discards them)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Wordlist: 'all' (default), 'answers', or path to file
    #[arg(short = 'w', long, global = true, default_value = "all")]
    wordlist: String,

    /// Pin every race to this secret (practice)
    #[arg(long, global = true)]
    secret: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive TUI race (default)
    Play,

    /// Race on plain stdin/stdout
    Race,

    /// Score a guess against a secret
    Score {
        /// The guessed word
        guess: String,

        /// The secret word
        secret: String,
    },

    /// Suggest the next guess for a history of GUESS:PATTERN entries
    Suggest {
        /// Prior guesses, e.g. crane:BYBBG
        history: Vec<String>,
    },

    /// Check that the configured backend is reachable
    Health,
}

fn parse_backend(s: &str) -> Result<BackendKind, String> {
    match s.to_ascii_lowercase().as_str() {
        "local" => Ok(BackendKind::Local),
        "http" => Ok(BackendKind::Http),
        other => Err(format!("unknown backend {other:?} (expected local or http)")),
    }
}

/// Logs go to `log_file` when set; otherwise to stderr, or nowhere under the TUI
fn init_tracing(cli: &Cli, tui: bool) -> Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level))
    };

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else if tui {
        tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

/// File values with command-line overrides applied
fn load_config(cli: &Cli) -> Result<RaceConfig> {
    let mut config = RaceConfig::load(cli.config.as_deref())?;

    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(sample) = cli.sample {
        config.sample_budget = sample;
    }
    if let Some(kind) = cli.backend {
        config.backend.kind = kind;
    }
    if let Some(url) = &cli.url {
        config.backend.base_url.clone_from(url);
    }

    config.validate()?;
    Ok(config)
}

fn http_backend(config: &RaceConfig) -> Result<Option<HttpBackend>> {
    match config.backend.kind {
        BackendKind::Local => Ok(None),
        BackendKind::Http => Ok(Some(HttpBackend::new(config.base_url()?))),
    }
}

fn collaborators(cli: &Cli, config: &RaceConfig) -> Result<Collaborators> {
    let mut collaborators = match http_backend(config)? {
        Some(backend) => Collaborators::http(backend),
        None => {
            let lists = WordLists::resolve(&cli.wordlist)
                .with_context(|| format!("failed to load wordlist {:?}", cli.wordlist))?;
            Collaborators::local(lists.guess_pool, lists.answers)
        }
    };

    if let Some(secret) = &cli.secret {
        let secret = Word::new(secret).with_context(|| format!("invalid secret {secret:?}"))?;
        info!(secret = %secret, "pinning secret");
        collaborators.secrets = Arc::new(FixedSecret(secret));
    }
    Ok(collaborators)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Default to Play mode if no command given
    let command = cli.command.take().unwrap_or(Commands::Play);
    init_tracing(&cli, matches!(command, Commands::Play))?;

    let config = load_config(&cli)?;
    let settings = config.settings()?;
    info!(
        mode = %settings.mode,
        sample_budget = settings.sample_budget.get(),
        backend = ?config.backend.kind,
        "configuration loaded"
    );

    match command {
        Commands::Play => {
            let controller = RaceController::new(collaborators(&cli, &config)?, settings);
            run_tui(App::new(controller)).await
        }
        Commands::Race => {
            let controller = RaceController::new(collaborators(&cli, &config)?, settings);
            run_race(controller).await
        }
        Commands::Score { guess, secret } => {
            let scorer: Box<dyn ScoringClient> = match http_backend(&config)? {
                Some(backend) => Box::new(backend),
                None => Box::new(LocalScorer),
            };
            let (guess, verdict) =
                score_guess(scorer.as_ref(), &guess, &secret, settings.call_timeout).await?;
            print_score(&guess, &verdict);
            Ok(())
        }
        Commands::Suggest { history } => {
            let history = parse_history(&history)?;
            let source = match http_backend(&config)? {
                Some(backend) => SuggestionSource::Http(backend),
                None => {
                    let lists = WordLists::resolve(&cli.wordlist)
                        .with_context(|| format!("failed to load wordlist {:?}", cli.wordlist))?;
                    SuggestionSource::Local(LocalSuggester::new(lists.guess_pool, lists.answers))
                }
            };
            let suggestion = source
                .suggestion(
                    &history,
                    settings.mode,
                    settings.sample_budget,
                    settings.call_timeout,
                )
                .await?;
            print_suggestion(&suggestion);
            Ok(())
        }
        Commands::Health => run_health(http_backend(&config)?.as_ref()).await,
    }
}
