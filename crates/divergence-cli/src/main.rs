//! `divergence`: timetable, notes and study help for neurodivergent students.
//!
//! # Usage
//!
//! ```
//! divergence                       # open the timetable TUI
//! divergence next
//! divergence add --name Maths --teacher "Mr Smith" --starts 09:00 --ends 10:00 --date 08/01/2024 --repeats
//! divergence notes add maths "Quadratic formula"
//! divergence summarize --style simplified maths
//! divergence --config ~/.config/divergence/config.toml week
//! ```

mod app;
mod client;
mod commands;
mod config;
mod lookup;
mod render;
mod ui;

use std::{io, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use client::{AlertClient, CompletionClient};
use commands::{AddArgs, NotesCommand, Session, SummarizeArgs, Switch};
use config::Settings;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use divergence_core::clock::SystemClock;
use divergence_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

/// Upper bound for `upcoming -n`.
const MAX_UPCOMING: i64 = 500;

#[derive(Parser, Debug)]
#[command(name = "divergence", version, about = "Timetable, notes and study help")]
struct Args {
  /// Path to a TOML config file (default: ~/.config/divergence/config.toml).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the next lesson.
  Next,
  /// List upcoming lessons in date order.
  Upcoming {
    #[arg(
      short = 'n',
      long,
      default_value_t = 5,
      value_parser = clap::value_parser!(u16).range(1..=MAX_UPCOMING),
    )]
    count: u16,
  },
  /// Lessons on a day (DD/MM/YYYY, default today).
  Day { date: Option<String> },
  /// Lessons for the Sunday-to-Saturday week containing a day.
  Week { date: Option<String> },
  /// Add a subject to the timetable.
  Add(AddArgs),
  /// List all subjects.
  Subjects,
  /// Manage a subject's notes.
  #[command(subcommand)]
  Notes(NotesCommand),
  /// Show or change dyslexia-friendly display mode.
  Dyslexia {
    #[arg(value_enum, default_value_t = Switch::Status)]
    switch: Switch,
  },
  /// Rework notes in a learning style.
  Summarize(SummarizeArgs),
  /// Study feedback on a subject's notes.
  Feedback { subject: String },
  /// Tell your teachers you need help.
  Panic,
  /// Open the timetable TUI (default).
  Tui,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let command = args.command.unwrap_or(Command::Tui);

  // The TUI owns the terminal, so it stays silent unless RUST_LOG asks.
  let default_level = if matches!(command, Command::Tui) {
    LevelFilter::OFF
  } else {
    LevelFilter::INFO
  };
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  let settings = Settings::load(args.config.as_deref())?;

  if let Some(parent) = settings.store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  let session = Session {
    store,
    settings,
    clock: Arc::new(SystemClock),
  };

  let output = match command {
    Command::Tui => return run_tui(&session).await,
    Command::Next => commands::next(&session).await?,
    Command::Upcoming { count } => commands::upcoming(&session, usize::from(count)).await?,
    Command::Day { date } => commands::day(&session, date.as_deref()).await?,
    Command::Week { date } => commands::week(&session, date.as_deref()).await?,
    Command::Add(add) => commands::add(&session, add).await?,
    Command::Subjects => commands::subjects(&session).await?,
    Command::Notes(notes) => commands::notes(&session, notes).await?,
    Command::Dyslexia { switch } => commands::dyslexia(&session, switch).await?,
    Command::Summarize(summarize) => {
      let backend = CompletionClient::new(&session.settings.completion)?;
      commands::summarize(&session, &backend, summarize).await?
    }
    Command::Feedback { subject } => {
      let backend = CompletionClient::new(&session.settings.completion)?;
      commands::feedback(&session, &backend, &subject).await?
    }
    Command::Panic => {
      let webhook = session
        .settings
        .alert
        .webhook_url
        .as_deref()
        .map(AlertClient::new)
        .transpose()?;
      commands::panic(&session, webhook.as_ref()).await?
    }
  };

  println!("{output}");
  Ok(())
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

async fn run_tui(session: &Session) -> Result<()> {
  let state = session.state().await?;
  let mut app = App::new(state, session.store.clone(), Arc::clone(&session.clock));

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(250))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
