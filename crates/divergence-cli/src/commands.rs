//! One-shot subcommand handlers. Each returns the text to print.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Subcommand, ValueEnum};
use divergence_core::{
  alert::{PANIC_CONFIRMATION, PanicAlert},
  clock::Clock,
  schedule,
  state::AppState,
  store::{DisplayMode, SubjectStore as _},
  study::{self, CompletionBackend, LearningStyle},
  subject::{NewSubject, Note},
  time::parse_date,
};
use divergence_store_sqlite::SqliteStore;

use crate::{client::AlertClient, config::Settings, lookup, render};

// ─── Arguments ────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AddArgs {
  #[arg(long)]
  pub name:        String,
  #[arg(long)]
  pub teacher:     String,
  /// Start time, `HH:MM`.
  #[arg(long)]
  pub starts:      String,
  /// End time, `HH:MM`.
  #[arg(long)]
  pub ends:        String,
  /// Lesson date, `DD/MM/YYYY`. Weekly lessons repeat on its weekday.
  #[arg(long)]
  pub date:        String,
  #[arg(long)]
  pub repeats:     bool,
  /// Hex colour such as `#50cebb`.
  #[arg(long)]
  pub colour:      Option<String>,
  #[arg(long)]
  pub description: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
  /// List a subject's notes.
  List { subject: String },
  /// Add a note to a subject.
  Add { subject: String, content: String },
  /// Delete a note by its index.
  Delete { subject: String, index: usize },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Switch {
  On,
  Off,
  Toggle,
  Status,
}

#[derive(Args, Debug)]
pub struct SummarizeArgs {
  #[arg(long, default_value_t = LearningStyle::default())]
  pub style:   LearningStyle,
  /// Subject whose notes to rework.
  #[arg(required_unless_present = "text")]
  pub subject: Option<String>,
  /// Free text to rework instead of a subject's notes.
  #[arg(long, conflicts_with = "subject")]
  pub text:    Option<String>,
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// Everything a command needs: storage, settings and a clock.
pub struct Session {
  pub store:    SqliteStore,
  pub settings: Settings,
  pub clock:    Arc<dyn Clock>,
}

impl Session {
  pub async fn state(&self) -> Result<AppState> {
    AppState::load(&self.store).await.context("failed to load timetable")
  }

  async fn save(&self, state: &AppState) -> Result<()> {
    state.persist(&self.store).await.context("failed to save timetable")
  }

  pub fn now(&self) -> NaiveDateTime { self.clock.now() }

  fn day_or_today(&self, date: Option<&str>) -> Result<NaiveDate> {
    match date {
      Some(d) => Ok(parse_date(d)?),
      None => Ok(self.now().date()),
    }
  }
}

// ─── Schedule ─────────────────────────────────────────────────────────────────

pub async fn next(session: &Session) -> Result<String> {
  let state = session.state().await?;
  let now = session.now();
  Ok(render::next_lesson(state.next_lesson(now), now))
}

pub async fn upcoming(session: &Session, count: usize) -> Result<String> {
  let state = session.state().await?;
  let found = schedule::upcoming_occurrences(state.subjects(), session.now(), count);
  Ok(render::upcoming(&found))
}

pub async fn day(session: &Session, date: Option<&str>) -> Result<String> {
  let day = session.day_or_today(date)?;
  let state = session.state().await?;
  Ok(render::day(day, &state.lessons_on(day)))
}

pub async fn week(session: &Session, date: Option<&str>) -> Result<String> {
  let day = session.day_or_today(date)?;
  let state = session.state().await?;
  Ok(render::week(&schedule::week_schedule(state.subjects(), day)))
}

// ─── Subjects ─────────────────────────────────────────────────────────────────

pub async fn add(session: &Session, args: AddArgs) -> Result<String> {
  let subject = NewSubject {
    name:        args.name,
    teacher:     args.teacher,
    colour:      args.colour,
    starts_at:   args.starts,
    ends_at:     args.ends,
    date:        args.date,
    repeats:     args.repeats,
    description: args.description,
  }
  .validate_into()?;

  let line = render::lesson_line(&subject);
  let id = subject.id.clone();
  let state = session.state().await?.with_subject(subject);
  session.save(&state).await?;

  tracing::info!(subject = %id, "subject added");
  Ok(format!("Added {id}: {line}"))
}

pub async fn subjects(session: &Session) -> Result<String> {
  let state = session.state().await?;
  Ok(render::subjects(state.subjects()))
}

// ─── Notes ────────────────────────────────────────────────────────────────────

pub async fn notes(session: &Session, command: NotesCommand) -> Result<String> {
  let state = session.state().await?;
  match command {
    NotesCommand::List { subject } => {
      let subject = lookup::resolve(state.subjects(), &subject)?;
      Ok(render::notes(subject))
    }
    NotesCommand::Add { subject, content } => {
      let id = lookup::resolve(state.subjects(), &subject)?.id.clone();
      let note = Note::recorded_at(content, session.now())?;
      let state = state.with_note_added(&id, note)?;
      session.save(&state).await?;
      tracing::info!(subject = %id, "note added");
      Ok(render::notes(lookup::resolve(state.subjects(), id.as_str())?))
    }
    NotesCommand::Delete { subject, index } => {
      let id = lookup::resolve(state.subjects(), &subject)?.id.clone();
      let (state, removed) = state.with_note_removed(&id, index)?;
      session.save(&state).await?;
      tracing::info!(subject = %id, index, "note deleted");
      Ok(format!("Deleted note [{index}]: {}", removed.content))
    }
  }
}

// ─── Display mode ─────────────────────────────────────────────────────────────

pub async fn dyslexia(session: &Session, switch: Switch) -> Result<String> {
  let current = session
    .store
    .display_mode()
    .await
    .context("failed to load display mode")?;
  let mode = match switch {
    Switch::On => DisplayMode::Dyslexia,
    Switch::Off => DisplayMode::Standard,
    Switch::Toggle => current.toggled(),
    Switch::Status => current,
  };
  if mode != current {
    session
      .store
      .set_display_mode(mode)
      .await
      .context("failed to save display mode")?;
    tracing::info!(%mode, "display mode changed");
  }
  let label = if mode.is_dyslexia() { "on" } else { "off" };
  Ok(format!("Dyslexia mode is {label}."))
}

// ─── Study help ───────────────────────────────────────────────────────────────

pub async fn summarize<B: CompletionBackend>(
  session: &Session,
  backend: &B,
  args: SummarizeArgs,
) -> Result<String> {
  let notes = match (&args.text, &args.subject) {
    (Some(text), _) => text.clone(),
    (None, Some(query)) => {
      let state = session.state().await?;
      let subject = lookup::resolve(state.subjects(), query)?;
      if subject.notes.is_empty() {
        return Err(divergence_core::Error::NoNotes(subject.name.clone()).into());
      }
      study::format_notes(&subject.notes)
    }
    (None, None) => return Err(divergence_core::Error::EmptyNotes.into()),
  };

  let request = study::revision_request(args.style, &notes)?;
  tracing::info!(style = %args.style, "requesting revision notes");
  backend
    .complete(request)
    .await
    .context("failed to generate revision notes")
}

pub async fn feedback<B: CompletionBackend>(
  session: &Session,
  backend: &B,
  subject: &str,
) -> Result<String> {
  let state = session.state().await?;
  let subject = lookup::resolve(state.subjects(), subject)?;
  let request = study::feedback_request(subject)?;
  tracing::info!(subject = %subject.id, "requesting study feedback");
  backend
    .complete(request)
    .await
    .context("failed to generate feedback")
}

// ─── Panic ────────────────────────────────────────────────────────────────────

pub async fn panic(session: &Session, webhook: Option<&AlertClient>) -> Result<String> {
  let state = session.state().await?;
  let alert = PanicAlert::raise(state.subjects(), session.now());
  tracing::warn!(
    lesson = alert.lesson.as_ref().map(|l| l.name.as_str()),
    teachers = ?alert.teachers,
    "panic alert raised"
  );
  if let Some(client) = webhook {
    client.send(&alert).await?;
  }
  Ok(PANIC_CONFIRMATION.to_owned())
}
