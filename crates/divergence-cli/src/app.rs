//! TUI state machine and key dispatcher.

use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use divergence_core::{
  clock::Clock,
  schedule::{self, DaySchedule},
  state::AppState,
  store::SubjectStore as _,
  subject::Subject,
};
use divergence_store_sqlite::SqliteStore;

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level TUI state.
pub struct App {
  /// Current timetable snapshot.
  pub state: AppState,

  /// Day highlighted in the week pane.
  pub selected_day: NaiveDate,

  /// Cursor within the selected day's lessons.
  pub lesson_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  store: SqliteStore,
  clock: Arc<dyn Clock>,
}

impl App {
  pub fn new(state: AppState, store: SqliteStore, clock: Arc<dyn Clock>) -> Self {
    let selected_day = clock.now().date();
    Self {
      state,
      selected_day,
      lesson_cursor: 0,
      status_msg: String::new(),
      store,
      clock,
    }
  }

  pub fn now(&self) -> NaiveDateTime { self.clock.now() }

  // ── Views ─────────────────────────────────────────────────────────────────

  pub fn week(&self) -> Vec<DaySchedule<'_>> {
    schedule::week_schedule(self.state.subjects(), self.selected_day)
  }

  pub fn lessons(&self) -> Vec<&Subject> { self.state.lessons_on(self.selected_day) }

  /// The lesson under the cursor, if the selected day has any.
  pub fn cursor_lesson(&self) -> Option<&Subject> {
    self.lessons().get(self.lesson_cursor).copied()
  }

  pub fn next_lesson(&self) -> Option<&Subject> { self.state.next_lesson(self.now()) }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return Ok(false),

      // Days
      KeyCode::Down | KeyCode::Char('j') => self.shift_day(1, true),
      KeyCode::Up | KeyCode::Char('k') => self.shift_day(1, false),
      KeyCode::Char(']') => self.shift_day(7, true),
      KeyCode::Char('[') => self.shift_day(7, false),
      KeyCode::Char('t') => self.select_day(self.now().date()),

      // Lessons
      KeyCode::Char('J') | KeyCode::Tab => self.move_lesson(true),
      KeyCode::Char('K') | KeyCode::BackTab => self.move_lesson(false),

      KeyCode::Char('d') => self.toggle_display_mode().await?,

      _ => {}
    }
    Ok(true)
  }

  fn select_day(&mut self, day: NaiveDate) {
    self.selected_day = day;
    self.lesson_cursor = 0;
  }

  fn shift_day(&mut self, days: u64, forward: bool) {
    let days = Days::new(days);
    let moved = if forward {
      self.selected_day.checked_add_days(days)
    } else {
      self.selected_day.checked_sub_days(days)
    };
    if let Some(day) = moved {
      self.select_day(day);
    }
  }

  /// Move the lesson cursor, wrapping at either end.
  fn move_lesson(&mut self, forward: bool) {
    let len = self.lessons().len();
    if len == 0 {
      return;
    }
    self.lesson_cursor = if forward {
      (self.lesson_cursor + 1) % len
    } else {
      (self.lesson_cursor + len - 1) % len
    };
  }

  /// Flip the display mode, writing only the mode flag so subjects stored by
  /// another process since this snapshot was loaded are left alone.
  async fn toggle_display_mode(&mut self) -> anyhow::Result<()> {
    let next = self.state.toggled_display_mode();
    match self.store.set_display_mode(next.display_mode()).await {
      Ok(()) => {
        self.status_msg = format!("Display mode: {}", next.display_mode());
        self.state = next;
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e.into())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use divergence_core::{
    clock::FixedClock,
    store::{DisplayMode, SubjectStore},
    subject::NewSubject,
  };

  use super::*;

  fn subject(name: &str, date: &str, starts: &str) -> Subject {
    NewSubject {
      name: name.into(),
      teacher: "Ms Patel".into(),
      starts_at: starts.into(),
      ends_at: "23:00".into(),
      date: date.into(),
      repeats: true,
      ..Default::default()
    }
    .validate_into()
    .unwrap()
  }

  async fn app() -> App {
    let now = NaiveDate::from_ymd_opt(2024, 1, 10)
      .unwrap()
      .and_hms_opt(8, 0, 0)
      .unwrap();
    let state = AppState::default()
      .with_subject(subject("Maths", "10/01/2024", "09:00"))
      .with_subject(subject("Art", "10/01/2024", "11:00"))
      .with_subject(subject("PE", "11/01/2024", "10:00"));
    let store = SqliteStore::open_in_memory().await.unwrap();
    App::new(state, store, Arc::new(FixedClock(now)))
  }

  fn press(c: char) -> KeyEvent { KeyEvent::from(KeyCode::Char(c)) }

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, d).unwrap() }

  #[tokio::test]
  async fn starts_on_today() {
    let app = app().await;
    assert_eq!(app.selected_day, day(10));
    assert_eq!(app.cursor_lesson().unwrap().name, "Maths");
    assert_eq!(app.next_lesson().unwrap().name, "Maths");
  }

  #[tokio::test]
  async fn day_and_week_navigation() {
    let mut app = app().await;
    app.handle_key(press('j')).await.unwrap();
    assert_eq!(app.selected_day, day(11));
    assert_eq!(app.cursor_lesson().unwrap().name, "PE");

    app.handle_key(press(']')).await.unwrap();
    assert_eq!(app.selected_day, day(18));
    app.handle_key(press('[')).await.unwrap();
    app.handle_key(press('k')).await.unwrap();
    assert_eq!(app.selected_day, day(10));

    app.handle_key(press(']')).await.unwrap();
    app.handle_key(press('t')).await.unwrap();
    assert_eq!(app.selected_day, day(10));
  }

  #[tokio::test]
  async fn lesson_cursor_wraps() {
    let mut app = app().await;
    app.handle_key(press('J')).await.unwrap();
    assert_eq!(app.cursor_lesson().unwrap().name, "Art");
    app.handle_key(KeyEvent::from(KeyCode::Tab)).await.unwrap();
    assert_eq!(app.cursor_lesson().unwrap().name, "Maths");
    app.handle_key(press('K')).await.unwrap();
    assert_eq!(app.cursor_lesson().unwrap().name, "Art");

    app.handle_key(press('j')).await.unwrap();
    assert_eq!(app.lesson_cursor, 0);
  }

  #[tokio::test]
  async fn dyslexia_toggle_is_persisted() {
    let mut app = app().await;
    app.handle_key(press('d')).await.unwrap();
    assert_eq!(app.state.display_mode(), DisplayMode::Dyslexia);

    let reloaded = AppState::load(&app.store).await.unwrap();
    assert_eq!(reloaded.display_mode(), DisplayMode::Dyslexia);
    assert!(reloaded.subjects().is_empty());

    app.handle_key(press('d')).await.unwrap();
    assert_eq!(app.store.display_mode().await.unwrap(), DisplayMode::Standard);
  }

  #[tokio::test]
  async fn dyslexia_toggle_keeps_subjects_added_elsewhere() {
    let mut app = app().await;
    let added = subject("Drama", "12/01/2024", "13:00");
    app.store.replace_subjects(vec![added.clone()]).await.unwrap();

    app.handle_key(press('d')).await.unwrap();

    assert_eq!(app.store.list_subjects().await.unwrap(), vec![added]);
    assert_eq!(app.store.display_mode().await.unwrap(), DisplayMode::Dyslexia);
  }

  #[tokio::test]
  async fn quit_keys() {
    let mut app = app().await;
    assert!(!app.handle_key(press('q')).await.unwrap());
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(!app.handle_key(ctrl_c).await.unwrap());
  }
}
