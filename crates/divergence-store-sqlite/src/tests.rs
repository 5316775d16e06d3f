//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use divergence_core::{
  state::AppState,
  store::{DYSLEXIA_MODE_KEY, DisplayMode, SUBJECTS_KEY, SubjectStore},
  subject::{NewSubject, Note, Subject},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn subject(name: &str, date: &str, repeats: bool) -> Subject {
  NewSubject {
    name: name.into(),
    teacher: "Ms Patel".into(),
    starts_at: "09:00".into(),
    ends_at: "10:00".into(),
    date: date.into(),
    repeats,
    ..Default::default()
  }
  .validate_into()
  .unwrap()
}

// ─── Fresh store ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_store_has_no_subjects() {
  let s = store().await;
  assert!(s.list_subjects().await.unwrap().is_empty());
}

#[tokio::test]
async fn fresh_store_is_in_standard_mode() {
  let s = store().await;
  assert_eq!(s.display_mode().await.unwrap(), DisplayMode::Standard);
}

#[tokio::test]
async fn missing_key_reads_as_none() {
  let s = store().await;
  let value: Option<String> = s.get("nothing-here").await.unwrap();
  assert!(value.is_none());
}

// ─── Subjects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_and_list_preserves_order() {
  let s = store().await;
  let subjects = vec![
    subject("Maths", "08/01/2024", true),
    subject("Art", "09/01/2024", false),
    subject("History", "10/01/2024", true),
  ];
  s.replace_subjects(subjects.clone()).await.unwrap();

  let listed = s.list_subjects().await.unwrap();
  assert_eq!(listed, subjects);
}

#[tokio::test]
async fn replace_overwrites_previous_list() {
  let s = store().await;
  s.replace_subjects(vec![subject("Maths", "08/01/2024", true)])
    .await
    .unwrap();
  s.replace_subjects(vec![subject("Art", "09/01/2024", false)])
    .await
    .unwrap();

  let names: Vec<_> = s
    .list_subjects()
    .await
    .unwrap()
    .into_iter()
    .map(|s| s.name)
    .collect();
  assert_eq!(names, ["Art"]);
}

#[tokio::test]
async fn notes_survive_a_round_trip() {
  let s = store().await;
  let mut maths = subject("Maths", "08/01/2024", true);
  maths.notes.push(Note {
    date:    "08/01/2024 09:15:00".into(),
    content: "Quadratics".into(),
  });
  s.replace_subjects(vec![maths.clone()]).await.unwrap();

  let listed = s.list_subjects().await.unwrap();
  assert_eq!(listed[0].notes, maths.notes);
}

#[tokio::test]
async fn loads_subjects_written_by_the_host_app() {
  let s = store().await;
  let raw = r##"[{
    "id": "abc123",
    "name": "Chemistry",
    "teacher": "Mr Jones",
    "colour": "#ff8800",
    "startsAt": "13:30",
    "endsAt": "14:45",
    "date": "17/01/2024",
    "repeats": true,
    "notes": [{ "date": "17/01/2024 13:40:00", "content": "Moles" }]
  }]"##;
  let value: serde_json::Value = serde_json::from_str(raw).unwrap();
  s.set(SUBJECTS_KEY, &value).await.unwrap();

  let listed = s.list_subjects().await.unwrap();
  assert_eq!(listed.len(), 1);
  let chem = &listed[0];
  assert_eq!(chem.id.as_str(), "abc123");
  assert_eq!(chem.date, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
  assert_eq!(chem.starts_at.to_string(), "13:30");
  assert!(chem.repeats);
  assert!(chem.description.is_none());
  assert_eq!(chem.notes[0].content, "Moles");
}

#[tokio::test]
async fn corrupt_subject_list_is_reported() {
  let s = store().await;
  s.set(SUBJECTS_KEY, "not a list").await.unwrap();

  let err = s.list_subjects().await.unwrap_err();
  assert!(matches!(err, Error::Corrupt { ref key, .. } if key == SUBJECTS_KEY));
}

// ─── Display mode ────────────────────────────────────────────────────────────

#[tokio::test]
async fn display_mode_persists() {
  let s = store().await;
  s.set_display_mode(DisplayMode::Dyslexia).await.unwrap();
  assert_eq!(s.display_mode().await.unwrap(), DisplayMode::Dyslexia);

  let raw: Option<bool> = s.get(DYSLEXIA_MODE_KEY).await.unwrap();
  assert_eq!(raw, Some(true));

  s.set_display_mode(DisplayMode::Standard).await.unwrap();
  assert_eq!(s.display_mode().await.unwrap(), DisplayMode::Standard);
}

// ─── AppState over SQLite ────────────────────────────────────────────────────

#[tokio::test]
async fn app_state_round_trips_through_sqlite() {
  let s = store().await;
  let state = AppState::default()
    .with_subject(subject("Maths", "08/01/2024", true))
    .toggled_display_mode();
  state.persist(&s).await.unwrap();

  let loaded = AppState::load(&s).await.unwrap();
  assert_eq!(loaded.subjects(), state.subjects());
  assert!(loaded.display_mode().is_dyslexia());
}

#[tokio::test]
async fn clones_share_the_same_database() {
  let s = store().await;
  let other = s.clone();
  other
    .replace_subjects(vec![subject("Maths", "08/01/2024", true)])
    .await
    .unwrap();
  assert_eq!(s.list_subjects().await.unwrap().len(), 1);
}
