//! `AppState`, the explicit state container handed to every screen and
//! command.
//!
//! A state value is an immutable snapshot. Every update returns a new
//! `AppState`; the subject list is shared behind an `Arc` so cloning a state
//! for another reader is cheap and never exposes a partially applied edit.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
  Error, Result, schedule,
  store::{DisplayMode, SubjectStore},
  subject::{Note, Subject, SubjectId},
};

#[derive(Debug, Clone, Default)]
pub struct AppState {
  subjects:     Arc<[Subject]>,
  display_mode: DisplayMode,
}

impl AppState {
  pub fn new(subjects: Vec<Subject>, display_mode: DisplayMode) -> Self {
    Self {
      subjects: subjects.into(),
      display_mode,
    }
  }

  /// Read subjects and display mode from `store`.
  pub async fn load<S: SubjectStore>(store: &S) -> Result<Self, S::Error> {
    let subjects = store.list_subjects().await?;
    let display_mode = store.display_mode().await?;
    Ok(Self::new(subjects, display_mode))
  }

  /// Write the whole snapshot back to `store`.
  pub async fn persist<S: SubjectStore>(&self, store: &S) -> Result<(), S::Error> {
    store.replace_subjects(self.subjects.to_vec()).await?;
    store.set_display_mode(self.display_mode).await
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  pub fn subjects(&self) -> &[Subject] { &self.subjects }

  pub fn display_mode(&self) -> DisplayMode { self.display_mode }

  pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
    self.subjects.iter().find(|s| &s.id == id)
  }

  pub fn next_lesson(&self, now: NaiveDateTime) -> Option<&Subject> {
    schedule::find_next_occurrence(&self.subjects, now)
  }

  pub fn lessons_on(&self, day: NaiveDate) -> Vec<&Subject> {
    schedule::occurrences_on_day(&self.subjects, day)
  }

  // ── Updates ─────────────────────────────────────────────────────────────

  /// Append a subject.
  pub fn with_subject(&self, subject: Subject) -> Self {
    let mut subjects = self.subjects.to_vec();
    subjects.push(subject);
    Self::new(subjects, self.display_mode)
  }

  pub fn with_display_mode(&self, display_mode: DisplayMode) -> Self {
    Self {
      subjects: Arc::clone(&self.subjects),
      display_mode,
    }
  }

  pub fn toggled_display_mode(&self) -> Self {
    self.with_display_mode(self.display_mode.toggled())
  }

  /// Append `note` to the subject with `id`.
  pub fn with_note_added(&self, id: &SubjectId, note: Note) -> Result<Self> {
    self.updating(id, |subject| {
      subject.notes.push(note);
      Ok(())
    })
  }

  /// Remove the note at `index` from the subject with `id`, returning the new
  /// state and the removed note.
  pub fn with_note_removed(&self, id: &SubjectId, index: usize) -> Result<(Self, Note)> {
    let mut removed = None;
    let state = self.updating(id, |subject| {
      if index >= subject.notes.len() {
        return Err(Error::NoteNotFound {
          subject: subject.id.clone(),
          index,
        });
      }
      removed = Some(subject.notes.remove(index));
      Ok(())
    })?;
    let note = removed.ok_or_else(|| Error::NoteNotFound {
      subject: id.clone(),
      index,
    })?;
    Ok((state, note))
  }

  fn updating(
    &self,
    id: &SubjectId,
    edit: impl FnOnce(&mut Subject) -> Result<()>,
  ) -> Result<Self> {
    let mut subjects = self.subjects.to_vec();
    let subject = subjects
      .iter_mut()
      .find(|s| &s.id == id)
      .ok_or_else(|| Error::SubjectNotFound(id.clone()))?;
    edit(subject)?;
    Ok(Self::new(subjects, self.display_mode))
  }
}
