//! Panic alert raised by a student who needs help from their teachers.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
  schedule,
  subject::{Subject, SubjectId},
  time::ClockTime,
};

/// Shown to the student once an alert has been raised.
pub const PANIC_CONFIRMATION: &str =
  "A message has been sent to your teachers, they'll respond shortly.";

/// The lesson an alert refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonRef {
  pub id:        SubjectId,
  pub name:      String,
  pub teacher:   String,
  pub starts_at: ClockTime,
  pub ends_at:   ClockTime,
}

impl From<&Subject> for LessonRef {
  fn from(s: &Subject) -> Self {
    Self {
      id:        s.id.clone(),
      name:      s.name.clone(),
      teacher:   s.teacher.clone(),
      starts_at: s.starts_at,
      ends_at:   s.ends_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanicAlert {
  pub raised_at: NaiveDateTime,
  /// The lesson in progress, or failing that the next lesson.
  pub lesson:    Option<LessonRef>,
  /// Teachers of today's lessons, first-seen order, without duplicates.
  pub teachers:  Vec<String>,
}

impl PanicAlert {
  pub fn raise(subjects: &[Subject], now: NaiveDateTime) -> Self {
    let lesson = schedule::lesson_in_progress(subjects, now)
      .or_else(|| schedule::find_next_occurrence(subjects, now))
      .map(LessonRef::from);

    let mut teachers: Vec<String> = Vec::new();
    for s in schedule::occurrences_on_day(subjects, now.date()) {
      if !teachers.iter().any(|t| *t == s.teacher) {
        teachers.push(s.teacher.clone());
      }
    }

    Self { raised_at: now, lesson, teachers }
  }
}
