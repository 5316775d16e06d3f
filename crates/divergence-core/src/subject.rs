//! Subjects, the unit of scheduling, and the notes attached to them.
//!
//! The serialised form uses the camelCase keys the host application has always
//! persisted (`startsAt`, `endsAt`, ...), so existing subject lists load
//! unchanged.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  time::{self, ClockTime},
};

/// Colour assigned to subjects created without an explicit one.
pub const DEFAULT_COLOUR: &str = "#50cebb";

/// `strftime` pattern for the display timestamp stamped on new notes.
pub const NOTE_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque subject identifier. Assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
  /// A fresh random identifier (UUID v4, simple form).
  pub fn generate() -> Self { Self(Uuid::new_v4().simple().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for SubjectId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for SubjectId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl fmt::Display for SubjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Notes ───────────────────────────────────────────────────────────────────

/// A free-text note. `date` is a display timestamp, not parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub date:    String,
  pub content: String,
}

impl Note {
  /// Build a note stamped with `at`. Blank content is rejected.
  pub fn recorded_at(content: impl Into<String>, at: NaiveDateTime) -> Result<Self> {
    let content = content.into();
    if content.trim().is_empty() {
      return Err(Error::EmptyNote);
    }
    Ok(Self {
      date: at.format(NOTE_TIMESTAMP_FORMAT).to_string(),
      content,
    })
  }
}

// ─── Subject ─────────────────────────────────────────────────────────────────

/// A lesson, either one-off (on `date`) or weekly on `date`'s weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
  pub id:          SubjectId,
  pub name:        String,
  pub teacher:     String,
  pub colour:      String,
  pub starts_at:   ClockTime,
  pub ends_at:     ClockTime,
  /// Anchor date. For repeating subjects only the weekday matters.
  #[serde(with = "crate::time::date_format")]
  pub date:        NaiveDate,
  #[serde(default)]
  pub repeats:     bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub notes:       Vec<Note>,
}

impl Subject {
  pub fn anchor_weekday(&self) -> Weekday { self.date.weekday() }

  /// Whether this subject meets on `day`.
  ///
  /// Repeating subjects match on weekday alone, with no lower bound at the
  /// anchor date.
  pub fn occurs_on(&self, day: NaiveDate) -> bool {
    self.date == day || (self.repeats && self.anchor_weekday() == day.weekday())
  }

  /// Whether a lesson on `day` would be running at `time`.
  pub fn in_progress(&self, day: NaiveDate, time: ClockTime) -> bool {
    self.occurs_on(day) && self.starts_at <= time && time < self.ends_at
  }
}

// ─── NewSubject ──────────────────────────────────────────────────────────────

/// Raw form input for a subject, validated by [`NewSubject::validate_into`].
#[derive(Debug, Clone, Default)]
pub struct NewSubject {
  pub name:        String,
  pub teacher:     String,
  pub colour:      Option<String>,
  pub starts_at:   String,
  pub ends_at:     String,
  /// `DD/MM/YYYY`.
  pub date:        String,
  pub repeats:     bool,
  pub description: Option<String>,
}

impl NewSubject {
  /// Validate the input and assign a fresh id. The new subject has no notes.
  pub fn validate_into(self) -> Result<Subject> {
    let required = [
      ("name", &self.name),
      ("teacher", &self.teacher),
      ("starts_at", &self.starts_at),
      ("ends_at", &self.ends_at),
      ("date", &self.date),
    ];
    if let Some(&(field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
      return Err(Error::MissingField(field));
    }

    let starts_at: ClockTime = self.starts_at.trim().parse()?;
    let ends_at: ClockTime = self.ends_at.trim().parse()?;
    if ends_at <= starts_at {
      return Err(Error::EndNotAfterStart { starts_at, ends_at });
    }
    let date = time::parse_date(&self.date)?;

    let colour = self
      .colour
      .filter(|c| !c.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_COLOUR.to_owned());
    let description = self.description.filter(|d| !d.trim().is_empty());

    Ok(Subject {
      id: SubjectId::generate(),
      name: self.name.trim().to_owned(),
      teacher: self.teacher.trim().to_owned(),
      colour,
      starts_at,
      ends_at,
      date,
      repeats: self.repeats,
      description,
      notes: Vec::new(),
    })
  }
}
