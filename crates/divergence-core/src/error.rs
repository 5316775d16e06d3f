//! Error types for `divergence-core`.

use thiserror::Error;

use crate::{subject::SubjectId, time::ClockTime};

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("invalid date {0:?}: expected DD/MM/YYYY")]
  InvalidDate(String),

  #[error("invalid time {0:?}: expected HH:MM")]
  InvalidTime(String),

  #[error("end time {ends_at} must be after start time {starts_at}")]
  EndNotAfterStart {
    starts_at: ClockTime,
    ends_at:   ClockTime,
  },

  #[error("subject not found: {0}")]
  SubjectNotFound(SubjectId),

  #[error("subject {subject} has no note at index {index}")]
  NoteNotFound { subject: SubjectId, index: usize },

  #[error("note content is empty")]
  EmptyNote,

  #[error("no notes supplied")]
  EmptyNotes,

  #[error("{0} has no notes to review")]
  NoNotes(String),

  #[error("completion response contained no choices")]
  EmptyCompletion,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
