//! The `SubjectStore` trait and the display-mode flag it persists.
//!
//! The trait is implemented by storage backends (e.g.
//! `divergence-store-sqlite`). Backends behave as a string-keyed key/value
//! store holding two entries: the subject list and the dyslexia-mode flag.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::subject::Subject;

/// Key under which the subject list is stored.
pub const SUBJECTS_KEY: &str = "subjects";

/// Key under which the display-mode flag is stored.
pub const DYSLEXIA_MODE_KEY: &str = "dyslexiaMode";

// ─── Display mode ────────────────────────────────────────────────────────────

/// How text is presented. Persisted as a boolean (`true` = dyslexia mode).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(from = "bool", into = "bool")]
#[strum(serialize_all = "lowercase")]
pub enum DisplayMode {
  #[default]
  Standard,
  Dyslexia,
}

impl DisplayMode {
  pub fn is_dyslexia(self) -> bool { matches!(self, Self::Dyslexia) }

  pub fn toggled(self) -> Self {
    match self {
      Self::Standard => Self::Dyslexia,
      Self::Dyslexia => Self::Standard,
    }
  }
}

impl From<bool> for DisplayMode {
  fn from(dyslexia: bool) -> Self {
    if dyslexia { Self::Dyslexia } else { Self::Standard }
  }
}

impl From<DisplayMode> for bool {
  fn from(mode: DisplayMode) -> Self { mode.is_dyslexia() }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the host's subject persistence.
///
/// Writes replace the whole collection; readers always receive an owned
/// snapshot, so a write can never be observed half-applied.
pub trait SubjectStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The stored subjects in insertion order; empty if nothing was saved yet.
  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// Replace the stored subject list.
  fn replace_subjects(
    &self,
    subjects: Vec<Subject>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The stored display mode; [`DisplayMode::Standard`] if never set.
  fn display_mode(
    &self,
  ) -> impl Future<Output = Result<DisplayMode, Self::Error>> + Send + '_;

  fn set_display_mode(
    &self,
    mode: DisplayMode,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
