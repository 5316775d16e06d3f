//! [`SqliteStore`]: [`SubjectStore`] over a SQLite key/value table.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use serde::{Serialize, de::DeserializeOwned};

use divergence_core::{
  store::{DYSLEXIA_MODE_KEY, DisplayMode, SUBJECTS_KEY, SubjectStore},
  subject::Subject,
};

use crate::{
  Result,
  encode::{decode_value, encode_dt, encode_value},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A key/value store backed by a single SQLite file.
///
/// Clones share one background connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a throwaway in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read and decode the value stored under `key`, if any.
  pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
  where
    T: DeserializeOwned + Send + 'static,
  {
    let key_owned = key.to_owned();
    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM kv WHERE key = ?1",
              rusqlite::params![key_owned],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(|r| decode_value(key, &r)).transpose()
  }

  /// Encode `value` and store it under `key`, replacing any previous value.
  pub async fn set<T>(&self, key: &str, value: &T) -> Result<()>
  where
    T: Serialize + ?Sized,
  {
    let key_owned  = key.to_owned();
    let value_str  = encode_value(value)?;
    let at_str     = encode_dt(Utc::now());
    let value_size = value_str.len();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
          rusqlite::params![key_owned, value_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(key, bytes = value_size, "stored value");
    Ok(())
  }
}

// ─── SubjectStore impl ───────────────────────────────────────────────────────

impl SubjectStore for SqliteStore {
  type Error = crate::Error;

  async fn list_subjects(&self) -> Result<Vec<Subject>> {
    let subjects: Option<Vec<Subject>> = self.get(SUBJECTS_KEY).await?;
    Ok(subjects.unwrap_or_default())
  }

  async fn replace_subjects(&self, subjects: Vec<Subject>) -> Result<()> {
    self.set(SUBJECTS_KEY, &subjects).await
  }

  async fn display_mode(&self) -> Result<DisplayMode> {
    let mode: Option<DisplayMode> = self.get(DYSLEXIA_MODE_KEY).await?;
    Ok(mode.unwrap_or_default())
  }

  async fn set_display_mode(&self, mode: DisplayMode) -> Result<()> {
    self.set(DYSLEXIA_MODE_KEY, &mode).await
  }
}
