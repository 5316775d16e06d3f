//! Conversions between stored text and typed values: compact JSON for values,
//! RFC 3339 for timestamps.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

/// Decode the stored JSON for `key`, naming the key on failure.
pub fn decode_value<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
  serde_json::from_str(raw).map_err(|source| Error::Corrupt {
    key: key.to_owned(),
    source,
  })
}
