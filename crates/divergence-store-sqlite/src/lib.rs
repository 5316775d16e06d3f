//! SQLite persistence for Divergence subjects and display settings.
//!
//! Queries run on `tokio_rusqlite`'s background connection thread. Each stored
//! entry is one JSON document under a string key.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
