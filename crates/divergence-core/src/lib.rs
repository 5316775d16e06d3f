//! Core types and pure logic for the Divergence student timetable.
//!
//! No HTTP or database code lives here. The schedule resolver in [`schedule`]
//! is a set of pure functions over a subject snapshot; persistence and text
//! completion are traits ([`store::SubjectStore`], [`study::CompletionBackend`])
//! implemented by the other crates.

pub mod alert;
pub mod clock;
pub mod error;
pub mod schedule;
pub mod state;
pub mod store;
pub mod study;
pub mod subject;
pub mod time;

pub use error::{Error, Result};
