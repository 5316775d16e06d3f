//! Plain-text output for the one-shot subcommands.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime};
use divergence_core::{
  schedule::{self, DaySchedule, Occurrence},
  subject::Subject,
  time::format_date,
};

/// `09:00-10:00  Maths  (Mr Smith)`, marked when weekly.
pub fn lesson_line(subject: &Subject) -> String {
  let weekly = if subject.repeats { "  weekly" } else { "" };
  format!(
    "{}-{}  {}  ({}){weekly}",
    subject.starts_at, subject.ends_at, subject.name, subject.teacher
  )
}

fn day_heading(date: NaiveDate) -> String {
  format!("{} {}", date.format("%A"), format_date(date))
}

pub fn next_lesson(next: Option<&Subject>, now: NaiveDateTime) -> String {
  let Some(subject) = next else {
    return "No upcoming lessons.".into();
  };
  let when = schedule::upcoming_occurrences(std::slice::from_ref(subject), now, 1)
    .first()
    .map(|o| format!(" on {}", day_heading(o.date)))
    .unwrap_or_default();
  format!(
    "Next: {} with {}{when}, {}-{}",
    subject.name, subject.teacher, subject.starts_at, subject.ends_at
  )
}

pub fn upcoming(occurrences: &[Occurrence<'_>]) -> String {
  if occurrences.is_empty() {
    return "No upcoming lessons.".into();
  }
  occurrences
    .iter()
    .map(|o| format!("{}  {}", format_date(o.date), lesson_line(o.subject)))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn day(date: NaiveDate, lessons: &[&Subject]) -> String {
  let mut out = day_heading(date);
  if lessons.is_empty() {
    out.push_str("\n  No lessons.");
  }
  for lesson in lessons {
    let _ = write!(out, "\n  {}", lesson_line(lesson));
  }
  out
}

pub fn week(days: &[DaySchedule<'_>]) -> String {
  days
    .iter()
    .map(|d| day(d.date, &d.lessons))
    .collect::<Vec<_>>()
    .join("\n\n")
}

pub fn subjects(subjects: &[Subject]) -> String {
  if subjects.is_empty() {
    return "No subjects yet. Add one with `divergence add`.".into();
  }
  subjects
    .iter()
    .map(|s| format!("{}  {}  {}", s.id, format_date(s.date), lesson_line(s)))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn notes(subject: &Subject) -> String {
  let mut out = format!("{} notes", subject.name);
  if subject.notes.is_empty() {
    out.push_str("\n  (none)");
  }
  for (i, note) in subject.notes.iter().enumerate() {
    let _ = write!(out, "\n  [{i}] {}  {}", note.date, note.content);
  }
  out
}
