//! Recurring-schedule resolution.
//!
//! Every function here is pure: it takes a read-only subject snapshot and a
//! reference date or instant, and returns references into that snapshot.
//! Results are deterministic for identical inputs, and ties are always broken
//! by position in the input slice.

use std::{cmp::Reverse, collections::BinaryHeap};

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::{subject::Subject, time::ClockTime};

// ─── Next lesson ─────────────────────────────────────────────────────────────

/// The subject with the soonest upcoming occurrence relative to `now`.
///
/// Subjects meeting later today win, earliest start first. Failing that, the
/// candidates are one-off subjects dated after today plus every repeating
/// subject, ordered by anchor date and then start time.
///
/// The second stage compares *anchor* dates, not true next-occurrence dates,
/// so a repeating subject anchored long ago sorts ahead of any dated one-off.
/// Use [`upcoming_occurrences`] for strict chronological order.
pub fn find_next_occurrence(subjects: &[Subject], now: NaiveDateTime) -> Option<&Subject> {
  let today = now.date();
  let current = ClockTime::from(now.time());

  // `min_by_key` returns the first of several equal minima, which gives the
  // stable tie-break on input order.
  subjects
    .iter()
    .filter(|s| s.occurs_on(today) && s.starts_at > current)
    .min_by_key(|s| s.starts_at)
    .or_else(|| {
      subjects
        .iter()
        .filter(|s| s.repeats || s.date > today)
        .min_by_key(|s| (s.date, s.starts_at))
    })
}

// ─── Day occupancy ───────────────────────────────────────────────────────────

/// Subjects meeting on `day`, ascending by start time.
pub fn occurrences_on_day(subjects: &[Subject], day: NaiveDate) -> Vec<&Subject> {
  let mut lessons: Vec<&Subject> = subjects.iter().filter(|s| s.occurs_on(day)).collect();
  // Stable sort: equal start times keep input order.
  lessons.sort_by_key(|s| s.starts_at);
  lessons
}

/// The lesson running at `now`, if any. Earliest start wins when lessons
/// overlap.
pub fn lesson_in_progress(subjects: &[Subject], now: NaiveDateTime) -> Option<&Subject> {
  let current = ClockTime::from(now.time());
  subjects
    .iter()
    .filter(|s| s.in_progress(now.date(), current))
    .min_by_key(|s| s.starts_at)
}

// ─── Occurrences ─────────────────────────────────────────────────────────────

/// A concrete calendar-date instance of a subject meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
  pub subject: &'a Subject,
  pub date:    NaiveDate,
}

impl Occurrence<'_> {
  pub fn starts(&self) -> NaiveDateTime { self.date.and_time(self.subject.starts_at.to_naive_time()) }

  pub fn ends(&self) -> NaiveDateTime { self.date.and_time(self.subject.ends_at.to_naive_time()) }
}

/// First date on or after `from` on which `subject` meets.
///
/// `None` for a one-off subject dated before `from`.
pub fn next_occurrence_date(subject: &Subject, from: NaiveDate) -> Option<NaiveDate> {
  if !subject.repeats {
    return (subject.date >= from).then_some(subject.date);
  }
  let target = subject.anchor_weekday().num_days_from_sunday();
  let start = from.weekday().num_days_from_sunday();
  let ahead = (target + 7 - start) % 7;
  from.checked_add_days(Days::new(u64::from(ahead)))
}

/// The next `limit` occurrences strictly after `now`, in true chronological
/// order (date, then start time, then input order).
///
/// Subjects are merged week by week, so work is bounded by `limit` plus the
/// number of subjects regardless of how large `limit` is.
pub fn upcoming_occurrences(
  subjects: &[Subject],
  now: NaiveDateTime,
  limit: usize,
) -> Vec<Occurrence<'_>> {
  let today = now.date();
  let current = ClockTime::from(now.time());

  let mut queue: BinaryHeap<Reverse<(NaiveDate, ClockTime, usize)>> = BinaryHeap::new();
  for (index, subject) in subjects.iter().enumerate() {
    let Some(mut first) = next_occurrence_date(subject, today) else {
      continue;
    };
    if first == today && subject.starts_at <= current {
      if !subject.repeats {
        continue;
      }
      match first.checked_add_days(Days::new(7)) {
        Some(d) => first = d,
        None => continue,
      }
    }
    queue.push(Reverse((first, subject.starts_at, index)));
  }

  let mut found = Vec::new();
  while found.len() < limit {
    let Some(Reverse((date, starts_at, index))) = queue.pop() else {
      break;
    };
    let subject = &subjects[index];
    if subject.repeats
      && let Some(next) = date.checked_add_days(Days::new(7))
    {
      queue.push(Reverse((next, starts_at, index)));
    }
    found.push(Occurrence { subject, date });
  }
  found
}

// ─── Weeks ───────────────────────────────────────────────────────────────────

/// The seven dates of the Sunday-first week containing `day`.
pub fn week_containing(day: NaiveDate) -> Vec<NaiveDate> {
  let back = Days::new(u64::from(day.weekday().num_days_from_sunday()));
  let start = day.checked_sub_days(back).unwrap_or(day);
  start.iter_days().take(7).collect()
}

/// One day's lessons within a week view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule<'a> {
  pub date:    NaiveDate,
  pub lessons: Vec<&'a Subject>,
}

/// [`occurrences_on_day`] for each day of the week containing `day`.
pub fn week_schedule(subjects: &[Subject], day: NaiveDate) -> Vec<DaySchedule<'_>> {
  week_containing(day)
    .into_iter()
    .map(|date| DaySchedule {
      date,
      lessons: occurrences_on_day(subjects, date),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::Weekday;

  use super::*;
  use crate::subject::SubjectId;

  fn date(d: u32, m: u32, y: i32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime { day.and_hms_opt(h, m, 0).unwrap() }

  fn lesson(id: &str, day: NaiveDate, starts: &str, repeats: bool) -> Subject {
    let starts_at: ClockTime = starts.parse().unwrap();
    let ends_at = ClockTime::new(starts_at.hour() + 1, starts_at.minute()).unwrap();
    Subject {
      id: SubjectId::from(id),
      name: format!("Subject {id}"),
      teacher: "Teacher".into(),
      colour: "#50cebb".into(),
      starts_at,
      ends_at,
      date: day,
      repeats,
      description: None,
      notes: Vec::new(),
    }
  }

  fn ids<'a>(subjects: impl IntoIterator<Item = &'a Subject>) -> Vec<&'a str> {
    subjects.into_iter().map(|s| s.id.as_str()).collect()
  }

  // ── find_next_occurrence ────────────────────────────────────────────────

  #[test]
  fn later_lesson_today_is_next() {
    let today = date(10, 1, 2024);
    let subjects = vec![lesson("a", today, "09:00", false), lesson("b", today, "14:00", false)];
    let next = find_next_occurrence(&subjects, at(today, 10, 0)).unwrap();
    assert_eq!(next.id.as_str(), "b");
  }

  #[test]
  fn empty_collection_has_no_next() {
    let now = at(date(10, 1, 2024), 10, 0);
    assert!(find_next_occurrence(&[], now).is_none());
    assert!(occurrences_on_day(&[], now.date()).is_empty());
  }

  #[test]
  fn equal_start_times_keep_input_order() {
    let today = date(10, 1, 2024);
    let subjects = vec![lesson("first", today, "09:00", false), lesson("second", today, "09:00", false)];
    let next = find_next_occurrence(&subjects, at(today, 8, 0)).unwrap();
    assert_eq!(next.id.as_str(), "first");
  }

  #[test]
  fn lesson_starting_this_minute_is_not_upcoming() {
    let today = date(10, 1, 2024);
    let tomorrow = date(11, 1, 2024);
    let subjects = vec![lesson("now", today, "10:00", false), lesson("tomorrow", tomorrow, "09:00", false)];
    let now = today.and_hms_opt(10, 0, 30).unwrap();
    assert_eq!(find_next_occurrence(&subjects, now).unwrap().id.as_str(), "tomorrow");
  }

  #[test]
  fn future_one_off_is_found_when_nothing_else_qualifies() {
    let today = date(10, 1, 2024);
    let subjects = vec![
      lesson("past", date(2, 1, 2024), "09:00", false),
      lesson("earlier-today", today, "08:00", false),
      lesson("future", date(15, 1, 2024), "11:00", false),
    ];
    let next = find_next_occurrence(&subjects, at(today, 12, 0)).unwrap();
    assert_eq!(next.id.as_str(), "future");
  }

  #[test]
  fn only_past_one_offs_yield_none() {
    let today = date(10, 1, 2024);
    let subjects = vec![lesson("past", date(2, 1, 2024), "09:00", false), lesson("gone", today, "08:00", false)];
    assert!(find_next_occurrence(&subjects, at(today, 9, 0)).is_none());
  }

  #[test]
  fn repeating_lesson_on_todays_weekday_counts_as_today() {
    // 01/01/2024 is a Monday; 15/01/2024 is a later Monday.
    let today = date(15, 1, 2024);
    let subjects = vec![
      lesson("future", date(16, 1, 2024), "08:00", false),
      lesson("weekly", date(1, 1, 2024), "13:00", true),
    ];
    let next = find_next_occurrence(&subjects, at(today, 9, 0)).unwrap();
    assert_eq!(next.id.as_str(), "weekly");
  }

  #[test]
  fn future_candidates_are_ordered_by_anchor_date() {
    let today = date(10, 1, 2024);
    // The repeating lesson's anchor is in the past, so it sorts before the
    // one-off tomorrow even though its real next meeting is later.
    let subjects = vec![
      lesson("tomorrow", date(11, 1, 2024), "09:00", false),
      lesson("weekly", date(1, 1, 2024), "09:00", true),
    ];
    let next = find_next_occurrence(&subjects, at(today, 12, 0)).unwrap();
    assert_eq!(next.id.as_str(), "weekly");
  }

  #[test]
  fn future_candidates_with_same_anchor_use_start_time() {
    let today = date(10, 1, 2024);
    let friday = date(12, 1, 2024);
    let subjects = vec![lesson("late", friday, "15:00", false), lesson("early", friday, "09:30", false)];
    let next = find_next_occurrence(&subjects, at(today, 12, 0)).unwrap();
    assert_eq!(next.id.as_str(), "early");
  }

  #[test]
  fn repeated_queries_agree() {
    let today = date(10, 1, 2024);
    let subjects = vec![
      lesson("a", today, "09:00", false),
      lesson("b", date(3, 1, 2024), "14:00", true),
      lesson("c", date(20, 1, 2024), "10:00", false),
    ];
    let now = at(today, 10, 0);
    assert_eq!(find_next_occurrence(&subjects, now), find_next_occurrence(&subjects, now));
    assert_eq!(occurrences_on_day(&subjects, today), occurrences_on_day(&subjects, today));
  }

  // ── occurrences_on_day ──────────────────────────────────────────────────

  #[test]
  fn weekly_subject_appears_on_matching_weekday_only() {
    let monday = date(1, 1, 2024);
    let subjects = vec![lesson("weekly", monday, "08:00", true)];

    let next_monday = date(8, 1, 2024);
    let wednesday = date(3, 1, 2024);
    assert_eq!(ids(occurrences_on_day(&subjects, next_monday)), ["weekly"]);
    assert!(occurrences_on_day(&subjects, wednesday).is_empty());
  }

  #[test]
  fn weekly_subject_matches_before_its_anchor() {
    let subjects = vec![lesson("weekly", date(1, 1, 2024), "08:00", true)];
    for day in [date(6, 3, 2023), date(25, 12, 2023), date(2, 12, 2024)] {
      assert_eq!(day.weekday(), Weekday::Mon);
      assert_eq!(ids(occurrences_on_day(&subjects, day)), ["weekly"]);
    }
  }

  #[test]
  fn one_off_subject_only_on_its_date() {
    let subjects = vec![lesson("once", date(1, 1, 2024), "08:00", false)];
    assert_eq!(ids(occurrences_on_day(&subjects, date(1, 1, 2024))), ["once"]);
    assert!(occurrences_on_day(&subjects, date(8, 1, 2024)).is_empty());
  }

  #[test]
  fn day_results_are_sorted_and_stable() {
    let day = date(1, 1, 2024);
    let subjects = vec![
      lesson("c", day, "14:00", false),
      lesson("a1", day, "09:00", false),
      lesson("weekly", date(25, 12, 2023), "11:00", true),
      lesson("a2", day, "09:00", false),
    ];
    let lessons = occurrences_on_day(&subjects, day);
    assert_eq!(ids(lessons.iter().copied()), ["a1", "a2", "weekly", "c"]);
    assert!(lessons.windows(2).all(|w| w[0].starts_at <= w[1].starts_at));
  }

  #[test]
  fn in_progress_lesson() {
    let day = date(1, 1, 2024);
    let subjects = vec![lesson("a", day, "09:00", false), lesson("b", day, "11:00", false)];
    assert_eq!(lesson_in_progress(&subjects, at(day, 9, 59)).unwrap().id.as_str(), "a");
    assert!(lesson_in_progress(&subjects, at(day, 10, 0)).is_none());
    assert!(lesson_in_progress(&subjects, at(day, 8, 59)).is_none());
  }

  // ── occurrences ─────────────────────────────────────────────────────────

  #[test]
  fn next_occurrence_date_for_weekly_and_one_off() {
    let weekly = lesson("weekly", date(1, 1, 2024), "08:00", true);
    // Wednesday 03/01 → following Monday 08/01.
    assert_eq!(next_occurrence_date(&weekly, date(3, 1, 2024)), Some(date(8, 1, 2024)));
    assert_eq!(next_occurrence_date(&weekly, date(8, 1, 2024)), Some(date(8, 1, 2024)));

    let once = lesson("once", date(5, 1, 2024), "08:00", false);
    assert_eq!(next_occurrence_date(&once, date(3, 1, 2024)), Some(date(5, 1, 2024)));
    assert_eq!(next_occurrence_date(&once, date(6, 1, 2024)), None);
  }

  #[test]
  fn upcoming_is_chronological() {
    let wednesday = date(10, 1, 2024);
    let subjects = vec![
      lesson("weekly-mon", date(4, 3, 2019), "09:00", true),
      lesson("thursday", date(11, 1, 2024), "09:00", false),
    ];
    let upcoming = upcoming_occurrences(&subjects, at(wednesday, 12, 0), 3);
    let got: Vec<_> = upcoming.iter().map(|o| (o.subject.id.as_str(), o.date)).collect();
    assert_eq!(
      got,
      [
        ("thursday", date(11, 1, 2024)),
        ("weekly-mon", date(15, 1, 2024)),
        ("weekly-mon", date(22, 1, 2024)),
      ]
    );
  }

  #[test]
  fn upcoming_skips_todays_started_lessons() {
    let monday = date(15, 1, 2024);
    let subjects = vec![lesson("weekly", date(1, 1, 2024), "09:00", true), lesson("once", monday, "09:00", false)];
    let upcoming = upcoming_occurrences(&subjects, at(monday, 9, 0), 2);
    assert!(upcoming.iter().all(|o| o.subject.id.as_str() == "weekly"));
    assert_eq!(upcoming[0].date, date(22, 1, 2024));
    assert_eq!(upcoming[0].starts(), at(date(22, 1, 2024), 9, 0));
    assert_eq!(upcoming[1].date, date(29, 1, 2024));
  }

  #[test]
  fn upcoming_respects_limit() {
    let subjects = vec![lesson("weekly", date(1, 1, 2024), "09:00", true)];
    assert!(upcoming_occurrences(&subjects, at(date(1, 1, 2024), 8, 0), 0).is_empty());
    assert_eq!(upcoming_occurrences(&subjects, at(date(1, 1, 2024), 8, 0), 4).len(), 4);
  }

  #[test]
  fn upcoming_interleaves_weekly_subjects_up_to_a_large_limit() {
    let subjects = vec![
      lesson("tue", date(2, 1, 2024), "10:00", true),
      lesson("mon", date(1, 1, 2024), "09:00", true),
    ];
    let upcoming = upcoming_occurrences(&subjects, at(date(1, 1, 2024), 8, 0), 1000);
    assert_eq!(upcoming.len(), 1000);
    assert!(upcoming.windows(2).all(|w| w[0].starts() < w[1].starts()));
    assert_eq!(upcoming[0].subject.id.as_str(), "mon");
    assert_eq!(upcoming[1].subject.id.as_str(), "tue");
    assert_eq!(upcoming[999].date, date(2, 1, 2024) + Days::new(7 * 499));
  }

  #[test]
  fn upcoming_one_offs_stop_short_of_an_unbounded_limit() {
    let subjects = vec![
      lesson("later", date(12, 1, 2024), "09:00", false),
      lesson("sooner", date(11, 1, 2024), "09:00", false),
      lesson("past", date(9, 1, 2024), "09:00", false),
    ];
    let upcoming = upcoming_occurrences(&subjects, at(date(10, 1, 2024), 8, 0), usize::MAX);
    let ids: Vec<_> = upcoming.iter().map(|o| o.subject.id.as_str()).collect();
    assert_eq!(ids, ["sooner", "later"]);
  }

  // ── weeks ───────────────────────────────────────────────────────────────

  #[test]
  fn week_starts_on_sunday() {
    let week = week_containing(date(3, 1, 2024));
    assert_eq!(week.len(), 7);
    assert_eq!(week[0], date(31, 12, 2023));
    assert_eq!(week[0].weekday(), Weekday::Sun);
    assert_eq!(week[6], date(6, 1, 2024));

    let sunday = date(7, 1, 2024);
    assert_eq!(week_containing(sunday)[0], sunday);
  }

  #[test]
  fn week_schedule_places_weekly_lesson_once() {
    let subjects = vec![lesson("weekly", date(1, 1, 2024), "08:00", true)];
    let week = week_schedule(&subjects, date(17, 1, 2024));
    let busy: Vec<_> = week.iter().filter(|d| !d.lessons.is_empty()).map(|d| d.date).collect();
    assert_eq!(busy, [date(15, 1, 2024)]);
  }
}
