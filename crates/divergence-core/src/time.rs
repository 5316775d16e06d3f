//! Codecs for the zero-padded `HH:MM` times and `DD/MM/YYYY` dates stored on
//! subjects.
//!
//! Both formats are parsed once, at the storage or input boundary. Inside the
//! crate a time of day is a [`ClockTime`] and a calendar date is a
//! [`NaiveDate`], so comparisons are chronological rather than textual.

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Error, Result};

/// `strftime` pattern for anchor dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// ─── ClockTime ───────────────────────────────────────────────────────────────

/// A wall-clock time of day with minute resolution.
///
/// Ordering is chronological. Because the textual form is always zero-padded,
/// it agrees with a lexicographic comparison of the `HH:MM` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
  hour:   u8,
  minute: u8,
}

impl ClockTime {
  /// Returns `None` unless `hour < 24` and `minute < 60`.
  pub fn new(hour: u8, minute: u8) -> Option<Self> {
    (hour < 24 && minute < 60).then_some(Self { hour, minute })
  }

  pub fn hour(self) -> u8 { self.hour }

  pub fn minute(self) -> u8 { self.minute }

  /// Minutes elapsed since midnight.
  pub fn minutes_since_midnight(self) -> u16 {
    u16::from(self.hour) * 60 + u16::from(self.minute)
  }

  pub fn to_naive_time(self) -> NaiveTime {
    NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
      .unwrap_or_default()
  }

  /// Twelve-hour rendering used in listings, e.g. `9:05 AM`.
  pub fn display_12h(self) -> String {
    let period = if self.hour >= 12 { "PM" } else { "AM" };
    let hour = match self.hour % 12 {
      0 => 12,
      h => h,
    };
    format!("{hour}:{:02} {period}", self.minute)
  }
}

/// Truncates to the minute.
impl From<NaiveTime> for ClockTime {
  fn from(t: NaiveTime) -> Self {
    Self {
      hour:   t.hour() as u8,
      minute: t.minute() as u8,
    }
  }
}

impl fmt::Display for ClockTime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02}:{:02}", self.hour, self.minute)
  }
}

impl FromStr for ClockTime {
  type Err = Error;

  /// Accepts exactly `HH:MM`.
  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidTime(s.to_owned());

    let (h, m) = s.split_once(':').ok_or_else(invalid)?;
    if h.len() != 2 || m.len() != 2 {
      return Err(invalid());
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }

    let hour: u8 = h.parse().map_err(|_| invalid())?;
    let minute: u8 = m.parse().map_err(|_| invalid())?;
    Self::new(hour, minute).ok_or_else(invalid)
  }
}

impl Serialize for ClockTime {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for ClockTime {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(de::Error::custom)
  }
}

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

/// `#[serde(with = "...")]` adapter storing a [`NaiveDate`] as `DD/MM/YYYY`.
pub mod date_format {
  use chrono::NaiveDate;
  use serde::{Deserialize, Deserializer, Serializer, de};

  pub fn serialize<S: Serializer>(
    date: &NaiveDate,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(super::DATE_FORMAT))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    super::parse_date(&raw).map_err(de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_zero_padded_times() {
    let t: ClockTime = "09:05".parse().unwrap();
    assert_eq!((t.hour(), t.minute()), (9, 5));
    assert_eq!(t.to_string(), "09:05");
    assert_eq!(t.minutes_since_midnight(), 545);
  }

  #[test]
  fn rejects_malformed_times() {
    for bad in ["9:05", "24:00", "12:60", "ab:cd", "1200", "", "12:5 "] {
      assert!(
        matches!(bad.parse::<ClockTime>(), Err(Error::InvalidTime(_))),
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn ordering_matches_string_ordering() {
    let samples = ["00:00", "08:59", "09:00", "09:10", "12:00", "23:59"];
    for a in samples {
      for b in samples {
        let (ta, tb): (ClockTime, ClockTime) = (a.parse().unwrap(), b.parse().unwrap());
        assert_eq!(ta.cmp(&tb), a.cmp(b), "{a} vs {b}");
      }
    }
  }

  #[test]
  fn twelve_hour_display() {
    let cases = [("00:30", "12:30 AM"), ("09:00", "9:00 AM"), ("12:15", "12:15 PM"), ("17:45", "5:45 PM")];
    for (raw, shown) in cases {
      assert_eq!(raw.parse::<ClockTime>().unwrap().display_12h(), shown);
    }
  }

  #[test]
  fn from_naive_time_truncates_seconds() {
    let t = NaiveTime::from_hms_opt(10, 0, 59).unwrap();
    assert_eq!(ClockTime::from(t).to_string(), "10:00");
  }

  #[test]
  fn dates_use_day_month_year() {
    let d = parse_date("01/02/2024").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(format_date(d), "01/02/2024");
    assert!(matches!(parse_date("2024-02-01"), Err(Error::InvalidDate(_))));
    assert!(matches!(parse_date("31/02/2024"), Err(Error::InvalidDate(_))));
  }
}
