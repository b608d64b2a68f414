//! First-timestamp hint used to anchor date-filtered grep commands.

use once_cell::sync::Lazy;
use regex::Regex;

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(\d{4}-\d{2}-\d{2})[ T]\d{2}:\d{2}:\d{2}(?:\.\d{1,3})?").expect("timestamp pattern compiles")
});

/// First ISO-like timestamp found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampHint {
  /// The full matched token, e.g. `2026-03-18 10:16:05.987`.
  pub raw: String,
  /// Date portion (`YYYY-MM-DD`) used as the grep filter.
  pub date: String,
}

pub fn find_first(text: &str) -> Option<TimestampHint> {
  let caps = TIMESTAMP_RE.captures(text)?;
  Some(TimestampHint {
    raw: caps[0].to_string(),
    date: caps[1].to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn space_and_t_separators_match() {
    let h = find_first("x 2026-03-18 10:16:05.987 ERROR boom").unwrap();
    assert_eq!(h.raw, "2026-03-18 10:16:05.987");
    assert_eq!(h.date, "2026-03-18");

    let h = find_first("2025-01-15T10:30:00Z started").unwrap();
    assert_eq!(h.raw, "2025-01-15T10:30:00");
    assert_eq!(h.date, "2025-01-15");
  }

  #[test]
  fn first_occurrence_wins() {
    let h = find_first("2025-02-01 00:00:01 a\n2024-12-31 23:59:59 b").unwrap();
    assert_eq!(h.date, "2025-02-01");
  }

  #[test]
  fn date_without_time_is_not_a_hint() {
    assert!(find_first("released on 2025-02-01").is_none());
    assert!(find_first("").is_none());
  }
}
