//! # Business-Day Calendar
//!
//! $$
//! \mathcal{C}(t_0, t_1) = \\{ t \in [t_0, t_1] : \text{weekday}(t) \notin \\{\text{Sat}, \text{Sun}\\} \\}
//! $$
//!
//! Weekend-skipping calendar generation. Exchange holidays are not modeled.

use chrono::Datelike;
use chrono::Days;
use chrono::NaiveDate;
use chrono::Weekday;

/// True if `date` falls on a weekday.
pub fn is_business_day(date: NaiveDate) -> bool {
  !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// All business days in `[start, end]`, strictly increasing.
///
/// Returns an empty calendar when `start > end`.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
  let mut days = Vec::new();
  let mut current = start;

  while current <= end {
    if is_business_day(current) {
      days.push(current);
    }
    match current.checked_add_days(Days::new(1)) {
      Some(next) => current = next,
      None => break,
    }
  }

  days
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn skips_weekends() {
    // 2024-01-05 is a Friday, 2024-01-08 a Monday.
    let days = business_days(d(2024, 1, 5), d(2024, 1, 9));
    assert_eq!(days, vec![d(2024, 1, 5), d(2024, 1, 8), d(2024, 1, 9)]);
  }

  #[test]
  fn empty_when_reversed() {
    assert!(business_days(d(2024, 1, 9), d(2024, 1, 5)).is_empty());
  }

  #[test]
  fn single_weekend_day_is_empty() {
    // 2024-01-06 is a Saturday.
    assert!(business_days(d(2024, 1, 6), d(2024, 1, 6)).is_empty());
  }
}
