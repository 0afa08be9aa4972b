use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::time::{format_date_range, is_date_in_range};

/// User-selected date window, inclusive on both ends.
///
/// `end >= start` is not enforced here; a reversed window simply contains no dates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        is_date_in_range(date, self.start, self.end)
    }

    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// Calendar years touched by the window, empty when reversed.
    pub fn years(&self) -> RangeInclusive<i32> {
        if self.is_reversed() {
            // start > end makes the range empty
            return 1..=0;
        }
        self.start.year()..=self.end.year()
    }

    pub fn label(&self) -> String {
        format_date_range(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_years_spanned() {
        let window = DateWindow::new(date(2024, 11, 1), date(2026, 2, 1));
        assert_eq!(window.years().collect::<Vec<_>>(), vec![2024, 2025, 2026]);

        let reversed = DateWindow::new(date(2026, 2, 1), date(2024, 11, 1));
        assert!(reversed.is_reversed());
        assert_eq!(reversed.years().count(), 0);
        assert!(!reversed.contains(date(2025, 1, 1)));
    }
}
