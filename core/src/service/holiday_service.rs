use std::collections::BTreeSet;

use log::debug;

use crate::holiday::{Holiday, HolidayRules};
use crate::model::window::DateWindow;
use crate::time::format_iso;

/// Projects a region's holidays onto a date window.
pub struct PublicHolidayResolver<R: HolidayRules> {
    rules: R,
}

impl<R: HolidayRules> PublicHolidayResolver<R> {
    pub fn new(rules: R) -> Self {
        Self { rules }
    }

    /// Holidays inside `window`, date-ordered, queried once per calendar year spanned.
    pub fn holidays_in(&self, window: Option<&DateWindow>) -> Vec<Holiday> {
        let window = match window {
            Some(w) if !w.is_reversed() => w,
            _ => return Vec::new(),
        };

        let mut holidays: Vec<Holiday> = window
            .years()
            .flat_map(|year| self.rules.year_holidays(year))
            .filter(|h| window.contains(h.date))
            .collect();
        holidays.sort();
        debug!(
            "{} public holidays in {} for {}",
            holidays.len(),
            window.label(),
            self.rules.region_name()
        );
        holidays
    }

    /// `YYYY-MM-DD` keys of the holidays inside `window`.
    pub fn resolve(&self, window: Option<&DateWindow>) -> BTreeSet<String> {
        self.holidays_in(window)
            .into_iter()
            .map(|h| format_iso(h.date))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::{FixedHolidays, VictoriaRules};
    use chrono::NaiveDate;
    use std::cell::RefCell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct RecordingRules {
        queried: RefCell<Vec<i32>>,
    }

    impl HolidayRules for RecordingRules {
        fn region_name(&self) -> &str {
            "recording"
        }

        fn year_holidays(&self, year: i32) -> Vec<Holiday> {
            self.queried.borrow_mut().push(year);
            vec![Holiday::new(date(year, 1, 1), "New Year"), Holiday::new(date(year, 12, 25), "Christmas")]
        }
    }

    #[test]
    fn test_queries_each_spanned_year_once() {
        let resolver = PublicHolidayResolver::new(RecordingRules {
            queried: RefCell::new(Vec::new()),
        });
        let window = DateWindow::new(date(2024, 12, 1), date(2026, 1, 1));
        let resolved = resolver.resolve(Some(&window));

        assert_eq!(*resolver.rules.queried.borrow(), vec![2024, 2025, 2026]);
        assert_eq!(
            resolved.into_iter().collect::<Vec<_>>(),
            vec!["2024-12-25", "2025-01-01", "2025-12-25", "2026-01-01"]
        );
    }

    #[test]
    fn test_absent_or_reversed_window_is_empty() {
        let resolver = PublicHolidayResolver::new(VictoriaRules);
        assert!(resolver.resolve(None).is_empty());
        let reversed = DateWindow::new(date(2025, 12, 31), date(2025, 1, 1));
        assert!(resolver.resolve(Some(&reversed)).is_empty());
    }

    #[test]
    fn test_victoria_holidays_in_financial_year_window() {
        let resolver = PublicHolidayResolver::new(VictoriaRules);
        let window = DateWindow::new(date(2025, 10, 1), date(2025, 11, 30));
        let resolved = resolver.resolve(Some(&window));
        assert_eq!(resolved.into_iter().collect::<Vec<_>>(), vec!["2025-11-04"]);

        let named = resolver.holidays_in(Some(&window));
        assert_eq!(named[0].name, "Melbourne Cup Day");
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let resolver = PublicHolidayResolver::new(FixedHolidays::new(
            "fixed",
            vec![Holiday::new(date(2025, 3, 10), "Labour Day")],
        ));
        let exact = DateWindow::new(date(2025, 3, 10), date(2025, 3, 10));
        assert_eq!(resolver.resolve(Some(&exact)).len(), 1);
        let after = DateWindow::new(date(2025, 3, 11), date(2025, 3, 31));
        assert!(resolver.resolve(Some(&after)).is_empty());
    }
}
