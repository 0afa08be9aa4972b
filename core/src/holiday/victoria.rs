//! Victoria (Australia) public holidays.
//!
//! * New Year's Day (Jan 1, Monday substitute when on a weekend)
//! * Australia Day (Jan 26, Monday substitute when on a weekend)
//! * Labour Day (2nd Monday in March)
//! * Good Friday, Easter Saturday, Easter Sunday, Easter Monday
//! * ANZAC Day (Apr 25)
//! * King's Birthday (2nd Monday in June; Queen's Birthday before 2023)
//! * Friday before the AFL Grand Final (since 2015)
//! * Melbourne Cup Day (1st Tuesday in November)
//! * Christmas Day and Boxing Day, with substitutes

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::{Holiday, HolidayRules};

#[derive(Debug, Clone, Copy, Default)]
pub struct VictoriaRules;

/// Grand Final Friday dates that do not follow the last-Saturday-of-September pattern.
const GRAND_FINAL_FRIDAYS: &[(i32, u32, u32)] = &[(2015, 10, 2), (2016, 9, 30), (2020, 10, 23)];

impl HolidayRules for VictoriaRules {
    fn region_name(&self) -> &str {
        "AU-VIC"
    }

    fn year_holidays(&self, year: i32) -> Vec<Holiday> {
        let mut holidays = Vec::new();
        let mut push = |date: Option<NaiveDate>, name: &str| {
            if let Some(date) = date {
                holidays.push(Holiday::new(date, name));
            }
        };

        let new_year = ymd(year, 1, 1);
        push(new_year, "New Year's Day");
        push(new_year.and_then(monday_substitute), "New Year's Day (substitute)");

        let australia_day = ymd(year, 1, 26);
        push(australia_day, "Australia Day");
        push(australia_day.and_then(monday_substitute), "Australia Day (substitute)");

        push(NaiveDate::from_weekday_of_month_opt(year, 3, Weekday::Mon, 2), "Labour Day");

        if let Some(easter) = easter_sunday(year) {
            push(Some(easter - Duration::days(2)), "Good Friday");
            push(Some(easter - Duration::days(1)), "Easter Saturday");
            push(Some(easter), "Easter Sunday");
            push(Some(easter + Duration::days(1)), "Easter Monday");
        }

        push(ymd(year, 4, 25), "ANZAC Day");

        let sovereign = if year >= 2023 { "King's Birthday" } else { "Queen's Birthday" };
        push(NaiveDate::from_weekday_of_month_opt(year, 6, Weekday::Mon, 2), sovereign);

        push(grand_final_friday(year), "Friday before the AFL Grand Final");

        push(NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Tue, 1), "Melbourne Cup Day");

        push(ymd(year, 12, 25), "Christmas Day");
        push(ymd(year, 12, 26), "Boxing Day");
        if let Some(christmas) = ymd(year, 12, 25) {
            match christmas.weekday() {
                // Christmas Sat/Boxing Sun -> Mon 27 and Tue 28
                Weekday::Sat => {
                    push(ymd(year, 12, 27), "Christmas Day (substitute)");
                    push(ymd(year, 12, 28), "Boxing Day (substitute)");
                }
                // Boxing Day takes Mon 26
                Weekday::Sun => push(ymd(year, 12, 27), "Christmas Day (substitute)"),
                // Boxing Day on Sat
                Weekday::Fri => push(ymd(year, 12, 28), "Boxing Day (substitute)"),
                _ => {}
            }
        }

        holidays.sort();
        holidays
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn monday_substitute(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => Some(date + Duration::days(2)),
        Weekday::Sun => Some(date + Duration::days(1)),
        _ => None,
    }
}

fn grand_final_friday(year: i32) -> Option<NaiveDate> {
    if year < 2015 {
        return None;
    }
    if let Some(&(y, m, d)) = GRAND_FINAL_FRIDAYS.iter().find(|(y, _, _)| *y == year) {
        return ymd(y, m, d);
    }
    // Projected: Friday before the last Saturday in September.
    let end_of_september = ymd(year, 9, 30)?;
    let back_to_saturday = (end_of_september.weekday().num_days_from_monday() + 7
        - Weekday::Sat.num_days_from_monday())
        % 7;
    let last_saturday = end_of_september - Duration::days(back_to_saturday as i64);
    Some(last_saturday - Duration::days(1))
}

/// Gregorian Easter Sunday (anonymous algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    ymd(year, month as u32, day as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(year: i32) -> Vec<NaiveDate> {
        VictoriaRules.year_holidays(year).into_iter().map(|h| h.date).collect()
    }

    #[test]
    fn test_easter() {
        assert_eq!(easter_sunday(2024), Some(date(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(date(2025, 4, 20)));
        assert_eq!(easter_sunday(2026), Some(date(2026, 4, 5)));
    }

    #[test]
    fn test_victoria_2025() {
        assert_eq!(
            dates(2025),
            vec![
                date(2025, 1, 1),
                date(2025, 1, 26),
                date(2025, 1, 27), // Australia Day on Sunday
                date(2025, 3, 10),
                date(2025, 4, 18),
                date(2025, 4, 19),
                date(2025, 4, 20),
                date(2025, 4, 21),
                date(2025, 4, 25),
                date(2025, 6, 9),
                date(2025, 9, 26),
                date(2025, 11, 4),
                date(2025, 12, 25),
                date(2025, 12, 26),
            ]
        );
    }

    #[test]
    fn test_christmas_substitutes() {
        // 2021: Christmas on Saturday
        let y2021 = dates(2021);
        assert!(y2021.contains(&date(2021, 12, 27)));
        assert!(y2021.contains(&date(2021, 12, 28)));

        // 2022: Christmas on Sunday, Boxing Day on Monday
        let y2022 = dates(2022);
        assert!(y2022.contains(&date(2022, 12, 26)));
        assert!(y2022.contains(&date(2022, 12, 27)));
        assert!(!y2022.contains(&date(2022, 12, 28)));

        // 2026: Boxing Day on Saturday
        let y2026 = dates(2026);
        assert!(y2026.contains(&date(2026, 12, 28)));
    }

    #[test]
    fn test_grand_final_friday() {
        assert_eq!(grand_final_friday(2014), None);
        assert_eq!(grand_final_friday(2020), Some(date(2020, 10, 23)));
        assert_eq!(grand_final_friday(2023), Some(date(2023, 9, 29)));
        assert_eq!(grand_final_friday(2024), Some(date(2024, 9, 27)));
    }

    #[test]
    fn test_sovereign_birthday_name() {
        let names: Vec<String> = VictoriaRules.year_holidays(2022).into_iter().map(|h| h.name).collect();
        assert!(names.contains(&"Queen's Birthday".to_string()));
        let names: Vec<String> = VictoriaRules.year_holidays(2024).into_iter().map(|h| h.name).collect();
        assert!(names.contains(&"King's Birthday".to_string()));
    }
}
