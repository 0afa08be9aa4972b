//! View shaping for the calendar and the per-day detail popup.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::dataset::UserRecord;
use crate::time::{first_of_month, format_iso, last_of_month, parse_attendance_date};

pub const UNKNOWN_STATION: &str = "Unknown";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Attended,
    Manual,
    Skip,
    PublicHoliday,
}

/// Date sets the calendar marks, all keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default)]
pub struct CalendarMarks {
    attended: HashSet<String>,
    manual: HashSet<String>,
    skip: HashSet<String>,
    holidays: HashSet<String>,
}

impl CalendarMarks {
    pub fn new(attended: &[String], manual: &[String], skip: &[String], holidays: &BTreeSet<String>) -> Self {
        Self {
            attended: attended.iter().cloned().collect(),
            manual: manual.iter().cloned().collect(),
            skip: skip.iter().cloned().collect(),
            holidays: holidays.iter().cloned().collect(),
        }
    }

    pub fn is_attended(&self, date: &str) -> bool {
        self.attended.contains(date)
    }
}

/// Attended wins over manual, manual over skip, skip over holiday.
pub fn classify_tile(date: NaiveDate, marks: &CalendarMarks) -> Option<TileKind> {
    let key = format_iso(date);
    if marks.attended.contains(&key) {
        Some(TileKind::Attended)
    } else if marks.manual.contains(&key) {
        Some(TileKind::Manual)
    } else if marks.skip.contains(&key) {
        Some(TileKind::Skip)
    } else if marks.holidays.contains(&key) {
        Some(TileKind::PublicHoliday)
    } else {
        None
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarTile {
    pub date: NaiveDate,
    pub kind: Option<TileKind>,
    /// Only detected-attendance days open the detail view.
    pub clickable: bool,
}

/// One tile per day of the month containing `month`.
pub fn month_tiles(month: NaiveDate, marks: &CalendarMarks) -> Vec<CalendarTile> {
    let first = first_of_month(month);
    let last = last_of_month(month);
    first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| {
            let kind = classify_tile(date, marks);
            CalendarTile {
                date,
                kind,
                clickable: kind == Some(TileKind::Attended),
            }
        })
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDetail {
    pub date: String,
    pub timestamp: Option<String>,
    pub station: String,
    pub is_manual: bool,
}

/// Looks up what is known about `date` for `user`. Manual entries take precedence and carry
/// no timestamp; detected entries fall back to the user's default station.
pub fn attendance_detail(user: &UserRecord, date: &str) -> Option<AttendanceDetail> {
    let default_station = user.target_station.as_deref().unwrap_or(UNKNOWN_STATION);

    if user.manual_attendance_dates.iter().any(|d| d == date) {
        return Some(AttendanceDetail {
            date: date.to_string(),
            timestamp: None,
            station: default_station.to_string(),
            is_manual: true,
        });
    }

    user.attendance_days
        .iter()
        .find(|day| day.date() == date)
        .map(|day| AttendanceDetail {
            date: date.to_string(),
            timestamp: day.timestamp().map(str::to_string),
            station: day.station().unwrap_or(default_station).to_string(),
            is_manual: false,
        })
}

/// "2025-10-09" -> "October 9, 2025"; malformed input is returned unchanged.
pub fn format_detail_date(date: &str) -> String {
    match parse_attendance_date(date) {
        Ok(d) => d.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dataset::{AttendanceDay, AttendanceEvent};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn marks() -> CalendarMarks {
        let holidays: BTreeSet<String> = ["2025-11-04", "2025-11-05"].iter().map(|s| s.to_string()).collect();
        CalendarMarks::new(
            &strings(&["2025-11-03", "2025-11-05"]),
            &strings(&["2025-11-06", "2025-11-03"]),
            &strings(&["2025-11-07", "2025-11-06"]),
            &holidays,
        )
    }

    #[test]
    fn test_tile_precedence() {
        let marks = marks();
        assert_eq!(classify_tile(date(2025, 11, 3), &marks), Some(TileKind::Attended));
        assert_eq!(classify_tile(date(2025, 11, 4), &marks), Some(TileKind::PublicHoliday));
        assert_eq!(classify_tile(date(2025, 11, 5), &marks), Some(TileKind::Attended));
        assert_eq!(classify_tile(date(2025, 11, 6), &marks), Some(TileKind::Manual));
        assert_eq!(classify_tile(date(2025, 11, 7), &marks), Some(TileKind::Skip));
        assert_eq!(classify_tile(date(2025, 11, 8), &marks), None);
    }

    #[test]
    fn test_month_tiles_cover_every_day() {
        let tiles = month_tiles(date(2025, 11, 17), &marks());
        assert_eq!(tiles.len(), 30);
        assert_eq!(tiles[0].date, date(2025, 11, 1));
        assert_eq!(tiles[29].date, date(2025, 11, 30));
        let clickable: Vec<u32> = tiles
            .iter()
            .filter(|t| t.clickable)
            .map(|t| chrono::Datelike::day(&t.date))
            .collect();
        assert_eq!(clickable, vec![3, 5]);
    }

    fn user() -> UserRecord {
        UserRecord {
            attendance_days: vec![
                AttendanceDay::Date("2025-10-09".to_string()),
                AttendanceDay::Event(AttendanceEvent {
                    date: "2025-10-10".to_string(),
                    timestamp: Some("08:30 AM".to_string()),
                    target_station: Some("Flinders Street Station".to_string()),
                }),
                AttendanceDay::Event(AttendanceEvent {
                    date: "2025-10-14".to_string(),
                    timestamp: Some("09:00 AM".to_string()),
                    target_station: None,
                }),
            ],
            manual_attendance_dates: strings(&["2025-10-14"]),
            target_station: Some("Southern Cross Station".to_string()),
            ..UserRecord::default()
        }
    }

    #[test]
    fn test_detected_detail_uses_event_station() {
        let detail = attendance_detail(&user(), "2025-10-10").unwrap();
        assert_eq!(detail.timestamp.as_deref(), Some("08:30 AM"));
        assert_eq!(detail.station, "Flinders Street Station");
        assert!(!detail.is_manual);

        let plain = attendance_detail(&user(), "2025-10-09").unwrap();
        assert_eq!(plain.timestamp, None);
        assert_eq!(plain.station, "Southern Cross Station");
    }

    #[test]
    fn test_manual_detail_takes_precedence() {
        let detail = attendance_detail(&user(), "2025-10-14").unwrap();
        assert!(detail.is_manual);
        assert_eq!(detail.timestamp, None);
        assert_eq!(detail.station, "Southern Cross Station");
    }

    #[test]
    fn test_station_falls_back_to_unknown() {
        let mut record = user();
        record.target_station = None;
        assert_eq!(attendance_detail(&record, "2025-10-09").unwrap().station, UNKNOWN_STATION);
        assert_eq!(attendance_detail(&record, "2025-10-01"), None);
    }

    #[test]
    fn test_format_detail_date() {
        assert_eq!(format_detail_date("2025-10-09"), "October 9, 2025");
        assert_eq!(format_detail_date("garbage"), "garbage");
    }
}
