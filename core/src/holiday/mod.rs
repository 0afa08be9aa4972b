//! Public-holiday rule sources.
//!
//! The resolver only needs `year -> [Holiday]`; where those holidays come from (computed
//! rules, a static table) is hidden behind [`HolidayRules`].

pub mod victoria;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AttendanceError;

pub use victoria::VictoriaRules;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// Deterministic, offline holiday calendar for one region.
pub trait HolidayRules {
    fn region_name(&self) -> &str;
    fn year_holidays(&self, year: i32) -> Vec<Holiday>;
}

/// Regions with a built-in rule set.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    #[serde(rename = "AU-VIC", alias = "AU_VIC", alias = "VIC")]
    AuVic,
}

impl Region {
    pub fn rules(self) -> Box<dyn HolidayRules + Send + Sync> {
        match self {
            Region::AuVic => Box::new(VictoriaRules),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::AuVic => write!(f, "AU-VIC"),
        }
    }
}

impl FromStr for Region {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AU-VIC" | "AU_VIC" | "VIC" => Ok(Region::AuVic),
            other => Err(AttendanceError::Config(format!("Unsupported holiday region: {}", other))),
        }
    }
}

/// Holidays supplied as data rather than computed.
#[derive(Debug, Clone, Default)]
pub struct FixedHolidays {
    name: String,
    entries: Vec<Holiday>,
}

impl FixedHolidays {
    pub fn new(name: impl Into<String>, mut entries: Vec<Holiday>) -> Self {
        entries.sort();
        Self {
            name: name.into(),
            entries,
        }
    }
}

impl HolidayRules for FixedHolidays {
    fn region_name(&self) -> &str {
        &self.name
    }

    fn year_holidays(&self, year: i32) -> Vec<Holiday> {
        self.entries
            .iter()
            .filter(|h| h.date.year() == year)
            .cloned()
            .collect()
    }
}

impl<T: HolidayRules + ?Sized> HolidayRules for Box<T> {
    fn region_name(&self) -> &str {
        (**self).region_name()
    }

    fn year_holidays(&self, year: i32) -> Vec<Holiday> {
        (**self).year_holidays(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parsing() {
        assert_eq!("AU-VIC".parse::<Region>().unwrap(), Region::AuVic);
        assert_eq!("vic".parse::<Region>().unwrap(), Region::AuVic);
        assert!(matches!("US-CA".parse::<Region>(), Err(AttendanceError::Config(_))));
        assert_eq!(Region::AuVic.to_string(), "AU-VIC");
    }

    #[test]
    fn test_fixed_holidays_filter_by_year() {
        let rules = FixedHolidays::new(
            "test",
            vec![
                Holiday::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), "New Year"),
                Holiday::new(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(), "Christmas"),
            ],
        );
        let holidays = rules.year_holidays(2025);
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].name, "Christmas");
        assert!(rules.year_holidays(2027).is_empty());
    }
}
