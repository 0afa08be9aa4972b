use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FetchFailure;

/// Reserved top-level key holding the snapshot metadata; every other key is a username.
pub const METADATA_KEY: &str = "metadata";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub total_users: u32,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub config_path: Option<String>,
}

/// One detected attendance event.
///
/// The generator writes bare `YYYY-MM-DD` strings; richer snapshots carry the tap-on
/// timestamp and the station it was detected at.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AttendanceDay {
    Date(String),
    Event(AttendanceEvent),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    pub date: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub target_station: Option<String>,
}

impl AttendanceDay {
    pub fn date(&self) -> &str {
        match self {
            AttendanceDay::Date(date) => date,
            AttendanceDay::Event(event) => &event.date,
        }
    }

    pub fn timestamp(&self) -> Option<&str> {
        match self {
            AttendanceDay::Date(_) => None,
            AttendanceDay::Event(event) => event.timestamp.as_deref(),
        }
    }

    pub fn station(&self) -> Option<&str> {
        match self {
            AttendanceDay::Date(_) => None,
            AttendanceDay::Event(event) => event.target_station.as_deref(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthStat {
    pub month: String, // "YYYY-MM"
    pub working_days: i64,
    pub days_attended: i64,
    pub days_missed: i64,
    pub attendance_percentage: f64,
}

/// Statistics computed by the upstream generator.
///
/// Counts are signed: the generator derives missed days by subtraction without clamping.
///
/// The whole-period totals are informational only; summaries are always re-aggregated
/// from `monthly_breakdown`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub total_working_days: Option<i64>,
    #[serde(default)]
    pub days_attended: Option<i64>,
    #[serde(default)]
    pub days_missed: Option<i64>,
    #[serde(default)]
    pub attendance_percentage: Option<f64>,
    #[serde(default)]
    pub monthly_breakdown: Vec<MonthStat>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub attendance_days: Vec<AttendanceDay>,
    #[serde(default)]
    pub manual_attendance_dates: Vec<String>,
    #[serde(default)]
    pub skip_dates: Vec<String>,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub target_station: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latest_processed_date: Option<String>,
}

impl UserRecord {
    pub fn monthly_breakdown(&self) -> &[MonthStat] {
        &self.statistics.monthly_breakdown
    }
}

/// An immutable attendance snapshot.
///
/// Users keep the order in which they appear in the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    pub metadata: Metadata,
    users: Vec<(String, UserRecord)>,
}

impl RawDataset {
    pub fn new(metadata: Metadata, users: Vec<(String, UserRecord)>) -> Self {
        Self { metadata, users }
    }

    /// Validates the shape of a decoded document.
    ///
    /// Missing or malformed metadata fails the whole document; a user record that does
    /// not decode is logged and left out.
    pub fn from_value(value: Value) -> Result<Self, FetchFailure> {
        let mut object: Map<String, Value> = match value {
            Value::Object(object) => object,
            _ => return Err(FetchFailure::Malformed("Invalid JSON structure".to_string())),
        };

        let metadata_value = match object.shift_remove(METADATA_KEY) {
            Some(Value::Null) | None => return Err(FetchFailure::MissingMetadata),
            Some(value) => value,
        };
        let metadata: Metadata = serde_json::from_value(metadata_value)
            .map_err(|e| FetchFailure::Malformed(format!("metadata: {}", e)))?;

        let mut users = Vec::with_capacity(object.len());
        for (username, record) in object {
            match serde_json::from_value::<UserRecord>(record) {
                Ok(record) => users.push((username, record)),
                Err(e) => warn!("Skipping user {:?} with malformed record: {}", username, e),
            }
        }

        Ok(Self { metadata, users })
    }

    pub fn from_json(body: &str) -> Result<Self, FetchFailure> {
        let value: Value = serde_json::from_str(body).map_err(|e| FetchFailure::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(|(name, _)| name.as_str())
    }

    pub fn user(&self, username: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|(name, _)| name == username)
            .map(|(_, record)| record)
    }

    pub fn contains_user(&self, username: &str) -> bool {
        self.user(username).is_some()
    }

    pub fn first_user(&self) -> Option<&str> {
        self.users.first().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
