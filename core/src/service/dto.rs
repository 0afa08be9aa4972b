use serde::{Deserialize, Serialize};

use crate::model::dataset::MonthStat;

/// A user's data narrowed to a date window.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilteredData {
    pub attended_dates: Vec<String>, // YYYY-MM-DD
    pub monthly_breakdown: Vec<MonthStat>,
}

/// Totals over the months inside a window.
///
/// Counts are signed so `days_attended + days_missed == total_working_days` holds even
/// when upstream months are inconsistent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub attendance_percentage: f64,
    pub total_working_days: i64,
    pub days_attended: i64,
    pub days_missed: i64,
}

/// One bar of the monthly attendance chart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub month: String, // "October 2025"
    pub month_key: String, // "2025-10"
    pub percentage: f64,
    pub working_days: i64,
    pub days_attended: i64,
    pub days_missed: i64,
}
