use log::warn;

use crate::model::dataset::{MonthStat, UserRecord};
use crate::model::window::DateWindow;
use crate::service::dto::{ChartPoint, FilteredData, SummaryStats};
use crate::time::{format_iso, month_label, parse_attendance_date, parse_month_key};

/// Narrows a user's detected attendance and monthly breakdown to `window`.
///
/// Attended dates are re-serialised from the parsed calendar date. Months are kept or
/// dropped whole, by their first day. Malformed entries are logged and skipped.
pub fn filter_by_window(user: Option<&UserRecord>, window: &DateWindow) -> FilteredData {
    let user = match user {
        Some(u) => u,
        None => return FilteredData::default(),
    };

    let attended_dates = user
        .attendance_days
        .iter()
        .filter_map(|day| match parse_attendance_date(day.date()) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("Skipping attendance day: {}", e);
                None
            }
        })
        .filter(|date| window.contains(*date))
        .map(format_iso)
        .collect();

    let monthly_breakdown = user
        .monthly_breakdown()
        .iter()
        .filter(|month| match parse_month_key(&month.month) {
            Ok(first_day) => window.contains(first_day),
            Err(e) => {
                warn!("Skipping monthly breakdown entry: {}", e);
                false
            }
        })
        .cloned()
        .collect();

    FilteredData {
        attended_dates,
        monthly_breakdown,
    }
}

/// Summary totals for the months of `user` that fall inside `window`.
pub fn aggregate(user: Option<&UserRecord>, window: &DateWindow) -> SummaryStats {
    if user.is_none() {
        return SummaryStats::default();
    }
    let filtered = filter_by_window(user, window);
    summarize(&filtered.monthly_breakdown)
}

/// Sums working and attended days; missed days are derived, not summed.
pub fn summarize(months: &[MonthStat]) -> SummaryStats {
    let total_working_days: i64 = months.iter().map(|m| m.working_days).sum();
    let days_attended: i64 = months.iter().map(|m| m.days_attended).sum();
    let days_missed = total_working_days - days_attended;

    let attendance_percentage = if total_working_days > 0 {
        percentage(days_attended, total_working_days)
    } else {
        0.0
    };

    SummaryStats {
        attendance_percentage,
        total_working_days,
        days_attended,
        days_missed,
    }
}

/// One chart point per month, in input order. The percentage is the upstream value
/// rounded, not recomputed from the counts.
pub fn to_chart_series(months: &[MonthStat]) -> Vec<ChartPoint> {
    months
        .iter()
        .map(|m| {
            let label = month_label(&m.month).unwrap_or_else(|e| {
                warn!("Using raw month key as chart label: {}", e);
                m.month.clone()
            });
            ChartPoint {
                month: label,
                month_key: m.month.clone(),
                percentage: round2(m.attendance_percentage),
                working_days: m.working_days,
                days_attended: m.days_attended,
                days_missed: m.days_missed,
            }
        })
        .collect()
}

/// Keeps the well-formed `YYYY-MM-DD` entries of a date list, normalised.
pub fn valid_dates(dates: &[String]) -> Vec<String> {
    dates
        .iter()
        .filter_map(|s| match parse_attendance_date(s) {
            Ok(date) => Some(format_iso(date)),
            Err(e) => {
                warn!("Skipping date entry: {}", e);
                None
            }
        })
        .collect()
}

/// `part / whole` as a percentage with two decimals, rounded in integer hundredths so
/// exact halves such as 23/160 = 14.375 round away from zero. `whole` must be positive.
pub fn percentage(part: i64, whole: i64) -> f64 {
    let scaled = i128::from(part.unsigned_abs()) * 10_000;
    let whole = i128::from(whole);
    let hundredths = (2 * scaled + whole) / (2 * whole);
    let hundredths = if part < 0 { -hundredths } else { hundredths };
    hundredths as f64 / 100.0
}

/// Two decimal places, halves rounded away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
