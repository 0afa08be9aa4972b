use attendance_core::holiday::{Holiday, Region};
use attendance_core::usecase::presentation::format_detail_date;
use attendance_core::{AttendanceDetail, RawDataset, SessionView};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Working Days")]
    working_days: i64,
    #[tabled(rename = "Attended")]
    attended: i64,
    #[tabled(rename = "Missed")]
    missed: i64,
    #[tabled(rename = "Attendance %")]
    percentage: String,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "User")]
    name: String,
    #[tabled(rename = "Station")]
    station: String,
    #[tabled(rename = "Detected")]
    detected: usize,
    #[tabled(rename = "Manual")]
    manual: usize,
    #[tabled(rename = "Last Updated")]
    last_updated: String,
}

#[derive(Tabled)]
struct HolidayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Holiday")]
    name: String,
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

pub fn show_users(dataset: &RawDataset) {
    let rows: Vec<UserRow> = dataset
        .usernames()
        .filter_map(|name| dataset.user(name).map(|record| (name, record)))
        .map(|(name, record)| UserRow {
            name: name.to_string(),
            station: record.target_station.clone().unwrap_or_else(|| "-".to_string()),
            detected: record.attendance_days.len(),
            manual: record.manual_attendance_dates.len(),
            last_updated: record
                .last_updated
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    if rows.is_empty() {
        println!("No users found.");
        return;
    }

    println!(
        "Snapshot generated {}",
        dataset.metadata.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("{}", styled(Table::new(rows)));
}

pub fn show_summary(view: &SessionView) {
    let user = view.user.as_deref().unwrap_or("-");
    let stats = &view.summary;

    println!("\x1b[1;36m{}\x1b[0m  {}", user, view.range_label);
    println!(
        "Attendance: {:.2}%   Working days: {}   Attended: {}   Missed: {}",
        stats.attendance_percentage, stats.total_working_days, stats.days_attended, stats.days_missed
    );

    if view.chart_series.is_empty() {
        println!("No monthly data in this range.");
        return;
    }

    let rows: Vec<MonthRow> = view
        .chart_series
        .iter()
        .map(|point| MonthRow {
            month: point.month.clone(),
            working_days: point.working_days,
            attended: point.days_attended,
            missed: point.days_missed,
            percentage: format!("{:.2}", point.percentage),
        })
        .collect();
    println!("{}", styled(Table::new(rows)));
}

pub fn show_detail(detail: &AttendanceDetail) {
    let kind = if detail.is_manual { "Manual attendance" } else { "Detected attendance" };
    println!("\x1b[1;36mAttendance Details\x1b[0m ({})", kind);
    println!("  Date:    {}", format_detail_date(&detail.date));
    println!("  Time:    {}", detail.timestamp.as_deref().unwrap_or("-"));
    println!("  Station: {}", detail.station);
}

pub fn show_holidays(holidays: &[Holiday], range_label: &str, region: Region) {
    println!("\x1b[1;36mPublic holidays ({})\x1b[0m  {}", region, range_label);
    if holidays.is_empty() {
        println!("None in this range.");
        return;
    }
    let rows: Vec<HolidayRow> = holidays
        .iter()
        .map(|h| HolidayRow {
            date: h.date.format("%Y-%m-%d (%a)").to_string(),
            name: h.name.clone(),
        })
        .collect();
    println!("{}", styled(Table::new(rows)));
}
