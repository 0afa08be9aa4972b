use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use attendance_core::{
    AppConfig, AttendanceError, DataFetcher, FetchTicket, RawDataset, SnapshotSource,
};
use attendance_core::time::{format_iso, last_of_month};
use chrono::{Datelike, Months, NaiveDate};
use log::{debug, warn};

use crate::Session;

type FetchResult = (FetchTicket, Result<RawDataset, AttendanceError>);

pub struct App {
    pub session: Session,
    /// Day of the displayed month under the cursor, 1-based.
    pub selected_day: u32,
    source: Arc<dyn SnapshotSource + Send + Sync>,
    /// User to select once the first dataset arrives.
    pending_user: Option<String>,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
}

/// Moves `date` by whole months, clamping the day to the target month's length.
fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let step = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(step)
    } else {
        date.checked_sub_months(step)
    };
    shifted.unwrap_or(date)
}

impl App {
    pub fn new(config: &AppConfig) -> App {
        let (tx, rx) = mpsc::channel();
        let session = crate::new_session(config);
        let selected_day = session.window().end.day().min(last_of_month(session.displayed_month()).day());
        App {
            session,
            selected_day,
            source: Arc::from(config.snapshot_source()),
            pending_user: None,
            tx,
            rx,
        }
    }

    /// Applies `--from`/`--to`/`--user` before the first fetch.
    pub fn with_selection(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>, user: Option<String>) -> App {
        if let Some(from) = from {
            self.session.set_start(from);
        }
        if let Some(to) = to {
            self.session.set_end(to);
            self.show_month_of(to);
        }
        self.pending_user = user;
        self
    }

    /// Starts a fetch on a worker thread. Earlier in-flight fetches are not cancelled;
    /// their results are discarded when they arrive.
    pub fn request_fetch(&mut self) {
        let ticket = self.session.begin_fetch();
        debug!("Requesting fetch {:?} from {}", ticket, self.source.describe());
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = DataFetcher::new(source).fetch();
            let _ = tx.send((ticket, result));
        });
    }

    pub fn poll_fetches(&mut self) {
        while let Ok((ticket, result)) = self.rx.try_recv() {
            if self.session.complete_fetch(ticket, result) && self.session.dataset().is_some() {
                if let Some(user) = self.pending_user.take() {
                    if !self.session.select_user(&user) {
                        warn!("Unknown user {:?}, showing {:?}", user, self.session.selected_user());
                    }
                }
            }
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.session.displayed_month().with_day(self.selected_day)
    }

    fn month_len(&self) -> u32 {
        last_of_month(self.session.displayed_month()).day()
    }

    pub fn next_day(&mut self) {
        if self.selected_day < self.month_len() {
            self.selected_day += 1;
        } else {
            self.session.next_month();
            self.selected_day = 1;
        }
    }

    pub fn previous_day(&mut self) {
        if self.selected_day > 1 {
            self.selected_day -= 1;
        } else {
            self.session.previous_month();
            self.selected_day = self.month_len();
        }
    }

    pub fn next_month(&mut self) {
        self.session.next_month();
        self.selected_day = self.selected_day.min(self.month_len());
    }

    pub fn previous_month(&mut self) {
        self.session.previous_month();
        self.selected_day = self.selected_day.min(self.month_len());
    }

    fn show_month_of(&mut self, date: NaiveDate) {
        self.session.show_month(date);
        self.selected_day = self.selected_day.min(self.month_len());
    }

    /// Moves the window start by whole months.
    pub fn move_start(&mut self, months: i32) {
        let start = shift_months(self.session.window().start, months);
        self.session.set_start(start);
    }

    /// Moves the window end by whole months and shows the month it lands in.
    pub fn move_end(&mut self, months: i32) {
        let end = shift_months(self.session.window().end, months);
        self.session.set_end(end);
        self.show_month_of(end);
    }

    pub fn next_user(&mut self) {
        self.session.cycle_user(true);
    }

    pub fn previous_user(&mut self) {
        self.session.cycle_user(false);
    }

    /// Opens the detail popup when the cursor is on an attended day.
    pub fn open_detail(&mut self) {
        if let Some(date) = self.selected_date() {
            self.session.open_detail(&format_iso(date));
        }
    }

    pub fn close_detail(&mut self) {
        self.session.close_detail();
    }

    pub fn has_detail(&self) -> bool {
        self.session.detail().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::holiday::HolidayRules;
    use attendance_core::{DateWindow, SessionState, VictoriaRules};
    use std::time::Duration;

    struct StaticSource(&'static str);

    impl SnapshotSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        fn read_snapshot(&self) -> Result<String, attendance_core::FetchFailure> {
            Ok(self.0.to_string())
        }
    }

    const BODY: &str = r#"{
        "metadata": {"generatedAt": "2025-11-02T07:08:42Z", "totalUsers": 2},
        "alice": {
            "attendanceDays": ["2025-09-03", "2025-10-09"],
            "targetStation": "Heathmont Station",
            "statistics": {"monthlyBreakdown": [
                {"month": "2025-09", "workingDays": 22, "daysAttended": 1, "daysMissed": 21, "attendancePercentage": 4.55},
                {"month": "2025-10", "workingDays": 23, "daysAttended": 2, "daysMissed": 21, "attendancePercentage": 8.7}
            ]}
        },
        "bob": {"attendanceDays": ["2025-10-10"]}
    }"#;

    fn app() -> App {
        let (tx, rx) = mpsc::channel();
        let window = DateWindow::new(
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
        );
        let rules: Box<dyn HolidayRules + Send + Sync> = Box::new(VictoriaRules);
        App {
            session: SessionState::new(window, rules),
            selected_day: 31,
            source: Arc::new(StaticSource(BODY)),
            pending_user: None,
            tx,
            rx,
        }
    }

    fn wait_for_load(app: &mut App) {
        for _ in 0..200 {
            app.poll_fetches();
            if !app.session.is_loading() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("fetch did not complete");
    }

    #[test]
    fn test_background_fetch_loads_session() {
        let mut app = app();
        app.request_fetch();
        wait_for_load(&mut app);
        assert_eq!(app.session.selected_user(), Some("alice"));
    }

    #[test]
    fn test_day_cursor_wraps_across_months() {
        let mut app = app();
        app.next_day();
        assert_eq!(app.selected_date(), NaiveDate::from_ymd_opt(2025, 11, 1));
        app.previous_day();
        assert_eq!(app.selected_date(), NaiveDate::from_ymd_opt(2025, 10, 31));
        app.next_month();
        // November has 30 days
        assert_eq!(app.selected_date(), NaiveDate::from_ymd_opt(2025, 11, 30));
    }

    #[test]
    fn test_detail_opens_on_attended_day() {
        let mut app = app();
        app.request_fetch();
        wait_for_load(&mut app);

        app.selected_day = 8;
        app.open_detail();
        assert!(!app.has_detail());

        app.selected_day = 9;
        app.open_detail();
        assert_eq!(app.session.detail().unwrap().station, "Heathmont Station");
        app.close_detail();
        assert!(!app.has_detail());
    }

    #[test]
    fn test_window_keys_recompute_summary() {
        let mut app = app();
        app.request_fetch();
        wait_for_load(&mut app);
        assert_eq!(app.session.view().summary.total_working_days, 23);

        app.move_start(-1);
        assert_eq!(app.session.window().start, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        let view = app.session.view();
        assert_eq!(view.summary.total_working_days, 45);
        assert_eq!(view.summary.days_attended, 3);
        assert_eq!(view.attended_dates, vec!["2025-09-03", "2025-10-09"]);

        app.move_end(-1);
        assert_eq!(app.session.window().end, NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
        assert_eq!(app.session.displayed_month(), NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(app.selected_day, 30);
        assert_eq!(app.session.view().summary.total_working_days, 22);
    }

    #[test]
    fn test_requested_user_selected_after_first_load() {
        let mut app = app().with_selection(
            NaiveDate::from_ymd_opt(2025, 9, 1),
            None,
            Some("bob".to_string()),
        );
        assert_eq!(app.session.window().start, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        app.request_fetch();
        wait_for_load(&mut app);
        assert_eq!(app.session.selected_user(), Some("bob"));

        // A retry keeps the current user rather than reapplying the request
        app.next_user();
        app.request_fetch();
        wait_for_load(&mut app);
        assert_eq!(app.session.selected_user(), Some("alice"));
    }
}
