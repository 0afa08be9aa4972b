use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::error::AttendanceError;
use crate::holiday::{Holiday, HolidayRules};
use crate::model::dataset::{MonthStat, RawDataset, UserRecord};
use crate::model::window::DateWindow;
use crate::service::attendance_service::{aggregate, filter_by_window, to_chart_series, valid_dates};
use crate::service::dto::{ChartPoint, SummaryStats};
use crate::service::holiday_service::PublicHolidayResolver;
use crate::time::{add_months, first_of_month, format_iso, parse_attendance_date};
use crate::usecase::presentation::{attendance_detail, month_tiles, AttendanceDetail, CalendarMarks, CalendarTile};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Stamp handed out for each fetch attempt; only the latest one may update the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Everything the presentation layer renders for the current selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionView {
    pub user: Option<String>,
    pub attended_dates: Vec<String>,
    pub manual_attendance_dates: Vec<String>,
    pub skip_dates: Vec<String>,
    pub monthly_breakdown: Vec<MonthStat>,
    pub chart_series: Vec<ChartPoint>,
    pub summary: SummaryStats,
    pub holidays: BTreeSet<String>,
    pub holiday_entries: Vec<Holiday>,
    pub range_label: String,
}

impl SessionView {
    pub fn marks(&self) -> CalendarMarks {
        CalendarMarks::new(
            &self.attended_dates,
            &self.manual_attendance_dates,
            &self.skip_dates,
            &self.holidays,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ViewKey {
    generation: u64,
    user: Option<String>,
    window: DateWindow,
}

/// Selection state of the dashboard plus its derived views.
///
/// Derived views are pure functions of (dataset, user, window); they are rebuilt from
/// scratch whenever any of the three changes and memoised on that tuple otherwise.
pub struct SessionState<R: HolidayRules> {
    dataset: Option<RawDataset>,
    generation: u64,
    selected_user: Option<String>,
    window: DateWindow,
    displayed_month: NaiveDate,
    detail: Option<AttendanceDetail>,
    status: SessionStatus,
    latest_ticket: u64,
    resolver: PublicHolidayResolver<R>,
    cache: RefCell<Option<(ViewKey, Rc<SessionView>)>>,
}

impl<R: HolidayRules> SessionState<R> {
    pub fn new(window: DateWindow, rules: R) -> Self {
        Self {
            dataset: None,
            generation: 0,
            selected_user: None,
            window,
            displayed_month: first_of_month(window.end),
            detail: None,
            status: SessionStatus::Idle,
            latest_ticket: 0,
            resolver: PublicHolidayResolver::new(rules),
            cache: RefCell::new(None),
        }
    }

    // --- fetch lifecycle ---

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        self.status = SessionStatus::Loading;
        debug!("fetch #{} started", self.latest_ticket);
        FetchTicket(self.latest_ticket)
    }

    /// Applies a fetch result. Returns `false` when the result belongs to a superseded
    /// attempt and was discarded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<RawDataset, AttendanceError>) -> bool {
        if ticket.0 != self.latest_ticket {
            warn!(
                "Discarding result of fetch #{} (latest is #{})",
                ticket.0, self.latest_ticket
            );
            return false;
        }

        self.generation += 1;
        self.detail = None;
        match result {
            Ok(dataset) => {
                let keep_selection = self
                    .selected_user
                    .as_deref()
                    .map(|u| dataset.contains_user(u))
                    .unwrap_or(false);
                if !keep_selection {
                    self.selected_user = dataset.first_user().map(str::to_string);
                }
                self.dataset = Some(dataset);
                self.status = SessionStatus::Ready;
            }
            Err(e) => {
                self.dataset = None;
                self.status = SessionStatus::Failed(e.to_string());
            }
        }
        true
    }

    /// Installs an already fetched dataset.
    pub fn load(&mut self, dataset: RawDataset) {
        let ticket = self.begin_fetch();
        self.complete_fetch(ticket, Ok(dataset));
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn dataset(&self) -> Option<&RawDataset> {
        self.dataset.as_ref()
    }

    // --- user selection ---

    pub fn users(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(|d| d.usernames().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn selected_user(&self) -> Option<&str> {
        self.selected_user.as_deref()
    }

    fn selected_record(&self) -> Option<&UserRecord> {
        let dataset = self.dataset.as_ref()?;
        dataset.user(self.selected_user.as_deref()?)
    }

    /// Switches user and closes any open detail. Unknown users are rejected.
    pub fn select_user(&mut self, username: &str) -> bool {
        let known = self
            .dataset
            .as_ref()
            .map(|d| d.contains_user(username))
            .unwrap_or(false);
        if !known {
            warn!("Ignoring selection of unknown user {:?}", username);
            return false;
        }
        self.selected_user = Some(username.to_string());
        self.detail = None;
        true
    }

    /// Moves to the next (or previous) user in dataset order, wrapping around.
    pub fn cycle_user(&mut self, forward: bool) -> bool {
        let users = self.users();
        if users.is_empty() {
            return false;
        }
        let current = self
            .selected_user
            .as_deref()
            .and_then(|u| users.iter().position(|name| name == u))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % users.len()
        } else {
            (current + users.len() - 1) % users.len()
        };
        let name = users[next].clone();
        self.select_user(&name)
    }

    // --- window ---

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn set_window(&mut self, window: DateWindow) {
        self.window = window;
    }

    pub fn set_start(&mut self, start: NaiveDate) {
        self.window.start = start;
    }

    pub fn set_end(&mut self, end: NaiveDate) {
        self.window.end = end;
    }

    // --- derived view ---

    pub fn view(&self) -> Rc<SessionView> {
        let key = ViewKey {
            generation: self.generation,
            user: self.selected_user.clone(),
            window: self.window,
        };

        if let Some((cached_key, view)) = self.cache.borrow().as_ref() {
            if *cached_key == key {
                return Rc::clone(view);
            }
        }

        let view = Rc::new(self.compute_view());
        *self.cache.borrow_mut() = Some((key, Rc::clone(&view)));
        view
    }

    fn compute_view(&self) -> SessionView {
        debug!(
            "recomputing view for {:?} over {}",
            self.selected_user,
            self.window.label()
        );
        let record = self.selected_record();
        let filtered = filter_by_window(record, &self.window);
        let summary = aggregate(record, &self.window);
        let holiday_entries = self.resolver.holidays_in(Some(&self.window));
        let holidays = holiday_entries.iter().map(|h| format_iso(h.date)).collect();

        SessionView {
            user: record.and(self.selected_user.clone()),
            manual_attendance_dates: record.map(|r| valid_dates(&r.manual_attendance_dates)).unwrap_or_default(),
            skip_dates: record.map(|r| valid_dates(&r.skip_dates)).unwrap_or_default(),
            chart_series: to_chart_series(&filtered.monthly_breakdown),
            attended_dates: filtered.attended_dates,
            monthly_breakdown: filtered.monthly_breakdown,
            summary,
            holidays,
            holiday_entries,
            range_label: self.window.label(),
        }
    }

    // --- detail view ---

    /// Opens the detail view for an attended day of the current view; other days are ignored.
    pub fn open_detail(&mut self, date: &str) -> Option<&AttendanceDetail> {
        let key = match parse_attendance_date(date) {
            Ok(d) => format_iso(d),
            Err(e) => {
                warn!("Ignoring detail request: {}", e);
                return None;
            }
        };
        if !self.view().attended_dates.contains(&key) {
            return None;
        }
        self.detail = self.selected_record().and_then(|r| attendance_detail(r, &key));
        self.detail.as_ref()
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&AttendanceDetail> {
        self.detail.as_ref()
    }

    // --- calendar navigation ---

    pub fn displayed_month(&self) -> NaiveDate {
        self.displayed_month
    }

    pub fn show_month(&mut self, date: NaiveDate) {
        self.displayed_month = first_of_month(date);
    }

    pub fn next_month(&mut self) {
        self.displayed_month = add_months(self.displayed_month, 1);
    }

    pub fn previous_month(&mut self) {
        self.displayed_month = add_months(self.displayed_month, -1);
    }

    pub fn month_grid(&self) -> Vec<CalendarTile> {
        month_tiles(self.displayed_month, &self.view().marks())
    }
}
