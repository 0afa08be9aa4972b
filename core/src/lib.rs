pub mod config;
pub mod error;
pub mod holiday;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::AppConfig;
pub use error::{AttendanceError, FetchFailure};
pub use holiday::{FixedHolidays, Holiday, HolidayRules, Region, VictoriaRules};
pub use model::dataset::{AttendanceDay, Metadata, MonthStat, RawDataset, UserRecord};
pub use model::window::DateWindow;
pub use repository::{FileSource, HttpSource, SnapshotSource};
pub use service::attendance_service::{aggregate, filter_by_window, to_chart_series};
pub use service::dto::{ChartPoint, FilteredData, SummaryStats};
pub use service::fetch_service::DataFetcher;
pub use service::holiday_service::PublicHolidayResolver;
pub use time::{format_date_range, is_date_in_range, month_label, parse_attendance_date};
pub use usecase::presentation::{AttendanceDetail, CalendarTile, TileKind};
pub use usecase::session::{FetchTicket, SessionState, SessionStatus, SessionView};
