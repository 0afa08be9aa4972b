mod calendar;
mod report;
mod tui;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use attendance_core::holiday::HolidayRules;
use attendance_core::{parse_attendance_date, AppConfig, DataFetcher, PublicHolidayResolver, SessionState};
use chrono::NaiveDate;
use clap::Parser;
use log::debug;

pub type Session = SessionState<Box<dyn HolidayRules + Send + Sync>>;

#[derive(Parser)]
#[command(name = "attendance")]
#[command(about = "Office attendance dashboard", long_about = None)]
struct Cli {
    /// Attendance snapshot URL (overrides the config file)
    #[arg(long, global = true)]
    url: Option<String>,
    /// Read a locally generated attendance.json instead of the URL
    #[arg(long, global = true)]
    file: Option<PathBuf>,
    /// Config file (default: ~/.attendance/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Debug, Default)]
struct WindowArgs {
    /// Username (default: first user in the dataset)
    #[arg(long)]
    user: Option<String>,
    /// Window start, YYYY-MM-DD
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<NaiveDate>,
    /// Window end, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<NaiveDate>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List users in the dataset
    Users,
    /// Summary statistics and monthly breakdown for a window
    Summary {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Month calendar with attended, manual, skip and holiday days marked
    Calendar {
        #[command(flatten)]
        window: WindowArgs,
        /// Month to display, YYYY-MM (default: month of the window end)
        #[arg(long)]
        month: Option<String>,
    },
    /// Details of one attended day
    Detail {
        /// Day, YYYY-MM-DD
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,
        #[arg(long)]
        user: Option<String>,
    },
    /// Public holidays inside a window
    Holidays {
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,
    },
    /// Open the interactive dashboard
    Dashboard {
        #[command(flatten)]
        window: WindowArgs,
    },
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_attendance_date(s).map_err(|e| e.to_string())
}

fn init_logging(interactive: bool) {
    // Log lines would corrupt the alternate screen
    let default_filter = if interactive { "off" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.url {
        config.data_url = url.clone();
        config.snapshot_file = None;
    }
    if let Some(file) = &cli.file {
        config.snapshot_file = Some(file.clone());
    }
    Ok(config)
}

fn new_session(config: &AppConfig) -> Session {
    SessionState::new(config.default_window(), config.region.rules())
}

/// Fetches once and applies the window/user arguments.
fn load_session(config: &AppConfig, args: &WindowArgs) -> Result<Session> {
    let mut session = new_session(config);
    if let Some(from) = args.from {
        session.set_start(from);
    }
    if let Some(to) = args.to {
        session.set_end(to);
    }

    debug!("Loading session for window {}", session.window().label());
    let fetcher = DataFetcher::new(config.snapshot_source());
    let dataset = fetcher.fetch()?;
    session.load(dataset);

    if let Some(user) = &args.user {
        if !session.select_user(user) {
            return Err(anyhow!(
                "Unknown user '{}'. Available: {}",
                user,
                session.users().join(", ")
            ));
        }
    }
    Ok(session)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, None | Some(Commands::Dashboard { .. })));
    let config = load_config(&cli)?;

    match &cli.command {
        Some(Commands::Users) => {
            let session = load_session(&config, &WindowArgs::default())?;
            if let Some(dataset) = session.dataset() {
                report::show_users(dataset);
            }
        }
        Some(Commands::Summary { window }) => {
            let session = load_session(&config, window)?;
            report::show_summary(&session.view());
        }
        Some(Commands::Calendar { window, month }) => {
            let mut session = load_session(&config, window)?;
            if let Some(month) = month {
                session.show_month(attendance_core::time::parse_month_key(month)?);
            }
            calendar::show_calendar(&session);
        }
        Some(Commands::Detail { date, user }) => {
            let args = WindowArgs {
                user: user.clone(),
                from: Some(*date),
                to: Some(*date),
            };
            let mut session = load_session(&config, &args)?;
            let key = attendance_core::time::format_iso(*date);
            match session.open_detail(&key) {
                Some(detail) => report::show_detail(detail),
                None => println!(
                    "No attendance recorded for {} on {}.",
                    session.selected_user().unwrap_or("-"),
                    key
                ),
            }
        }
        Some(Commands::Holidays { from, to }) => {
            let mut window = config.default_window();
            if let Some(from) = from {
                window.start = *from;
            }
            if let Some(to) = to {
                window.end = *to;
            }
            let resolver = PublicHolidayResolver::new(config.region.rules());
            report::show_holidays(&resolver.holidays_in(Some(&window)), &window.label(), config.region);
        }
        Some(Commands::Dashboard { window }) => {
            tui::run(&config, window)?;
        }
        None => {
            tui::run(&config, &WindowArgs::default())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_arguments() {
        let cli = Cli::try_parse_from([
            "attendance", "summary", "--user", "alice", "--from", "2025-10-01", "--to", "2025-10-31",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Summary { window }) => {
                assert_eq!(window.user.as_deref(), Some("alice"));
                assert_eq!(window.from, NaiveDate::from_ymd_opt(2025, 10, 1));
                assert_eq!(window.to, NaiveDate::from_ymd_opt(2025, 10, 31));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_dates() {
        assert!(Cli::try_parse_from(["attendance", "summary", "--from", "01/10/2025"]).is_err());
        assert!(Cli::try_parse_from(["attendance", "detail", "--date", "2025-10-32"]).is_err());
    }

    #[test]
    fn test_global_source_flags() {
        let cli = Cli::try_parse_from(["attendance", "users", "--file", "output/attendance.json"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("output/attendance.json")));

        let config = load_config(&Cli {
            url: Some("http://localhost:8000/attendance.json".to_string()),
            file: None,
            config: Some(PathBuf::from("/nonexistent/config.json")),
            command: None,
        })
        .unwrap();
        assert_eq!(config.data_url, "http://localhost:8000/attendance.json");
    }

    #[test]
    fn test_dashboard_accepts_window_arguments() {
        let cli = Cli::try_parse_from(["attendance", "dashboard", "--from", "2025-09-01", "--user", "bob"]).unwrap();
        match cli.command {
            Some(Commands::Dashboard { window }) => {
                assert_eq!(window.from, NaiveDate::from_ymd_opt(2025, 9, 1));
                assert_eq!(window.to, None);
                assert_eq!(window.user.as_deref(), Some("bob"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_opens_dashboard() {
        let cli = Cli::try_parse_from(["attendance"]).unwrap();
        assert!(cli.command.is_none());
    }
}
