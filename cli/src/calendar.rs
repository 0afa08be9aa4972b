use attendance_core::time::{format_iso, last_of_month};
use attendance_core::{CalendarTile, TileKind};
use chrono::{Datelike, NaiveDate};

use crate::Session;

const RESET: &str = "\x1b[0m";

fn marker(kind: Option<TileKind>) -> (&'static str, &'static str) {
    match kind {
        Some(TileKind::Attended) => ("*", "\x1b[1;37;41m"),
        Some(TileKind::Manual) => ("+", "\x1b[1;33m"),
        Some(TileKind::Skip) => ("~", "\x1b[33m"),
        Some(TileKind::PublicHoliday) => ("!", "\x1b[31m"),
        None => (" ", ""),
    }
}

/// Week rows, Monday first, `None` for padding cells.
pub fn weeks(tiles: &[CalendarTile]) -> Vec<Vec<Option<&CalendarTile>>> {
    let mut rows = Vec::new();
    let mut row: Vec<Option<&CalendarTile>> = Vec::new();

    if let Some(first) = tiles.first() {
        for _ in 0..first.date.weekday().num_days_from_monday() {
            row.push(None);
        }
    }
    for tile in tiles {
        row.push(Some(tile));
        if row.len() == 7 {
            rows.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        while row.len() < 7 {
            row.push(None);
        }
        rows.push(row);
    }
    rows
}

pub fn show_calendar(session: &Session) {
    let month = session.displayed_month();
    let view = session.view();
    let tiles = session.month_grid();

    println!(
        "\x1b[1;36m{}\x1b[0m  {}  ({})",
        month.format("%B %Y"),
        view.user.as_deref().unwrap_or("-"),
        view.range_label
    );
    println!(" Mon Tue Wed Thu Fri Sat Sun");

    for week in weeks(&tiles) {
        let mut line = String::new();
        for cell in week {
            match cell {
                Some(tile) => {
                    let (mark, color) = marker(tile.kind);
                    if color.is_empty() {
                        line.push_str(&format!(" {:>2}{}", tile.date.day(), mark));
                    } else {
                        line.push_str(&format!(" {}{:>2}{}{}", color, tile.date.day(), mark, RESET));
                    }
                }
                None => line.push_str("    "),
            }
        }
        println!("{}", line);
    }

    println!();
    println!("  * attended   + manual   ~ skipped   ! public holiday");

    let month_end = last_of_month(month);
    let in_month = |d: NaiveDate| d >= month && d <= month_end;
    for holiday in view.holiday_entries.iter().filter(|h| in_month(h.date)) {
        println!("  {}  {}", format_iso(holiday.date), holiday.name);
    }
}
