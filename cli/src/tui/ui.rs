use attendance_core::time::format_iso;
use attendance_core::usecase::presentation::format_detail_date;
use attendance_core::{AttendanceDetail, SessionStatus, SessionView, TileKind};
use chrono::Datelike;
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::calendar::weeks;
use crate::tui::app::App;

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    attended: Color,
    manual: Color,
    skip: Color,
    holiday: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    attended: Color::Red,
    manual: Color::LightYellow,
    skip: Color::Yellow,
    holiday: Color::LightRed,
};

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(title)
}

pub fn draw(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + Sidebar
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    let view = app.session.view();
    draw_header(frame, app, &view, main_layout[0]);

    if app.session.dataset().is_some() {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Chart
                Constraint::Length(1),      // Gutter
                Constraint::Percentage(40), // Summary + Calendar
            ])
            .split(main_layout[1]);

        draw_chart(frame, &view, content_chunks[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(10)])
            .split(content_chunks[2]);
        draw_summary(frame, &view, side[0]);
        draw_calendar(frame, app, side[1]);
    } else {
        draw_status(frame, app.session.status(), main_layout[1]);
    }

    let help = Line::from(vec![
        Span::styled("USER: ", Style::default().fg(THEME.muted)),
        Span::styled("u/U ", Style::default().fg(THEME.text)),
        Span::styled(" DAY: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::styled(" MONTH: ", Style::default().fg(THEME.muted)),
        Span::styled("[/] ", Style::default().fg(THEME.text)),
        Span::styled(" START: ", Style::default().fg(THEME.muted)),
        Span::styled("s/S ", Style::default().fg(THEME.text)),
        Span::styled(" END: ", Style::default().fg(THEME.muted)),
        Span::styled("e/E ", Style::default().fg(THEME.text)),
        Span::styled(" DETAIL: ", Style::default().fg(THEME.muted)),
        Span::styled("enter ", Style::default().fg(THEME.text)),
        Span::styled(" RETRY: ", Style::default().fg(THEME.muted)),
        Span::styled("r ", Style::default().fg(THEME.text)),
        Span::styled(" QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), main_layout[2]);

    if let Some(detail) = app.session.detail() {
        draw_detail(frame, detail);
    }
}

fn draw_header(frame: &mut Frame, app: &App, view: &SessionView, area: Rect) {
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24), // Title
            Constraint::Min(1),     // Spacer
            Constraint::Length(60), // User + range
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "ATTENDANCE TRACKER",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(title, header_layout[0]);

    let users = app.session.users().len();
    let user = view.user.clone().unwrap_or_else(|| "-".to_string());
    let nav = Line::from(vec![
        Span::styled(" < ", Style::default().fg(if users > 1 { THEME.text } else { THEME.muted })),
        Span::styled(user, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(if users > 1 { THEME.text } else { THEME.muted })),
        Span::styled(format!(" {}", view.range_label), Style::default().fg(THEME.muted)),
    ]);
    let nav = Paragraph::new(nav)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);

    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        area,
    );
}

fn draw_status(frame: &mut Frame, status: &SessionStatus, area: Rect) {
    let lines = match status {
        SessionStatus::Failed(message) => vec![
            Line::from(Span::styled(message.clone(), Style::default().fg(THEME.attended).add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(Span::styled("Press r to retry", Style::default().fg(THEME.muted))),
        ],
        _ => vec![Line::from(Span::styled("Loading attendance data...", Style::default().fg(THEME.muted)))],
    };
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(panel(" Status ").padding(Padding::new(0, 0, 2, 0)));
    frame.render_widget(paragraph, area);
}

fn draw_chart(frame: &mut Frame, view: &SessionView, area: Rect) {
    let bar_items: Vec<Bar> = view
        .chart_series
        .iter()
        .map(|point| {
            Bar::default()
                .label(point.month_key.as_str())
                .value((point.percentage * 10.0).round().max(0.0) as u64)
                .style(Style::default().fg(THEME.attended))
                .text_value(format!("{:.1}%", point.percentage))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(" Monthly Attendance (%) "))
        .bar_width(8)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bar_items))
        .max(1000);

    frame.render_widget(chart, area);
}

fn draw_summary(frame: &mut Frame, view: &SessionView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(area);

    let stats = &view.summary;
    let info_text = vec![
        Line::from(vec![
            Span::styled("Working days: ", Style::default().fg(THEME.muted)),
            Span::styled(stats.total_working_days.to_string(), Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Attended:     ", Style::default().fg(THEME.muted)),
            Span::styled(stats.days_attended.to_string(), Style::default().fg(THEME.attended).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Missed:       ", Style::default().fg(THEME.muted)),
            Span::styled(stats.days_missed.to_string(), Style::default().fg(THEME.text)),
        ]),
        Line::from(vec![
            Span::styled("Manual days:  ", Style::default().fg(THEME.muted)),
            Span::styled(view.manual_attendance_dates.len().to_string(), Style::default().fg(THEME.manual)),
        ]),
    ];
    frame.render_widget(Paragraph::new(info_text).block(panel(" Summary ")), chunks[0]);

    let ratio = (stats.attendance_percentage / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(panel(" Attendance "))
        .gauge_style(Style::default().fg(THEME.attended))
        .ratio(ratio)
        .label(format!("{:.2}%", stats.attendance_percentage));
    frame.render_widget(gauge, chunks[1]);
}

fn tile_style(kind: Option<TileKind>) -> Style {
    match kind {
        Some(TileKind::Attended) => Style::default().fg(Color::White).bg(THEME.attended).add_modifier(Modifier::BOLD),
        Some(TileKind::Manual) => Style::default().fg(THEME.manual).add_modifier(Modifier::BOLD),
        Some(TileKind::Skip) => Style::default().fg(THEME.skip),
        Some(TileKind::PublicHoliday) => Style::default().fg(THEME.holiday),
        None => Style::default().fg(THEME.text),
    }
}

fn draw_calendar(frame: &mut Frame, app: &App, area: Rect) {
    let month = app.session.displayed_month();
    let tiles = app.session.month_grid();
    let view = app.session.view();

    let mut lines = vec![Line::from(Span::styled(
        " Mo  Tu  We  Th  Fr  Sa  Su",
        Style::default().fg(THEME.muted),
    ))];

    for week in weeks(&tiles) {
        let spans: Vec<Span> = week
            .into_iter()
            .map(|cell| match cell {
                Some(tile) => {
                    let mut style = tile_style(tile.kind);
                    if tile.date.day() == app.selected_day {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(format!(" {:>2} ", tile.date.day()), style)
                }
                None => Span::raw("    "),
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    for holiday in view
        .holiday_entries
        .iter()
        .filter(|h| h.date.year() == month.year() && h.date.month() == month.month())
    {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", format_iso(holiday.date)), Style::default().fg(THEME.holiday)),
            Span::styled(holiday.name.clone(), Style::default().fg(THEME.muted)),
        ]));
    }

    let title = format!(" {} ", month.format("%B %Y"));
    frame.render_widget(Paragraph::new(lines).block(panel(&title)), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_detail(frame: &mut Frame, detail: &AttendanceDetail) {
    let area = centered(frame.area(), 48, 10);
    let kind = if detail.is_manual { "Manual attendance" } else { "Detected attendance" };
    let lines = vec![
        Line::from(Span::styled(kind, Style::default().fg(THEME.muted))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Date:    ", Style::default().fg(THEME.muted)),
            Span::styled(format_detail_date(&detail.date), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Time:    ", Style::default().fg(THEME.muted)),
            Span::raw(detail.timestamp.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![
            Span::styled("Station: ", Style::default().fg(THEME.muted)),
            Span::raw(detail.station.clone()),
        ]),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(" Attendance Details ").border_style(Style::default().fg(THEME.primary))),
        area,
    );
}
