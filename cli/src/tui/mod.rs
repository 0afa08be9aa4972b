pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use attendance_core::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::App;
use crate::WindowArgs;

pub fn run(config: &AppConfig, args: &WindowArgs) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config).with_selection(args.from, args.to, args.user.clone());
    app.request_fetch();
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.poll_fetches();

        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.has_detail() {
                    match key.code {
                        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_detail(),
                        _ => {}
                    }
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('r') => app.request_fetch(),
                    KeyCode::Char('u') | KeyCode::Tab => app.next_user(),
                    KeyCode::Char('U') | KeyCode::BackTab => app.previous_user(),
                    KeyCode::Right | KeyCode::Char('l') => app.next_day(),
                    KeyCode::Left | KeyCode::Char('h') => app.previous_day(),
                    KeyCode::Char(']') | KeyCode::PageDown => app.next_month(),
                    KeyCode::Char('[') | KeyCode::PageUp => app.previous_month(),
                    KeyCode::Char('s') => app.move_start(-1),
                    KeyCode::Char('S') => app.move_start(1),
                    KeyCode::Char('e') => app.move_end(-1),
                    KeyCode::Char('E') => app.move_end(1),
                    KeyCode::Enter => app.open_detail(),
                    _ => {}
                }
            }
        }
    }
}
