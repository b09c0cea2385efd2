use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::models::Owner;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database, owner: Owner) -> Result<()> {
    let mut app = App::new(owner, chrono::Local::now().date_naive());
    app.refresh_all(db)?;
    tracing::info!(owner = %app.owner, "TUI started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("TUI exited with error: {e:#}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        if let Err(e) = app.set_today(chrono::Local::now().date_naive(), db) {
            report_error(app, &e);
        }

        terminal.draw(|f| {
            // tab bar + status bar + command bar
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            let handled = match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db),
                InputMode::Command => handle_command_input(key, app, db),
                InputMode::Editing => handle_editing_input(key, app, db),
                InputMode::Confirm => handle_confirm_input(key, app, db),
            };
            if let Err(e) = handled {
                report_error(app, &e);
            }
        }
    }
    Ok(())
}

/// A failed command lands on the status line; the session keeps running.
fn report_error(app: &mut App, e: &anyhow::Error) {
    tracing::error!("Command failed: {e:#}");
    app.input_mode = InputMode::Normal;
    app.set_status(format!("Error: {e:#}"));
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('1') => commands::switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => commands::switch_screen(app, db, Screen::Expenses)?,
        KeyCode::Char('3') => commands::switch_screen(app, db, Screen::Income)?,
        KeyCode::Char('4') => commands::switch_screen(app, db, Screen::Goals)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            commands::switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            commands::switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Char('a') => {
            // Prefill the command line for the current tab
            let prefix = match app.screen {
                Screen::Dashboard | Screen::Expenses => "add-expense ",
                Screen::Income => "add-income ",
                Screen::Goals => "add-goal ",
            };
            app.command_input = prefix.to_string();
            app.input_mode = InputMode::Command;
        }
        KeyCode::Char('e') if app.screen != Screen::Dashboard => {
            commands::handle_command("rename", app, db)?;
        }
        KeyCode::Char('D') if app.screen != Screen::Dashboard => {
            commands::handle_command("delete", app, db)?;
        }
        KeyCode::Char('c') if app.screen == Screen::Goals => {
            commands::handle_command("complete", app, db)?;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Esc => {
            app.status_message.clear();
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let text = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::rename_selected(&text, app, db)?;
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            if let Some(action) = app.pending_action.take() {
                commands::confirm_pending(action, app, db)?;
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

// ── Cursor movement ──────────────────────────────────────────

fn handle_move_down(app: &mut App) {
    let page = app.table_page();
    match app.screen {
        Screen::Expenses | Screen::Income => scroll_down(
            &mut app.record_index,
            &mut app.record_scroll,
            app.records.len(),
            page,
        ),
        Screen::Goals => scroll_down(
            &mut app.goal_index,
            &mut app.goal_scroll,
            app.goals.len(),
            page,
        ),
        Screen::Dashboard => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Expenses | Screen::Income => {
            scroll_up(&mut app.record_index, &mut app.record_scroll)
        }
        Screen::Goals => scroll_up(&mut app.goal_index, &mut app.goal_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Expenses | Screen::Income => {
            scroll_to_top(&mut app.record_index, &mut app.record_scroll)
        }
        Screen::Goals => scroll_to_top(&mut app.goal_index, &mut app.goal_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.table_page();
    match app.screen {
        Screen::Expenses | Screen::Income => scroll_to_bottom(
            &mut app.record_index,
            &mut app.record_scroll,
            app.records.len(),
            page,
        ),
        Screen::Goals => scroll_to_bottom(
            &mut app.goal_index,
            &mut app.goal_scroll,
            app.goals.len(),
            page,
        ),
        Screen::Dashboard => {}
    }
}
