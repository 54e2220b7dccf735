pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250); // 250ms tick for flash expiry

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break;
        }
    }

    ratatui::restore();

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Day navigation
                KeyCode::Char('h') | KeyCode::Left => app.move_selection(-1),
                KeyCode::Char('l') | KeyCode::Right => app.move_selection(1),
                KeyCode::Char('j') | KeyCode::Down => app.move_selection(7),
                KeyCode::Char('k') | KeyCode::Up => app.move_selection(-7),

                // Month navigation
                KeyCode::Char('[') | KeyCode::PageUp => app.previous_month(),
                KeyCode::Char(']') | KeyCode::PageDown => app.next_month(),
                KeyCode::Char('t') => app.jump_to(chrono::Local::now().date_naive()),

                // Cycle the selected day's status
                KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),

                // Undo
                KeyCode::Char('z') => app.undo_last(),

                // Best days overlay
                KeyCode::Char('b') => app.show_best_days(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::BestDays => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => app.dismiss_best_days(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::types::{AvailabilityStatus, ScheduleState};
    use crate::tui::theme::ThemeColors;
    use chrono::NaiveDate;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn test_app() -> App {
        // Keep the directory alive for the duration of the test process;
        // toggles save through it.
        let dir = tempfile::tempdir().unwrap().keep();
        App::new(
            ScheduleState::new(),
            dir.join("availability.json"),
            Config::default(),
            "alice".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            ThemeColors::dark(),
        )
    }

    #[test]
    fn test_q_quits() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_space_cycles_status() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        assert_eq!(app.selected_status(), AvailabilityStatus::Available);
        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        assert_eq!(app.selected_status(), AvailabilityStatus::Maybe);
    }

    #[test]
    fn test_toggle_then_undo_restores() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        handle_key_event(&mut app, key(KeyCode::Char('z')));
        assert_eq!(app.selected_status(), AvailabilityStatus::Unknown);
    }

    #[test]
    fn test_help_opens_and_any_key_closes() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.input_mode, app::InputMode::Help);
        handle_key_event(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_best_days_overlay_open_close() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('b')));
        assert_eq!(app.input_mode, app::InputMode::BestDays);
        // One entry per day of March
        assert!(!app.best_days.is_empty());
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_keys_in_overlay_do_not_toggle() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('b')));
        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        assert_eq!(app.selected_status(), AvailabilityStatus::Unknown);
        handle_key_event(&mut app, key(KeyCode::Char('b')));
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }
}
