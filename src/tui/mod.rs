pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

/// Run the interactive scorecard form until the user quits.
pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while the form is active so output doesn't corrupt the display
    crate::diagnostics::activate_buffer();

    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let outcome = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Some(Event::Key(key)) => handle_key_event(&mut app, key),
            Some(Event::Tick) => app.update_flash(),
            None => break Ok(()),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    for msg in crate::diagnostics::drain() {
        eprintln!("{}", msg);
    }

    outcome
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Navigation
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.next_field(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.previous_field(),

            // Adjust selected field
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') => app.adjust(1),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => app.adjust(-1),
            KeyCode::Enter | KeyCode::Char(' ') => app.activate_selected(),

            KeyCode::Char('p') => app.toggle_preview(),
            KeyCode::Char('e') => app.export(Utc::now()),
            KeyCode::Char('r') => app.reset(),
            KeyCode::Char('?') => app.show_help(),
            _ => {}
        },
        app::InputMode::EditText => match key.code {
            KeyCode::Enter => app.confirm_text_input(),
            KeyCode::Esc => app.cancel_text_input(),
            KeyCode::Backspace => {
                app.text_input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.push_text_char(c)
            }
            _ => {}
        },
        app::InputMode::JsonPreview => match key.code {
            KeyCode::Char('p') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_preview(),
            KeyCode::Char('j') | KeyCode::Down => app.scroll_preview(true),
            KeyCode::Char('k') | KeyCode::Up => app.scroll_preview(false),
            _ => {}
        },
        app::InputMode::Help => app.dismiss_help(),
    }
}
