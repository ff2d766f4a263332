use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Controller, PlaybackState};
use crate::audio::SessionFactory;
use crate::skin::Skin;
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What a key press asks for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    PlayPause,
    Next,
    Previous,
    ToggleLoop,
    TogglePinned,
    ToggleMinimized,
    Close,
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Close);
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(Action::PlayPause),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::Next),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::Previous),
        KeyCode::Char('r') => Some(Action::ToggleLoop),
        KeyCode::Char('t') => Some(Action::TogglePinned),
        KeyCode::Char('m') => Some(Action::ToggleMinimized),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Close),
        _ => None,
    }
}

/// Returns `false` once the panel should close.
pub fn apply<F: SessionFactory>(
    action: Action,
    controller: &mut Controller<F>,
    skin: &mut Skin,
) -> bool {
    // Playback failures are already logged and surfaced via `last_error`.
    match action {
        // Nothing is open yet (no autoplay, or the last open failed): start the cued track.
        Action::PlayPause
            if controller.state() == PlaybackState::Idle && !controller.playlist().is_empty() =>
        {
            let _ = controller.select_track(controller.playlist().cursor());
        }
        Action::PlayPause => controller.toggle_play_pause(),
        Action::Next => {
            let _ = controller.next();
        }
        Action::Previous => {
            let _ = controller.previous();
        }
        Action::ToggleLoop => controller.toggle_loop(),
        Action::TogglePinned => skin.toggle_pinned(),
        Action::ToggleMinimized => skin.toggle_minimized(),
        Action::Close => return false,
    }
    true
}

/// Main terminal loop: drains player events, draws, handles keys.
/// Returns `Ok(())` when the panel is closed.
pub fn run<F: SessionFactory>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    controller: &mut Controller<F>,
    skin: &mut Skin,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        controller.pump_events();

        terminal.draw(|f| ui::draw(f, controller, skin))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = action_for(key) {
                    if !apply(action, controller, skin) {
                        return Ok(());
                    }
                }
            }
        }
    }
}
