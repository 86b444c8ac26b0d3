use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::GameError;
use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close / Ctrl+C. Ends the session from any state.
    Quit,
    Turn(Direction),
    Restart,
    ConfirmQuit,
    TogglePause,
    ToggleSound,
}

/// Anything that can hand over the events queued since the last poll.
pub trait InputSource {
    /// Must not block waiting for new input.
    fn poll_events(&mut self) -> Result<Vec<InputEvent>, GameError>;
}

pub fn from_key_event(ev: &KeyEvent) -> Option<InputEvent> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }
    if is_ctrl_c(ev) {
        return Some(InputEvent::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(InputEvent::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(InputEvent::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(InputEvent::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(InputEvent::Turn(Right)),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(InputEvent::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::ConfirmQuit),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(InputEvent::TogglePause),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(InputEvent::ToggleSound),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev.code, KeyCode::Char('c') | KeyCode::Char('C')) && ev.modifiers.contains(KeyModifiers::CONTROL)
}
