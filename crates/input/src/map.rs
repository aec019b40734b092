//! Key mapping from terminal events to session commands.
//!
//! The same key means different things on different screens, so mapping
//! takes the current phase and whether the exit prompt is up.

use crate::types::{Command, Decision, SessionPhase};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to a session command.
pub fn map_key(key: KeyEvent, phase: SessionPhase, exit_prompt: bool) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match phase {
        SessionPhase::Menu => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Char('S') => {
                Some(Command::Start)
            }
            KeyCode::Char('x') | KeyCode::Char('X') => Some(Command::Shutdown),
            _ => None,
        },

        SessionPhase::Playing if exit_prompt => match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Some(Command::ConfirmExit),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::CancelExit),
            _ => None,
        },

        SessionPhase::Playing => match key.code {
            // HOAX on the left, FACT on the right
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
                Some(Command::Decide(Decision::ClassifyFalse))
            }
            KeyCode::Right | KeyCode::Char('f') | KeyCode::Char('F') => {
                Some(Command::Decide(Decision::ClassifyGenuine))
            }
            KeyCode::Esc | KeyCode::Char('e') | KeyCode::Char('E') => Some(Command::RequestExit),
            _ => None,
        },

        SessionPhase::Education => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('c') | KeyCode::Char('C') => {
                Some(Command::Continue)
            }
            _ => None,
        },

        SessionPhase::GameOver => match key.code {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
            _ => None,
        },

        SessionPhase::Shutdown => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') | KeyCode::Char('O') => {
                Some(Command::PowerOn)
            }
            _ => None,
        },

        SessionPhase::RankUp => None,
    }
}

/// Check if key should quit the program.
///
/// Ctrl-C always quits; `q` only from the menu or the powered-off screen so a
/// stray keypress cannot end a running session.
pub fn should_quit(key: KeyEvent, phase: SessionPhase) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        || (matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
            && matches!(phase, SessionPhase::Menu | SessionPhase::Shutdown))
}

/// One-line key hint for the footer.
pub fn key_hint(phase: SessionPhase, exit_prompt: bool) -> &'static str {
    match phase {
        SessionPhase::Menu => "[Enter] start  [x] power off  [q] quit",
        SessionPhase::Playing if exit_prompt => "[y] leave  [n] stay",
        SessionPhase::Playing => "[<-/h] HOAX  [->/f] FACT  [Esc] exit",
        SessionPhase::Education => "[Enter] continue",
        SessionPhase::GameOver => "[r] reboot system",
        SessionPhase::Shutdown => "[o] power on  [q] quit",
        SessionPhase::RankUp => "",
    }
}
