//! Terminal key mapping
//!
//! In-game keys map to [`Input`]; menu keys (between runs) map to [`Command`].
//! Anything unrecognised maps to nothing and is ignored.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::Input;

/// Driver-level commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Key for the running game
    Game(Input),
    /// Start a run (between runs)
    Start,
    /// Cycle the difficulty tier (between runs)
    NextTier,
    /// Toggle marathon/practice (between runs)
    ToggleMode,
    Quit,
}

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_ACTION: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_STOP: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];
const KEYS_START: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_TIER: &[KeyCode] = &[KeyCode::Char('t'), KeyCode::Char('T')];
const KEYS_MODE: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];

/// Map a key press. `in_game` selects the in-game table over the menu table.
pub fn map_key(key: &KeyEvent, in_game: bool) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let code = key.code;
    if in_game {
        let input = if KEYS_UP.contains(&code) {
            Input::Up
        } else if KEYS_DOWN.contains(&code) {
            Input::Down
        } else if KEYS_LEFT.contains(&code) {
            Input::Left
        } else if KEYS_RIGHT.contains(&code) {
            Input::Right
        } else if KEYS_ACTION.contains(&code) {
            Input::Action
        } else if KEYS_PAUSE.contains(&code) {
            Input::Pause
        } else if KEYS_STOP.contains(&code) {
            Input::Stop
        } else {
            return None;
        };
        return Some(Command::Game(input));
    }

    if KEYS_START.contains(&code) {
        Some(Command::Start)
    } else if KEYS_TIER.contains(&code) {
        Some(Command::NextTier)
    } else if KEYS_MODE.contains(&code) {
        Some(Command::ToggleMode)
    } else if KEYS_STOP.contains(&code) {
        Some(Command::Quit)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_game_keys() {
        assert_eq!(map_key(&press(KeyCode::Up), true), Some(Command::Game(Input::Up)));
        assert_eq!(map_key(&press(KeyCode::Char('a')), true), Some(Command::Game(Input::Left)));
        assert_eq!(map_key(&press(KeyCode::Char(' ')), true), Some(Command::Game(Input::Action)));
        assert_eq!(map_key(&press(KeyCode::Char('P')), true), Some(Command::Game(Input::Pause)));
        assert_eq!(map_key(&press(KeyCode::Esc), true), Some(Command::Game(Input::Stop)));
        assert_eq!(map_key(&press(KeyCode::Char('z')), true), None);
    }

    #[test]
    fn test_menu_keys() {
        assert_eq!(map_key(&press(KeyCode::Enter), false), Some(Command::Start));
        assert_eq!(map_key(&press(KeyCode::Char('t')), false), Some(Command::NextTier));
        assert_eq!(map_key(&press(KeyCode::Char('q')), false), Some(Command::Quit));
        assert_eq!(map_key(&press(KeyCode::Up), false), None);
    }

    #[test]
    fn test_ctrl_c_and_release() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c, true), Some(Command::Quit));

        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(&release, true), None);
    }
}
