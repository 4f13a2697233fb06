/// Keyboard input: drains pending crossterm events once per frame.
///
/// Moves are discrete, so every Press or Repeat event counts as one step;
/// Release events are ignored. Nothing here touches game state. The game
/// loop maps presses to `Command`s.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::grid::Direction;

pub const KEYS_NEW_GAME: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Arrow keys and WASD.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

pub struct InputState {
    /// Key presses collected by the most recent `drain_events()`, in order.
    presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { presses: Vec::with_capacity(8) }
    }

    /// Read all available terminal events without blocking.
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        self.presses.clear();
        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    self.presses.push(key);
                }
            }
        }
        Ok(())
    }

    /// Directions pressed this frame, oldest first.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.presses.iter().filter_map(|k| direction_for(k.code))
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        self.presses.iter().any(|k| codes.contains(&k.code))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    #[cfg(test)]
    fn with_presses(codes: &[KeyCode]) -> Self {
        InputState {
            presses: codes.iter().map(|&c| KeyEvent::new(c, KeyModifiers::NONE)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(direction_for(KeyCode::Up), Some(Direction::Up));
        assert_eq!(direction_for(KeyCode::Char('a')), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::Char('S')), Some(Direction::Down));
        assert_eq!(direction_for(KeyCode::Right), Some(Direction::Right));
        assert_eq!(direction_for(KeyCode::Char('x')), None);
    }

    #[test]
    fn directions_keep_press_order() {
        let input = InputState::with_presses(&[KeyCode::Left, KeyCode::Char('r'), KeyCode::Up]);
        let dirs: Vec<Direction> = input.directions().collect();
        assert_eq!(dirs, vec![Direction::Left, Direction::Up]);
        assert!(input.any_pressed(KEYS_NEW_GAME));
        assert!(!input.any_pressed(KEYS_QUIT));
        assert!(!input.ctrl_c_pressed());
    }
}
