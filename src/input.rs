use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::InputError;

/// Canonical movement directions (headings) of the snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit vector `(dx, dy)` with y growing downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Discrete action ids accepted by the learning environment.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Action {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Action {
    /// Size of the action space.
    pub const COUNT: usize = 4;

    /// All actions in id order.
    pub const ALL: [Self; Self::COUNT] = [Self::Up, Self::Right, Self::Down, Self::Left];

    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            Self::Up => Direction::Up,
            Self::Right => Direction::Right,
            Self::Down => Direction::Down,
            Self::Left => Direction::Left,
        }
    }

    #[must_use]
    pub fn id(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Action {
    type Error = InputError;

    fn try_from(id: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(id)
            .copied()
            .ok_or(InputError::UnknownAction(id))
    }
}

/// Translates a raw key into a heading.
///
/// `None` means no key was pressed this tick and leaves the heading unchanged.
pub fn translate_key(key: Option<KeyCode>) -> Result<Option<Direction>, InputError> {
    let Some(code) = key else {
        return Ok(None);
    };

    match code {
        KeyCode::Up => Ok(Some(Direction::Up)),
        KeyCode::Right => Ok(Some(Direction::Right)),
        KeyCode::Down => Ok(Some(Direction::Down)),
        KeyCode::Left => Ok(Some(Direction::Left)),
        other => Err(InputError::UnmappedKey(other)),
    }
}

/// High-level input events consumed by the interactive loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Quit,
    Confirm,
}

/// Reads key presses from the terminal for the interactive game.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one key press.
    ///
    /// Returns `Ok(None)` when nothing relevant was pressed in time.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key_event(key)),
            _ => Ok(None),
        }
    }
}

fn map_key_event(key: KeyEvent) -> Option<GameInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    match key.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(GameInput::Quit),
        KeyCode::Enter | KeyCode::Char(' ') => Some(GameInput::Confirm),
        KeyCode::Char('w' | 'W') => Some(GameInput::Direction(Direction::Up)),
        KeyCode::Char('d' | 'D') => Some(GameInput::Direction(Direction::Right)),
        KeyCode::Char('s' | 'S') => Some(GameInput::Direction(Direction::Down)),
        KeyCode::Char('a' | 'A') => Some(GameInput::Direction(Direction::Left)),
        code => match translate_key(Some(code)) {
            Ok(direction) => direction.map(GameInput::Direction),
            Err(error) => {
                tracing::trace!(%error, "ignoring key");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{Action, Direction, GameInput, map_key_event, translate_key};
    use crate::error::InputError;

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn deltas_are_unit_vectors() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Right.delta(), (1, 0));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
    }

    #[test]
    fn action_ids_map_clockwise_from_up() {
        let directions: Vec<_> = (0..4_usize)
            .map(|id| Action::try_from(id).expect("ids 0..4 are valid").direction())
            .collect();

        assert_eq!(
            directions,
            vec![
                Direction::Up,
                Direction::Right,
                Direction::Down,
                Direction::Left
            ]
        );
        assert_eq!(Action::Left.id(), 3);
    }

    #[test]
    fn out_of_range_action_is_an_error() {
        assert_eq!(Action::try_from(4_usize), Err(InputError::UnknownAction(4)));
    }

    #[test]
    fn arrow_keys_translate_to_directions() {
        assert_eq!(translate_key(Some(KeyCode::Up)), Ok(Some(Direction::Up)));
        assert_eq!(
            translate_key(Some(KeyCode::Right)),
            Ok(Some(Direction::Right))
        );
        assert_eq!(translate_key(Some(KeyCode::Down)), Ok(Some(Direction::Down)));
        assert_eq!(translate_key(Some(KeyCode::Left)), Ok(Some(Direction::Left)));
    }

    #[test]
    fn no_key_means_no_change() {
        assert_eq!(translate_key(None), Ok(None));
    }

    #[test]
    fn unmapped_key_is_an_error() {
        assert_eq!(
            translate_key(Some(KeyCode::Char('x'))),
            Err(InputError::UnmappedKey(KeyCode::Char('x')))
        );
    }

    #[test]
    fn wasd_and_control_keys_map_to_game_input() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            map_key_event(press(KeyCode::Char('w'))),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            map_key_event(press(KeyCode::Left)),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(map_key_event(press(KeyCode::Esc)), Some(GameInput::Quit));
        assert_eq!(
            map_key_event(press(KeyCode::Enter)),
            Some(GameInput::Confirm)
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(GameInput::Quit)
        );
        assert_eq!(map_key_event(press(KeyCode::Tab)), None);
    }
}
