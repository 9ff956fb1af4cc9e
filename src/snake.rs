use std::collections::VecDeque;

use crate::config::INITIAL_SNAKE_LENGTH;
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step towards `direction`.
    #[must_use]
    pub fn moved(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Cells touched by the most recent step.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Movement {
    pub head: Position,
    pub previous_head: Position,
    /// Tail cell released by the step; `None` when the snake grew.
    pub vacated: Option<Position>,
}

/// Snake body, heading and life cycle flags.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    heading: Direction,
    has_eaten: bool,
    alive: bool,
    last_move: Option<Movement>,
}

impl Snake {
    /// Creates a straight snake with its head at `head`, body trailing
    /// behind it opposite to `heading`.
    #[must_use]
    pub fn new(head: Position, heading: Direction) -> Self {
        let behind = heading.opposite();
        let mut body = Vec::with_capacity(INITIAL_SNAKE_LENGTH);
        let mut segment = head;
        for _ in 0..INITIAL_SNAKE_LENGTH {
            body.push(segment);
            segment = segment.moved(behind);
        }

        Self::from_segments(body, heading)
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, heading: Direction) -> Self {
        debug_assert!(!segments.is_empty());

        Self {
            body: VecDeque::from(segments),
            heading,
            has_eaten: false,
            alive: true,
            last_move: None,
        }
    }

    /// Turns towards `heading` unless that would reverse into the neck.
    ///
    /// Returns whether the heading was accepted.
    pub fn change_direction(&mut self, heading: Direction) -> bool {
        if heading == self.heading.opposite() {
            return false;
        }

        self.heading = heading;
        true
    }

    /// Moves one cell along the heading, keeping the tail if food was eaten.
    pub fn step(&mut self) {
        let previous_head = self.head();
        let head = previous_head.moved(self.heading);

        self.body.push_front(head);
        let vacated = if self.has_eaten {
            None
        } else {
            self.body.pop_back()
        };
        self.has_eaten = false;

        self.last_move = Some(Movement {
            head,
            previous_head,
            vacated,
        });
    }

    /// Queues growth on the next step.
    pub fn grow(&mut self) {
        self.has_eaten = true;
    }

    pub fn die(&mut self) {
        self.alive = false;
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Body from head to tail.
    #[must_use]
    pub fn points(&self) -> &VecDeque<Position> {
        &self.body
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// True between `grow` and the step that consumes it.
    #[must_use]
    pub fn has_eaten(&self) -> bool {
        self.has_eaten
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn last_move(&self) -> Option<Movement> {
        self.last_move
    }
}
