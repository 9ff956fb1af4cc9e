use crate::snake::Position;

/// What occupies a cell, as far as drawing is concerned.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TileKind {
    Wall,
    Body,
    Head,
    Food,
    Empty,
}

/// One cell to draw.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Tile {
    pub position: Position,
    pub kind: TileKind,
}

impl Tile {
    #[must_use]
    pub fn new(position: Position, kind: TileKind) -> Self {
        Self { position, kind }
    }
}
