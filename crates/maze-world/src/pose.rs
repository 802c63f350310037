use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Position;

/// Facing direction, encoded 0–3 clockwise from up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Decode `index mod 4`.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index % 4)]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// `(facing − 1) mod 4`
    pub fn left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// `(facing + 1) mod 4`
    pub fn right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn behind(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Unit `(d_row, d_col)` step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Arrow glyph used when drawing the agent.
    pub fn arrow(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

/// The agent's position and facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    #[serde(flatten)]
    pub position: Position,
    pub facing: Direction,
}

impl Pose {
    pub fn new(position: Position, facing: Direction) -> Self {
        Self { position, facing }
    }

    /// The cell one step away in `direction`.
    pub fn neighbor(self, direction: Direction) -> Position {
        self.position.offset(direction.delta())
    }

    /// The cell directly ahead.
    pub fn ahead(self) -> Position {
        self.neighbor(self.facing)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} facing {}", self.position, self.facing)
    }
}
