//! The maze grid: an immutable rectangle of cells loaded from text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A grid coordinate. Signed so that neighbours of edge cells can be
/// expressed; every out-of-bounds position reads as a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The position offset by `(d_row, d_col)`.
    pub fn offset(self, (d_row, d_col): (i32, i32)) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// What occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Open,
    Wall,
    Start,
    Goal,
}

impl CellKind {
    /// Decode a maze text character.
    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(Self::Open),
            '#' => Some(Self::Wall),
            'S' => Some(Self::Start),
            'G' => Some(Self::Goal),
            _ => None,
        }
    }

    /// The character this cell is written as in maze text.
    pub fn symbol(self) -> char {
        match self {
            Self::Open => ' ',
            Self::Wall => '#',
            Self::Start => 'S',
            Self::Goal => 'G',
        }
    }
}

/// Why maze text was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeLoadError {
    #[error("maze is empty")]
    Empty,

    #[error("all maze rows must be the same width: row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid maze character {ch:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, ch: char },

    #[error("maze must contain exactly one 'S' (found another at {second})")]
    DuplicateStart { first: Position, second: Position },

    #[error("maze must contain exactly one 'G' (found another at {second})")]
    DuplicateGoal { first: Position, second: Position },

    #[error("maze must contain one 'S' (start) and one 'G' (goal)")]
    MissingStartOrGoal,
}

/// An immutable, rectangular maze.
///
/// Invariants (checked by [`MazeGrid::parse`]): every row has the same
/// width, and there is exactly one start and one goal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    cells: Vec<CellKind>,
    rows: usize,
    cols: usize,
    start: Position,
    goal: Position,
}

impl MazeGrid {
    /// Parse maze text: rows over `#`, `S`, `G` and space. Blank lines are
    /// ignored; line endings may be `\n` or `\r\n`.
    pub fn parse(text: &str) -> Result<Self, MazeLoadError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .collect();

        let width = lines.first().map(|l| l.chars().count()).ok_or(MazeLoadError::Empty)?;

        let mut cells = Vec::with_capacity(width * lines.len());
        let mut start = None;
        let mut goal = None;

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MazeLoadError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell =
                    CellKind::from_symbol(ch).ok_or(MazeLoadError::InvalidCell { row, col, ch })?;
                let here = Position::new(row as i32, col as i32);
                match cell {
                    CellKind::Start => {
                        if let Some(first) = start.replace(here) {
                            return Err(MazeLoadError::DuplicateStart {
                                first,
                                second: here,
                            });
                        }
                    }
                    CellKind::Goal => {
                        if let Some(first) = goal.replace(here) {
                            return Err(MazeLoadError::DuplicateGoal {
                                first,
                                second: here,
                            });
                        }
                    }
                    CellKind::Open | CellKind::Wall => {}
                }
                cells.push(cell);
            }
        }

        let (Some(start), Some(goal)) = (start, goal) else {
            return Err(MazeLoadError::MissingStartOrGoal);
        };

        Ok(Self {
            cells,
            rows: lines.len(),
            cols: width,
            start,
            goal,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && (pos.row as usize) < self.rows && (pos.col as usize) < self.cols
    }

    /// The cell at `pos`; out-of-bounds positions are walls.
    pub fn cell(&self, pos: Position) -> CellKind {
        if !self.in_bounds(pos) {
            return CellKind::Wall;
        }
        let idx = pos.row as usize * self.cols + pos.col as usize;
        self.cells.get(idx).copied().unwrap_or(CellKind::Wall)
    }

    /// True if `(row, col)` is out of bounds or a wall.
    pub fn is_wall(&self, row: i32, col: i32) -> bool {
        self.cell(Position::new(row, col)) == CellKind::Wall
    }
}

impl FromStr for MazeGrid {
    type Err = MazeLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Writes the maze back as text, one row per line.
impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}
