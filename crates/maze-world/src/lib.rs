//! The maze world model: grid, agent pose, and the query/action primitives
//! the maze language can call.

mod grid;
mod pose;
mod world;

pub use grid::{CellKind, MazeGrid, MazeLoadError, Position};
pub use pose::{Direction, Pose};
pub use world::{ActionResult, World, START_FACING};
