//! Text rendering of the world.

use maze_world::{Position, World};

/// Draw the maze with the agent as an arrow (`^ > v <`) in its cell.
pub fn render(world: &World) -> String {
    let grid = world.grid();
    let pose = world.pose();
    let mut out = String::with_capacity((grid.cols() + 1) * grid.rows());
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let here = Position::new(row as i32, col as i32);
            if here == pose.position {
                out.push(pose.facing.arrow());
            } else {
                out.push(grid.cell(here).symbol());
            }
        }
        out.push('\n');
    }
    out
}
