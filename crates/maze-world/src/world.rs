//! The live world: a shared grid plus the agent's mutable pose.

use std::sync::Arc;

use maze_types::program::{Action, Predicate};
use serde::{Deserialize, Serialize};

use crate::grid::MazeGrid;
use crate::pose::{Direction, Pose};

/// Facing at the start of every run.
pub const START_FACING: Direction = Direction::Right;

/// What an action did to the pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionResult {
    /// The agent advanced one cell.
    Moved,
    /// `move()` into a wall; the pose is unchanged.
    Bumped,
    /// The facing changed.
    Turned,
}

/// One agent in one maze.
///
/// The grid is shared and immutable; the pose belongs to this world alone,
/// so independent runs over the same maze never observe each other.
#[derive(Debug, Clone)]
pub struct World {
    grid: Arc<MazeGrid>,
    pose: Pose,
}

impl World {
    /// A world with the agent on the start cell, facing right.
    pub fn new(grid: Arc<MazeGrid>) -> Self {
        let pose = Pose::new(grid.start(), START_FACING);
        Self { grid, pose }
    }

    pub fn grid(&self) -> &Arc<MazeGrid> {
        &self.grid
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Put the agent back on the start cell, facing right.
    pub fn reset(&mut self) {
        self.pose = Pose::new(self.grid.start(), START_FACING);
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn is_wall(&self, row: i32, col: i32) -> bool {
        self.grid.is_wall(row, col)
    }

    fn open_towards(&self, direction: Direction) -> bool {
        let target = self.pose.neighbor(direction);
        !self.grid.is_wall(target.row, target.col)
    }

    pub fn path_ahead(&self) -> bool {
        self.open_towards(self.pose.facing)
    }

    pub fn path_left(&self) -> bool {
        self.open_towards(self.pose.facing.left())
    }

    pub fn path_right(&self) -> bool {
        self.open_towards(self.pose.facing.right())
    }

    pub fn path_behind(&self) -> bool {
        self.open_towards(self.pose.facing.behind())
    }

    pub fn at_goal(&self) -> bool {
        self.pose.position == self.grid.goal()
    }

    /// Answer a predicate.
    pub fn query(&self, predicate: Predicate) -> bool {
        match predicate {
            Predicate::AtGoal => self.at_goal(),
            Predicate::PathAhead => self.path_ahead(),
            Predicate::PathLeft => self.path_left(),
            Predicate::PathRight => self.path_right(),
            Predicate::PathBehind => self.path_behind(),
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    /// Advance one cell if the way ahead is open; otherwise bump.
    pub fn move_forward(&mut self) -> ActionResult {
        if !self.path_ahead() {
            return ActionResult::Bumped;
        }
        self.pose.position = self.pose.ahead();
        ActionResult::Moved
    }

    pub fn turn_left(&mut self) -> ActionResult {
        self.pose.facing = self.pose.facing.left();
        ActionResult::Turned
    }

    pub fn turn_right(&mut self) -> ActionResult {
        self.pose.facing = self.pose.facing.right();
        ActionResult::Turned
    }

    /// Perform an action.
    pub fn perform(&mut self, action: Action) -> ActionResult {
        match action {
            Action::Move => self.move_forward(),
            Action::TurnLeft => self.turn_left(),
            Action::TurnRight => self.turn_right(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    // ######
    // #S  G#   start (1,1), corridor to the right
    // # ####
    // ######
    const MAZE: &str = "######\n#S  G#\n# ####\n######";

    fn world() -> World {
        World::new(Arc::new(MazeGrid::parse(MAZE).unwrap()))
    }

    #[test]
    fn test_starts_facing_right_on_start() {
        let w = world();
        assert_eq!(w.pose(), Pose::new(Position::new(1, 1), Direction::Right));
        assert!(!w.at_goal());
    }

    #[test]
    fn test_path_queries_relative_to_facing() {
        let mut w = world();
        assert!(w.path_ahead());
        assert!(!w.path_left());
        assert!(w.path_right());
        assert!(!w.path_behind());

        w.turn_right(); // facing down
        assert!(w.path_ahead());
        assert!(w.path_left());
        assert!(!w.path_right());
        assert!(!w.path_behind());
    }

    #[test]
    fn test_move_and_bump() {
        let mut w = world();
        assert_eq!(w.move_forward(), ActionResult::Moved);
        assert_eq!(w.move_forward(), ActionResult::Moved);
        assert_eq!(w.move_forward(), ActionResult::Moved);
        assert!(w.at_goal());
        let before = w.pose();
        assert_eq!(w.move_forward(), ActionResult::Bumped);
        assert_eq!(w.pose(), before);
    }

    #[test]
    fn test_query_dispatch() {
        let w = world();
        for predicate in Predicate::ALL {
            let direct = match predicate {
                Predicate::AtGoal => w.at_goal(),
                Predicate::PathAhead => w.path_ahead(),
                Predicate::PathLeft => w.path_left(),
                Predicate::PathRight => w.path_right(),
                Predicate::PathBehind => w.path_behind(),
            };
            assert_eq!(w.query(predicate), direct);
        }
    }

    #[test]
    fn test_perform_and_reset() {
        let mut w = world();
        assert_eq!(w.perform(Action::TurnLeft), ActionResult::Turned);
        assert_eq!(w.pose().facing, Direction::Up);
        assert_eq!(w.perform(Action::Move), ActionResult::Bumped);
        w.reset();
        assert_eq!(w.pose().facing, Direction::Right);
    }

    #[test]
    fn test_worlds_share_grid_not_pose() {
        let a = world();
        let mut b = World::new(Arc::clone(a.grid()));
        b.move_forward();
        assert_ne!(a.pose(), b.pose());
        assert!(Arc::ptr_eq(a.grid(), b.grid()));
    }
}
