//! What a run reports to its host: one event per action, then one outcome.

use std::fmt;

use maze_types::program::Action;
use maze_world::{ActionResult, Pose};
use serde::{Deserialize, Serialize};

use crate::error::Fault;

/// Notice attached to an action that bumped into a wall.
pub const BUMP_NOTICE: &str = "Bumped into a wall.";

/// One performed action. Produced at every suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    /// 1-based action number within the run.
    pub index: u64,
    pub action: Action,
    /// Source line of the call.
    pub line: u32,
    pub result: ActionResult,
    /// Pose after the action.
    pub pose: Pose,
    /// The action landed on the goal; the run ends after this event.
    pub reached_goal: bool,
}

impl ActionEvent {
    pub fn bumped(&self) -> bool {
        self.result == ActionResult::Bumped
    }

    /// Non-fatal notice for the host's log.
    pub fn notice(&self) -> Option<&'static str> {
        self.bumped().then_some(BUMP_NOTICE)
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// An action put the agent on the goal.
    ReachedGoal,
    /// The program ran out of statements first.
    FinishedWithoutGoal,
    /// The action ceiling was reached.
    BudgetExceeded { max_actions: u64 },
    /// A run-time fault or governor interruption.
    Faulted { fault: Fault },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::ReachedGoal)
    }

    /// Human-readable message for the host.
    pub fn message(&self) -> String {
        match self {
            Outcome::ReachedGoal => "Reached the goal!".to_string(),
            Outcome::FinishedWithoutGoal => {
                "Program finished without reaching the goal.".to_string()
            }
            Outcome::BudgetExceeded { max_actions } => {
                format!("Program stopped: exceeded {max_actions} actions.")
            }
            Outcome::Faulted { fault } => format!("Program error: {fault}"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// One item pulled from a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Action(ActionEvent),
    /// Always the last item.
    Halted(Outcome),
}

/// Where a run is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Created, no step taken.
    Fresh,
    /// Producing steps.
    Running,
    /// Reached the goal.
    Completed,
    /// Hit the action ceiling.
    Exhausted,
    /// Ran out of program without reaching the goal.
    Finished,
    /// Stopped by a fault.
    Faulted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunState::Fresh | RunState::Running)
    }
}

impl From<&Outcome> for RunState {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::ReachedGoal => RunState::Completed,
            Outcome::FinishedWithoutGoal => RunState::Finished,
            Outcome::BudgetExceeded { .. } => RunState::Exhausted,
            Outcome::Faulted { .. } => RunState::Faulted,
        }
    }
}

/// A complete run: every event and the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub events: Vec<ActionEvent>,
    pub outcome: Outcome,
    pub final_pose: Pose,
}

impl Transcript {
    pub fn bumps(&self) -> usize {
        self.events.iter().filter(|e| e.bumped()).count()
    }

    pub fn moves(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.result == ActionResult::Moved)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_world::{Direction, Position};

    fn event(result: ActionResult) -> ActionEvent {
        ActionEvent {
            index: 1,
            action: Action::Move,
            line: 2,
            result,
            pose: Pose::new(Position::new(1, 1), Direction::Right),
            reached_goal: false,
        }
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::ReachedGoal.message(), "Reached the goal!");
        assert_eq!(
            Outcome::BudgetExceeded { max_actions: 2000 }.to_string(),
            "Program stopped: exceeded 2000 actions."
        );
        let faulted = Outcome::Faulted {
            fault: Fault::DivisionByZero { line: 3 },
        };
        assert_eq!(
            faulted.message(),
            "Program error: line 3: integer division or modulo by zero"
        );
        assert!(!faulted.is_success());
    }

    #[test]
    fn test_bump_notice() {
        assert_eq!(event(ActionResult::Bumped).notice(), Some(BUMP_NOTICE));
        assert_eq!(event(ActionResult::Moved).notice(), None);
    }

    #[test]
    fn test_event_json_uses_action_tag() {
        let json = serde_json::to_value(event(ActionResult::Moved)).unwrap();
        assert_eq!(json["action"], "move");
        assert_eq!(json["result"], "moved");
        assert_eq!(json["pose"]["facing"], "right");
    }

    #[test]
    fn test_outcome_json_tagged() {
        let json = serde_json::to_value(Outcome::BudgetExceeded { max_actions: 5 }).unwrap();
        assert_eq!(json["outcome"], "budget_exceeded");
        assert_eq!(json["max_actions"], 5);
    }

    #[test]
    fn test_run_state_from_outcome() {
        assert_eq!(RunState::from(&Outcome::ReachedGoal), RunState::Completed);
        assert!(RunState::Exhausted.is_terminal());
        assert!(!RunState::Running.is_terminal());
    }
}
