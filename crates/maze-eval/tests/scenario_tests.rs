//! End-to-end scenarios: compile a program, run it against a maze, and check
//! the event sequence and outcome.

use std::sync::Arc;

use maze_check::compile;
use maze_eval::{EngineConfig, GovernorConfig, Outcome, Session, Step, Transcript};
use maze_types::program::Action;
use maze_world::{ActionResult, Direction, MazeGrid, Position};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Corridor to the right, then one turn down into the goal.
const ELBOW: &str = "\
#####
#S  #
### #
###G#
#####";

/// Two open cells to the right of the start; the goal is out of the way.
const SHORT: &str = "\
#####
#S  #
#G###
#####";

/// A long corridor with the goal at the far end.
const CORRIDOR: &str = "\
############
#S        G#
############";

const WALL_FOLLOWER: &str = "\
while not at_goal():
    if path_ahead():
        move()
    else:
        turn_right()
";

fn session(maze: &str, source: &str, config: &EngineConfig) -> Session {
    let grid = Arc::new(MazeGrid::parse(maze).expect("maze should load"));
    Session::compile(grid, source, "test.py", config)
        .unwrap_or_else(|errors| panic!("compile failed:\n{errors}"))
}

fn run(maze: &str, source: &str) -> Transcript {
    session(maze, source, &EngineConfig::classic())
        .start()
        .run_to_end()
}

fn tags(transcript: &Transcript) -> Vec<&'static str> {
    transcript
        .events
        .iter()
        .map(|event| event.action.event_tag())
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Scenarios
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_wall_follower_reaches_goal_around_one_turn() {
    let transcript = run(ELBOW, WALL_FOLLOWER);
    assert_eq!(
        tags(&transcript),
        vec!["move", "move", "turnRight", "move", "move"]
    );
    assert_eq!(transcript.outcome, Outcome::ReachedGoal);
    assert_eq!(transcript.final_pose.position, Position::new(3, 3));
    assert_eq!(transcript.final_pose.facing, Direction::Down);

    let last = transcript.events.last().unwrap();
    assert!(last.reached_goal);
    assert!(transcript.events[..4].iter().all(|e| !e.reached_goal));
}

#[test]
fn test_three_moves_two_cells_one_bump() {
    let transcript = run(SHORT, "move()\nmove()\nmove()\n");
    let results: Vec<ActionResult> = transcript.events.iter().map(|e| e.result).collect();
    assert_eq!(
        results,
        vec![ActionResult::Moved, ActionResult::Moved, ActionResult::Bumped]
    );
    assert_eq!(transcript.moves(), 2);
    assert_eq!(transcript.bumps(), 1);
    assert_eq!(transcript.outcome, Outcome::FinishedWithoutGoal);
    assert_eq!(
        transcript.outcome.message(),
        "Program finished without reaching the goal."
    );
    // The bump leaves the pose where the second move put it.
    assert_eq!(transcript.events[2].pose, transcript.events[1].pose);
    assert_eq!(transcript.events[2].notice(), Some("Bumped into a wall."));
}

#[test]
fn test_for_range_three_moves() {
    let transcript = run(CORRIDOR, "for i in range(3):\n    move()\n");
    assert_eq!(tags(&transcript), vec!["move"; 3]);
    assert_eq!(transcript.final_pose.position, Position::new(1, 4));
    assert_eq!(transcript.outcome, Outcome::FinishedWithoutGoal);
}

#[test]
fn test_nested_loops() {
    let source = "\
for i in range(2):
    for j in range(3):
        turn_left()
    move()
";
    let transcript = run(CORRIDOR, source);
    assert_eq!(transcript.events.len(), 8);
    assert_eq!(
        transcript.events.iter().filter(|e| e.action == Action::Move).count(),
        2
    );
    // Three left turns from right face down; the first move bumps.
    assert!(transcript.events[3].bumped());
}

#[test]
fn test_goal_stops_remaining_program() {
    let transcript = run(CORRIDOR, &"move()\n".repeat(20));
    assert_eq!(transcript.events.len(), 9);
    assert_eq!(transcript.outcome, Outcome::ReachedGoal);
    assert_eq!(transcript.outcome.message(), "Reached the goal!");
}

#[test]
fn test_goal_event_then_outcome_then_nothing() {
    let mut run = session("####\n#SG#\n####", "move()\nmove()\n", &EngineConfig::classic()).start();
    let Some(Step::Action(event)) = run.step() else {
        panic!("expected the goal move");
    };
    assert!(event.reached_goal);
    assert_eq!(run.step(), Some(Step::Halted(Outcome::ReachedGoal)));
    assert_eq!(run.step(), None);
    assert_eq!(run.step(), None);
    assert_eq!(run.actions(), 1);
}

#[test]
fn test_action_budget_exhausted_at_exactly_the_ceiling() {
    let config = EngineConfig {
        governor: GovernorConfig {
            max_actions: 5,
            ..GovernorConfig::default()
        },
        ..EngineConfig::classic()
    };
    let transcript = session(SHORT, "while True:\n    turn_left()\n", &config)
        .start()
        .run_to_end();
    assert_eq!(transcript.events.len(), 5);
    assert_eq!(transcript.events.last().unwrap().index, 5);
    assert_eq!(transcript.outcome, Outcome::BudgetExceeded { max_actions: 5 });
    assert_eq!(
        transcript.outcome.message(),
        "Program stopped: exceeded 5 actions."
    );
}

#[test]
fn test_program_using_exactly_the_budget_finishes() {
    let config = EngineConfig {
        governor: GovernorConfig {
            max_actions: 3,
            ..GovernorConfig::default()
        },
        ..EngineConfig::classic()
    };
    let transcript = session(SHORT, "for i in range(3):\n    turn_left()\n", &config)
        .start()
        .run_to_end();
    assert_eq!(transcript.events.len(), 3);
    assert_eq!(transcript.outcome, Outcome::FinishedWithoutGoal);
}

#[test]
fn test_default_budget_is_two_thousand() {
    let transcript = run(SHORT, "while True:\n    turn_right()\n");
    assert_eq!(transcript.events.len(), 2000);
    assert_eq!(transcript.outcome, Outcome::BudgetExceeded { max_actions: 2000 });
}

#[test]
fn test_integer_literals_in_classic_conditions() {
    let transcript = run(CORRIDOR, "while path_ahead() == 1:\n    move()\n");
    assert_eq!(transcript.events.len(), 9);
    assert_eq!(transcript.outcome, Outcome::ReachedGoal);

    let transcript = run(SHORT, "while 1:\n    if path_ahead() != 0:\n        move()\n    else:\n        turn_left()\n");
    assert!(transcript.events.len() > 2);
    assert_eq!(tags(&transcript)[..3], ["move", "move", "turnLeft"]);
}

#[test]
fn test_while_else_runs_when_test_fails() {
    let transcript = run(SHORT, "while path_ahead():\n    move()\nelse:\n    turn_left()\n");
    assert_eq!(tags(&transcript), vec!["move", "move", "turnLeft"]);
}

#[test]
fn test_while_else_skipped_after_goal() {
    let transcript = run(
        CORRIDOR,
        "while path_ahead():\n    move()\nelse:\n    turn_left()\n",
    );
    assert_eq!(transcript.outcome, Outcome::ReachedGoal);
    assert!(transcript.events.iter().all(|e| e.action == Action::Move));
}

#[test]
fn test_elif_chain_takes_one_branch() {
    let source = "\
if path_left():
    turn_left()
elif path_ahead():
    move()
elif path_right():
    turn_right()
else:
    turn_left()
    turn_left()
";
    let transcript = run(SHORT, source);
    assert_eq!(tags(&transcript), vec!["move"]);
}

#[test]
fn test_rejected_program_never_runs() {
    let errors = compile("import os\nmove()\n", "t.py", &EngineConfig::classic().language)
        .unwrap_err();
    assert!(errors.has_errors());
    let grid = Arc::new(MazeGrid::parse(SHORT).unwrap());
    let attempt = Session::compile(grid, "move()\nx.y = 1\n", "t.py", &EngineConfig::classic());
    assert!(attempt.is_err());
}

#[test]
fn test_rerun_reproduces_event_sequence() {
    let session = session(ELBOW, WALL_FOLLOWER, &EngineConfig::classic());
    let first = session.start().run_to_end();
    for _ in 0..100 {
        assert_eq!(session.start().run_to_end(), first);
    }
}

#[test]
fn test_independent_runs_do_not_interfere() {
    let session = session(CORRIDOR, "for i in range(4):\n    move()\n", &EngineConfig::classic());
    let mut a = session.start();
    let mut b = session.start();
    a.step();
    a.step();
    b.step();
    assert_eq!(a.world().pose().position, Position::new(1, 3));
    assert_eq!(b.world().pose().position, Position::new(1, 2));
}
