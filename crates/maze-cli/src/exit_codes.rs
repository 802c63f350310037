//! Process exit codes for `maze-run`.

/// The agent reached the goal, or `--check` found no errors.
pub const GOAL: i32 = 0;
/// The run ended without reaching the goal: finished, exhausted or faulted.
pub const NO_GOAL: i32 = 1;
/// The maze, program or configuration could not be loaded or compiled.
pub const INVALID_INPUT: i32 = 2;
