//! Terminal host for the maze language.
//!
//! `maze-run --maze maze.txt --program solve.py` compiles the program, runs
//! it to the end and prints every action. `--json` switches to one JSON
//! object per line; `--check` stops after validation.

pub mod args;
pub mod exit_codes;
pub mod host;
pub mod logging;
pub mod render;

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use maze_world::MazeGrid;

pub use args::{Cli, Dialect};

/// Carry out one invocation. Returns the process exit code.
pub fn run(cli: &Cli) -> Result<i32> {
    let config = cli.engine_config()?;
    let source = fs::read_to_string(&cli.program)
        .with_context(|| format!("read program {}", cli.program.display()))?;
    let name = cli.program.display().to_string();
    let mut stdout = std::io::stdout().lock();

    if cli.check {
        return host::check(&source, &name, &config, cli.json, &mut stdout);
    }

    let maze_path = cli
        .maze
        .as_ref()
        .context("--maze is required unless --check is given")?;
    let maze_text = fs::read_to_string(maze_path)
        .with_context(|| format!("read maze {}", maze_path.display()))?;
    let grid = MazeGrid::parse(&maze_text)
        .with_context(|| format!("load maze {}", maze_path.display()))?;

    host::play(Arc::new(grid), &source, &name, &config, cli.json, &mut stdout)
}
