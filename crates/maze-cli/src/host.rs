//! The host loop: compile, pull steps, report.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use maze_check::{compile, ValidatedProgram};
use maze_eval::{ActionEvent, EngineConfig, Outcome, Run, Session, Step};
use maze_types::CompileErrors;
use maze_world::{MazeGrid, Pose};
use serde::Serialize;
use tracing::info;

use crate::exit_codes;
use crate::render::render;

/// Final JSON line of a `--json` run.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    #[serde(flatten)]
    outcome: &'a Outcome,
    message: String,
    actions: u64,
    statements: u64,
    final_pose: Pose,
}

/// JSON printed by `--check --json` on success.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    ok: bool,
    statements: usize,
    fingerprint: &'a str,
    notes: Vec<String>,
}

/// Validate `source` only. Returns the process exit code.
pub fn check(
    source: &str,
    name: &str,
    config: &EngineConfig,
    json: bool,
    out: &mut impl Write,
) -> Result<i32> {
    let program = match compile(source, name, &config.language) {
        Ok(program) => program,
        Err(errors) => return report_errors(&errors, json, out),
    };
    if json {
        let report = CheckReport {
            ok: true,
            statements: program.program().statement_count(),
            fingerprint: program.fingerprint(),
            notes: program.notes().iter().map(ToString::to_string).collect(),
        };
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    } else {
        write_notes(&program, out)?;
        writeln!(
            out,
            "{name}: ok ({} statements, {} dialect)",
            program.program().statement_count(),
            program.language()
        )?;
    }
    Ok(exit_codes::GOAL)
}

/// Compile `source` and run it to the end against `grid`. Returns the
/// process exit code.
pub fn play(
    grid: Arc<MazeGrid>,
    source: &str,
    name: &str,
    config: &EngineConfig,
    json: bool,
    out: &mut impl Write,
) -> Result<i32> {
    let session = match Session::compile(grid, source, name, config) {
        Ok(session) => session,
        Err(errors) => return report_errors(&errors, json, out),
    };
    info!(
        program = name,
        fingerprint = session.program().fingerprint(),
        language = %config.language,
        "starting run"
    );
    if !json {
        write_notes(session.program(), out)?;
    }

    let mut run = session.start();
    if !json {
        write!(out, "{}", render(run.world()))?;
    }
    let outcome = pump(&mut run, json, out)?;

    if json {
        let summary = Summary {
            outcome: &outcome,
            message: outcome.message(),
            actions: run.actions(),
            statements: run.statements(),
            final_pose: run.world().pose(),
        };
        writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    } else {
        write!(out, "{}", render(run.world()))?;
        writeln!(out, "{outcome}")?;
    }

    Ok(if outcome.is_success() {
        exit_codes::GOAL
    } else {
        exit_codes::NO_GOAL
    })
}

/// Pull steps until the run halts, writing one line per action.
fn pump(run: &mut Run, json: bool, out: &mut impl Write) -> Result<Outcome> {
    while let Some(step) = run.step() {
        match step {
            Step::Action(event) if json => {
                writeln!(out, "{}", serde_json::to_string(&event)?)?;
            }
            Step::Action(event) => write_event(&event, out)?,
            Step::Halted(outcome) => return Ok(outcome),
        }
    }
    // A fresh run always halts with an outcome before it stops yielding.
    Ok(run.outcome().cloned().unwrap_or(Outcome::FinishedWithoutGoal))
}

fn write_event(event: &ActionEvent, out: &mut impl Write) -> Result<()> {
    write!(
        out,
        "{:>5}  line {:<4} {:<10} {}",
        event.index,
        event.line,
        event.action.event_tag(),
        event.pose
    )?;
    if let Some(notice) = event.notice() {
        write!(out, "  {notice}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_notes(program: &ValidatedProgram, out: &mut impl Write) -> Result<()> {
    for note in program.notes() {
        writeln!(out, "note: {note}")?;
    }
    Ok(())
}

fn report_errors(errors: &CompileErrors, json: bool, out: &mut impl Write) -> Result<i32> {
    if json {
        writeln!(out, "{}", serde_json::to_string(errors)?)?;
    } else {
        writeln!(out, "{errors}")?;
    }
    Ok(exit_codes::INVALID_INPUT)
}
