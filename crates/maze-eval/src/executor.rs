//! The resumable executor.
//!
//! A [`Run`] interprets a [`Program`] one action at a time. Nested control
//! flow lives on an explicit frame stack rather than the Rust call stack, so
//! between two calls to [`Run::step`] the whole interpreter state is plain
//! data: a host can render the world, wait on a timer, or drop the run.
//!
//! ```text
//! Fresh ──step──▶ Running ──▶ Completed | Exhausted | Finished | Faulted
//! ```

use std::sync::Arc;

use maze_types::program::{Block, Expr, ForStmt, Program, Stmt, WhileStmt};
use maze_world::{ActionResult, World};
use tracing::{debug, info, warn};

use crate::env::Bindings;
use crate::error::{EvalResult, Fault};
use crate::evaluator::{arith, evaluate, Value};
use crate::governor::{Governor, GovernorConfig};
use crate::outcome::{ActionEvent, Outcome, RunState, Step, Transcript};

// ══════════════════════════════════════════════════════════════════════════════
// Frames
// ══════════════════════════════════════════════════════════════════════════════

/// One level of the continuation.
#[derive(Debug, Clone)]
enum Frame {
    /// Statements of a suite; `next` is the index of the next one to run.
    Block { stmts: Block, next: usize },
    /// A `while` loop whose test is evaluated every time the frame is on top.
    While { stmt: Arc<WhileStmt> },
    /// A `for` loop; `next` is the counter value for the next iteration.
    For { stmt: Arc<ForStmt>, next: i64 },
}

/// What advancing the continuation produced.
enum Advance {
    Action(ActionEvent),
    Exhausted,
    Finished,
}

#[derive(Debug, Clone)]
enum Phase {
    Fresh,
    Running,
    /// The goal event has been returned; the outcome comes next.
    Halting(Outcome),
    Done(Outcome),
}

// ══════════════════════════════════════════════════════════════════════════════
// Run
// ══════════════════════════════════════════════════════════════════════════════

/// Host callbacks for [`Run::drive`].
pub trait RunObserver {
    /// Called after every action, with the world already updated.
    fn on_action(&mut self, event: &ActionEvent, world: &World);

    /// Called once when the run halts.
    fn on_outcome(&mut self, _outcome: &Outcome, _world: &World) {}
}

/// One execution of a program against its own world.
#[derive(Debug, Clone)]
pub struct Run {
    body: Block,
    world: World,
    bindings: Bindings,
    governor: Governor,
    frames: Vec<Frame>,
    phase: Phase,
}

impl Run {
    pub fn new(program: &Program, world: World, governor: GovernorConfig) -> Self {
        let body = Arc::clone(&program.body);
        Self {
            frames: vec![Frame::Block {
                stmts: Arc::clone(&body),
                next: 0,
            }],
            body,
            world,
            bindings: Bindings::new(),
            governor: Governor::new(governor),
            phase: Phase::Fresh,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Actions performed so far.
    pub fn actions(&self) -> u64 {
        self.governor.actions()
    }

    /// Statements and loop checks executed so far.
    pub fn statements(&self) -> u64 {
        self.governor.statements()
    }

    pub fn state(&self) -> RunState {
        match &self.phase {
            Phase::Fresh => RunState::Fresh,
            Phase::Running => RunState::Running,
            Phase::Halting(outcome) | Phase::Done(outcome) => RunState::from(outcome),
        }
    }

    /// The outcome, once the run has one.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Halting(outcome) | Phase::Done(outcome) => Some(outcome),
            Phase::Fresh | Phase::Running => None,
        }
    }

    /// Start over: agent back on the start cell, no variables, fresh budgets.
    pub fn reset(&mut self) {
        self.world.reset();
        self.bindings.clear();
        self.governor.reset();
        self.frames = vec![Frame::Block {
            stmts: Arc::clone(&self.body),
            next: 0,
        }];
        self.phase = Phase::Fresh;
    }

    /// Run until the next action or the end.
    ///
    /// Returns `Step::Action` for every performed action (bumps included),
    /// then exactly one `Step::Halted`, then `None` forever.
    pub fn step(&mut self) -> Option<Step> {
        match &self.phase {
            Phase::Done(_) => return None,
            Phase::Halting(outcome) => {
                let outcome = outcome.clone();
                return Some(self.halt(outcome));
            }
            Phase::Fresh => {
                self.governor.start();
                self.phase = Phase::Running;
            }
            Phase::Running => {}
        }

        let outcome = match self.advance() {
            Ok(Advance::Action(event)) => {
                if event.reached_goal {
                    self.phase = Phase::Halting(Outcome::ReachedGoal);
                }
                return Some(Step::Action(event));
            }
            Ok(Advance::Finished) => Outcome::FinishedWithoutGoal,
            Ok(Advance::Exhausted) => Outcome::BudgetExceeded {
                max_actions: self.governor.config().max_actions,
            },
            Err(fault) => Outcome::Faulted { fault },
        };
        Some(self.halt(outcome))
    }

    /// Pull every step, reporting each to `observer`, and return the outcome.
    pub fn drive(&mut self, observer: &mut impl RunObserver) -> Outcome {
        loop {
            match self.step() {
                Some(Step::Action(event)) => observer.on_action(&event, &self.world),
                Some(Step::Halted(outcome)) => {
                    observer.on_outcome(&outcome, &self.world);
                    return outcome;
                }
                None => {
                    return self.outcome().cloned().unwrap_or_else(|| Outcome::Faulted {
                        fault: Fault::Internal {
                            message: "run stopped without an outcome".to_string(),
                        },
                    })
                }
            }
        }
    }

    /// Drive the run to its end and collect everything it reported.
    pub fn run_to_end(mut self) -> Transcript {
        let mut events: Vec<ActionEvent> = Vec::new();
        let outcome = self.drive(&mut events);
        Transcript {
            events,
            outcome,
            final_pose: self.world.pose(),
        }
    }

    fn halt(&mut self, outcome: Outcome) -> Step {
        info!(
            outcome = %outcome,
            actions = self.governor.actions(),
            statements = self.governor.statements(),
            "run halted"
        );
        self.frames.clear();
        self.phase = Phase::Done(outcome.clone());
        Step::Halted(outcome)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Interpretation
    // ══════════════════════════════════════════════════════════════════════

    /// Execute statements until one action has been performed, the budget is
    /// spent or the program ends.
    fn advance(&mut self) -> EvalResult<Advance> {
        loop {
            let Some(top) = self.frames.last_mut() else {
                return Ok(Advance::Finished);
            };

            match top {
                Frame::Block { stmts, next } => {
                    if *next >= stmts.len() {
                        self.frames.pop();
                        continue;
                    }
                    let index = *next;
                    *next += 1;
                    let block = Arc::clone(stmts);
                    if let Some(advance) = self.exec(&block[index])? {
                        return Ok(advance);
                    }
                }

                Frame::While { stmt } => {
                    let stmt = Arc::clone(stmt);
                    self.governor.charge(stmt.line)?;
                    if self.eval(&stmt.test)?.truthy() {
                        self.push_block(&stmt.body);
                    } else {
                        self.frames.pop();
                        self.push_block(&stmt.else_body);
                    }
                }

                Frame::For { stmt, next } => {
                    if *next >= stmt.stop {
                        self.frames.pop();
                        continue;
                    }
                    let counter = *next;
                    *next += 1;
                    let stmt = Arc::clone(stmt);
                    self.governor.charge(stmt.line)?;
                    if let Some(var) = &stmt.var {
                        self.bindings.set(var, Value::Int(counter));
                    }
                    self.push_block(&stmt.body);
                }
            }
        }
    }

    /// Execute one statement. Returns `Some` when the run suspends or ends.
    fn exec(&mut self, stmt: &Stmt) -> EvalResult<Option<Advance>> {
        self.governor.charge(stmt.line())?;
        match stmt {
            Stmt::Action { action, line } => {
                if !self.governor.try_action() {
                    return Ok(Some(Advance::Exhausted));
                }
                let result = self.world.perform(*action);
                let pose = self.world.pose();
                let event = ActionEvent {
                    index: self.governor.actions(),
                    action: *action,
                    line: *line,
                    result,
                    pose,
                    reached_goal: result == ActionResult::Moved && self.world.at_goal(),
                };
                debug!(index = event.index, action = %action, line, pose = %pose, "action");
                if event.bumped() {
                    warn!(line, pose = %pose, "bumped into a wall");
                }
                return Ok(Some(Advance::Action(event)));
            }
            Stmt::If(stmt) => {
                let body = if self.eval(&stmt.test)?.truthy() {
                    &stmt.then_body
                } else {
                    &stmt.else_body
                };
                self.push_block(body);
            }
            Stmt::While(stmt) => self.frames.push(Frame::While {
                stmt: Arc::clone(stmt),
            }),
            Stmt::For(stmt) => self.frames.push(Frame::For {
                stmt: Arc::clone(stmt),
                next: stmt.start,
            }),
            Stmt::Pass { .. } => {}
            Stmt::Assign { name, value, .. } => {
                let value = self.eval(value)?;
                self.bindings.set(name, value);
            }
            Stmt::AugAssign {
                name,
                op,
                value,
                line,
            } => {
                let current = self.bindings.get(name).unwrap_or(Value::Int(0));
                let operand = self.eval(value)?;
                let updated = arith(*op, current, operand, *line)?;
                self.bindings.set(name, updated);
            }
        }
        Ok(None)
    }

    fn eval(&self, expr: &Expr) -> EvalResult<Value> {
        evaluate(expr, &self.bindings, &self.world)
    }

    fn push_block(&mut self, stmts: &Block) {
        if !stmts.is_empty() {
            self.frames.push(Frame::Block {
                stmts: Arc::clone(stmts),
                next: 0,
            });
        }
    }
}

impl Iterator for Run {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        self.step()
    }
}

impl RunObserver for Vec<ActionEvent> {
    fn on_action(&mut self, event: &ActionEvent, _world: &World) {
        self.push(*event);
    }
}
