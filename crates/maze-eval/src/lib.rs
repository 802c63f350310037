//! Maze runtime: evaluates validated programs against a world, one action
//! at a time.
//!
//! ```text
//! Session ──start──▶ Run ──step──▶ Step::Action … Step::Halted(Outcome)
//! ```

mod env;
mod error;
mod evaluator;
mod executor;
mod governor;
mod outcome;
mod session;

pub use env::Bindings;
pub use error::{EvalResult, Fault};
pub use evaluator::{arith, compare, evaluate, Value};
pub use executor::{Run, RunObserver};
pub use governor::{
    Governor, GovernorConfig, DEFAULT_MAX_ACTIONS, DEFAULT_MAX_STATEMENTS, SANDBOX_MAX_DURATION,
    SANDBOX_MAX_STATEMENTS,
};
pub use outcome::{ActionEvent, Outcome, RunState, Step, Transcript, BUMP_NOTICE};
pub use session::{EngineConfig, Session};
