//! Run budgets.
//!
//! Two independent ceilings bound a run. The action ceiling is a normal
//! terminal outcome; the statement and wall-clock ceilings are fatal
//! interruptions for programs that loop without ever acting. Every
//! configuration carries a statement ceiling unless it is set to `None`
//! explicitly.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{EvalResult, Fault};

/// Default action ceiling.
pub const DEFAULT_MAX_ACTIONS: u64 = 2000;

/// Default statement ceiling. Generous enough for any program that acts
/// within [`DEFAULT_MAX_ACTIONS`].
pub const DEFAULT_MAX_STATEMENTS: u64 = 1_000_000;

/// Statement ceiling used by [`GovernorConfig::sandboxed`].
pub const SANDBOX_MAX_STATEMENTS: u64 = 100_000;

/// Wall-clock ceiling used by [`GovernorConfig::sandboxed`].
pub const SANDBOX_MAX_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Actions a run may perform before it ends as exhausted.
    pub max_actions: u64,
    /// Statements plus loop checks a run may execute. `None` removes the
    /// ceiling.
    pub max_statements: Option<u64>,
    /// Wall-clock time since the first step.
    #[serde(rename = "max_duration_ms", with = "millis")]
    pub max_duration: Option<Duration>,
}

impl GovernorConfig {
    /// Default action ceiling plus tighter statement and time ceilings.
    pub fn sandboxed() -> Self {
        Self {
            max_statements: Some(SANDBOX_MAX_STATEMENTS),
            max_duration: Some(SANDBOX_MAX_DURATION),
            ..Self::default()
        }
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            max_actions: DEFAULT_MAX_ACTIONS,
            max_statements: Some(DEFAULT_MAX_STATEMENTS),
            max_duration: None,
        }
    }
}

/// Meters one run against a [`GovernorConfig`].
#[derive(Debug, Clone)]
pub struct Governor {
    config: GovernorConfig,
    actions: u64,
    statements: u64,
    started: Option<Instant>,
}

impl Governor {
    pub fn new(config: GovernorConfig) -> Self {
        Self {
            config,
            actions: 0,
            statements: 0,
            started: None,
        }
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    /// Start the clock. Later calls keep the first start time.
    pub fn start(&mut self) {
        self.started.get_or_insert_with(Instant::now);
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    pub fn actions(&self) -> u64 {
        self.actions
    }

    pub fn statements(&self) -> u64 {
        self.statements
    }

    pub fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Reserve one action. `false` once the ceiling has been reached; the
    /// count never goes past `max_actions`.
    pub fn try_action(&mut self) -> bool {
        if self.actions >= self.config.max_actions {
            return false;
        }
        self.actions += 1;
        true
    }

    /// Charge one statement or loop check executed at `line`.
    pub fn charge(&mut self, line: u32) -> EvalResult<()> {
        self.statements += 1;
        if let Some(limit) = self.config.max_statements {
            if self.statements > limit {
                return Err(Fault::StatementLimitExceeded { limit, line });
            }
        }
        if let Some(limit) = self.config.max_duration {
            if self.elapsed() > limit {
                return Err(Fault::TimeLimitExceeded {
                    limit_ms: duration_ms(limit),
                    line,
                });
            }
        }
        Ok(())
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// `Option<Duration>` as optional whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        value.map(super::duration_ms).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
