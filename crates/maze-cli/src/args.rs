//! Command-line arguments and how they become an [`EngineConfig`].

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use maze_check::LanguageConfig;
use maze_eval::{EngineConfig, GovernorConfig};

#[derive(Parser, Debug)]
#[command(
    name = "maze-run",
    version,
    about = "Compile a maze program and run it against a maze"
)]
pub struct Cli {
    /// Maze file: rows of `#` (wall), `S` (start), `G` (goal) and spaces.
    #[arg(long, value_name = "FILE", required_unless_present = "check")]
    pub maze: Option<PathBuf>,

    /// Program file.
    #[arg(long, value_name = "FILE")]
    pub program: PathBuf,

    /// Language dialect. Overrides the dialect from `--config`.
    #[arg(long, value_enum)]
    pub dialect: Option<Dialect>,

    /// Action ceiling.
    #[arg(long, value_name = "N")]
    pub max_actions: Option<u64>,

    /// Ceiling on statements and loop checks.
    #[arg(long, value_name = "N")]
    pub max_statements: Option<u64>,

    /// Wall-clock ceiling for the run, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// JSON engine configuration (`{"language": {...}, "governor": {...}}`).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print one JSON object per event, then one for the outcome.
    #[arg(long)]
    pub json: bool,

    /// Validate the program and exit without running it.
    #[arg(long)]
    pub check: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Classic,
    Extended,
}

impl Dialect {
    pub fn language(self) -> LanguageConfig {
        match self {
            Dialect::Classic => LanguageConfig::classic(),
            Dialect::Extended => LanguageConfig::extended(),
        }
    }
}

impl Cli {
    /// The configuration for this invocation: the `--config` file if given,
    /// otherwise the classic dialect under sandbox ceilings, then flags.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let base = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parse config {}", path.display()))?
            }
            None => EngineConfig {
                language: LanguageConfig::classic(),
                governor: GovernorConfig::sandboxed(),
            },
        };
        Ok(self.apply_overrides(base))
    }

    /// Layer the command-line flags over `config`.
    pub fn apply_overrides(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(dialect) = self.dialect {
            config.language = dialect.language();
        }
        if let Some(max_actions) = self.max_actions {
            config.governor.max_actions = max_actions;
        }
        if let Some(max_statements) = self.max_statements {
            config.governor.max_statements = Some(max_statements);
        }
        if let Some(ms) = self.timeout_ms {
            config.governor.max_duration = Some(Duration::from_millis(ms));
        }
        config
    }
}
