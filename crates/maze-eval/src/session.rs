//! Sessions: one maze, one validated program, any number of runs.

use std::sync::Arc;

use maze_check::{compile, LanguageConfig, ValidatedProgram};
use maze_types::CompileErrors;
use maze_world::{MazeGrid, World};
use serde::{Deserialize, Serialize};

use crate::executor::Run;
use crate::governor::GovernorConfig;

/// Everything a host configures: the grammar and the run budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub language: LanguageConfig,
    pub governor: GovernorConfig,
}

impl EngineConfig {
    pub fn classic() -> Self {
        Self {
            language: LanguageConfig::classic(),
            governor: GovernorConfig::default(),
        }
    }

    pub fn extended() -> Self {
        Self {
            language: LanguageConfig::extended(),
            governor: GovernorConfig::default(),
        }
    }

    /// The extended language with a tighter statement ceiling and a time
    /// ceiling, for hosts running untrusted programs interactively.
    pub fn sandboxed() -> Self {
        Self {
            language: LanguageConfig::extended(),
            governor: GovernorConfig::sandboxed(),
        }
    }
}

/// Shares an immutable maze and program between independent runs.
#[derive(Debug, Clone)]
pub struct Session {
    grid: Arc<MazeGrid>,
    program: Arc<ValidatedProgram>,
    governor: GovernorConfig,
}

impl Session {
    pub fn new(
        grid: Arc<MazeGrid>,
        program: Arc<ValidatedProgram>,
        governor: GovernorConfig,
    ) -> Self {
        Self {
            grid,
            program,
            governor,
        }
    }

    /// Compile `source` and build a session around it.
    pub fn compile(
        grid: Arc<MazeGrid>,
        source: &str,
        name: &str,
        config: &EngineConfig,
    ) -> Result<Self, CompileErrors> {
        let program = compile(source, name, &config.language)?;
        Ok(Self::new(grid, Arc::new(program), config.governor))
    }

    pub fn grid(&self) -> &Arc<MazeGrid> {
        &self.grid
    }

    pub fn program(&self) -> &Arc<ValidatedProgram> {
        &self.program
    }

    pub fn governor(&self) -> &GovernorConfig {
        &self.governor
    }

    /// A fresh run with its own world and execution state.
    pub fn start(&self) -> Run {
        let world = World::new(Arc::clone(&self.grid));
        Run::new(self.program.program(), world, self.governor)
    }
}
