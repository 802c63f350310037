//! Maze checker: orchestrates the compile pipeline.
//!
//! ```text
//! source text → normalise → Lexer → Parser → Validator → ValidatedProgram
//! ```
//!
//! Compilation is atomic: either every stage succeeds and a
//! [`ValidatedProgram`] is produced, or the diagnostics are returned and
//! nothing can run.

mod checker;
mod dialect;

pub use checker::Validator;
pub use dialect::{LanguageConfig, DEFAULT_MAX_RANGE_BOUND};

use maze_lexer::{normalize_source, SourceNote};
use maze_types::ast::Module;
use maze_types::program::Program;
use maze_types::{CompileErrors, ErrorCode, MazeError, SourceFile, Span};
use sha2::{Digest, Sha256};
use tracing::debug;

/// A program that passed every compile stage.
#[derive(Debug, Clone)]
pub struct ValidatedProgram {
    program: Program,
    language: LanguageConfig,
    notes: Vec<SourceNote>,
    fingerprint: String,
}

impl ValidatedProgram {
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The dialect the program was validated against.
    pub fn language(&self) -> &LanguageConfig {
        &self.language
    }

    /// Advisory notes from source normalisation.
    pub fn notes(&self) -> &[SourceNote] {
        &self.notes
    }

    /// SHA-256 hex digest of the normalised source and the dialect.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Validate an already-parsed module.
pub fn validate(
    module: &Module,
    source_file: &SourceFile,
    language: &LanguageConfig,
) -> Result<ValidatedProgram, CompileErrors> {
    let mut errors = CompileErrors::empty();
    let program = Validator::new(*language, &mut errors, source_file).validate(module);
    debug!(
        file = %source_file.name,
        errors = errors.total_errors,
        statements = program.statement_count(),
        "validated program"
    );
    if errors.has_errors() {
        return Err(errors);
    }
    Ok(ValidatedProgram {
        program,
        language: *language,
        notes: Vec::new(),
        fingerprint: fingerprint(&source_file.source, language),
    })
}

/// Compile program text through every stage.
pub fn compile(
    source: &str,
    name: &str,
    language: &LanguageConfig,
) -> Result<ValidatedProgram, CompileErrors> {
    let (normalized, notes) = normalize_source(source);
    let source_file = SourceFile::new(name, normalized);

    let parsed = maze_parser::parse(&source_file);
    if parsed.errors.has_errors() {
        return Err(parsed.errors);
    }
    let Some(module) = parsed.module else {
        return Err(MazeError::new(
            name,
            ErrorCode::NOT_A_MODULE,
            "source did not produce a module",
            Span::point(1, 1),
            "",
        )
        .into());
    };

    let mut validated = validate(&module, &source_file, language)?;
    validated.notes = notes;
    Ok(validated)
}

/// Run the pipeline and return only the diagnostics (empty on success).
pub fn check(source: &str, name: &str, language: &LanguageConfig) -> CompileErrors {
    match compile(source, name, language) {
        Ok(_) => CompileErrors::empty(),
        Err(errors) => errors,
    }
}

fn fingerprint(source: &str, language: &LanguageConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(language.cache_key().as_bytes());
    hex::encode(hasher.finalize())
}
