//! Language configuration: which grammar the validator accepts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest literal accepted as a `range()` argument by default.
pub const DEFAULT_MAX_RANGE_BOUND: u32 = 1000;

/// Grammar switches for the validator.
///
/// The classic dialect is the small teaching language: actions, boolean
/// conditions over predicates, `if`/`while`/`for range()` and `pass`. The
/// extended dialect adds integer variables, arithmetic, ordering comparisons
/// and `path_behind()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// `name = expr`, `name op= expr`, name reads, arithmetic and unary
    /// minus. Integer literals are accepted in every dialect.
    pub variables: bool,
    /// `<`, `<=`, `>`, `>=` in addition to `==` and `!=`.
    pub ordering_comparisons: bool,
    /// The `path_behind()` predicate.
    pub path_behind: bool,
    /// Ceiling for `range()` literal arguments (inclusive).
    pub max_range_bound: u32,
}

impl LanguageConfig {
    pub fn classic() -> Self {
        Self {
            variables: false,
            ordering_comparisons: false,
            path_behind: false,
            max_range_bound: DEFAULT_MAX_RANGE_BOUND,
        }
    }

    pub fn extended() -> Self {
        Self {
            variables: true,
            ordering_comparisons: true,
            path_behind: true,
            max_range_bound: DEFAULT_MAX_RANGE_BOUND,
        }
    }

    /// Stable textual form, used when fingerprinting programs.
    pub fn cache_key(&self) -> String {
        format!(
            "variables={};ordering={};path_behind={};max_range={}",
            self.variables, self.ordering_comparisons, self.path_behind, self.max_range_bound
        )
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl fmt::Display for LanguageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::classic() {
            f.write_str("classic")
        } else if *self == Self::extended() {
            f.write_str("extended")
        } else {
            f.write_str("custom")
        }
    }
}
