//! Lexical denylist scan over raw snippet text.
//!
//! This is advisory linting, not isolation. The check is plain,
//! case-sensitive substring membership with no parsing or normalization, so
//! aliasing (`import os as o` passes through `__import__`), string
//! concatenation or extra whitespace (`import  os`) all slip past it. Real
//! isolation has to come from the process running the snippet.

/// Substrings whose presence rejects a snippet.
pub const FORBIDDEN_PATTERNS: &[&str] = &["import os", "import sys", "exec", "eval"];

/// Returns `true` when `source` contains none of [`FORBIDDEN_PATTERNS`].
pub fn validate(source: &str) -> bool {
    !FORBIDDEN_PATTERNS.iter().any(|p| source.contains(p))
}

/// Lists every forbidden pattern found in `source`, in denylist order.
pub fn forbidden_matches(source: &str) -> Vec<&'static str> {
    FORBIDDEN_PATTERNS
        .iter()
        .copied()
        .filter(|p| source.contains(p))
        .collect()
}
