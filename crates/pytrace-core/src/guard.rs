//! Request guards run before any code is synthesized or executed.
//!
//! Guards run in a fixed order and the first failure wins. The definition
//! checks are substring tests, not a parse: `def func2` satisfies a request
//! for `func`, and a `def` inside a string literal counts as a definition.

use crate::analyzer;
use crate::error::ValidationError;
use crate::step::ExecutionConfig;

/// The snippet the editor starts with. Submitting it unchanged is rejected.
pub const PLACEHOLDER_SOURCE: &str = "def func(n):";

/// Keyword that introduces a function definition.
pub const DEFINITION_KEYWORD: &str = "def";

/// Checks `source` and `config` against every guard, in order.
pub fn check_request(source: &str, config: &ExecutionConfig) -> Result<(), ValidationError> {
    let patterns = analyzer::forbidden_matches(source);
    if !patterns.is_empty() {
        return Err(ValidationError::ForbiddenOperation { patterns });
    }

    if source == PLACEHOLDER_SOURCE {
        return Err(ValidationError::PlaceholderSource);
    }

    if !source.contains(DEFINITION_KEYWORD) {
        return Err(ValidationError::MissingDefinition);
    }

    if config.function_name.is_empty() {
        return Err(ValidationError::EmptyFunctionName);
    }

    if config.parameter_value.is_empty() {
        return Err(ValidationError::EmptyParameterValue);
    }

    if !source.contains(&format!("{} {}", DEFINITION_KEYWORD, config.function_name)) {
        return Err(ValidationError::FunctionNotFound {
            name: config.function_name.clone(),
        });
    }

    Ok(())
}
