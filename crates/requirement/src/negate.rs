//! Negation.
//!
//! Negation wraps a single requirement and inverts its result. The
//! description is prefixed with the token that introduced the negation
//! (`"not "` or `"!"`), so compiled descriptions read like their source.

use std::sync::Arc;

use crate::Requirement;

/// Default negation prefix.
pub const NOT_PREFIX: &str = "not ";

/// Alternative negation prefix.
pub const BANG_PREFIX: &str = "!";

/// Recognized negation tokens, tried in order.
pub const NEGATION_TOKENS: [&str; 2] = [NOT_PREFIX, BANG_PREFIX];

impl Requirement {
    /// Inverts this requirement, described with the default `"not "` prefix.
    pub fn negate(&self) -> Requirement {
        self.negate_with(NOT_PREFIX)
    }

    /// Inverts this requirement, described with the given prefix.
    pub fn negate_with(&self, prefix: &str) -> Requirement {
        let predicate = Arc::clone(self.predicate());
        let describe = Arc::clone(self.describer());
        let prefix: Arc<str> = prefix.into();
        Requirement::new(
            move || !predicate(),
            move || format!("{prefix}{}", describe()),
        )
    }
}

/// Splits a leading negation token off `text`.
///
/// Returns the token and the remaining text, or `None` if `text` is not
/// negated.
pub fn strip_negation(text: &str) -> Option<(&'static str, &str)> {
    NEGATION_TOKENS
        .iter()
        .find_map(|token| text.strip_prefix(token).map(|rest| (*token, rest)))
}
