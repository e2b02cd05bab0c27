//! Compile-time errors.
//!
//! Anything reported here is an authoring mistake in a requirement string and
//! is meant to abort profile loading. Runtime degradations (unknown boolean
//! names, a divisor that happens to be zero) are not errors; they produce a
//! requirement that does not hold and a log line.

/// Errors raised while compiling a requirement string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The left-hand side of a comparison is not a registered integer variable.
    #[error("unknown integer variable `{name}` in `{expression}`")]
    UnknownVariable { name: String, expression: String },

    /// An operand is neither an integer literal nor a registered variable.
    #[error("invalid operand `{operand}` in `{expression}`")]
    InvalidOperand { operand: String, expression: String },

    /// A structured form is missing a mandatory argument.
    #[error("missing argument in `{0}`")]
    MissingArgument(String),

    /// A structured form names something its lookup table does not know.
    #[error("unknown {kind} `{name}` in `{expression}`")]
    UnknownName {
        kind: &'static str,
        name: String,
        expression: String,
    },

    /// `% 0` written as a literal.
    #[error("modulo by zero in `{0}`")]
    ZeroDivisor(String),

    /// Unbalanced parentheses, dangling operators, or leftover operands.
    #[error("malformed expression `{expression}`: {reason}")]
    Malformed {
        expression: String,
        reason: &'static str,
    },
}

impl CompileError {
    pub(crate) fn malformed(expression: &str, reason: &'static str) -> Self {
        Self::Malformed {
            expression: expression.to_owned(),
            reason,
        }
    }
}
