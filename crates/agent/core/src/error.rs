//! Common error infrastructure for agent-core.
//!
//! Errors split along one line: anything found while *loading* a profile
//! aborts the load, anything found while *running* degrades to a requirement
//! that does not hold. Only the first kind is represented here.

use requirement::CompileError;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retrying later may succeed.
    Recoverable,

    /// Invalid input; must be fixed by the profile author.
    Validation,

    /// Unexpected state inconsistency.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all agent-core errors.
pub trait CoreError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl CoreError for CompileError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownVariable { .. } => "COMPILE_UNKNOWN_VARIABLE",
            Self::InvalidOperand { .. } => "COMPILE_INVALID_OPERAND",
            Self::MissingArgument(_) => "COMPILE_MISSING_ARGUMENT",
            Self::UnknownName { .. } => "COMPILE_UNKNOWN_NAME",
            Self::ZeroDivisor(_) => "COMPILE_ZERO_DIVISOR",
            Self::Malformed { .. } => "COMPILE_MALFORMED",
        }
    }
}

/// Errors raised while preparing key actions for a profile.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// A requirement string of an action failed to compile.
    #[error("action `{action}`: {source}")]
    Requirement {
        action: String,
        #[source]
        source: CompileError,
    },

    /// Two actions share a name, so `Usable:` and `CD_` lookups are ambiguous.
    #[error("duplicate action name `{0}`")]
    DuplicateAction(String),

    /// Action bar slots are 1-based.
    #[error("action `{action}` has invalid slot {slot}")]
    InvalidSlot { action: String, slot: u16 },
}

impl ProfileError {
    pub fn requirement(action: &str, source: CompileError) -> Self {
        Self::Requirement {
            action: action.to_owned(),
            source,
        }
    }
}

impl CoreError for ProfileError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Requirement { source, .. } => source.error_code(),
            Self::DuplicateAction(_) => "PROFILE_DUPLICATE_ACTION",
            Self::InvalidSlot { .. } => "PROFILE_INVALID_SLOT",
        }
    }
}
