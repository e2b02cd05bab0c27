//! Core requirement type.
//!
//! This module defines [`Requirement`], the fundamental unit produced by the
//! compiler and consumed by action gates. A requirement is a predicate paired
//! with a description that is only rendered when someone asks for it.

use std::fmt;
use std::sync::Arc;

/// Shared zero-argument predicate.
pub type Predicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Shared, lazily evaluated description.
pub type Describe = Arc<dyn Fn() -> String + Send + Sync>;

/// A predicate with an attached diagnostic description.
///
/// Cloning is cheap (two `Arc` bumps). Requirements are immutable: combining
/// them never changes the operands, it builds a new requirement capturing
/// them.
#[derive(Clone)]
pub struct Requirement {
    predicate: Predicate,
    describe: Describe,
}

impl Requirement {
    /// Creates a requirement from a predicate and a live description.
    ///
    /// The description closure is evaluated on every call to
    /// [`Requirement::describe`], so it may read live values.
    pub fn new<P, D>(predicate: P, describe: D) -> Self
    where
        P: Fn() -> bool + Send + Sync + 'static,
        D: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            describe: Arc::new(describe),
        }
    }

    /// Creates a requirement whose description is a fixed label.
    pub fn labeled<P>(predicate: P, label: impl Into<String>) -> Self
    where
        P: Fn() -> bool + Send + Sync + 'static,
    {
        let label: Arc<str> = label.into().into();
        Self::new(predicate, move || label.to_string())
    }

    /// Creates a requirement from already shared parts.
    pub fn from_parts(predicate: Predicate, describe: Describe) -> Self {
        Self {
            predicate,
            describe,
        }
    }

    /// A requirement that always holds.
    pub fn always(label: impl Into<String>) -> Self {
        Self::labeled(|| true, label)
    }

    /// A requirement that never holds.
    pub fn never(label: impl Into<String>) -> Self {
        Self::labeled(|| false, label)
    }

    /// The sentinel produced for names nothing is registered under.
    ///
    /// Profile authors rely on this degrading silently: the action simply
    /// never runs and the description says why.
    pub fn unknown(name: &str) -> Self {
        Self::never(format!("UNKNOWN REQUIREMENT! {name}"))
    }

    /// Evaluates the predicate.
    #[inline]
    pub fn is_met(&self) -> bool {
        (self.predicate)()
    }

    /// Renders the description against current values.
    pub fn describe(&self) -> String {
        (self.describe)()
    }

    pub(crate) fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub(crate) fn describer(&self) -> &Describe {
        &self.describe
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirement")
            .field("description", &self.describe())
            .field("met", &self.is_met())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn description_reads_live_values() {
        let value = Arc::new(AtomicI32::new(1));
        let probe = Arc::clone(&value);
        let req = Requirement::new(
            move || probe.load(Ordering::Relaxed) > 0,
            {
                let value = Arc::clone(&value);
                move || format!("value {}", value.load(Ordering::Relaxed))
            },
        );

        assert!(req.is_met());
        assert_eq!(req.describe(), "value 1");

        value.store(-3, Ordering::Relaxed);
        assert!(!req.is_met());
        assert_eq!(req.describe(), "value -3");
    }

    #[test]
    fn unknown_is_never_met() {
        let req = Requirement::unknown("Has Unicorn");
        assert!(!req.is_met());
        assert_eq!(req.describe(), "UNKNOWN REQUIREMENT! Has Unicorn");
    }
}
