//! Binary requirement combinators.
//!
//! Combinators join two requirements into a new one. This module provides
//! [`Requirement::and`] (short-circuit AND) and [`Requirement::or`]
//! (short-circuit OR). Both capture their operands by `Arc`, so the same
//! requirement can take part in any number of combinations.

use std::sync::Arc;

use crate::Requirement;

/// Textual joiner used in descriptions of [`Requirement::and`].
pub const AND_JOINER: &str = " and ";

/// Textual joiner used in descriptions of [`Requirement::or`].
pub const OR_JOINER: &str = " or ";

impl Requirement {
    /// Both requirements must hold.
    ///
    /// # Semantics
    ///
    /// - If `self` is not met, `other` is **not evaluated**
    /// - The description is `"<self> and <other>"`
    ///
    /// This is analogous to a short-circuited logical AND (&&) operation.
    pub fn and(&self, other: &Requirement) -> Requirement {
        let (lp, rp) = (Arc::clone(self.predicate()), Arc::clone(other.predicate()));
        let (ld, rd) = (Arc::clone(self.describer()), Arc::clone(other.describer()));
        Requirement::new(
            move || lp() && rp(),
            move || format!("{}{AND_JOINER}{}", ld(), rd()),
        )
    }

    /// At least one requirement must hold.
    ///
    /// # Semantics
    ///
    /// - If `self` is met, `other` is **not evaluated**
    /// - The description is `"<self> or <other>"`
    ///
    /// This is analogous to a short-circuited logical OR (||) operation.
    pub fn or(&self, other: &Requirement) -> Requirement {
        let (lp, rp) = (Arc::clone(self.predicate()), Arc::clone(other.predicate()));
        let (ld, rd) = (Arc::clone(self.describer()), Arc::clone(other.describer()));
        Requirement::new(
            move || lp() || rp(),
            move || format!("{}{OR_JOINER}{}", ld(), rd()),
        )
    }
}
