//! Builder utilities for ergonomic requirement construction.
//!
//! Shorthand functions for the combinators, plus folds over lists of
//! requirements. Instead of writing `a.and(&b).and(&c)` you can use
//! `all(&[a, b, c])`.

use crate::Requirement;

/// Shorthand for [`Requirement::and`].
#[inline]
pub fn and(lhs: &Requirement, rhs: &Requirement) -> Requirement {
    lhs.and(rhs)
}

/// Shorthand for [`Requirement::or`].
#[inline]
pub fn or(lhs: &Requirement, rhs: &Requirement) -> Requirement {
    lhs.or(rhs)
}

/// Shorthand for [`Requirement::negate`].
#[inline]
pub fn not(inner: &Requirement) -> Requirement {
    inner.negate()
}

/// Folds requirements with AND, left to right.
///
/// An empty list yields a requirement that always holds.
pub fn all(requirements: &[Requirement]) -> Requirement {
    match requirements.split_first() {
        Some((first, rest)) => rest.iter().fold(first.clone(), |acc, r| acc.and(r)),
        None => Requirement::always("none"),
    }
}

/// Folds requirements with OR, left to right.
///
/// An empty list yields a requirement that never holds.
pub fn any(requirements: &[Requirement]) -> Requirement {
    match requirements.split_first() {
        Some((first, rest)) => rest.iter().fold(first.clone(), |acc, r| acc.or(r)),
        None => Requirement::never("none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_and_any_fold_left() {
        let reqs = [
            Requirement::always("A"),
            Requirement::never("B"),
            Requirement::always("C"),
        ];

        assert!(!all(&reqs).is_met());
        assert!(any(&reqs).is_met());
        assert_eq!(all(&reqs).describe(), "A and B and C");
        assert_eq!(any(&reqs).describe(), "A or B or C");
    }

    #[test]
    fn empty_folds() {
        assert!(all(&[]).is_met());
        assert!(!any(&[]).is_met());
    }
}
