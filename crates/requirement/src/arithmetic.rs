//! Integer comparisons.
//!
//! `"<lhs> <op> <rhs>"` where `lhs` is a registered integer variable and
//! `rhs` is a literal or another integer variable. Both sides are read live
//! on every evaluation, including when rendering the description.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{CompileError, Requirement, Variables};

/// Comparison operators, in detection order.
///
/// Order matters: `>=` must be tried before `>` because detection is by
/// substring containment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    GreaterOrEqual,
    LessOrEqual,
    Greater,
    Less,
    Equal,
    /// `lhs % rhs == 0`.
    Modulo,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::GreaterOrEqual,
        Comparison::LessOrEqual,
        Comparison::Greater,
        Comparison::Less,
        Comparison::Equal,
        Comparison::Modulo,
    ];

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::Equal => "==",
            Self::Modulo => "%",
        }
    }

    /// First operator whose symbol occurs in `text`.
    pub fn detect(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| text.contains(op.symbol()))
    }

    /// Applies the operator.
    ///
    /// Returns `None` for a modulo by zero.
    #[inline]
    pub fn apply(self, lhs: i32, rhs: i32) -> Option<bool> {
        Some(match self {
            Self::GreaterOrEqual => lhs >= rhs,
            Self::LessOrEqual => lhs <= rhs,
            Self::Greater => lhs > rhs,
            Self::Less => lhs < rhs,
            Self::Equal => lhs == rhs,
            Self::Modulo => lhs.checked_rem(rhs)? == 0,
        })
    }

    /// Compiles `text` as a comparison with this operator.
    ///
    /// # Errors
    ///
    /// - `UnknownVariable` if the left side is not a registered integer variable
    /// - `InvalidOperand` if the right side is neither literal nor variable
    /// - `ZeroDivisor` for a literal `% 0`
    pub fn compile(self, text: &str, vars: &Variables) -> Result<Requirement, CompileError> {
        let symbol = self.symbol();
        // Variable names may themselves end in `%` ("Health%").
        let split = match self {
            Self::Modulo => text.rsplit_once(symbol),
            _ => text.split_once(symbol),
        };
        let (lhs_name, rhs_text) =
            split.ok_or_else(|| CompileError::malformed(text, "missing comparison operator"))?;

        let lhs_name = lhs_name.trim().to_owned();
        let rhs_text = rhs_text.trim().to_owned();

        let lhs = vars
            .int_var(&lhs_name)
            .cloned()
            .ok_or_else(|| CompileError::UnknownVariable {
                name: lhs_name.clone(),
                expression: text.to_owned(),
            })?;
        let rhs = vars.resolve_int(&rhs_text, text)?;

        if self == Self::Modulo && rhs_text.parse::<i32>() == Ok(0) {
            return Err(CompileError::ZeroDivisor(text.to_owned()));
        }

        let warned = Arc::new(AtomicBool::new(false));
        let predicate = {
            let (lhs, rhs) = (Arc::clone(&lhs), Arc::clone(&rhs));
            let expression = text.to_owned();
            move || match self.apply(lhs(), rhs()) {
                Some(result) => result,
                None => {
                    if !warned.swap(true, Ordering::Relaxed) {
                        tracing::warn!("zero divisor in `{}`, requirement not met", expression);
                    }
                    false
                }
            }
        };

        let literal = rhs_text.parse::<i32>().is_ok();
        let describe = move || {
            let rhs_value = rhs();
            let rhs_shown = if literal {
                rhs_value.to_string()
            } else {
                format!("{rhs_text} {rhs_value}")
            };
            match self {
                Self::Modulo => format!("{lhs_name} {} % {rhs_shown} == 0", lhs()),
                _ => format!("{lhs_name} {} {symbol} {rhs_shown}", lhs()),
            }
        };

        Ok(Requirement::new(predicate, describe))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
