//! Requirement compiler.
//!
//! [`Compiler::compile`] runs the full pipeline on one requirement string:
//!
//! 1. **Combinators**: text containing `&&` / `||` goes through
//!    [`expression`](crate::expression); every operand re-enters step 2
//! 2. **Negation**: a leading `"not "` or `"!"` is stripped and the result
//!    inverted
//! 3. **Structured forms**: the [`Grammar`] gets the first look; if it
//!    recognizes a keyword, its builder parses the rest
//! 4. **Plain booleans**: the trimmed text is looked up in [`Variables`];
//!    unknown names produce [`Requirement::unknown`]

use crate::expression;
use crate::negate::strip_negation;
use crate::{CompileError, Comparison, Requirement, Variables};

/// A table of structured forms, tried before plain boolean lookup.
///
/// `detect` must implement "first matching keyword wins": grammars keep an
/// ordered keyword table and return the first kind whose keyword occurs in the
/// text.
pub trait Grammar {
    type Kind: Copy;

    /// Returns the structured form `text` belongs to, if any.
    fn detect(&self, text: &str) -> Option<Self::Kind>;

    /// Parses `text` as a `kind` form.
    fn build(
        &self,
        kind: Self::Kind,
        text: &str,
        vars: &Variables,
    ) -> Result<Requirement, CompileError>;
}

/// The grammar with comparisons only.
#[derive(Clone, Copy, Debug, Default)]
pub struct Arithmetic;

impl Grammar for Arithmetic {
    type Kind = Comparison;

    fn detect(&self, text: &str) -> Option<Comparison> {
        Comparison::detect(text)
    }

    fn build(
        &self,
        kind: Comparison,
        text: &str,
        vars: &Variables,
    ) -> Result<Requirement, CompileError> {
        kind.compile(text, vars)
    }
}

/// Compiles requirement strings against a variable registry and a grammar.
pub struct Compiler<'a, G> {
    vars: &'a Variables,
    grammar: G,
}

impl<'a, G: Grammar> Compiler<'a, G> {
    pub fn new(vars: &'a Variables, grammar: G) -> Self {
        Self { vars, grammar }
    }

    pub fn variables(&self) -> &Variables {
        self.vars
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Compiles one requirement string.
    ///
    /// # Errors
    ///
    /// Any structured-form or comparison error, or `Malformed` for a broken
    /// combinator expression. Unknown boolean names are **not** errors.
    pub fn compile(&self, text: &str) -> Result<Requirement, CompileError> {
        if expression::is_compound(text) {
            expression::compile_compound(text, |operand| self.compile_single(operand))
        } else {
            self.compile_single(text)
        }
    }

    /// Compiles text that contains no combinators.
    pub fn compile_single(&self, text: &str) -> Result<Requirement, CompileError> {
        let text = text.trim();
        if let Some((token, rest)) = strip_negation(text) {
            return Ok(self.compile_single(rest)?.negate_with(token));
        }

        if let Some(kind) = self.grammar.detect(text) {
            return self.grammar.build(kind, text, self.vars);
        }

        Ok(match self.vars.bool_var(text) {
            Some(var) => {
                let var = var.clone();
                Requirement::labeled(move || var(), text)
            }
            None => {
                tracing::warn!("unknown requirement `{}`, it will never be met", text);
                Requirement::unknown(text)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

    struct Fixture {
        has_pet: Arc<AtomicBool>,
        health: Arc<AtomicI32>,
        vars: Variables,
    }

    fn fixture() -> Fixture {
        let has_pet = Arc::new(AtomicBool::new(true));
        let health = Arc::new(AtomicI32::new(100));
        let mut vars = Variables::new();
        {
            let has_pet = Arc::clone(&has_pet);
            vars.insert_bool("Has Pet", move || has_pet.load(Ordering::Relaxed));
        }
        {
            let health = Arc::clone(&health);
            vars.insert_int("Health%", move || health.load(Ordering::Relaxed));
        }
        vars.insert_bool("Casting", || false);
        Fixture {
            has_pet,
            health,
            vars,
        }
    }

    #[test]
    fn plain_boolean_lookup() {
        let f = fixture();
        let compiler = Compiler::new(&f.vars, Arithmetic);
        let req = compiler.compile("Has Pet").unwrap();

        assert!(req.is_met());
        assert_eq!(req.describe(), "Has Pet");
        f.has_pet.store(false, Ordering::Relaxed);
        assert!(!req.is_met());
    }

    #[test]
    fn negation_tokens() {
        let f = fixture();
        let compiler = Compiler::new(&f.vars, Arithmetic);

        let not = compiler.compile("not Has Pet").unwrap();
        let bang = compiler.compile("!Has Pet").unwrap();
        assert!(!not.is_met());
        assert!(!bang.is_met());
        assert_eq!(not.describe(), "not Has Pet");
        assert_eq!(bang.describe(), "!Has Pet");
    }

    #[test]
    fn unknown_names_degrade() {
        let f = fixture();
        let compiler = Compiler::new(&f.vars, Arithmetic);
        let req = compiler.compile("Has Unicorn").unwrap();

        assert!(!req.is_met());
        assert_eq!(req.describe(), "UNKNOWN REQUIREMENT! Has Unicorn");
    }

    #[test]
    fn negated_unknown_is_met() {
        let f = fixture();
        let compiler = Compiler::new(&f.vars, Arithmetic);
        assert!(compiler.compile("not Has Unicorn").unwrap().is_met());
    }

    #[test]
    fn combinators_compile_each_operand() {
        let f = fixture();
        let compiler = Compiler::new(&f.vars, Arithmetic);
        let req = compiler.compile("Has Pet && Health% < 50 || Casting").unwrap();

        assert!(!req.is_met());
        f.health.store(20, Ordering::Relaxed);
        assert!(req.is_met());
        assert_eq!(req.describe(), "Has Pet and Health% 20 < 50 or Casting");

        f.has_pet.store(false, Ordering::Relaxed);
        assert!(!req.is_met());
    }

    #[test]
    fn comparison_errors_propagate_through_combinators() {
        let f = fixture();
        let compiler = Compiler::new(&f.vars, Arithmetic);
        assert!(matches!(
            compiler.compile("Has Pet && Nope > 3"),
            Err(CompileError::UnknownVariable { .. })
        ));
    }
}
