//! Named variable registry.
//!
//! Requirement text refers to live values by name: `"Has Pet"` is a boolean
//! variable, `"Health%"` an integer one. The registry is filled explicitly at
//! startup; the compiler only ever reads it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::CompileError;

/// Shared boolean variable.
pub type BoolVar = Arc<dyn Fn() -> bool + Send + Sync>;

/// Shared integer variable.
pub type IntVar = Arc<dyn Fn() -> i32 + Send + Sync>;

/// Registry of named boolean and integer variables.
#[derive(Clone, Default)]
pub struct Variables {
    bools: HashMap<String, BoolVar>,
    ints: HashMap<String, IntVar>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a boolean variable.
    pub fn insert_bool<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.bools.insert(name.into(), Arc::new(f));
        self
    }

    /// Registers (or replaces) an integer variable.
    pub fn insert_int<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn() -> i32 + Send + Sync + 'static,
    {
        self.ints.insert(name.into(), Arc::new(f));
        self
    }

    /// Registers an already shared boolean variable.
    pub fn insert_bool_var(&mut self, name: impl Into<String>, var: BoolVar) -> &mut Self {
        self.bools.insert(name.into(), var);
        self
    }

    /// Registers an already shared integer variable.
    pub fn insert_int_var(&mut self, name: impl Into<String>, var: IntVar) -> &mut Self {
        self.ints.insert(name.into(), var);
        self
    }

    pub fn bool_var(&self, name: &str) -> Option<&BoolVar> {
        self.bools.get(name)
    }

    pub fn int_var(&self, name: &str) -> Option<&IntVar> {
        self.ints.get(name)
    }

    pub fn bool_names(&self) -> impl Iterator<Item = &str> {
        self.bools.keys().map(String::as_str)
    }

    pub fn int_names(&self) -> impl Iterator<Item = &str> {
        self.ints.keys().map(String::as_str)
    }

    /// Resolves an operand to an integer source.
    ///
    /// The operand is trimmed, then tried as an `i32` literal and finally as a
    /// registered integer variable name.
    ///
    /// # Errors
    ///
    /// `InvalidOperand` if the operand is neither.
    pub fn resolve_int(&self, operand: &str, expression: &str) -> Result<IntVar, CompileError> {
        let operand = operand.trim();
        if let Ok(value) = operand.parse::<i32>() {
            return Ok(Arc::new(move || value));
        }
        self.ints
            .get(operand)
            .cloned()
            .ok_or_else(|| CompileError::InvalidOperand {
                operand: operand.to_owned(),
                expression: expression.to_owned(),
            })
    }

    /// Resolves an operand that must be known at compile time.
    ///
    /// Variables are sampled once; literals are parsed.
    pub fn resolve_const(&self, operand: &str, expression: &str) -> Result<i32, CompileError> {
        self.resolve_int(operand, expression).map(|var| var())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_literal_and_variable() {
        let mut vars = Variables::new();
        vars.insert_int("MobCount", || 3);

        assert_eq!(vars.resolve_int(" 42 ", "x").map(|v| v()), Ok(42));
        assert_eq!(vars.resolve_int("-7", "x").map(|v| v()), Ok(-7));
        assert_eq!(vars.resolve_int("MobCount", "x").map(|v| v()), Ok(3));
    }

    #[test]
    fn resolve_unknown_operand_fails() {
        let vars = Variables::new();
        let err = vars.resolve_int("Nope", "Health% > Nope").err();
        assert_eq!(
            err,
            Some(CompileError::InvalidOperand {
                operand: "Nope".into(),
                expression: "Health% > Nope".into(),
            })
        );
    }

    #[test]
    fn insert_replaces() {
        let mut vars = Variables::new();
        vars.insert_bool("Has Pet", || false);
        vars.insert_bool("Has Pet", || true);

        assert!(vars.bool_var("Has Pet").is_some_and(|v| v()));
        assert_eq!(vars.bool_names().count(), 1);
    }
}
