//! Compiling requirement text through the public API, including a grammar
//! defined outside the crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use requirement::{
    Arithmetic, CompileError, Comparison, Compiler, Grammar, Requirement, Variables, builder,
};

struct Cells {
    a: Arc<AtomicBool>,
    b: Arc<AtomicBool>,
    c: Arc<AtomicBool>,
    rage: Arc<AtomicI32>,
    vars: Variables,
}

fn cells() -> Cells {
    let a = Arc::new(AtomicBool::new(false));
    let b = Arc::new(AtomicBool::new(false));
    let c = Arc::new(AtomicBool::new(false));
    let rage = Arc::new(AtomicI32::new(0));

    let mut vars = Variables::new();
    for (name, cell) in [("A", &a), ("B", &b), ("C", &c)] {
        let cell = Arc::clone(cell);
        vars.insert_bool(name, move || cell.load(Ordering::Relaxed));
    }
    {
        let rage = Arc::clone(&rage);
        vars.insert_int("Rage", move || rage.load(Ordering::Relaxed));
    }

    Cells {
        a,
        b,
        c,
        rage,
        vars,
    }
}

fn set(cells: &Cells, a: bool, b: bool, c: bool) {
    cells.a.store(a, Ordering::Relaxed);
    cells.b.store(b, Ordering::Relaxed);
    cells.c.store(c, Ordering::Relaxed);
}

/// `A || B && C` is `(A || B) && C` for every input.
#[test]
fn test_operators_evaluate_left_to_right() {
    let cells = cells();
    let compiler = Compiler::new(&cells.vars, Arithmetic);
    let req = compiler.compile("A || B && C").unwrap();
    let grouped = compiler.compile("(A || B) && C").unwrap();

    for bits in 0..8u8 {
        let (a, b, c) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
        set(&cells, a, b, c);
        assert_eq!(req.is_met(), (a || b) && c, "a={a} b={b} c={c}");
        assert_eq!(req.is_met(), grouped.is_met());
    }
    assert_eq!(req.describe(), "A or B and C");
}

#[test]
fn test_combinator_laws() {
    let cells = cells();
    let compiler = Compiler::new(&cells.vars, Arithmetic);
    let a = compiler.compile("A").unwrap();
    let b = compiler.compile("B").unwrap();

    for bits in 0..4u8 {
        set(&cells, bits & 1 != 0, bits & 2 != 0, false);
        assert_eq!(a.and(&b).is_met(), a.is_met() && b.is_met());
        assert_eq!(a.or(&b).is_met(), a.is_met() || b.is_met());
        assert_eq!(a.negate().negate().is_met(), a.is_met());
        assert_eq!(
            a.and(&b).negate().is_met(),
            a.negate().or(&b.negate()).is_met()
        );
    }

    assert_eq!(builder::all(&[a.clone(), b.clone()]).describe(), "A and B");
    assert_eq!(builder::any(&[a.clone(), b.clone()]).describe(), "A or B");
    assert_eq!(builder::not(&a).describe(), "not A");
}

#[test]
fn test_comparison_describes_live_value() {
    let cells = cells();
    let compiler = Compiler::new(&cells.vars, Arithmetic);
    let req = compiler.compile("!A && Rage >= 15").unwrap();

    cells.rage.store(10, Ordering::Relaxed);
    assert!(!req.is_met());
    assert_eq!(req.describe(), "!A and Rage 10 >= 15");

    cells.rage.store(15, Ordering::Relaxed);
    assert!(req.is_met());
}

#[test]
fn test_malformed_expressions_are_errors() {
    let cells = cells();
    let compiler = Compiler::new(&cells.vars, Arithmetic);
    for text in ["A &&", "|| B", "(A && B", "A && B)"] {
        assert!(
            matches!(compiler.compile(text), Err(CompileError::Malformed { .. })),
            "{text}"
        );
    }
}

// ============================================================
// Custom grammar
// ============================================================

#[derive(Clone, Copy)]
enum ParityKind {
    Even,
    Compare(Comparison),
}

/// Adds `Even:<int>` on top of the comparisons.
struct Parity;

impl Grammar for Parity {
    type Kind = ParityKind;

    fn detect(&self, text: &str) -> Option<ParityKind> {
        if text.starts_with("Even:") {
            return Some(ParityKind::Even);
        }
        Comparison::detect(text).map(ParityKind::Compare)
    }

    fn build(
        &self,
        kind: ParityKind,
        text: &str,
        vars: &Variables,
    ) -> Result<Requirement, CompileError> {
        match kind {
            ParityKind::Compare(comparison) => comparison.compile(text, vars),
            ParityKind::Even => {
                let operand = text.trim_start_matches("Even:");
                let value = vars.resolve_int(operand, text)?;
                Ok(Requirement::labeled(
                    move || value() % 2 == 0,
                    format!("Even {operand}"),
                ))
            }
        }
    }
}

#[test]
fn test_custom_grammar_extends_comparisons() {
    let cells = cells();
    let compiler = Compiler::new(&cells.vars, Parity);
    let req = compiler.compile("Even:Rage && Rage > 0 && A").unwrap();

    cells.rage.store(4, Ordering::Relaxed);
    cells.a.store(true, Ordering::Relaxed);
    assert!(req.is_met());
    assert_eq!(req.describe(), "Even Rage and Rage 4 > 0 and A");

    cells.rage.store(5, Ordering::Relaxed);
    assert!(!req.is_met());

    assert!(matches!(
        compiler.compile("Even:Fury"),
        Err(CompileError::InvalidOperand { .. })
    ));
}
