//! Composable runtime predicates compiled from human-authored conditions.
//!
//! A [`Requirement`] pairs a zero-argument predicate with a lazily evaluated
//! description. Requirements are built once (typically at profile load) and
//! evaluated many times per second, so evaluation never allocates.
//!
//! - **Composable**: [`Requirement::and`], [`Requirement::or`] and
//!   [`Requirement::negate`] build new requirements over shared originals
//! - **Text in, predicate out**: [`Compiler`] turns `"Health% < 50 && !Has Pet"`
//!   into a requirement using a [`Variables`] registry and a [`Grammar`]
//! - **Degrades, never panics**: unknown boolean names compile to an
//!   always-false requirement with a diagnostic description
//!
//! # Architecture
//!
//! - [`Requirement`]: predicate + description
//! - [`Variables`]: named boolean and integer variables
//! - [`expression`]: infix → postfix conversion and stack evaluation
//! - [`Comparison`]: `>=`, `<=`, `>`, `<`, `==`, `%` over integer variables
//! - [`Compiler`]: negation, structured grammars, plain lookups, combinators

pub mod arithmetic;
pub mod builder;
pub mod combinator;
pub mod compiler;
pub mod error;
pub mod expression;
pub mod negate;
pub mod requirement;
pub mod variables;

pub use arithmetic::Comparison;
pub use compiler::{Arithmetic, Compiler, Grammar};
pub use error::CompileError;
pub use requirement::Requirement;
pub use variables::{BoolVar, IntVar, Variables};
