//! Core engine for seeded property-based testing.
//!
//! A run draws inputs from a [`RandomSequence`] built off one [`Seed`],
//! checks every still-pending [`Guarantee`] against each input, executes the
//! property, and on falsification greedily searches the [`Simplifier`]'s
//! candidates for the simplest input that still fails before reporting it as
//! a [`FalsifiedProperty`].
//!
//! ```
//! use refute::{evaluate, ints, EvalConfig, PropertyOutcome};
//!
//! let fuzzer = ints::fuzzer(-1000, 1000);
//! let result = evaluate(&fuzzer, &EvalConfig::seeded(100, 42), |&x: &i64| {
//!     PropertyOutcome::require(x.abs() < 2000, "magnitude out of range")
//! });
//! assert!(result.is_ok());
//! ```

pub mod data;
pub mod engine;
pub mod fuzzer;
pub mod generator;
pub mod guarantee;
pub mod ints;
pub mod shrinking;

pub use data::{fresh_seed, RandomSource, Seed};
pub use engine::{
    evaluate, for_any, panic_to_outcome, EvalConfig, EvaluationError, FalsifiedProperty,
    Falsification, PropertyOutcome, DEFAULT_GUARANTEE_PATIENCE, DEFAULT_ITERATIONS,
};
pub use fuzzer::Fuzzer;
pub use generator::{constant, from_fn, Generator, RandomSequence};
pub use guarantee::Guarantee;
pub use shrinking::{from_candidates, simplify, Simplifier};
