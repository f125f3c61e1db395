//! Bundles generation, simplification and guarantees for one input type.

use std::fmt;

use crate::generator::Generator;
use crate::guarantee::Guarantee;
use crate::shrinking::Simplifier;

/// Immutable aggregate of a generator, a simplifier and the guarantees every
/// run must satisfy.
///
/// Built once by the caller and reusable across any number of runs; an
/// evaluation only borrows it. All per-run state (the random source, the
/// pending-guarantee set) lives in the run itself.
pub struct Fuzzer<T> {
    generator: Box<dyn Generator<Item = T>>,
    simplifier: Box<dyn Simplifier<Item = T>>,
    guarantees: Vec<Guarantee<T>>,
}

impl<T> Fuzzer<T> {
    pub fn new(
        generator: impl Generator<Item = T> + 'static,
        simplifier: impl Simplifier<Item = T> + 'static,
    ) -> Fuzzer<T> {
        Fuzzer {
            generator: Box::new(generator),
            simplifier: Box::new(simplifier),
            guarantees: Vec::new(),
        }
    }

    /// Adds a guarantee: at least one input per run must satisfy `predicate`.
    pub fn guarantee(
        mut self,
        label: impl Into<String>,
        predicate: impl Fn(&T) -> bool + 'static,
    ) -> Fuzzer<T> {
        self.guarantees.push(Guarantee::new(label, predicate));
        self
    }

    pub fn generator(&self) -> &dyn Generator<Item = T> {
        self.generator.as_ref()
    }

    pub fn simplifier(&self) -> &dyn Simplifier<Item = T> {
        self.simplifier.as_ref()
    }

    pub fn guarantees(&self) -> &[Guarantee<T>] {
        &self.guarantees
    }
}

impl<T> fmt::Debug for Fuzzer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fuzzer")
            .field("guarantees", &self.guarantees)
            .finish_non_exhaustive()
    }
}
