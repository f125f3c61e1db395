//! Guarantees assert that a run actually exercised a class of inputs.

use std::fmt;

/// Labelled predicate that at least one generated input per run must satisfy.
///
/// Guarantees catch generators that silently stop covering an input class
/// ("at least one empty value", "at least one negative value"). The label
/// names the class and is reported when a run gives up waiting for it.
pub struct Guarantee<T> {
    label: String,
    predicate: Box<dyn Fn(&T) -> bool>,
}

impl<T> Guarantee<T> {
    pub fn new(label: impl Into<String>, predicate: impl Fn(&T) -> bool + 'static) -> Guarantee<T> {
        Guarantee {
            label: label.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_satisfied_by(&self, value: &T) -> bool {
        (self.predicate)(value)
    }
}

impl<T> fmt::Debug for Guarantee<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Guarantee").field(&self.label).finish()
    }
}

/// Per-run bookkeeping of which guarantees are still unsatisfied.
///
/// Order is preserved from the owning fuzzer. Satisfied entries are dropped
/// by filtering the collection, never by removing while iterating it.
pub(crate) struct PendingGuarantees<'a, T> {
    pending: Vec<&'a Guarantee<T>>,
}

impl<'a, T> PendingGuarantees<'a, T> {
    pub(crate) fn new(guarantees: &'a [Guarantee<T>]) -> PendingGuarantees<'a, T> {
        PendingGuarantees {
            pending: guarantees.iter().collect(),
        }
    }

    /// Drops every pending guarantee the input satisfies.
    ///
    /// Called once per generated input, before the property's outcome on
    /// that input is known: satisfaction is a fact about the input alone.
    pub(crate) fn observe(&mut self, value: &T) {
        self.pending.retain(|guarantee| !guarantee.is_satisfied_by(value));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn labels(&self) -> Vec<String> {
        self.pending
            .iter()
            .map(|guarantee| guarantee.label().to_string())
            .collect()
    }
}
