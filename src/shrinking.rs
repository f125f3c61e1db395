//! Counterexample simplification: greedy descent over candidate values.

use core::marker::PhantomData;

use tracing::{debug, trace};

/// Capability that proposes simpler alternatives to a failing value.
///
/// `candidates` returns a finite list, ordered most aggressive reduction
/// first, since the search commits to the first candidate that still fails.
/// Termination of the search is the implementor's contract: every candidate
/// must be strictly smaller than the input under some well-founded measure.
/// The engine performs no cycle detection.
pub trait Simplifier {
    type Item;

    fn candidates(&self, value: &Self::Item) -> Vec<Self::Item>;
}

impl<S: Simplifier + ?Sized> Simplifier for &S {
    type Item = S::Item;

    fn candidates(&self, value: &S::Item) -> Vec<S::Item> {
        (**self).candidates(value)
    }
}

impl<S: Simplifier + ?Sized> Simplifier for Box<S> {
    type Item = S::Item;

    fn candidates(&self, value: &S::Item) -> Vec<S::Item> {
        (**self).candidates(value)
    }
}

/// Wraps a closure as a [`Simplifier`].
pub fn from_candidates<T, F>(f: F) -> FromCandidates<F, T>
where
    F: Fn(&T) -> Vec<T>,
{
    FromCandidates(f, PhantomData)
}

#[derive(Clone)]
pub struct FromCandidates<F, T>(F, PhantomData<fn(&T) -> Vec<T>>);

impl<T, F> Simplifier for FromCandidates<F, T>
where
    F: Fn(&T) -> Vec<T>,
{
    type Item = T;

    fn candidates(&self, value: &T) -> Vec<T> {
        (self.0)(value)
    }
}

fn no_candidates<T>(_: &T) -> Vec<T> {
    Vec::new()
}

/// Simplifier that never proposes anything; failing inputs are reported
/// exactly as drawn.
pub fn none<T>() -> FromCandidates<fn(&T) -> Vec<T>, T> {
    FromCandidates(no_candidates::<T>, PhantomData)
}

/// Greedy local descent from `origin` towards the simplest value for which
/// `still_falsifies` holds.
///
/// Scans the candidate list in order, commits to the first falsifying
/// candidate, and restarts the scan from it; stops at the first value none
/// of whose candidates still falsify. The result is a local minimum of the
/// candidate relation, not a global one, which keeps the search tractable
/// for arbitrary user-supplied simplifiers.
pub fn simplify<S, F>(simplifier: &S, origin: S::Item, mut still_falsifies: F) -> S::Item
where
    S: Simplifier + ?Sized,
    F: FnMut(&S::Item) -> bool,
{
    let mut current = origin;
    let mut attempts: u64 = 0;
    let mut accepted: u64 = 0;
    loop {
        let mut improved = false;
        for candidate in simplifier.candidates(&current) {
            attempts += 1;
            if still_falsifies(&candidate) {
                trace!(attempts, "accepted simpler falsifying candidate");
                current = candidate;
                accepted += 1;
                improved = true;
                break;
            }
        }
        if !improved {
            break;
        }
    }
    debug!(attempts, accepted, "simplification search finished");
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toward_zero(value: &i64) -> Vec<i64> {
        let v = *value;
        if v == 0 {
            return Vec::new();
        }
        let mut candidates = Vec::new();
        for candidate in [0, v / 2, v - v.signum()] {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        candidates
    }

    #[test]
    fn descends_to_the_boundary() {
        let simplifier = from_candidates(toward_zero);
        assert_eq!(simplify(&simplifier, 1000, |v| v.abs() >= 10), 10);
        assert_eq!(simplify(&simplifier, -1000, |v| v.abs() >= 10), -10);
        assert_eq!(simplify(&simplifier, 10, |v| v.abs() >= 10), 10);
    }

    #[test]
    fn empty_candidates_return_the_origin() {
        assert_eq!(simplify(&none::<i64>(), 123, |_| true), 123);
    }

    #[test]
    fn unfalsifiable_candidates_return_the_origin() {
        let simplifier = from_candidates(toward_zero);
        // Only the original value falsifies, so no candidate is accepted.
        assert_eq!(simplify(&simplifier, 17, |&v| v == 17), 17);
    }

    #[test]
    fn commits_to_the_first_falsifying_candidate() {
        let simplifier = from_candidates(|&v: &i64| match v {
            10 => vec![5, 3],
            _ => Vec::new(),
        });
        // 5 and 3 both falsify; candidate order decides.
        assert_eq!(simplify(&simplifier, 10, |_| true), 5);
    }

    #[test]
    fn restarts_the_scan_after_each_improvement() {
        let simplifier = from_candidates(toward_zero);
        let mut checked = Vec::new();
        let result = simplify(&simplifier, 8, |&v| {
            checked.push(v);
            v >= 2
        });
        assert_eq!(result, 2);
        // Every scan starts from the most aggressive candidate again.
        assert_eq!(checked.first(), Some(&0));
        assert!(checked.len() >= 3);
    }

    #[test]
    fn terminates_on_well_founded_chains() {
        // Worst case for the descent: every step shrinks by one.
        let simplifier = from_candidates(|&v: &i64| if v > 0 { vec![v - 1] } else { Vec::new() });
        assert_eq!(simplify(&simplifier, 5000, |&v| v > 100), 101);
    }
}
