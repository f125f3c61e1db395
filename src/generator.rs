//! Generation capabilities and the lazy sequences they produce.

use crate::data::{RandomSource, Seed};

/// Capability that produces one value of a type from a [`RandomSource`].
///
/// Generators must be referentially stable: everything that affects future
/// draws lives in the source, so re-seeding the source reproduces the same
/// values. Concrete generator libraries implement this trait; the engine only
/// ever sees the capability.
pub trait Generator {
    type Item;

    fn generate(&self, source: &mut RandomSource) -> Self::Item;

    /// Applies `f` to every generated value.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> U,
    {
        Map { inner: self, f }
    }

    /// Feeds every generated value into `f` and draws from the generator it
    /// returns.
    fn flat_map<G, F>(self, f: F) -> FlatMap<Self, F>
    where
        Self: Sized,
        G: Generator,
        F: Fn(Self::Item) -> G,
    {
        FlatMap { inner: self, f }
    }

    /// Pairs this generator with another, drawing left then right.
    fn zip<G>(self, other: G) -> Zip<Self, G>
    where
        Self: Sized,
        G: Generator,
    {
        Zip {
            left: self,
            right: other,
        }
    }

    /// Starts the infinite sequence this generator produces under `seed`.
    fn random_sequence(self, seed: Seed) -> RandomSequence<Self>
    where
        Self: Sized,
    {
        RandomSequence::new(self, seed)
    }
}

impl<G: Generator + ?Sized> Generator for &G {
    type Item = G::Item;

    fn generate(&self, source: &mut RandomSource) -> G::Item {
        (**self).generate(source)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    type Item = G::Item;

    fn generate(&self, source: &mut RandomSource) -> G::Item {
        (**self).generate(source)
    }
}

/// Wraps a closure as a [`Generator`].
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: Fn(&mut RandomSource) -> T,
{
    FromFn(f)
}

#[derive(Clone)]
pub struct FromFn<F>(F);

impl<T, F> Generator for FromFn<F>
where
    F: Fn(&mut RandomSource) -> T,
{
    type Item = T;

    fn generate(&self, source: &mut RandomSource) -> T {
        (self.0)(source)
    }
}

/// Always produces clones of `value`; consumes no randomness.
pub fn constant<T: Clone>(value: T) -> Constant<T> {
    Constant(value)
}

#[derive(Debug, Clone)]
pub struct Constant<T>(T);

impl<T: Clone> Generator for Constant<T> {
    type Item = T;

    fn generate(&self, _source: &mut RandomSource) -> T {
        self.0.clone()
    }
}

#[derive(Clone)]
pub struct Map<G, F> {
    inner: G,
    f: F,
}

impl<G, U, F> Generator for Map<G, F>
where
    G: Generator,
    F: Fn(G::Item) -> U,
{
    type Item = U;

    fn generate(&self, source: &mut RandomSource) -> U {
        (self.f)(self.inner.generate(source))
    }
}

#[derive(Clone)]
pub struct FlatMap<G, F> {
    inner: G,
    f: F,
}

impl<G, H, F> Generator for FlatMap<G, F>
where
    G: Generator,
    H: Generator,
    F: Fn(G::Item) -> H,
{
    type Item = H::Item;

    fn generate(&self, source: &mut RandomSource) -> H::Item {
        let intermediate = self.inner.generate(source);
        (self.f)(intermediate).generate(source)
    }
}

#[derive(Clone)]
pub struct Zip<A, B> {
    left: A,
    right: B,
}

impl<A, B> Generator for Zip<A, B>
where
    A: Generator,
    B: Generator,
{
    type Item = (A::Item, B::Item);

    fn generate(&self, source: &mut RandomSource) -> (A::Item, B::Item) {
        let left = self.left.generate(source);
        let right = self.right.generate(source);
        (left, right)
    }
}

/// Lazy infinite sequence of values drawn by one generator from one seed.
///
/// Forward-only: each element consumes exactly the random state left behind
/// by the previous draw, never rewinding. Restartable in the sense that
/// constructing a new sequence from the same seed replays it element for
/// element.
pub struct RandomSequence<G> {
    generator: G,
    source: RandomSource,
    index: u64,
}

impl<G: Generator> RandomSequence<G> {
    pub fn new(generator: G, seed: Seed) -> RandomSequence<G> {
        RandomSequence {
            generator,
            source: RandomSource::new(seed),
            index: 0,
        }
    }

    /// Produces the next element. Infallible: the sequence never ends.
    pub fn draw(&mut self) -> G::Item {
        self.index += 1;
        self.generator.generate(&mut self.source)
    }

    /// 1-based index of the most recent draw, 0 before the first.
    pub fn index(&self) -> u64 {
        self.index
    }
}

impl<G: Generator> Iterator for RandomSequence<G> {
    type Item = G::Item;

    fn next(&mut self) -> Option<G::Item> {
        Some(self.draw())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn raw_u64() -> FromFn<impl Fn(&mut RandomSource) -> u64> {
        from_fn(|source: &mut RandomSource| source.next_u64())
    }

    #[test]
    fn sequences_from_the_same_seed_are_equal() {
        for len in [1usize, 7, 64] {
            let first: Vec<u64> = raw_u64().random_sequence(99).take(len).collect();
            let second: Vec<u64> = raw_u64().random_sequence(99).take(len).collect();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn sequence_consumes_draws_in_order() {
        // A generator that ignores the source entirely makes the engine's
        // draw accounting observable: the output must be the exact counter
        // progression, with no element skipped or produced twice.
        let counter = Cell::new(0u64);
        let generator = from_fn(move |_source: &mut RandomSource| {
            let value = counter.get();
            counter.set(value + 1);
            value
        });
        let produced: Vec<u64> = generator.random_sequence(5).take(10).collect();
        assert_eq!(produced, (0..10).collect::<Vec<u64>>());
    }

    #[test]
    fn sequence_tracks_draw_index() {
        let mut sequence = raw_u64().random_sequence(1);
        assert_eq!(sequence.index(), 0);
        sequence.draw();
        sequence.draw();
        assert_eq!(sequence.index(), 2);
    }

    #[test]
    fn map_transforms_each_value() {
        let doubled: Vec<u64> = raw_u64()
            .map(|value| value / 2 * 2)
            .random_sequence(13)
            .take(20)
            .collect();
        assert!(doubled.iter().all(|value| value % 2 == 0));
    }

    #[test]
    fn zip_draws_left_then_right() {
        let zipped: Vec<(u64, u64)> = raw_u64().zip(raw_u64()).random_sequence(21).take(8).collect();

        let mut source = RandomSource::new(21);
        for pair in zipped {
            assert_eq!(pair.0, source.next_u64());
            assert_eq!(pair.1, source.next_u64());
        }
    }

    #[test]
    fn constant_leaves_the_source_untouched() {
        let pairs: Vec<(u32, u64)> = constant(7u32)
            .zip(raw_u64())
            .random_sequence(55)
            .take(4)
            .collect();

        let mut source = RandomSource::new(55);
        for (tag, raw) in pairs {
            assert_eq!(tag, 7);
            assert_eq!(raw, source.next_u64());
        }
    }

    #[test]
    fn flat_map_threads_the_source_through_both_stages() {
        let generator = raw_u64().flat_map(|first| {
            from_fn(move |source: &mut RandomSource| (first, source.next_u64()))
        });
        let pairs: Vec<(u64, u64)> = generator.random_sequence(77).take(6).collect();

        let mut source = RandomSource::new(77);
        for (first, second) in pairs {
            assert_eq!(first, source.next_u64());
            assert_eq!(second, source.next_u64());
        }
    }

    #[test]
    fn boxed_generator_delegates() {
        let boxed: Box<dyn Generator<Item = u64>> = Box::new(raw_u64());
        let from_box: Vec<u64> = RandomSequence::new(&boxed, 31).take(5).collect();
        let direct: Vec<u64> = raw_u64().random_sequence(31).take(5).collect();
        assert_eq!(from_box, direct);
    }
}
