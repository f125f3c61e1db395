//! The evaluation loop: draws inputs, tracks guarantees, runs the property
//! and reports minimized falsifications.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::data::{fresh_seed, Seed};
use crate::fuzzer::Fuzzer;
use crate::generator::RandomSequence;
use crate::guarantee::PendingGuarantees;
use crate::shrinking::simplify;

/// Iterations performed when the caller does not ask for a specific count.
pub const DEFAULT_ITERATIONS: u64 = 100;

/// Extra draws allowed per requested iteration while guarantees are pending.
pub const DEFAULT_GUARANTEE_PATIENCE: u64 = 10;

/// Why a property did not hold for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Falsification {
    message: String,
}

impl Falsification {
    pub fn new(message: impl Into<String>) -> Falsification {
        Falsification {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Falsification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Falsification {}

/// Result of running a property against one input.
///
/// Falsification is a value, not an unwound panic, so the same property can
/// be run by the main loop and re-run by the simplification search without
/// any exception plumbing. Assert-style properties are adapted with
/// [`panic_to_outcome`].
#[derive(Debug)]
pub enum PropertyOutcome {
    Satisfied,
    Falsified(Falsification),
}

impl PropertyOutcome {
    /// `Satisfied` when `condition` holds, otherwise a falsification
    /// carrying `message`.
    pub fn require(condition: bool, message: impl Into<String>) -> PropertyOutcome {
        if condition {
            PropertyOutcome::Satisfied
        } else {
            PropertyOutcome::Falsified(Falsification::new(message))
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, PropertyOutcome::Satisfied)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "property panicked".to_string()
    }
}

/// Adapts an assert-style property (one that panics on failure) into an
/// outcome-returning one.
pub fn panic_to_outcome<T, P>(mut property: P) -> impl FnMut(&T) -> PropertyOutcome
where
    P: FnMut(&T),
{
    move |input| match catch_unwind(AssertUnwindSafe(|| property(input))) {
        Ok(()) => PropertyOutcome::Satisfied,
        Err(panic) => PropertyOutcome::Falsified(Falsification::new(panic_message(panic.as_ref()))),
    }
}

/// Terminal report for a falsified property.
///
/// `counterexample` is the simplest falsifying input the simplifier's
/// candidates reached, `cause` the failure raised by the originally drawn
/// input. `iteration` is the 1-based index of the draw that falsified;
/// re-running with the same `seed` replays the run exactly.
#[derive(Debug)]
pub struct FalsifiedProperty<T> {
    pub iteration: u64,
    pub iterations: u64,
    pub seed: Seed,
    pub counterexample: T,
    pub cause: Falsification,
}

impl<T: fmt::Debug> fmt::Display for FalsifiedProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "property falsified at iteration {}/{} (seed {}): counterexample {:?}: {}",
            self.iteration, self.iterations, self.seed, self.counterexample, self.cause
        )
    }
}

impl<T: fmt::Debug> std::error::Error for FalsifiedProperty<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Everything `evaluate` can report back to the caller.
#[derive(Debug, Error)]
pub enum EvaluationError<T: fmt::Debug> {
    /// Precondition violation, raised before any input is generated.
    #[error("iterations must be greater than zero")]
    InvalidIterations,

    /// The property is false; carries the minimized counterexample.
    #[error(transparent)]
    Falsified(FalsifiedProperty<T>),

    /// Some guarantees were still unsatisfied when the patience budget ran
    /// out, so the generator is not producing the promised input classes.
    #[error("guarantees never satisfied after {draws} draws: {labels:?}")]
    GuaranteesNotMet { labels: Vec<String>, draws: u64 },
}

/// Knobs for one evaluation run.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Number of satisfied iterations required; must be greater than zero.
    pub iterations: u64,

    /// Seed for the run; `None` picks a fresh one per run.
    pub seed: Option<Seed>,

    /// Extra draws allowed per requested iteration while guarantees remain
    /// pending. Past `iterations * (1 + patience)` total draws the run gives
    /// up with [`EvaluationError::GuaranteesNotMet`] instead of looping
    /// forever against a guarantee the generator cannot satisfy.
    pub guarantee_patience: u64,
}

impl Default for EvalConfig {
    fn default() -> EvalConfig {
        EvalConfig {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            guarantee_patience: DEFAULT_GUARANTEE_PATIENCE,
        }
    }
}

impl EvalConfig {
    pub fn new(iterations: u64) -> EvalConfig {
        EvalConfig {
            iterations,
            ..EvalConfig::default()
        }
    }

    pub fn seeded(iterations: u64, seed: Seed) -> EvalConfig {
        EvalConfig {
            iterations,
            seed: Some(seed),
            ..EvalConfig::default()
        }
    }
}

/// Runs `property` against `config.iterations` generated inputs.
///
/// Draws one input at a time from the fuzzer's generator under the run's
/// seed, updates the pending guarantees with it, then executes the property.
/// The run keeps drawing past the requested count while guarantees are
/// pending, up to the patience budget; it never stops short of it. On the
/// first falsified outcome the run stops generating and greedily simplifies
/// the failing input before reporting.
///
/// Success is silent: `Ok(())` means every iteration satisfied the property
/// and every guarantee was met.
pub fn evaluate<T, P>(
    fuzzer: &Fuzzer<T>,
    config: &EvalConfig,
    mut property: P,
) -> Result<(), EvaluationError<T>>
where
    T: fmt::Debug,
    P: FnMut(&T) -> PropertyOutcome,
{
    if config.iterations == 0 {
        return Err(EvaluationError::InvalidIterations);
    }
    let seed = config.seed.unwrap_or_else(fresh_seed);
    let max_draws = config
        .iterations
        .saturating_mul(config.guarantee_patience.saturating_add(1));
    debug!(iterations = config.iterations, seed, "starting property run");

    let mut sequence = RandomSequence::new(fuzzer.generator(), seed);
    let mut pending = PendingGuarantees::new(fuzzer.guarantees());
    let mut satisfied: u64 = 0;

    while satisfied < config.iterations || !pending.is_empty() {
        if !pending.is_empty() && sequence.index() >= max_draws {
            let labels = pending.labels();
            info!(?labels, draws = sequence.index(), "giving up on unsatisfied guarantees");
            return Err(EvaluationError::GuaranteesNotMet {
                labels,
                draws: sequence.index(),
            });
        }
        if satisfied >= config.iterations {
            trace!(
                draws = sequence.index(),
                pending = pending.len(),
                "extending run to satisfy guarantees"
            );
        }

        let input = sequence.draw();
        pending.observe(&input);
        match property(&input) {
            PropertyOutcome::Satisfied => satisfied += 1,
            PropertyOutcome::Falsified(cause) => {
                let iteration = sequence.index();
                info!(seed, iteration, "property falsified; re-run with this seed to reproduce");
                let counterexample = simplify(fuzzer.simplifier(), input, |candidate| {
                    !property(candidate).is_satisfied()
                });
                return Err(EvaluationError::Falsified(FalsifiedProperty {
                    iteration,
                    iterations: config.iterations,
                    seed,
                    counterexample,
                    cause,
                }));
            }
        }
    }
    debug!(draws = sequence.index(), "property run finished");
    Ok(())
}

/// Defaults-applied entry point: the default iteration count and a fresh
/// seed per run.
pub fn for_any<T, P>(fuzzer: &Fuzzer<T>, property: P) -> Result<(), EvaluationError<T>>
where
    T: fmt::Debug,
    P: FnMut(&T) -> PropertyOutcome,
{
    evaluate(fuzzer, &EvalConfig::default(), property)
}
