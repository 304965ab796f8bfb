//! Cold/hot aggregation engine.
//!
//! For each candidate, in insertion order:
//! 1. one cold trial
//! 2. `iterations` hot trials
//! 3. statistics over both
//!
//! Once every candidate has statistics, a second pass scores them. Everything
//! runs sequentially on the calling thread. A candidate that never returns
//! stalls the run; there is no timeout.

use crate::block::Block;
use crate::clock::{Clock, DefaultClock};
use crate::error::{KeitError, Result};
use crate::observer::{Event, Observer};
use crate::report::{RunReport, Series};
use crate::trial::{benchmark_with, Trial};
use crate::utils::CpuPinGuard;

/// Name of the candidate used when none are supplied.
pub const DEFAULT_CANDIDATE: &str = "Nothing";

// ============================================================================
// Configuration
// ============================================================================

/// CPU pinning strategy during measurements
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinStrategy {
    /// Leave scheduling to the OS
    #[default]
    Off,
    /// Pin once for the whole run
    Global,
    /// Pin/unpin around every trial (outside the timed window)
    PerTrial,
}

/// Run configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Hot trials per candidate (default: 1000)
    pub iterations: usize,
    /// Influence of the cold trial and of the spreads on the score (default: 0.25)
    pub weight: f64,
    /// Log a warning when the clock is not high-resolution (default: false)
    pub warning: bool,
    /// CPU pinning strategy (default: Off)
    pub pin_strategy: PinStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 1000,
            weight: 0.25,
            warning: false,
            pin_strategy: PinStrategy::default(),
        }
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() {
            return Err(KeitError::NonFiniteWeight(self.weight));
        }
        Ok(())
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Builder and runner for one benchmark run.
///
/// # Example
/// ```
/// use keit::{Block, Keit};
///
/// let report = Keit::new()
///     .candidate("sum", Block::new(|| (0..100u64).sum::<u64>()))
///     .candidate("fold", Block::new(|| (0..100u64).fold(0, |a, b| a + b)))
///     .iterations(50)
///     .run()
///     .unwrap();
///
/// assert_eq!(report.len(), 2);
/// assert_eq!(report.get("sum").unwrap().hot.len(), 50);
/// ```
pub struct Keit<'a, T, C = DefaultClock> {
    candidates: Vec<(String, Block<'a, T>)>,
    placeholder: bool,
    config: Config,
    observer: Option<&'a mut dyn Observer<T>>,
    clock: C,
}

/// Entry point: a runner holding only the no-op [`DEFAULT_CANDIDATE`].
///
/// The placeholder is dropped as soon as a real candidate is added.
pub fn keit<'a>() -> Keit<'a, ()> {
    Keit::default()
}

impl<'a, T> Keit<'a, T> {
    /// A runner with no candidates, default config and the [`DefaultClock`].
    ///
    /// `Default` is only implemented for `Keit<'_, ()>`, where it holds the
    /// no-op [`DEFAULT_CANDIDATE`]; other result types have no placeholder.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            placeholder: false,
            config: Config::default(),
            observer: None,
            clock: DefaultClock::default(),
        }
    }
}

impl<'a> Default for Keit<'a, ()> {
    fn default() -> Self {
        let mut runner = Self::new();
        runner.candidates.push((DEFAULT_CANDIDATE.to_string(), Block::default()));
        runner.placeholder = true;
        runner
    }
}

impl<'a, T, C: Clock> Keit<'a, T, C> {
    /// Add a candidate. A name that is already present keeps its position and
    /// has its block replaced.
    pub fn candidate(mut self, name: impl Into<String>, block: Block<'a, T>) -> Self {
        self.insert(name.into(), block);
        self
    }

    /// Add several candidates in order.
    pub fn candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = (S, Block<'a, T>)>,
        S: Into<String>,
    {
        for (name, block) in candidates {
            self.insert(name.into(), block);
        }
        self
    }

    fn insert(&mut self, name: String, block: Block<'a, T>) {
        if self.placeholder {
            self.candidates.clear();
            self.placeholder = false;
        }
        match self.candidates.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = block,
            None => self.candidates.push((name, block)),
        }
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.config.weight = weight;
        self
    }

    pub fn warning(mut self, warning: bool) -> Self {
        self.config.warning = warning;
        self
    }

    pub fn pin(mut self, pin_strategy: PinStrategy) -> Self {
        self.config.pin_strategy = pin_strategy;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Send progress events to `observer`.
    pub fn observer(mut self, observer: &'a mut dyn Observer<T>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Measure with `clock` instead of the current one.
    pub fn clock<C2: Clock>(self, clock: C2) -> Keit<'a, T, C2> {
        Keit {
            candidates: self.candidates,
            placeholder: self.placeholder,
            config: self.config,
            observer: self.observer,
            clock,
        }
    }

    /// Names of the candidates that will run, in order.
    pub fn candidate_names(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|(n, _)| n.as_str())
    }

    /// Run every candidate and score them.
    ///
    /// A panic in any setup, action, teardown or observer unwinds out of this
    /// call immediately: later candidates never run and no report is built.
    pub fn run(self) -> Result<RunReport<T>> {
        self.config.validate()?;

        let Keit {
            candidates,
            config,
            mut observer,
            clock,
            ..
        } = self;
        let Config {
            iterations,
            weight,
            warning,
            pin_strategy,
        } = config;

        if warning && !clock.is_high_resolution() {
            tracing::warn!(
                clock = clock.name(),
                "clock is not high-resolution; sub-microsecond timings are unreliable"
            );
        }

        tracing::debug!(
            candidates = candidates.len(),
            iterations,
            weight,
            clock = clock.name(),
            "starting run"
        );

        let _global_pin = (pin_strategy == PinStrategy::Global).then(CpuPinGuard::new);

        let start = clock.now();

        // Phase 1: trials and statistics, one candidate at a time.
        let mut measured = Vec::with_capacity(candidates.len());
        for (name, mut block) in candidates {
            let cold = run_trial(&clock, &mut block, pin_strategy);
            emit(
                &mut observer,
                Event::Cold {
                    name: &name,
                    time: cold.time,
                    result: &cold.result,
                },
            );

            let mut hot = Vec::with_capacity(iterations);
            for _ in 0..iterations {
                let trial = run_trial(&clock, &mut block, pin_strategy);
                emit(
                    &mut observer,
                    Event::Hot {
                        name: &name,
                        time: trial.time,
                        result: &trial.result,
                    },
                );
                hot.push(trial);
            }

            let series = Series::new(cold, hot, iterations, weight);
            emit(
                &mut observer,
                Event::Stats {
                    name: &name,
                    stats: &series.stats,
                },
            );
            tracing::debug!(
                name = %name,
                cold = series.cold.time,
                average_hot = series.stats.average_hot,
                average = series.stats.average,
                "candidate measured"
            );

            measured.push((name, series));
        }

        // Phase 2: scoring, only once every candidate is complete.
        let mut results = Vec::with_capacity(measured.len());
        for (name, series) in measured {
            let report = series.into_report(weight);
            emit(
                &mut observer,
                Event::Score {
                    name: &name,
                    score: report.score,
                },
            );
            results.push((name, report));
        }

        let benchmark_time = clock.now().saturating_sub(start);
        tracing::debug!(benchmark_time, "run finished");

        Ok(RunReport {
            benchmark_time,
            results,
        })
    }
}

#[inline]
fn run_trial<T, C: Clock>(clock: &C, block: &mut Block<'_, T>, pin_strategy: PinStrategy) -> Trial<T> {
    let _pin = (pin_strategy == PinStrategy::PerTrial).then(CpuPinGuard::new);
    benchmark_with(clock, block)
}

fn emit<T>(observer: &mut Option<&mut dyn Observer<T>>, event: Event<'_, T>) {
    if let Some(observer) = observer {
        observer.notify(&event);
    }
}
