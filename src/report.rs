//! Per-candidate statistics and run reports.
//!
//! Aggregation happens in two phases. Phase one turns the trials of a single
//! candidate into an immutable [`Series`] with its [`Stats`]. Phase two is the
//! pure [`score`] function, applied once every series is complete.

use crate::trial::Trial;

/// Statistics derived from one candidate's cold and hot trials.
///
/// With zero hot trials `average_hot` and `average` are NaN and the hot-only
/// extrema are `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    /// Mean of the hot times.
    pub average_hot: f64,
    /// Hot mean blended with the cold time, which counts as
    /// `iterations * weight` extra samples.
    pub average: f64,
    /// Fastest time including the cold trial.
    pub fastest: u64,
    /// Slowest time including the cold trial.
    pub slowest: u64,
    pub fastest_hot: Option<u64>,
    pub slowest_hot: Option<u64>,
}

impl Stats {
    /// Fold a cold time and the hot times into statistics.
    pub fn compute(cold: u64, hot: &[u64], iterations: usize, weight: f64) -> Self {
        let hot_sum: u128 = hot.iter().map(|&t| u128::from(t)).sum();
        let hot_length = hot.len() as f64;
        let weighted_iterations = iterations as f64 * weight;

        let average_hot = hot_sum as f64 / hot_length;
        let average = (hot_sum as f64 + cold as f64 * weighted_iterations)
            / (hot_length + weighted_iterations);

        let fastest_hot = hot.iter().copied().min();
        let slowest_hot = hot.iter().copied().max();

        Self {
            average_hot,
            average,
            fastest: fastest_hot.map_or(cold, |f| f.min(cold)),
            slowest: slowest_hot.map_or(cold, |s| s.max(cold)),
            fastest_hot,
            slowest_hot,
        }
    }

    /// Spread between the slowest and fastest hot trial.
    pub fn hot_spread(&self) -> Option<u64> {
        Some(self.slowest_hot? - self.fastest_hot?)
    }
}

/// Composite score. Lower is better: both spreads add to it, so a tight,
/// fast candidate scores lowest.
///
/// NaN when there were no hot trials.
pub fn score(stats: &Stats, weight: f64) -> f64 {
    let overall = (stats.average + stats.slowest as f64 - stats.fastest as f64) * weight;
    let hot = match (stats.fastest_hot, stats.slowest_hot) {
        (Some(fastest), Some(slowest)) => stats.average_hot + slowest as f64 - fastest as f64,
        _ => f64::NAN,
    };
    overall + hot
}

/// Completed trials of one candidate, before scoring.
#[derive(Clone, Debug)]
pub struct Series<T> {
    pub cold: Trial<T>,
    pub hot: Vec<Trial<T>>,
    pub stats: Stats,
}

impl<T> Series<T> {
    pub fn new(cold: Trial<T>, hot: Vec<Trial<T>>, iterations: usize, weight: f64) -> Self {
        let hot_times: Vec<u64> = hot.iter().map(|t| t.time).collect();
        let stats = Stats::compute(cold.time, &hot_times, iterations, weight);
        Self { cold, hot, stats }
    }

    /// Second phase: attach the composite score.
    pub fn into_report(self, weight: f64) -> CandidateReport<T> {
        let score = score(&self.stats, weight);
        CandidateReport {
            cold: self.cold,
            hot: self.hot,
            stats: self.stats,
            score,
        }
    }
}

/// Everything measured for one candidate.
#[derive(Clone, Debug)]
pub struct CandidateReport<T> {
    pub cold: Trial<T>,
    /// Hot trials in execution order.
    pub hot: Vec<Trial<T>>,
    pub stats: Stats,
    pub score: f64,
}

/// Result of a whole run, candidates in configuration order.
#[derive(Clone, Debug)]
pub struct RunReport<T> {
    /// Nanoseconds from the first cold trial to the end of scoring.
    pub benchmark_time: u64,
    pub results: Vec<(String, CandidateReport<T>)>,
}

impl<T> RunReport<T> {
    /// Look up a candidate by name.
    pub fn get(&self, name: &str) -> Option<&CandidateReport<T>> {
        self.results
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, report)| report)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CandidateReport<T>)> {
        self.results.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Candidate with the lowest score, ignoring NaN scores.
    pub fn best(&self) -> Option<(&str, &CandidateReport<T>)> {
        self.iter()
            .filter(|(_, r)| !r.score.is_nan())
            .min_by(|(_, a), (_, b)| a.score.total_cmp(&b.score))
    }
}
