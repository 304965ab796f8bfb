//! Convenience adapter: bare actions in, flat statistics out.

use crate::block::Block;
use crate::engine::Keit;
use crate::error::Result;
use crate::report::CandidateReport;

/// Statistics of one candidate without its trial series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleStats {
    /// Time of the cold trial.
    pub cold: u64,
    pub average: f64,
    pub average_hot: f64,
    pub fastest: u64,
    pub slowest: u64,
    pub fastest_hot: Option<u64>,
    pub slowest_hot: Option<u64>,
    pub score: f64,
}

impl<T> From<&CandidateReport<T>> for SimpleStats {
    fn from(report: &CandidateReport<T>) -> Self {
        Self {
            cold: report.cold.time,
            average: report.stats.average,
            average_hot: report.stats.average_hot,
            fastest: report.stats.fastest,
            slowest: report.stats.slowest,
            fastest_hot: report.stats.fastest_hot,
            slowest_hot: report.stats.slowest_hot,
            score: report.score,
        }
    }
}

/// `name -> SimpleStats`, in the order the actions were given.
pub type SimpleReport = Vec<(String, SimpleStats)>;

/// Benchmark named actions with default weight and no observer.
///
/// Actions sharing a name collide: the later one replaces the earlier one
/// and only one entry is reported.
pub fn simple<T, S, F, I>(actions: I, iterations: usize) -> Result<SimpleReport>
where
    I: IntoIterator<Item = (S, F)>,
    S: Into<String>,
    F: FnMut() -> T,
{
    let report = Keit::new()
        .candidates(actions.into_iter().map(|(name, action)| (name, Block::new(action))))
        .iterations(iterations)
        .run()?;

    Ok(report
        .results
        .iter()
        .map(|(name, candidate)| (name.clone(), SimpleStats::from(candidate)))
        .collect())
}

/// Box an action so differently typed closures fit in one list.
#[doc(hidden)]
pub fn boxed<'a, T, F>(action: F) -> Box<dyn FnMut() -> T + 'a>
where
    F: FnMut() -> T + 'a,
{
    Box::new(action)
}

/// Benchmark closures, naming each by its source text.
///
/// Textually identical actions get the same name and collide.
///
/// ```
/// let results = keit::simple![
///     || (0..64u32).sum::<u32>(),
///     || (0..64u32).product::<u32>();
///     200
/// ]
/// .unwrap();
///
/// assert_eq!(results.len(), 2);
/// assert!(results[0].0.contains("sum"));
/// ```
#[macro_export]
macro_rules! simple {
    ($($action:expr),+ ; $iterations:expr) => {{
        let actions = ::std::vec![
            $((::std::stringify!($action), $crate::simple::boxed($action))),+
        ];
        $crate::simple::simple(actions, $iterations)
    }};
    ($($action:expr),+ $(,)?) => {
        $crate::simple![$($action),+; 1000]
    };
}
