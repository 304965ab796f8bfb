//! # keit
//!
//! Latency comparison for small code blocks, separating the first (cold)
//! execution from repeated (hot) ones.
//!
//! Each candidate runs once cold and `iterations` times hot. The timings are
//! folded into averages, extrema and a composite score where lower is better.
//!
//! ```
//! use keit::{Block, Keit};
//!
//! let input: Vec<u32> = (0..256).rev().collect();
//! let report = Keit::new()
//!     .candidate("sort", Block::new(|| {
//!         let mut v = input.clone();
//!         v.sort();
//!         v[0]
//!     }))
//!     .candidate("sort_unstable", Block::new(|| {
//!         let mut v = input.clone();
//!         v.sort_unstable();
//!         v[0]
//!     }))
//!     .iterations(100)
//!     .run()
//!     .unwrap();
//!
//! for (name, result) in report.iter() {
//!     println!("{name}: cold {}ns, hot avg {:.1}ns", result.cold.time, result.stats.average_hot);
//! }
//! ```

pub mod block;
pub mod clock;
pub mod engine;
pub mod error;
pub mod observer;
pub mod report;
pub mod simple;
pub mod trial;
pub mod tui;
pub mod utils;

pub use block::Block;
pub use clock::{nanoseconds, Clock, DefaultClock, MonotonicClock, SteppingClock};
pub use engine::{keit, Config, Keit, PinStrategy};
pub use error::{KeitError, Result};
pub use observer::{Event, EventKind, Observer};
pub use report::{CandidateReport, RunReport, Stats};
pub use simple::{simple, SimpleStats};
pub use trial::{benchmark, benchmark_with, Trial};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::block::Block;
    pub use crate::clock::{nanoseconds, Clock};
    pub use crate::engine::{keit, Keit};
    pub use crate::observer::{Event, Observer};
}

#[cfg(test)]
mod tests {
    use crate::observer::{EventLog, RecordedEvent};
    use crate::prelude::*;
    use crate::SteppingClock;

    #[test]
    fn test_two_candidates_full_pipeline() {
        let mut log = EventLog::new();
        let report = Keit::new()
            .candidate("fast", Block::new(|| "fast"))
            .candidate(
                "slow",
                Block::new(|| {
                    std::thread::sleep(std::time::Duration::from_micros(50));
                    "slow"
                }),
            )
            .iterations(20)
            .observer(&mut log)
            .run()
            .unwrap();

        assert_eq!(report.names().collect::<Vec<_>>(), vec!["fast", "slow"]);
        for (name, result) in report.iter() {
            let stats = &result.stats;
            assert_eq!(result.hot.len(), 20, "{}", name);
            assert!(stats.fastest <= stats.slowest);
            assert!(stats.fastest as f64 <= stats.average && stats.average <= stats.slowest as f64);
            let (fastest_hot, slowest_hot) = (stats.fastest_hot.unwrap(), stats.slowest_hot.unwrap());
            assert!(fastest_hot as f64 <= stats.average_hot && stats.average_hot <= slowest_hot as f64);
        }

        let slow = report.get("slow").unwrap();
        assert!(slow.stats.fastest_hot.unwrap() >= 50_000);
        assert_eq!(slow.cold.result, "slow");
        assert!(report.benchmark_time >= 21 * 50_000);

        let scores: Vec<_> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Score { name, score } => Some((name.as_str(), *score)),
                _ => None,
            })
            .collect();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], ("fast", report.get("fast").unwrap().score));
        assert_eq!(scores[1], ("slow", slow.score));
    }

    #[test]
    fn test_single_raw_measurement() {
        let mut block = Block::new(|| 2 + 2).with_setup(|| ()).with_teardown(|| ());
        let trial = crate::benchmark(&mut block);
        assert_eq!(trial.result, 4);

        let clock = SteppingClock::new(11);
        assert_eq!(crate::benchmark_with(&clock, &mut block).time, 11);
        let t1 = nanoseconds();
        assert!(nanoseconds() >= t1);
    }
}
