//! Progress events emitted while a run is in progress.
//!
//! Delivery is synchronous and fire-and-forget: the engine calls
//! [`Observer::notify`] inline and never inspects what the observer did.
//! A panic inside an observer unwinds out of the run like any other.

use std::fmt;

use crate::report::Stats;

/// Kind of an [`Event`], as a stable wire-style name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Cold,
    Hot,
    Stats,
    Score,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Cold => "COLD",
            EventKind::Hot => "HOT",
            EventKind::Stats => "STATS",
            EventKind::Score => "SCORE",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single progress event, borrowing from the run in progress.
#[derive(Debug)]
pub enum Event<'e, T> {
    /// First execution of a candidate.
    Cold { name: &'e str, time: u64, result: &'e T },
    /// One steady-state execution.
    Hot { name: &'e str, time: u64, result: &'e T },
    /// Statistics of a candidate whose hot trials are complete.
    Stats { name: &'e str, stats: &'e Stats },
    /// Composite score, emitted after every candidate has its statistics.
    Score { name: &'e str, score: f64 },
}

impl<T> Event<'_, T> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Cold { .. } => EventKind::Cold,
            Event::Hot { .. } => EventKind::Hot,
            Event::Stats { .. } => EventKind::Stats,
            Event::Score { .. } => EventKind::Score,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Event::Cold { name, .. }
            | Event::Hot { name, .. }
            | Event::Stats { name, .. }
            | Event::Score { name, .. } => name,
        }
    }
}

/// Sink for progress events.
pub trait Observer<T> {
    fn notify(&mut self, event: &Event<'_, T>);
}

impl<T, F> Observer<T> for F
where
    F: FnMut(&Event<'_, T>),
{
    fn notify(&mut self, event: &Event<'_, T>) {
        self(event)
    }
}

/// Logs every event through `tracing`.
///
/// Per-trial events go to `TRACE`, statistics and scores to `DEBUG`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl<T: fmt::Debug> Observer<T> for TracingObserver {
    fn notify(&mut self, event: &Event<'_, T>) {
        match event {
            Event::Cold { name, time, result } => {
                tracing::trace!(event = "COLD", name, time, ?result);
            }
            Event::Hot { name, time, result } => {
                tracing::trace!(event = "HOT", name, time, ?result);
            }
            Event::Stats { name, stats } => {
                tracing::debug!(
                    event = "STATS",
                    name,
                    average_hot = stats.average_hot,
                    average = stats.average,
                    fastest = stats.fastest,
                    slowest = stats.slowest,
                    fastest_hot = ?stats.fastest_hot,
                    slowest_hot = ?stats.slowest_hot,
                    "candidate stats"
                );
            }
            Event::Score { name, score } => {
                tracing::debug!(event = "SCORE", name, score);
            }
        }
    }
}

/// Owned copy of an [`Event`].
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent<T> {
    Cold { name: String, time: u64, result: T },
    Hot { name: String, time: u64, result: T },
    Stats { name: String, stats: Stats },
    Score { name: String, score: f64 },
}

impl<T> RecordedEvent<T> {
    pub fn kind(&self) -> EventKind {
        match self {
            RecordedEvent::Cold { .. } => EventKind::Cold,
            RecordedEvent::Hot { .. } => EventKind::Hot,
            RecordedEvent::Stats { .. } => EventKind::Stats,
            RecordedEvent::Score { .. } => EventKind::Score,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RecordedEvent::Cold { name, .. }
            | RecordedEvent::Hot { name, .. }
            | RecordedEvent::Stats { name, .. }
            | RecordedEvent::Score { name, .. } => name,
        }
    }
}

/// Records every event it receives, cloning results.
#[derive(Clone, Debug)]
pub struct EventLog<T> {
    events: Vec<RecordedEvent<T>>,
}

impl<T> EventLog<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[RecordedEvent<T>] {
        &self.events
    }

    pub fn into_events(self) -> Vec<RecordedEvent<T>> {
        self.events
    }

    /// Kinds in delivery order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(RecordedEvent::kind).collect()
    }
}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Observer<T> for EventLog<T> {
    fn notify(&mut self, event: &Event<'_, T>) {
        let recorded = match *event {
            Event::Cold { name, time, result } => RecordedEvent::Cold {
                name: name.to_string(),
                time,
                result: result.clone(),
            },
            Event::Hot { name, time, result } => RecordedEvent::Hot {
                name: name.to_string(),
                time,
                result: result.clone(),
            },
            Event::Stats { name, stats } => RecordedEvent::Stats {
                name: name.to_string(),
                stats: *stats,
            },
            Event::Score { name, score } => RecordedEvent::Score {
                name: name.to_string(),
                score,
            },
        };
        self.events.push(recorded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(EventKind::Cold.as_str(), "COLD");
        assert_eq!(EventKind::Hot.to_string(), "HOT");
        assert_eq!(EventKind::Stats.as_str(), "STATS");
        assert_eq!(EventKind::Score.as_str(), "SCORE");
    }

    fn as_observer<T, F: FnMut(&Event<'_, T>)>(f: F) -> F {
        f
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer =
                as_observer::<u8, _>(|event| seen.push((event.kind(), event.name().to_string())));
            observer.notify(&Event::Cold { name: "a", time: 1, result: &3 });
            observer.notify(&Event::Score { name: "a", score: 1.0 });
        }
        assert_eq!(
            seen,
            vec![(EventKind::Cold, "a".to_string()), (EventKind::Score, "a".to_string())]
        );
    }

    #[test]
    fn test_event_log_records_owned_copies() {
        let mut log = EventLog::new();
        let result = String::from("out");
        log.notify(&Event::Hot { name: "x", time: 9, result: &result });
        drop(result);

        assert_eq!(
            log.events(),
            &[RecordedEvent::Hot {
                name: "x".to_string(),
                time: 9,
                result: "out".to_string()
            }]
        );
        assert_eq!(log.kinds(), vec![EventKind::Hot]);
    }
}
