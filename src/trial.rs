//! Single timed execution of a block.

use std::hint::black_box;

use crate::block::Block;
use crate::clock::{Clock, DefaultClock};

/// One timed execution: elapsed nanoseconds and whatever the action returned.
#[derive(Clone, Debug, PartialEq)]
pub struct Trial<T> {
    pub time: u64,
    pub result: T,
}

/// Run `block` once against the [`DefaultClock`].
pub fn benchmark<T>(block: &mut Block<'_, T>) -> Trial<T> {
    benchmark_with(&DefaultClock::default(), block)
}

/// Run `block` once against `clock`.
///
/// Order is fixed: setup, first reading, action, second reading, teardown.
#[inline]
pub fn benchmark_with<T, C: Clock>(clock: &C, block: &mut Block<'_, T>) -> Trial<T> {
    (block.setup)();
    let start = clock.now();
    let result = black_box((block.action)());
    let end = clock.now();
    (block.teardown)();

    debug_assert!(
        end >= start,
        "clock '{}' went backwards: {} -> {}",
        clock.name(),
        start,
        end
    );
    if end < start {
        tracing::error!(clock = clock.name(), start, end, "clock went backwards");
    }

    Trial {
        time: end.saturating_sub(start),
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_benchmark_returns_action_result() {
        let mut block = Block::new(|| 42);
        let trial = benchmark(&mut block);
        assert_eq!(trial.result, 42);
    }

    #[test]
    fn test_setup_and_teardown_excluded_from_window() {
        let clock = SteppingClock::new(10);
        let reads_in_setup = Cell::new(0);
        let reads_in_teardown = Cell::new(0);

        let mut block = Block::new(|| ())
            .with_setup(|| reads_in_setup.set(clock.elapsed()))
            .with_teardown(|| reads_in_teardown.set(clock.elapsed()));

        let trial = benchmark_with(&clock, &mut block);
        drop(block);

        assert_eq!(trial.time, 10);
        // Setup ran before the first reading, teardown after the second.
        assert_eq!(reads_in_setup.get(), 0);
        assert_eq!(reads_in_teardown.get(), 20);
    }

    #[test]
    fn test_call_order() {
        let order = RefCell::new(Vec::new());
        let mut block = Block::new(|| order.borrow_mut().push(2))
            .with_setup(|| order.borrow_mut().push(1))
            .with_teardown(|| order.borrow_mut().push(3));

        benchmark(&mut block);
        benchmark(&mut block);
        drop(block);

        assert_eq!(order.into_inner(), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_sleep_is_measured() {
        let mut block = Block::new(|| std::thread::sleep(std::time::Duration::from_millis(2)));
        let trial = benchmark(&mut block);
        assert!(trial.time >= 2_000_000, "Elapsed {} < 2ms", trial.time);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_action_panic_propagates() {
        let mut block = Block::new(|| -> u32 { panic!("boom") });
        benchmark(&mut block);
    }
}
