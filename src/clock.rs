//! Nanosecond clock sources.
//!
//! Every clock returns an integer count of nanoseconds since an arbitrary,
//! process-local epoch. Only differences between two readings are meaningful.
//!
//! By default (`hrtime` feature) the [`DefaultClock`] reads
//! `clock_gettime` directly on unix targets. Use `--no-default-features`
//! to fall back to `std::time::Instant` everywhere.

use std::cell::Cell;
use std::sync::OnceLock;
use std::time::Instant;

/// A monotonic nanosecond counter.
///
/// Implementations must never fail and must never go backwards within a
/// process run.
pub trait Clock {
    /// Current reading in nanoseconds.
    fn now(&self) -> u64;

    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Whether the source reads a dedicated high-resolution OS timer.
    fn is_high_resolution(&self) -> bool {
        false
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline(always)]
    fn now(&self) -> u64 {
        (**self).now()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_high_resolution(&self) -> bool {
        (**self).is_high_resolution()
    }
}

// ============================================================================
// Clock selection: clock_gettime or std::time::Instant depending on features
// ============================================================================

/// Clock used when none is injected.
#[cfg(all(feature = "hrtime", unix))]
pub type DefaultClock = HighResClock;

#[cfg(not(all(feature = "hrtime", unix)))]
pub type DefaultClock = MonotonicClock;

/// Read the [`DefaultClock`].
#[inline(always)]
pub fn nanoseconds() -> u64 {
    DefaultClock::default().now()
}

// ============================================================================
// Generic monotonic clock
// ============================================================================

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// `std::time::Instant` measured against a process-wide epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> u64 {
        EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
    }

    fn name(&self) -> &'static str {
        "monotonic"
    }
}

// ============================================================================
// High-resolution OS clock
// ============================================================================

/// `clock_gettime` with the rawest monotonic clock id the platform offers.
///
/// On Linux and Android this is `CLOCK_MONOTONIC_RAW`, which is not slewed
/// by NTP. Other unix targets use `CLOCK_MONOTONIC`.
#[cfg(unix)]
#[derive(Clone, Copy, Debug, Default)]
pub struct HighResClock;

#[cfg(unix)]
impl HighResClock {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    const CLOCK_ID: libc::clockid_t = libc::CLOCK_MONOTONIC_RAW;

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    const CLOCK_ID: libc::clockid_t = libc::CLOCK_MONOTONIC;
}

#[cfg(unix)]
impl Clock for HighResClock {
    #[inline(always)]
    fn now(&self) -> u64 {
        // SAFETY: a zeroed timespec is valid, and CLOCK_ID is a monotonic
        // clock supported by every target this is compiled for.
        let (rc, ts) = unsafe {
            let mut ts: libc::timespec = std::mem::zeroed();
            let rc = libc::clock_gettime(Self::CLOCK_ID, &mut ts);
            (rc, ts)
        };
        debug_assert_eq!(rc, 0, "clock_gettime failed");
        (ts.tv_sec as u64) * 1_000_000_000 + ts.tv_nsec as u64
    }

    fn name(&self) -> &'static str {
        "clock_gettime"
    }

    fn is_high_resolution(&self) -> bool {
        true
    }
}

// ============================================================================
// Adapters and stubs
// ============================================================================

/// Adapts a floating-point millisecond source (e.g. a `performance.now()`
/// style timer) into integer nanoseconds.
pub struct MillisClock<F> {
    source: F,
}

impl<F: Fn() -> f64> MillisClock<F> {
    pub fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F: Fn() -> f64> Clock for MillisClock<F> {
    fn now(&self) -> u64 {
        ((self.source)() * 1_000_000.0) as u64
    }

    fn name(&self) -> &'static str {
        "millis"
    }
}

/// Deterministic clock that advances by a fixed step on every reading.
///
/// Any window bounded by two consecutive reads measures exactly `step`
/// nanoseconds, which makes the derived statistics reproducible.
#[derive(Debug)]
pub struct SteppingClock {
    step: u64,
    current: Cell<u64>,
}

impl SteppingClock {
    pub fn new(step: u64) -> Self {
        Self {
            step,
            current: Cell::new(0),
        }
    }

    /// Number of nanoseconds elapsed so far.
    pub fn elapsed(&self) -> u64 {
        self.current.get()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> u64 {
        let next = self.current.get() + self.step;
        self.current.set(next);
        next
    }

    fn name(&self) -> &'static str {
        "stepping"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hint::black_box;

    #[test]
    fn test_monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock;
        let t1 = clock.now();
        let t2 = clock.now();
        let t3 = clock.now();
        assert!(t2 >= t1);
        assert!(t3 >= t2);
    }

    #[cfg(unix)]
    #[test]
    fn test_high_res_clock_monotonic() {
        let clock = HighResClock;
        let t1 = clock.now();
        let mut sum = 0u64;
        for i in 0..10_000 {
            sum = black_box(sum.wrapping_add(black_box(i)));
        }
        let t2 = clock.now();
        assert!(sum > 0);
        assert!(t2 >= t1, "clock_gettime went backwards: {} -> {}", t1, t2);
        assert!(clock.is_high_resolution());
    }

    #[test]
    fn test_nanoseconds_advances() {
        let t1 = nanoseconds();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let t2 = nanoseconds();
        assert!(t2 - t1 >= 1_000_000, "expected at least 1ms, got {}", t2 - t1);
    }

    #[test]
    fn test_stepping_clock() {
        let clock = SteppingClock::new(5);
        assert_eq!(clock.now(), 5);
        assert_eq!(clock.now(), 10);
        assert_eq!(clock.elapsed(), 10);
        // Borrowed clocks share the same counter
        let borrowed = &clock;
        assert_eq!(borrowed.now(), 15);
        assert_eq!(clock.elapsed(), 15);
    }

    #[test]
    fn test_millis_clock_scales_to_nanos() {
        let clock = MillisClock::new(|| 1.5);
        assert_eq!(clock.now(), 1_500_000);
    }
}
