//! Utility modules for measurement and output.

pub mod cpu_affinity;

pub use cpu_affinity::CpuPinGuard;

/// Format a nanosecond count with an auto-selected unit.
pub fn format_nanos(ns: f64) -> String {
    if ns.is_nan() {
        "-".to_string()
    } else if ns < 1_000.0 {
        format!("{:.0}ns", ns)
    } else if ns < 1_000_000.0 {
        format!("{:.2}µs", ns / 1_000.0)
    } else if ns < 1_000_000_000.0 {
        format!("{:.2}ms", ns / 1_000_000.0)
    } else {
        format!("{:.2}s", ns / 1_000_000_000.0)
    }
}
