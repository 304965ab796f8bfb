//! Thread pinning for steadier measurements.
//!
//! On Linux the current thread is pinned with `sched_setaffinity` and the
//! previous mask is restored afterwards. Elsewhere pinning is a no-op and
//! [`CpuPinGuard::is_pinned`] reports `false`.

#[cfg(target_os = "linux")]
mod platform {
    pub type Mask = libc::cpu_set_t;

    pub fn current_cpu() -> Option<usize> {
        // SAFETY: sched_getcpu has no preconditions.
        let cpu = unsafe { libc::sched_getcpu() };
        (cpu >= 0).then_some(cpu as usize)
    }

    pub fn current_mask() -> Option<Mask> {
        // SAFETY: `set` is a zeroed cpu_set_t of the size passed in.
        unsafe {
            let mut set: Mask = std::mem::zeroed();
            (libc::sched_getaffinity(0, std::mem::size_of::<Mask>(), &mut set) == 0).then_some(set)
        }
    }

    pub fn pin(cpu: usize) -> bool {
        // SAFETY: CPU_ZERO/CPU_SET only write inside `set`.
        unsafe {
            let mut set: Mask = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(cpu, &mut set);
            libc::sched_setaffinity(0, std::mem::size_of::<Mask>(), &set) == 0
        }
    }

    pub fn restore(mask: &Mask) -> bool {
        // SAFETY: `mask` was filled by sched_getaffinity.
        unsafe { libc::sched_setaffinity(0, std::mem::size_of::<Mask>(), mask) == 0 }
    }

    pub fn allowed_cpus() -> Vec<usize> {
        let Some(mask) = current_mask() else {
            return Vec::new();
        };
        (0..libc::CPU_SETSIZE as usize)
            // SAFETY: every index is below CPU_SETSIZE.
            .filter(|&cpu| unsafe { libc::CPU_ISSET(cpu, &mask) })
            .collect()
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub type Mask = ();

    pub fn current_cpu() -> Option<usize> {
        None
    }

    pub fn current_mask() -> Option<Mask> {
        None
    }

    pub fn pin(_cpu: usize) -> bool {
        false
    }

    pub fn restore(_mask: &Mask) -> bool {
        false
    }

    pub fn allowed_cpus() -> Vec<usize> {
        Vec::new()
    }
}

/// CPUs the current thread may run on. Empty where affinity is unsupported.
pub fn allowed_cpus() -> Vec<usize> {
    platform::allowed_cpus()
}

/// RAII guard: pins the current thread to the core it is running on and
/// restores the affinity it replaced on drop.
///
/// Each guard keeps its own copy of the previous mask, so nested guards
/// unwind back to the original affinity. The restore also runs while
/// unwinding, so a panicking candidate does not leave the thread pinned.
pub struct CpuPinGuard {
    pinned_core: Option<usize>,
    saved: Option<platform::Mask>,
}

impl CpuPinGuard {
    pub fn new() -> Self {
        let unpinned = Self {
            pinned_core: None,
            saved: None,
        };
        let Some(cpu) = platform::current_cpu() else {
            return unpinned;
        };
        let Some(saved) = platform::current_mask() else {
            return unpinned;
        };
        if !platform::pin(cpu) {
            return unpinned;
        }
        tracing::trace!(cpu, "pinned thread");
        Self {
            pinned_core: Some(cpu),
            saved: Some(saved),
        }
    }

    pub fn core_id(&self) -> Option<usize> {
        self.pinned_core
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_core.is_some()
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            if !platform::restore(&saved) {
                tracing::warn!("failed to restore thread affinity");
            }
        }
    }
}

impl Default for CpuPinGuard {
    fn default() -> Self {
        Self::new()
    }
}
