//! Candidate code blocks.

use std::fmt;

/// A named unit of work: optional setup, the timed action, optional teardown.
///
/// Only `action` is timed. `setup` and `teardown` run immediately before and
/// after the timed window so inputs can be prepared or cleaned up without
/// polluting the measurement. None of the three are assumed to be pure.
pub struct Block<'a, T = ()> {
    pub(crate) setup: Box<dyn FnMut() + 'a>,
    pub(crate) action: Box<dyn FnMut() -> T + 'a>,
    pub(crate) teardown: Box<dyn FnMut() + 'a>,
}

impl<'a, T> Block<'a, T> {
    /// Create a block timing `action`, with no-op setup and teardown.
    pub fn new<F>(action: F) -> Self
    where
        F: FnMut() -> T + 'a,
    {
        Self {
            setup: Box::new(|| {}),
            action: Box::new(action),
            teardown: Box::new(|| {}),
        }
    }

    /// Run `setup` before every timed execution.
    pub fn with_setup<S>(mut self, setup: S) -> Self
    where
        S: FnMut() + 'a,
    {
        self.setup = Box::new(setup);
        self
    }

    /// Run `teardown` after every timed execution.
    pub fn with_teardown<D>(mut self, teardown: D) -> Self
    where
        D: FnMut() + 'a,
    {
        self.teardown = Box::new(teardown);
        self
    }
}

impl Default for Block<'_, ()> {
    /// A block whose action does nothing.
    fn default() -> Self {
        Self::new(|| {})
    }
}

impl<T> fmt::Debug for Block<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block").finish_non_exhaustive()
    }
}
