//! Debug-only guard against calling back into a set from user code.
//!
//! `HashSet` runs user `Hash`, `Eq` and `ToOwned` impls while slots and
//! chain counts are being updated. If one of those impls reaches the same
//! set again it would observe a half-updated table, so every public entry
//! point that may run user code holds a `BusyGuard` for its duration. In
//! debug builds a nested `enter` panics; in release builds the guard is
//! a zero-sized no-op.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-set busy flag.
#[derive(Debug)]
pub(crate) struct BusyFlag {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // Single-threaded, like the set that embeds it.
    _nosend: PhantomData<*mut ()>,
}

impl BusyFlag {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _nosend: PhantomData,
        }
    }

    /// Marks the set busy until the returned guard is dropped.
    ///
    /// Panics in debug builds when the set is already busy.
    #[inline]
    pub(crate) fn enter(&self) -> BusyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrant call into HashSet from a Hash/Eq/ToOwned impl"
            );
            return BusyGuard { flag: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return BusyGuard { _flag: PhantomData };
        }
    }
}

impl Default for BusyFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by [`BusyFlag::enter`].
pub(crate) struct BusyGuard<'a> {
    #[cfg(debug_assertions)]
    flag: &'a BusyFlag,
    #[cfg(not(debug_assertions))]
    _flag: PhantomData<&'a BusyFlag>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.flag.busy.set(false);
    }
}
