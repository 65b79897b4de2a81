//! Slot: one storage cell of the table, plus the chain count rooted at it.

use core::borrow::Borrow;

// The hash is computed once on insert and reused by every later probe and
// rehash, so user `Hash` never runs again for a stored value.
#[derive(Clone, Debug)]
struct Stored<T> {
    value: T,
    hash: u64,
}

/// A single cell of the open-addressing table.
///
/// `chain` is not about this cell's own occupancy: it counts the values in
/// the whole table whose primary probe position is this cell.
#[derive(Clone, Debug)]
pub(crate) struct Slot<T> {
    stored: Option<Stored<T>>,
    chain: usize,
}

/// Outcome of comparing a probe target against one slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum SlotMatch {
    Empty,
    Mismatch,
    Equal,
}

impl<T> Slot<T> {
    pub(crate) const fn new() -> Self {
        Self {
            stored: None,
            chain: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stored.is_none()
    }

    pub(crate) fn value(&self) -> Option<&T> {
        self.stored.as_ref().map(|s| &s.value)
    }

    pub(crate) fn hash(&self) -> Option<u64> {
        self.stored.as_ref().map(|s| s.hash)
    }

    /// Compares `q` against the stored value. The stored hash is checked
    /// first so `Eq` only runs on real candidates.
    pub(crate) fn matches<Q>(&self, hash: u64, q: &Q) -> SlotMatch
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        match &self.stored {
            None => SlotMatch::Empty,
            Some(s) if s.hash == hash && s.value.borrow() == q => SlotMatch::Equal,
            Some(_) => SlotMatch::Mismatch,
        }
    }

    /// Stores `value`, dropping whatever the slot held before.
    pub(crate) fn set(&mut self, hash: u64, value: T) {
        self.stored = Some(Stored { value, hash });
    }

    /// Moves the stored value and its hash out, leaving the slot empty.
    pub(crate) fn take(&mut self) -> Option<(u64, T)> {
        self.stored.take().map(|s| (s.hash, s.value))
    }

    /// Drops the stored value. The chain count is left untouched.
    pub(crate) fn clear(&mut self) {
        self.stored = None;
    }

    pub(crate) fn chain_count(&self) -> usize {
        self.chain
    }

    pub(crate) fn bump_chain(&mut self) {
        self.chain += 1;
    }

    pub(crate) fn drop_chain(&mut self) {
        debug_assert!(self.chain > 0, "chain count underflow");
        self.chain = self.chain.saturating_sub(1);
    }

    pub(crate) fn reset_chain(&mut self) {
        self.chain = 0;
    }
}
