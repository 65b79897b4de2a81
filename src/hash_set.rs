//! HashSet: open addressing over a power-of-two slot array, quadratic
//! probing and per-slot chain counts for fast misses.

use crate::config::{Config, ConfigError};
use crate::reentrancy::BusyFlag;
use crate::slot::{Slot, SlotMatch};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertError {
    /// An equal value is already stored; the set was not modified.
    DuplicateValue,
    /// The probe sequence visited every slot without finding a free one.
    ProbeExhausted,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateValue => f.write_str("value is already in the set"),
            InsertError::ProbeExhausted => f.write_str("no free slot on the probe sequence"),
        }
    }
}

impl std::error::Error for InsertError {}

/// Offset of the `i`-th probe from the primary position: `(i + i²) / 2`.
///
/// Halving before multiplying keeps the product exact modulo 2^64, which is
/// all the power-of-two mask looks at.
#[inline]
fn probe_offset(i: usize) -> usize {
    if i % 2 == 0 {
        (i / 2).wrapping_mul(i + 1)
    } else {
        i.wrapping_mul((i + 1) / 2)
    }
}

#[inline]
fn probe_position(hash: u64, i: usize, mask: usize) -> usize {
    (hash as usize).wrapping_add(probe_offset(i)) & mask
}

fn alloc_slots<T>(capacity: usize) -> Box<[Slot<T>]> {
    (0..capacity).map(|_| Slot::new()).collect()
}

// Slot storage and occupancy. Never calls user `Hash`: every slot keeps the
// hash of its value, and callers pass hashes in.
#[derive(Clone, Debug)]
struct Table<T> {
    slots: Box<[Slot<T>]>,
    len: usize,
}

impl<T> Table<T> {
    fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            slots: alloc_slots(capacity),
            len: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    fn find<Q>(&self, hash: u64, q: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mask = self.mask();
        let primary = probe_position(hash, 0, mask);
        // Every value rooted at `primary` sits on this same probe sequence,
        // so once all of them were seen the target cannot be further along.
        let mut rooted = self.slots[primary].chain_count();
        for i in 0..self.capacity() {
            if rooted == 0 {
                return None;
            }
            let idx = probe_position(hash, i, mask);
            let slot = &self.slots[idx];
            match slot.matches(hash, q) {
                SlotMatch::Equal => return Some(idx),
                SlotMatch::Mismatch => {
                    if slot.hash().map(|h| probe_position(h, 0, mask)) == Some(primary) {
                        rooted -= 1;
                    }
                }
                SlotMatch::Empty => {}
            }
        }
        None
    }

    /// Stores `value` in the first free slot of its probe sequence. Does not
    /// check for duplicates and never resizes.
    fn place(&mut self, hash: u64, value: T) -> Result<usize, T> {
        let mask = self.mask();
        for i in 0..self.capacity() {
            let idx = probe_position(hash, i, mask);
            if self.slots[idx].is_empty() {
                self.slots[idx].set(hash, value);
                self.slots[probe_position(hash, 0, mask)].bump_chain();
                self.len += 1;
                return Ok(idx);
            }
        }
        Err(value)
    }

    // Places a value known to be absent, then grows if the max load factor
    // was reached.
    fn commit(&mut self, hash: u64, value: T, config: &Config) -> Result<(), InsertError> {
        if self.place(hash, value).is_err() {
            log::warn!("no free slot found after probing {} slots", self.capacity());
            return Err(InsertError::ProbeExhausted);
        }
        if self.load_factor() >= config.max_load_factor {
            match self.capacity().checked_mul(config.growth_factor) {
                Some(new_capacity) => self.resize(new_capacity),
                None => log::warn!("hash set capacity overflow; not growing"),
            }
        }
        Ok(())
    }

    fn remove_at(&mut self, idx: usize) -> Option<T> {
        let (hash, value) = self.slots[idx].take()?;
        self.len -= 1;
        let primary = probe_position(hash, 0, self.mask());
        self.slots[primary].drop_chain();
        Some(value)
    }

    fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.clear();
            slot.reset_chain();
        }
        self.len = 0;
    }

    /// Rebuilds the table with `new_capacity` slots, reinserting every value
    /// at its probe position under the new mask.
    fn resize(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity.is_power_of_two());
        debug_assert!(new_capacity > self.len);
        log::debug!(
            "resizing hash set: {} -> {} slots, {} values",
            self.capacity(),
            new_capacity,
            self.len
        );
        let snapshot: Vec<(u64, T)> = self.slots.iter_mut().filter_map(Slot::take).collect();
        self.slots = alloc_slots(new_capacity);
        self.len = 0;
        for (hash, value) in snapshot {
            if self.place(hash, value).is_err() {
                unreachable!("resized table must have room for every value");
            }
        }
    }
}

/// An unordered set of unique values stored in a single open-addressed
/// slot array.
///
/// Values are hashed once with `S`; the hash is kept beside the value so
/// probing and rehashing never call `Hash` again. The capacity is always a
/// power of two and the load factor is kept within the bounds of the set's
/// [`Config`] by growing after inserts and shrinking after erases.
pub struct HashSet<T, S = DefaultHashBuilder> {
    hasher: S,
    config: Config,
    table: Table<T>,
    busy: BusyFlag,
}

/// Iterator over the stored values in raw slot order.
pub struct Iter<'a, T> {
    it: core::slice::Iter<'a, Slot<T>>,
    left: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let v = self.it.by_ref().find_map(Slot::value)?;
        self.left -= 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.left, Some(self.left))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> HashSet<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, Default::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates an empty set with the default [`Config`] and the given hash
    /// builder.
    pub fn with_hasher(hasher: S) -> Self {
        Self::build(Config::default(), hasher)
    }

    pub fn with_config_and_hasher(config: Config, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    fn build(config: Config, hasher: S) -> Self {
        Self {
            hasher,
            config,
            table: Table::with_capacity(config.initial_capacity),
            busy: BusyFlag::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len
    }

    pub fn is_empty(&self) -> bool {
        self.table.len == 0
    }

    /// Number of slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Value stored in raw slot `index`, if any.
    ///
    /// This reads the table directly and is meant for walking it slot by
    /// slot; use [`contains`](Self::contains) or [`get`](Self::get) for
    /// lookups.
    pub fn at(&self, index: usize) -> Option<&T> {
        self.table.slots.get(index)?.value()
    }

    /// Number of stored values whose primary probe position is slot
    /// `index`, or `None` when `index` is out of range.
    pub fn chain_count(&self, index: usize) -> Option<usize> {
        self.table.slots.get(index).map(Slot::chain_count)
    }

    /// Drops every value and resets all chain counts. The capacity is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            it: self.table.slots.iter(),
            left: self.table.len,
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Inserts an owned copy of `value`.
    ///
    /// Fails with [`InsertError::DuplicateValue`] without touching the set
    /// when an equal value is already stored. The copy is only made once the
    /// value is known to be new.
    pub fn insert<Q>(&mut self, value: &Q) -> Result<(), InsertError>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = T>,
    {
        let _g = self.busy.enter();
        let hash = self.make_hash(value);
        if self.table.find(hash, value).is_some() {
            log::trace!("insert rejected: value already present");
            return Err(InsertError::DuplicateValue);
        }
        let owned = value.to_owned();
        self.table.commit(hash, owned, &self.config)
    }

    /// Inserts `value` itself, taking ownership instead of copying.
    pub fn insert_owned(&mut self, value: T) -> Result<(), InsertError> {
        let _g = self.busy.enter();
        let hash = self.make_hash(&value);
        if self.table.find(hash, &value).is_some() {
            log::trace!("insert rejected: value already present");
            return Err(InsertError::DuplicateValue);
        }
        self.table.commit(hash, value, &self.config)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        let hash = self.make_hash(value);
        self.table.find(hash, value).is_some()
    }

    /// Borrows the stored value equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        let hash = self.make_hash(value);
        let idx = self.table.find(hash, value)?;
        self.table.slots[idx].value()
    }

    /// Removes the value equal to `value` and drops it. Returns whether a
    /// value was removed.
    pub fn erase<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take(value).is_some()
    }

    /// Removes the value equal to `value` and hands it back to the caller.
    ///
    /// Shrinks the table when the load factor drops to the configured
    /// minimum, down to a single slot.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.busy.enter();
        let hash = self.make_hash(value);
        let Some(idx) = self.table.find(hash, value) else {
            log::trace!("erase miss: value not present");
            return None;
        };
        let removed = self.table.remove_at(idx)?;
        let new_capacity = self.table.capacity() / self.config.growth_factor;
        if new_capacity >= 1 && self.table.load_factor() <= self.config.min_load_factor {
            self.table.resize(new_capacity);
        }
        Some(removed)
    }
}

impl<T, S> Clone for HashSet<T, S>
where
    T: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            config: self.config,
            table: self.table.clone(),
            busy: BusyFlag::new(),
        }
    }
}

impl<T, S> fmt::Debug for HashSet<T, S>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Duplicates are skipped.
impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let _ = self.insert_owned(value);
        }
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}
