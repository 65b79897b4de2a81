//! probe-hashset: an open-addressing HashSet with quadratic probing and
//! per-slot chain counts for constant-time negative lookups.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, self-contained set whose probing, resizing and
//!   ownership rules can each be read in one place.
//! - Layers:
//!   - Slot<T>: one cell of the table. Holds at most one value, the hash
//!     computed when it was inserted, and a chain count.
//!   - Table<T> (private, in `hash_set`): the power-of-two slot array plus
//!     occupancy; probing, placement, removal and rehash-on-resize.
//!   - HashSet<T, S>: public API. Owns the hash builder and the resize
//!     policy (`Config`), hashes queries and decides when to grow/shrink.
//!
//! Probing
//! - Attempt `i` visits `(hash + (i + i²) / 2) & (capacity - 1)`. Over a
//!   power-of-two capacity these triangular offsets visit every slot
//!   exactly once, so an insert below the max load factor always finds a
//!   free slot.
//! - The mask is only a true modulo when the capacity is a power of two;
//!   `Config::validate` rejects initial capacities and growth factors
//!   that would break this.
//!
//! Chain counts
//! - A slot's chain count is the number of stored values whose primary
//!   (attempt 0) position is that slot, wherever they ended up. Inserts
//!   increment it once per value, erases decrement it, resize rebuilds it.
//! - A lookup whose primary slot has a zero count is a miss without
//!   probing. Otherwise the probe stops after it has seen that many values
//!   rooted at the same primary slot.
//! - Erase leaves a plain hole (no tombstones); lookups never stop at an
//!   empty slot, only on a match, an exhausted chain, or a full sweep.
//!
//! Ownership
//! - `insert(&Q)` stores `Q::to_owned()`; the caller's value is never
//!   aliased. `insert_owned(T)` moves a value in instead.
//! - Values are dropped on erase, clear and when the set drops. Resize
//!   moves values into the new table rather than copying them.
//!
//! Hashing
//! - `S: BuildHasher` (default: hashbrown's `DefaultHashBuilder`) runs
//!   once per insert and once per query. Stored hashes are reused for
//!   probing comparisons and rehashing, so user `Hash` is never called on a
//!   stored value.
//!
//! Reentrancy
//! - Entry points that call user `Hash`/`Eq`/`ToOwned` hold a debug-only
//!   busy guard; calling back into the same set from those impls panics in
//!   debug builds.
//!
//! Notes and non-goals
//! - Single-threaded: `HashSet` is `!Send`/`!Sync`.
//! - Iteration order is raw slot order, which changes on every resize.
//! - Resizing is not incremental; it happens inline in insert/erase.

pub mod config;
mod hash_set;
mod hash_set_proptest;
mod reentrancy;
mod slot;

// Public surface
pub use config::{Config, ConfigError};
pub use hash_set::{HashSet, InsertError, Iter};
