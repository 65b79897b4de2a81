#![cfg(test)]

// Property tests for HashSet kept inside the crate so they can use the
// collision hasher and raw-table accessors side by side.

use crate::config::{Config, MAX_LOAD_FACTOR, MIN_LOAD_FACTOR};
use crate::hash_set::{HashSet, InsertError};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeSet;
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations so shrinking moves towards earlier values and
// shorter pools.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize),
    InsertOwned(usize),
    Erase(usize),
    Take(usize),
    Contains(String),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => idx.clone().prop_map(Op::Insert),
            2 => idx.clone().prop_map(Op::InsertOwned),
            3 => idx.clone().prop_map(Op::Erase),
            1 => idx.clone().prop_map(Op::Take),
            2 => prop_oneof![contains_pool, "[a-z]{0,4}"].prop_map(Op::Contains),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn chain_total<S>(sut: &HashSet<String, S>) -> usize {
    (0..sut.capacity())
        .map(|i| sut.chain_count(i).unwrap_or(0))
        .sum()
}

// State-machine equivalence against std::collections::BTreeSet.
// Invariants checked after every op:
// - Duplicate inserts fail; erase/take of absent values fail; both leave
//   the set untouched.
// - `len` parity with the model, and every model value is contained.
// - Capacity is a power of two and the load factor stays below the max.
// - Chain counts sum to `len` (one per stored value).
// - An erase that did not resize leaves the load factor above the min.
fn run_scenario<S: BuildHasher>(
    mut sut: HashSet<String, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: BTreeSet<String> = BTreeSet::new();

    for op in ops {
        let capacity_before = sut.capacity();
        let mut erased = false;
        match op {
            Op::Insert(i) => {
                let v = &pool[i];
                let already = model.contains(v);
                match sut.insert(v.as_str()) {
                    Ok(()) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(v.clone());
                    }
                    Err(InsertError::DuplicateValue) => {
                        prop_assert!(already, "duplicate error only when value exists");
                    }
                    Err(e) => prop_assert!(false, "unexpected insert error: {}", e),
                }
            }
            Op::InsertOwned(i) => {
                let v = pool[i].clone();
                let already = model.contains(&v);
                match sut.insert_owned(v.clone()) {
                    Ok(()) => {
                        prop_assert!(!already);
                        model.insert(v);
                    }
                    Err(InsertError::DuplicateValue) => prop_assert!(already),
                    Err(e) => prop_assert!(false, "unexpected insert error: {}", e),
                }
            }
            Op::Erase(i) => {
                let v = &pool[i];
                let removed = sut.erase(v.as_str());
                prop_assert_eq!(removed, model.remove(v));
                erased = removed;
            }
            Op::Take(i) => {
                let v = &pool[i];
                let taken = sut.take(v.as_str());
                prop_assert_eq!(taken.is_some(), model.remove(v));
                if let Some(t) = taken {
                    prop_assert_eq!(&t, v);
                    erased = true;
                }
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains(s.as_str()), model.contains(&s));
                prop_assert_eq!(sut.get(s.as_str()), model.get(&s));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), capacity_before);
            }
            Op::Iterate => {
                let seen: BTreeSet<String> = sut.iter().cloned().collect();
                prop_assert_eq!(&seen, &model);
                let raw: BTreeSet<String> = (0..sut.capacity())
                    .filter_map(|i| sut.at(i))
                    .cloned()
                    .collect();
                prop_assert_eq!(&raw, &model);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity().is_power_of_two());
        prop_assert!(sut.load_factor() < MAX_LOAD_FACTOR);
        prop_assert_eq!(chain_total(&sut), sut.len());
        if erased && sut.capacity() == capacity_before && sut.capacity() > 1 {
            prop_assert!(sut.load_factor() > MIN_LOAD_FACTOR);
        }
        for v in &model {
            prop_assert!(sut.contains(v.as_str()), "lost value {:?}", v);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(HashSet::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every value shares primary
// slot 0, so all lookups walk one chain and rely on `Eq`.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(HashSet::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}

// Growth factor 4 and a small initial table: capacities must still be
// powers of two and nothing may be lost across multi-step resizes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_values_survive_resizes(values in proptest::collection::btree_set(any::<u32>(), 0..300)) {
        let config = Config {
            initial_capacity: 1,
            growth_factor: 4,
            max_load_factor: 0.75,
            min_load_factor: 0.125,
        };
        let mut sut: HashSet<u32> = HashSet::with_config(config).unwrap();
        for v in &values {
            prop_assert!(sut.insert(v).is_ok());
            prop_assert!(sut.capacity().is_power_of_two());
        }
        prop_assert_eq!(sut.len(), values.len());
        for v in &values {
            prop_assert!(sut.contains(v));
        }
        for (n, v) in values.iter().enumerate() {
            prop_assert!(sut.erase(v));
            prop_assert!(!sut.contains(v));
            prop_assert_eq!(sut.len(), values.len() - n - 1);
            prop_assert!(sut.capacity().is_power_of_two());
        }
    }
}
