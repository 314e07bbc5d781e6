use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeMap, BTreeSet};

use crate::node::Colour;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "0u16..512")] u16, u64),
    #[proptest(weight = 25)]
    Erase(#[proptest(strategy = "0u16..512")] u16),
    #[proptest(weight = 12)]
    Find(#[proptest(strategy = "0u16..512")] u16),
    #[proptest(weight = 12)]
    LowerBound(#[proptest(strategy = "0u16..520")] u16),
    #[proptest(weight = 1)]
    Compact,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=2000)
}

/// In-order `(key, colour, height, parent key)` of every node.
fn shape<V>(t: &RbTree<u16, V>) -> Vec<(u16, Colour, u8, Option<u16>)> {
    t.inorder_ids()
        .into_iter()
        .map(|id| {
            let n = &t.nodes[id];
            (n.key, n.colour, n.height, n.parent.map(|p| t.nodes[p].key))
        })
        .collect()
}

fn apply_map(t: &mut RbTree<u16, u64>, m: &mut BTreeMap<u16, u64>, op: &Op) -> Result<(), TestCaseError> {
    match *op {
        Op::Insert(key, value) => {
            prop_assert_eq!(t.insert(key, value), m.insert(key, value));
        }
        Op::Erase(key) => {
            prop_assert_eq!(t.erase(&key), m.remove(&key));
        }
        Op::Find(key) => {
            let c = t.find(&key);
            prop_assert_eq!(c.entry(), m.get_key_value(&key));
            prop_assert_eq!(c.is_end(), !m.contains_key(&key));
        }
        Op::LowerBound(key) => {
            prop_assert_eq!(t.lower_bound(&key).entry(), m.range(key..).next());
        }
        Op::Compact => {
            let before = shape(t);
            t.compact();
            prop_assert_eq!(t.nodes.holes(), 0);
            prop_assert_eq!(shape(t), before);
        }
    }
    prop_assert_eq!(t.len(), m.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_map_equivalence(ops in ops_strategy()) {
        let mut t: RbTree<u16, u64> = RbTree::new();
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();

        for op in &ops {
            apply_map(&mut t, &mut m, op)?;
        }

        let stats = t.validate().map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(stats.entries, m.len());
        let got: Vec<(u16, u64)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u64)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_invariants_after_every_op(ops in prop::collection::vec(any::<Op>(), 0..=200)) {
        let mut t: RbTree<u16, u64> = RbTree::new();
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();

        for op in &ops {
            apply_map(&mut t, &mut m, op)?;
            if let Err(err) = t.validate() {
                return Err(TestCaseError::fail(format!("after {op:?}: {err}")));
            }
        }
    }

    #[test]
    fn prop_set_equivalence(ops in ops_strategy()) {
        let mut s: RbSet<u16> = RbSet::new();
        let mut m: BTreeSet<u16> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(key, _) => {
                    prop_assert_eq!(s.insert(key), m.insert(key));
                }
                Op::Erase(key) => {
                    prop_assert_eq!(s.erase(&key), m.remove(&key));
                }
                Op::Find(key) => {
                    prop_assert_eq!(s.find(&key).key(), m.get(&key));
                }
                Op::LowerBound(key) => {
                    prop_assert_eq!(s.lower_bound(&key).key(), m.range(key..).next());
                }
                Op::Compact => {
                    s.compact();
                }
            }
            prop_assert_eq!(s.len(), m.len());
        }

        s.validate().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let got: Vec<u16> = s.iter().copied().collect();
        let expected: Vec<u16> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_reverse_walk_mirrors_forward(keys in prop::collection::vec(any::<u32>(), 0..=500)) {
        let t: RbSet<u32> = keys.iter().copied().collect();

        let forward: Vec<u32> = t.iter().copied().collect();
        prop_assert!(forward.windows(2).all(|w| w[0] < w[1]));

        let mut backward = Vec::with_capacity(forward.len());
        let mut c = t.end();
        loop {
            c.move_prev();
            match c.key() {
                Some(&k) => backward.push(k),
                None => break,
            }
        }
        backward.reverse();
        prop_assert_eq!(backward, forward);
    }

    #[test]
    fn prop_clone_is_independent(
        base in prop::collection::vec((0u16..512, any::<u64>()), 0..=300),
        ops in prop::collection::vec(any::<Op>(), 0..=300),
    ) {
        let original: RbTree<u16, u64> = base.into_iter().collect();
        let snapshot: Vec<(u16, u64)> = original.iter().map(|(k, v)| (*k, *v)).collect();

        let mut copy = original.clone();
        let mut model: BTreeMap<u16, u64> = snapshot.iter().copied().collect();
        for op in &ops {
            apply_map(&mut copy, &mut model, op)?;
        }

        let after: Vec<(u16, u64)> = original.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(after, snapshot);
        original.validate().map_err(|e| TestCaseError::fail(e.to_string()))?;
        copy.validate().map_err(|e| TestCaseError::fail(e.to_string()))?;
    }
}

/// Calls `f` once per ordering of `items`, generated in place by Heap's method.
fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(&[T])) {
    let mut perm = items.to_vec();
    let mut swaps = vec![0usize; perm.len()];
    f(&perm);

    let mut level = 1;
    while level < perm.len() {
        if swaps[level] < level {
            let other = if level % 2 == 0 { 0 } else { swaps[level] };
            perm.swap(other, level);
            f(&perm);
            swaps[level] += 1;
            level = 1;
        } else {
            swaps[level] = 0;
            level += 1;
        }
    }
}

#[test]
fn permutations_cover_every_ordering_once() {
    let mut seen = BTreeSet::new();
    for_each_permutation(&[1u8, 2, 3, 4], |perm| {
        assert!(seen.insert(perm.to_vec()), "repeated {perm:?}");
    });
    assert_eq!(seen.len(), 24);

    let mut calls = 0;
    let empty: [u8; 0] = [];
    for_each_permutation(&empty, |perm| {
        assert!(perm.is_empty());
        calls += 1;
    });
    assert_eq!(calls, 1);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<u32> = (1..=7).collect();

    for_each_permutation(&keys, |perm| {
        let mut t: RbTree<u32, usize> = RbTree::new();
        let mut m: BTreeMap<u32, usize> = BTreeMap::new();

        for (i, k) in perm.iter().copied().enumerate() {
            assert_eq!(t.insert(k, i), m.insert(k, i));
            t.validate()
                .unwrap_or_else(|e| panic!("order {perm:?}, after {k}: {e}"));
        }

        let got: Vec<(u32, usize)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u32, usize)> = m.into_iter().collect();
        assert_eq!(got, expected);
    });
}

#[test]
fn exhaustive_erase_order_small_set() {
    let keys: Vec<u32> = (1..=7).collect();

    // Insert in a fixed order, then erase in all permutations.
    let mut base_tree: RbTree<u32, u32> = RbTree::new();
    for &k in &[4, 2, 6, 1, 3, 5, 7] {
        base_tree.insert(k, k * 10);
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base_tree.clone();
        let mut m: BTreeMap<u32, u32> = keys.iter().map(|&k| (k, k * 10)).collect();

        for k in perm {
            assert_eq!(t.erase(k), m.remove(k));
            assert_eq!(t.len(), m.len());
            t.validate()
                .unwrap_or_else(|e| panic!("order {perm:?}, after {k}: {e}"));
            assert!(t.keys().eq(m.keys()));
        }
        assert!(t.is_empty());
        assert!(t.root.is_none());
        assert!(t.begin() == t.end());
    });
}

#[test]
fn exhaustive_erase_after_ascending_build() {
    // Ascending inserts leave a right-leaning shape with red interior nodes.
    let keys: Vec<u32> = (1..=8).collect();
    let mut base: RbSet<u32> = RbSet::new();
    for &k in &keys {
        base.insert(k);
    }

    for_each_permutation(&keys[..6], |perm| {
        let mut s = base.clone();
        for k in perm {
            assert!(s.erase(k));
            s.validate()
                .unwrap_or_else(|e| panic!("order {perm:?}, after {k}: {e}"));
        }
        assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![7, 8]);
    });
}
