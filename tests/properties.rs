//! Property tests for register map convergence.
//!
//! Replicas replay arbitrary operation sequences; merge must behave as a
//! join: commutative and associative on observable state, idempotent on
//! full state.

use std::collections::BTreeMap;

use proptest::prelude::*;
use register_map::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Set(u8, i32),
    Remove(u8),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..4, any::<i32>()).prop_map(|(k, v)| Op::Set(k, v)),
        2 => (0u8..4).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 0..24)
}

/// Replay ops on a fresh replica. Stamps are minted deterministically:
/// strictly increasing per replica, disambiguated across replicas by the
/// node id inside the stamp.
fn replay(node: u16, ops: &[Op]) -> RegisterMap<u8, i32> {
    let mut map = RegisterMap::new(node);
    for (i, op) in ops.iter().enumerate() {
        let stamp = HybridTimestamp {
            physical: i as u64 + 1,
            logical: 0,
            node_id: node,
        };
        match op {
            Op::Set(k, v) => map.set_value_at(*k, *v, stamp),
            Op::Remove(k) => map.remove(k),
            Op::Clear => map.clear(),
        }
    }
    map
}

fn observable(map: &RegisterMap<u8, i32>) -> BTreeMap<u8, i32> {
    map.keys()
        .map(|k| (*k, *map.get_value(k).unwrap()))
        .collect()
}

proptest! {
    #[test]
    fn merge_is_commutative(ops_a in ops_strategy(), ops_b in ops_strategy()) {
        let a = replay(1, &ops_a);
        let b = replay(2, &ops_b);

        let mut ab = a.clone();
        ab.merge(&b);

        let mut ba = b.clone();
        ba.merge(&a);

        prop_assert_eq!(observable(&ab), observable(&ba));
    }

    #[test]
    fn merge_is_associative(
        ops_a in ops_strategy(),
        ops_b in ops_strategy(),
        ops_c in ops_strategy(),
    ) {
        let a = replay(1, &ops_a);
        let b = replay(2, &ops_b);
        let c = replay(3, &ops_c);

        let mut left = a.clone();
        left.merge(&b);
        left.merge(&c);

        let mut bc = b.clone();
        bc.merge(&c);
        let mut right = a.clone();
        right.merge(&bc);

        prop_assert_eq!(observable(&left), observable(&right));
    }

    #[test]
    fn merge_is_idempotent(ops_a in ops_strategy(), ops_b in ops_strategy()) {
        let mut a = replay(1, &ops_a);
        let b = replay(2, &ops_b);

        a.merge(&b);
        let snapshot = a.clone();
        a.merge(&b);

        prop_assert_eq!(a, snapshot);
    }

    #[test]
    fn full_exchange_converges(ops_a in ops_strategy(), ops_b in ops_strategy()) {
        let mut a = replay(1, &ops_a);
        let mut b = replay(2, &ops_b);

        let snapshot = a.clone();
        a.merge(&b);
        b.merge(&snapshot);

        prop_assert_eq!(observable(&a), observable(&b));
        prop_assert_eq!(a.len(), b.len());
    }

    #[test]
    fn single_replica_behaves_like_a_plain_map(ops in ops_strategy()) {
        let map = replay(1, &ops);

        let mut model = BTreeMap::new();
        for op in &ops {
            match op {
                Op::Set(k, v) => {
                    model.insert(*k, *v);
                }
                Op::Remove(k) => {
                    model.remove(k);
                }
                Op::Clear => model.clear(),
            }
        }

        prop_assert_eq!(observable(&map), model);
        prop_assert_eq!(map.len(), map.keys().count());
    }

    #[test]
    fn reads_never_create_state(ops in ops_strategy(), lookup in 0u8..8) {
        let map = replay(1, &ops);
        let snapshot = map.clone();

        let _ = map.get_value(&lookup);
        let _ = map.contains_key(&lookup);
        let _ = map.keys().count();

        prop_assert_eq!(map, snapshot);
    }
}
