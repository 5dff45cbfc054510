//! End-to-end scenarios through the facade.

use proptest::prelude::*;
use skein::prelude::*;
use skein_test_utils::{assert_hub_consistent, assert_ring_invariants, assert_scope_consistent};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn vals<T: Clone>(weave: &Weave<T>, id: &RingId) -> Vec<T> {
    weave.values(id).unwrap().cloned().collect()
}

fn check<T>(weave: &Weave<T>) {
    let rings: Vec<&Ring> = weave.rings().collect();
    for ring in &rings {
        assert_ring_invariants(ring, weave.pool());
    }
    assert_scope_consistent(weave.pool(), &rings);
}

fn hubbed(values: &[(&str, Vec<i32>)]) -> (Weave<i32>, HubId) {
    let mut weave = Weave::new();
    let hub = weave.create_hub(HubConfig::named("hub")).unwrap();
    for (id, vs) in values {
        weave
            .create_ring_from_values(RingConfig::named(*id).with_hub(hub.clone()), vs.clone())
            .unwrap();
    }
    (weave, hub)
}

#[test]
fn split_after_first_member() {
    let mut weave = Weave::new();
    let r = weave.create_ring_from_values(RingConfig::named("r"), [10, 20, 30]).unwrap();
    let tail = weave.split(&r, 1, None).unwrap();
    assert_eq!(vals(&weave, &r), [10]);
    assert_eq!(vals(&weave, &tail), [20, 30]);
    check(&weave);
}

#[test]
fn overwrite_last_of_single_member_ring() {
    let mut weave = Weave::new();
    let r = weave
        .create_ring_from_values(RingConfig::named("r"), ["A".to_string()])
        .unwrap();
    let out = weave
        .edit_ring(&r, |ring, pool| {
            ring.insert(pool, Item::Value("B".to_string()), Position::Index(-1), true)
        })
        .unwrap();
    let ring = weave.ring(&r).unwrap();
    assert_eq!(ring.len(), 1);
    assert_eq!(ring.head(), Some(out.node));
    assert!(out.evicted.is_some());
    assert_eq!(vals(&weave, &r), ["B"]);
    check(&weave);
}

#[test]
fn linked_append_reaches_every_subscriber() {
    init_tracing();
    let (mut weave, hub) = hubbed(&[("l1", vec![1, 2, 3]), ("l2", vec![9])]);
    let l1 = RingId::named("l1");
    let out = weave.linked_append(&l1, Item::Value(99)).unwrap();
    assert!(out.values().all(Option::is_some));
    assert_eq!(vals(&weave, &l1), [1, 2, 3, 99]);
    assert_eq!(vals(&weave, &RingId::named("l2")), [9, 99]);
    assert_hub_consistent(weave.hub(&hub).unwrap(), weave.rings());
    check(&weave);
}

#[test]
fn shared_node_extend_is_refused_cleanly() {
    init_tracing();
    let mut weave = Weave::new();
    let a = weave.create_ring_from_values(RingConfig::named("a"), [1, 2]).unwrap();
    let b = weave.create_ring_from_values(RingConfig::named("b"), [3]).unwrap();
    let shared = weave.ring(&a).unwrap().head().unwrap();
    weave
        .edit_ring(&b, |ring, pool| ring.append(pool, Item::Node(shared)))
        .unwrap();

    let err = weave.extend(&a, &b, ExtendOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SharedNode);
    assert_eq!(vals(&weave, &a), [1, 2]);
    assert_eq!(vals(&weave, &b), [3, 1]);
    check(&weave);
}

#[test]
fn empty_pop_and_zero_split() {
    let mut weave = Weave::<i32>::new();
    let e = weave.create_ring(RingConfig::named("e"), []).unwrap();
    let err = weave
        .edit_ring(&e, |ring, pool| ring.pop(pool, Target::Index(0)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Empty);

    let r = weave.create_ring_from_values(RingConfig::named("r"), [1, 2]).unwrap();
    let err = weave.split(&r, 0, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
    assert_eq!(vals(&weave, &r), [1, 2]);
}

#[test]
fn linked_split_registers_pieces() {
    let (mut weave, hub) = hubbed(&[("a", vec![1, 2, 3, 4]), ("b", vec![4, 5, 6]), ("c", vec![6])]);
    let out = weave.linked_split(&RingId::named("b"), 2).unwrap();
    assert!(matches!(&out[&RingId::named("a")], Some(Outcome::Spawned(id)) if id == &RingId::named("a_split")));
    assert!(matches!(&out[&RingId::named("b")], Some(Outcome::Spawned(_))));
    // Index 2 is past the end of a single-member ring.
    assert!(out[&RingId::named("c")].is_none());

    assert_eq!(vals(&weave, &RingId::named("a")), [1, 2]);
    assert_eq!(vals(&weave, &RingId::named("a_split")), [3, 4]);
    assert_eq!(vals(&weave, &RingId::named("b_split")), [6]);
    assert!(weave.ring(&RingId::named("a_split")).unwrap().hub().is_none());
    assert_eq!(weave.hub(&hub).unwrap().len(), 3);

    // A second linked split collides with the first pieces and is renamed.
    let out = weave.linked_split(&RingId::named("a"), 1).unwrap();
    let Some(Outcome::Spawned(renamed)) = &out[&RingId::named("a")] else {
        panic!("expected a spawned ring");
    };
    assert_eq!(renamed, &RingId::named("a_split_1"));
    assert_eq!(vals(&weave, renamed), [2]);
    assert_eq!(vals(&weave, &RingId::named("b_split_1")), [5]);
    assert_hub_consistent(weave.hub(&hub).unwrap(), weave.rings());
    check(&weave);
}

#[test]
fn linked_queries_report_per_ring() {
    let (mut weave, _) = hubbed(&[("a", vec![1, 2, 1]), ("b", vec![]), ("c", vec![1])]);
    let a = RingId::named("a");

    let out = weave.linked_index_of(&a, 1).unwrap();
    let found: Vec<Vec<usize>> = out
        .values()
        .map(|o| match o {
            Some(Outcome::Indices(ix)) => ix.to_vec(),
            _ => vec![usize::MAX],
        })
        .collect();
    assert_eq!(found, [vec![0, 2], vec![], vec![0]]);

    let out = weave.linked_is_empty(&a).unwrap();
    let empties: Vec<bool> = out
        .values()
        .map(|o| matches!(o, Some(Outcome::IsEmpty(true))))
        .collect();
    assert_eq!(empties, [false, true, false]);

    let out = weave.linked_value_of(&a, -1).unwrap();
    assert!(out[&RingId::named("a")].is_some());
    assert!(out[&RingId::named("b")].is_none());

    let out = weave.linked_get_head(&a).unwrap();
    assert!(matches!(out[&RingId::named("b")], Some(Outcome::Head(None))));
}

#[test]
fn linked_edits_mirror_structure() {
    let (mut weave, _) = hubbed(&[("a", vec![1, 2, 3]), ("b", vec![3, 4])]);
    let a = RingId::named("a");
    let b = RingId::named("b");

    weave.linked_prepend(&a, Item::Value(0)).unwrap();
    weave.linked_insert(&a, Item::Value(7), Position::Index(1), false).unwrap();
    assert_eq!(vals(&weave, &a), [0, 7, 1, 2, 3]);
    assert_eq!(vals(&weave, &b), [0, 7, 3, 4]);

    weave.linked_remove(&a, Filter::Values(vec![7])).unwrap();
    weave.linked_replace(&a, Item::Value(30), Selector::Value(3)).unwrap();
    assert_eq!(vals(&weave, &a), [0, 1, 2, 30]);
    assert_eq!(vals(&weave, &b), [0, 30, 4]);

    weave.linked_set_values(&a, 5, Filter::Indices(vec![0])).unwrap();
    weave.linked_reverse(&a).unwrap();
    assert_eq!(vals(&weave, &a), [30, 2, 1, 5]);
    assert_eq!(vals(&weave, &b), [4, 30, 5]);

    let out = weave.linked_pop(&a, Target::Index(-1)).unwrap();
    assert!(out.values().all(Option::is_some));
    let out = weave.linked_get_nodes(&a, Filter::All).unwrap();
    assert!(matches!(&out[&b], Some(Outcome::Nodes(nodes)) if nodes.len() == 2));
    check(&weave);

    let out = weave.linked_clear(&a).unwrap();
    assert!(matches!(&out[&a], Some(Outcome::Cleared(keys)) if keys.len() == 3));
    assert!(weave.ring(&a).unwrap().is_empty());
    assert!(weave.ring(&b).unwrap().is_empty());
}

#[test]
fn linked_clone_and_extend() {
    let (mut weave, hub) = hubbed(&[("a", vec![1, 2]), ("b", vec![3])]);
    let a = RingId::named("a");

    let out = weave.linked_clone(&a, true).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(weave.rings().count(), 4);

    let out = weave
        .linked_extend(&a, ExtendMode::PrependSelf, ExtendOptions::default())
        .unwrap();
    assert!(out[&RingId::named("b")].is_some());
    assert_eq!(vals(&weave, &RingId::named("b")), [1, 2, 3]);
    assert!(weave.ring(&a).unwrap().is_empty());
    assert_eq!(weave.hub(&hub).unwrap().subscribers(), [a.clone(), RingId::named("b")]);

    weave.unsubscribe(&a).unwrap();
    let err = weave.linked_reverse(&a).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotSubscribed);
    let listed = weave.unsubscribe_all(&hub).unwrap();
    assert_eq!(listed, [RingId::named("b")]);
}

#[test]
fn loose_equality_with_value_payloads() {
    let mut weave = Weave::new();
    let r = weave
        .create_ring_from_values(
            RingConfig::named("mixed"),
            [Value::Int(1), Value::Float(1.0), Value::Bool(true), Value::Text("1".into())],
        )
        .unwrap();
    let ring = weave.ring(&r).unwrap();
    let loose = ring.index_of(weave.pool(), &Value::Int(1)).unwrap();
    assert_eq!(loose.to_vec(), [0, 1, 2]);
    let strict = ring.get_nodes(weave.pool(), &Filter::Values(vec![Value::Int(1)])).unwrap();
    assert_eq!(strict.len(), 1);
}

proptest! {
    #[test]
    fn repeated_splits_register_unique_rings(cuts in proptest::collection::vec(1isize..4, 1..6)) {
        let mut weave = Weave::new();
        let r = weave.create_ring_from_values(RingConfig::named("r"), 0..32).unwrap();
        let mut made = Vec::new();
        for cut in cuts {
            if let Ok(id) = weave.split(&r, cut, None) {
                prop_assert!(!made.contains(&id));
                made.push(id);
            }
        }
        let total: usize = weave.rings().map(Ring::len).sum();
        prop_assert_eq!(total, 32);
        prop_assert_eq!(weave.rings().count(), made.len() + 1);
        check(&weave);
    }
}
