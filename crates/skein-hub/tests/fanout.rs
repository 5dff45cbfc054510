//! Fan-out across heterogeneous subscribers.

use indexmap::IndexMap;
use proptest::prelude::*;
use skein_core::{ErrorKind, RingId};
use skein_hub::{ExtendMode, Hub, HubMember, Op, Outcome, Subscriber};
use skein_pool::NodePool;
use skein_ring::{ExtendOptions, Filter, Item, Ring, Target};
use skein_test_utils::{
    assert_hub_consistent, assert_ring_invariants, assert_scope_consistent, ring_of, values_of,
    FailingSubscriber, RecordingSubscriber,
};

type Boxed = Box<dyn Subscriber<i32>>;

#[test]
fn failing_subscriber_does_not_stop_the_rest() {
    let mut pool = NodePool::new();
    let mut hub = Hub::new("hub");
    let mut rings: IndexMap<RingId, Boxed> = IndexMap::new();

    let subs: Vec<Boxed> = vec![
        Box::new(ring_of(&mut pool, "a", [1, 2])),
        Box::new(FailingSubscriber::new(ring_of(&mut pool, "flaky", [7]), 1)),
        Box::new(ring_of(&mut pool, "c", [3])),
    ];
    for mut sub in subs {
        hub.subscribe(&mut sub).unwrap();
        rings.insert(sub.ring_id().clone(), sub);
    }
    assert_hub_consistent(&hub, rings.values());

    let first = hub.broadcast(&mut rings, &mut pool, &Op::Append(Item::Value(5)));
    assert!(first.values().all(Option::is_some));

    let second = hub.broadcast(&mut rings, &mut pool, &Op::Prepend(Item::Value(0)));
    assert!(second[&RingId::named("a")].is_some());
    assert!(second[&RingId::named("flaky")].is_none());
    assert!(second[&RingId::named("c")].is_some());

    let out = hub.broadcast(&mut rings, &mut pool, &Op::GetNodes(Filter::All));
    let lens: Vec<usize> = out
        .values()
        .map(|o| match o {
            Some(Outcome::Nodes(nodes)) => nodes.len(),
            _ => usize::MAX,
        })
        .collect();
    assert_eq!(lens, [4, usize::MAX, 3]);
}

#[test]
fn every_subscriber_sees_ops_in_order() {
    let mut pool = NodePool::new();
    let mut hub = Hub::new("hub");
    let mut a = RecordingSubscriber::new(ring_of(&mut pool, "a", [1, 2, 3]));
    let mut b = RecordingSubscriber::new(ring_of(&mut pool, "b", [4, 5, 6]));
    hub.subscribe(&mut a).unwrap();
    hub.subscribe(&mut b).unwrap();

    let mut rings = IndexMap::new();
    rings.insert(RingId::named("a"), a);
    rings.insert(RingId::named("b"), b);

    for op in [Op::Reverse, Op::Pop(Target::Index(0)), Op::IsEmpty] {
        hub.broadcast(&mut rings, &mut pool, &op);
    }
    for sub in rings.values() {
        assert_eq!(sub.seen, ["reverse", "pop", "is_empty"]);
        assert_ring_invariants(&sub.ring, &pool);
    }
    assert_eq!(values_of(&rings[0].ring, &pool), [2, 1]);
    assert_eq!(values_of(&rings[1].ring, &pool), [5, 4]);
}

#[test]
fn shared_node_broadcast_links_one_node_everywhere() {
    let mut pool = NodePool::new();
    let mut hub = Hub::new("hub");
    let mut rings = IndexMap::new();
    for id in ["a", "b", "c"] {
        let mut ring = ring_of(&mut pool, id, [0]);
        hub.subscribe(&mut ring).unwrap();
        rings.insert(ring.id().clone(), ring);
    }
    let shared = pool.alloc(42);
    let out = hub.broadcast(&mut rings, &mut pool, &Op::Append(Item::Node(shared)));
    assert!(out.values().all(Option::is_some));
    assert_eq!(pool.node(shared).unwrap().ring_count(), 3);

    // Reversing one ring leaves the others' order alone.
    rings[0].reverse(&mut pool).unwrap();
    assert_eq!(values_of(&rings[0], &pool), [42, 0]);
    assert_eq!(values_of(&rings[1], &pool), [0, 42]);
    let all: Vec<&Ring> = rings.values().collect();
    for ring in &all {
        assert_ring_invariants(ring, &pool);
    }
    assert_scope_consistent(&pool, &all);
}

#[test]
fn broadcast_split_and_clone_produce_rings() {
    let mut pool = NodePool::new();
    let mut hub = Hub::new("hub");
    let mut rings = IndexMap::new();
    for (id, values) in [("a", vec![1, 2, 3]), ("b", vec![4, 5])] {
        let mut ring = ring_of(&mut pool, id, values);
        hub.subscribe(&mut ring).unwrap();
        rings.insert(ring.id().clone(), ring);
    }

    let out = hub.broadcast(&mut rings, &mut pool, &Op::Split(1));
    let produced: Vec<Ring> = out.into_values().flatten().filter_map(Outcome::into_ring).collect();
    let ids: Vec<String> = produced.iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, ["a_split", "b_split"]);
    assert_eq!(values_of(&produced[0], &pool), [2, 3]);
    assert!(produced.iter().all(|r| r.hub().is_none()));

    let out = hub.broadcast(&mut rings, &mut pool, &Op::Clone { bind_to_original: false });
    for (id, outcome) in out {
        let clone = outcome.and_then(Outcome::into_ring).unwrap();
        assert!(clone.equals(&pool, &rings[&id]));
        assert_ne!(clone.id(), &id);
    }
}

#[test]
fn hub_extend_reports_per_subscriber() {
    let mut pool = NodePool::new();
    let mut hub = Hub::new("hub");
    let mut rings = IndexMap::new();
    for (id, values) in [("src", vec![1, 2]), ("x", vec![9]), ("y", vec![])] {
        let mut ring = ring_of(&mut pool, id, values);
        hub.subscribe(&mut ring).unwrap();
        rings.insert(ring.id().clone(), ring);
    }
    let out = hub
        .extend(
            &mut rings,
            &mut pool,
            &RingId::named("src"),
            ExtendMode::AppendSelf,
            ExtendOptions {
                unlink_from_other: false,
                check_for_shared_nodes: true,
            },
        )
        .unwrap();
    assert!(!out.contains_key(&RingId::named("src")));
    assert!(matches!(out[&RingId::named("x")], Some(Outcome::Done)));
    assert!(out[&RingId::named("y")].is_none());
    assert_eq!(values_of(&rings[&RingId::named("x")], &pool), [9, 1, 2]);
    assert_eq!(values_of(&rings[&RingId::named("src")], &pool), [1, 2]);
    assert_hub_consistent(&hub, rings.values());

    // Extending again would share nodes with x.
    let out = hub
        .extend(&mut rings, &mut pool, &RingId::named("src"), ExtendMode::AppendSelf, ExtendOptions::default())
        .unwrap();
    assert!(out[&RingId::named("x")].is_none());
    assert_eq!(values_of(&rings[&RingId::named("x")], &pool), [9, 1, 2]);
}

#[test]
fn unknown_listed_ring_reports_none() {
    let mut pool = NodePool::<i32>::new();
    let mut hub = Hub::new("hub");
    let mut ring = Ring::new("gone");
    hub.subscribe(&mut ring).unwrap();
    let mut rings: IndexMap<RingId, Ring> = IndexMap::new();
    let out = hub.broadcast(&mut rings, &mut pool, &Op::IsEmpty);
    assert!(out[&RingId::named("gone")].is_none());

    let err = hub
        .extend(&mut rings, &mut pool, &RingId::named("gone"), ExtendMode::FuseAll, ExtendOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[derive(Clone, Debug)]
enum Step {
    AppendShared(i32),
    Pop(isize),
    Reverse,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => any::<i32>().prop_map(Step::AppendShared),
        2 => (-4isize..4).prop_map(Step::Pop),
        1 => Just(Step::Reverse),
    ]
}

proptest! {
    #[test]
    fn broadcast_keeps_every_ring_consistent(steps in proptest::collection::vec(step(), 0..40)) {
        let mut pool = NodePool::new();
        let mut hub = Hub::new("hub");
        let mut rings = IndexMap::new();
        for (id, values) in [("a", vec![1, 2]), ("b", vec![]), ("c", vec![3])] {
            let mut ring = ring_of(&mut pool, id, values);
            hub.subscribe(&mut ring).unwrap();
            rings.insert(ring.id().clone(), ring);
        }

        for step in steps {
            let op = match step {
                Step::AppendShared(v) => Op::Append(Item::Node(pool.alloc(v))),
                Step::Pop(i) => Op::Pop(Target::Index(i)),
                Step::Reverse => Op::Reverse,
            };
            let out = hub.broadcast(&mut rings, &mut pool, &op);
            prop_assert_eq!(out.len(), 3);
            let all: Vec<&Ring> = rings.values().collect();
            for ring in &all {
                assert_ring_invariants(ring, &pool);
            }
            assert_scope_consistent(&pool, &all);
        }
        assert_hub_consistent(&hub, rings.values());
    }
}
