//! Structural assertions for rings and hubs.
//!
//! These check the properties every operation must preserve, so tests can
//! call them after each step instead of re-deriving the link layout.

use indexmap::{IndexMap, IndexSet};
use skein_core::{NodeKey, RingId};
use skein_hub::{Hub, HubMember};
use skein_pool::NodePool;
use skein_ring::Ring;

/// Assert that `ring` is a well-formed circular list of `len` distinct
/// members.
///
/// Checks that the head is present exactly when the ring is non-empty,
/// that `len` forward steps return to the head, that `prev` undoes
/// `next` everywhere, and that the reverse walk mirrors the forward one.
pub fn assert_ring_invariants<T>(ring: &Ring, pool: &NodePool<T>) {
    let id = ring.id();
    let Some(head) = ring.head() else {
        assert_eq!(ring.len(), 0, "ring {id} has no head but len {}", ring.len());
        return;
    };
    assert!(ring.len() > 0, "ring {id} has a head but len 0");

    let mut seen = IndexSet::with_capacity(ring.len());
    let mut current = head;
    for step in 0..ring.len() {
        assert!(
            pool.is_linked(current, id),
            "member {current} at step {step} has no scope entry for {id}"
        );
        assert!(seen.insert(current), "member {current} visited twice in {id}");
        let next = match pool.next(current, id) {
            Ok(next) => next,
            Err(e) => panic!("member {current} of {id} has no next: {e}"),
        };
        let back = match pool.prev(next, id) {
            Ok(back) => back,
            Err(e) => panic!("member {next} of {id} has no prev: {e}"),
        };
        assert_eq!(back, current, "prev(next({current})) = {back} in {id}");
        current = next;
    }
    assert_eq!(current, head, "{} steps from head did not return to head in {id}", ring.len());

    let forward: Vec<NodeKey> = ring.iter(pool).collect();
    let mut backward: Vec<NodeKey> = ring.iter_rev(pool).collect();
    backward.reverse();
    assert_eq!(forward, backward, "reverse walk of {id} disagrees with forward walk");
    assert_eq!(forward.len(), ring.len(), "walk of {id} stopped early");
}

/// Assert that every scope entry naming one of `rings` points only at
/// members of that ring.
///
/// Nodes outside a ring may still carry its entry (bound clones do); the
/// entry must just never lead out of the ring.
pub fn assert_scope_consistent<T>(pool: &NodePool<T>, rings: &[&Ring]) {
    for ring in rings {
        let id = ring.id();
        let members: IndexSet<NodeKey> = ring.iter(pool).collect();
        for (key, node) in pool.iter() {
            let Some(links) = node.scope(id) else {
                continue;
            };
            for side in [links.prev, links.next].into_iter().flatten() {
                assert!(
                    members.contains(&side),
                    "node {key} links {side} under {id}, which is not a member"
                );
            }
        }
    }
}

/// Assert that `hub` and the rings agree on who is subscribed.
///
/// `rings` should hold every ring that might name `hub`.
pub fn assert_hub_consistent<'a, S, I>(hub: &Hub, rings: I)
where
    S: HubMember + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let by_id: IndexMap<&RingId, &S> = rings.into_iter().map(|r| (r.ring_id(), r)).collect();
    let listed: IndexSet<&RingId> = hub.subscribers().iter().collect();
    assert_eq!(listed.len(), hub.len(), "hub {} lists a ring twice", hub.id());
    for id in &listed {
        let Some(ring) = by_id.get(*id) else {
            panic!("hub {} lists unknown ring {id}", hub.id());
        };
        assert_eq!(ring.hub(), Some(hub.id()), "ring {id} does not point back at hub {}", hub.id());
    }
    for (id, ring) in &by_id {
        if ring.hub() == Some(hub.id()) {
            assert!(listed.contains(*id), "ring {id} points at hub {} but is not listed", hub.id());
        }
    }
}
