//! Generational node arena.
//!
//! [`NodePool`] owns every node. Rings and hubs only hold [`NodeKey`]s, so
//! circular links never form ownership cycles. Released slots go onto a
//! free list and have their generation bumped before reuse, which makes
//! stale keys fail lookups instead of aliasing a newer node.

use skein_core::{LinkError, NodeKey, NodeName, RingId};

use crate::config::PoolConfig;
use crate::node::{Direction, Links, Node};

/// A single arena slot.
#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Arena of nodes addressed by generational keys.
///
/// Scoped helpers ([`next`](Self::next), [`set_neighbor`](Self::set_neighbor),
/// [`link`](Self::link), …) read and write one ring's entry of one node per
/// call, exactly like the [`Node`] methods they wrap, but resolve the key
/// first and validate any key being stored.
#[derive(Clone, Debug)]
pub struct NodePool<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    live: usize,
}

impl<T> NodePool<T> {
    /// Create an empty pool with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&PoolConfig::default())
    }

    /// Create an empty pool sized from `config`.
    pub fn with_config(config: &PoolConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.initial_capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Store a node, returning its key.
    pub fn insert(&mut self, node: Node<T>) -> NodeKey {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeKey::new(index, slot.generation);
        }
        debug_assert!(self.slots.len() < u32::MAX as usize, "node pool exhausted");
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeKey::new(index, 0)
    }

    /// Wrap `value` in a fresh, unlinked node.
    pub fn alloc(&mut self, value: T) -> NodeKey {
        self.insert(Node::new(value))
    }

    /// Wrap `value` in a fresh, unlinked node with a chosen name.
    pub fn alloc_named(&mut self, value: T, name: impl Into<NodeName>) -> NodeKey {
        self.insert(Node::named(value, name))
    }

    /// Look up a live node.
    pub fn get(&self, key: NodeKey) -> Option<&Node<T>> {
        let slot = self.slots.get(key.index() as usize)?;
        if slot.generation != key.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    /// Look up a live node mutably.
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node<T>> {
        let slot = self.slots.get_mut(key.index() as usize)?;
        if slot.generation != key.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    /// Like [`get`](Self::get), but a stale key is an error.
    pub fn node(&self, key: NodeKey) -> Result<&Node<T>, LinkError> {
        self.get(key).ok_or(LinkError::StaleNode { key })
    }

    /// Like [`get_mut`](Self::get_mut), but a stale key is an error.
    pub fn node_mut(&mut self, key: NodeKey) -> Result<&mut Node<T>, LinkError> {
        self.get_mut(key).ok_or(LinkError::StaleNode { key })
    }

    /// The payload of a live node.
    pub fn value(&self, key: NodeKey) -> Result<&T, LinkError> {
        self.node(key).map(Node::value)
    }

    /// Whether `key` names a live node.
    pub fn contains(&self, key: NodeKey) -> bool {
        self.get(key).is_some()
    }

    /// Remove a node from the pool, returning it.
    ///
    /// Refused while any ring still links the node: releasing it would
    /// leave that ring pointing at a dead slot.
    pub fn release(&mut self, key: NodeKey) -> Result<Node<T>, LinkError> {
        let rings = self.node(key)?.ring_count();
        if rings > 0 {
            return Err(LinkError::StillLinked { key, rings });
        }
        let slot = &mut self.slots[key.index() as usize];
        let node = slot.node.take().ok_or(LinkError::StaleNode { key })?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(key.index());
        self.live -= 1;
        Ok(node)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the pool holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total slots (live + free).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node<T>)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.node
                .as_ref()
                .map(|node| (NodeKey::new(i as u32, slot.generation), node))
        })
    }

    // ── Scoped link access ─────────────────────────────────────────

    /// Register an empty entry for `ring` on `key`. Idempotent.
    pub fn link(&mut self, key: NodeKey, ring: &RingId) -> Result<(), LinkError> {
        self.node_mut(key)?.link(ring);
        Ok(())
    }

    /// Install a complete entry for `ring` on `key`.
    pub fn link_with(&mut self, key: NodeKey, ring: &RingId, links: Links) -> Result<(), LinkError> {
        for neighbor in [links.prev, links.next].into_iter().flatten() {
            if !self.contains(neighbor) {
                return Err(LinkError::StaleNode { key: neighbor });
            }
        }
        self.node_mut(key)?.link_with(ring, links);
        Ok(())
    }

    /// Drop the entry for `ring` on `key`.
    pub fn unlink(&mut self, key: NodeKey, ring: &RingId) -> Result<Links, LinkError> {
        self.node_mut(key)?.unlink(ring)
    }

    /// Whether `key` is live and belongs to `ring`.
    pub fn is_linked(&self, key: NodeKey, ring: &RingId) -> bool {
        self.get(key).is_some_and(|n| n.is_linked(ring))
    }

    /// Read one side of the entry for `ring` on `key`.
    pub fn neighbor(
        &self,
        key: NodeKey,
        ring: &RingId,
        direction: Direction,
    ) -> Result<Option<NodeKey>, LinkError> {
        self.node(key)?.neighbor(ring, direction)
    }

    /// Write one side of the entry for `ring` on `key`.
    ///
    /// `target` must be `None` or a live node; anything else fails with
    /// [`LinkError::StaleNode`] and leaves the entry unchanged.
    pub fn set_neighbor(
        &mut self,
        key: NodeKey,
        ring: &RingId,
        direction: Direction,
        target: Option<NodeKey>,
    ) -> Result<(), LinkError> {
        if let Some(t) = target {
            if !self.contains(t) {
                return Err(LinkError::StaleNode { key: t });
            }
        }
        self.node_mut(key)?.set_neighbor(ring, direction, target)
    }

    /// Follow one side of a complete entry.
    ///
    /// Fails with [`LinkError::Dangling`] when that side was never set.
    pub fn step(&self, key: NodeKey, ring: &RingId, direction: Direction) -> Result<NodeKey, LinkError> {
        self.neighbor(key, ring, direction)?
            .ok_or_else(|| LinkError::Dangling { ring: ring.clone() })
    }

    /// Successor of `key` in `ring`.
    pub fn next(&self, key: NodeKey, ring: &RingId) -> Result<NodeKey, LinkError> {
        self.step(key, ring, Direction::Next)
    }

    /// Predecessor of `key` in `ring`.
    pub fn prev(&self, key: NodeKey, ring: &RingId) -> Result<NodeKey, LinkError> {
        self.step(key, ring, Direction::Prev)
    }

    /// Point `key`'s successor in `ring` at `target`.
    pub fn set_next(&mut self, key: NodeKey, ring: &RingId, target: NodeKey) -> Result<(), LinkError> {
        self.set_neighbor(key, ring, Direction::Next, Some(target))
    }

    /// Point `key`'s predecessor in `ring` at `target`.
    pub fn set_prev(&mut self, key: NodeKey, ring: &RingId, target: NodeKey) -> Result<(), LinkError> {
        self.set_neighbor(key, ring, Direction::Prev, Some(target))
    }

    /// Swap `prev` and `next` of the entry for `ring` on `key`.
    pub fn flip(&mut self, key: NodeKey, ring: &RingId) -> Result<(), LinkError> {
        self.node_mut(key)?.flip(ring)
    }

    /// Move `key`'s entry for `from` under `to`.
    pub fn rescope(&mut self, key: NodeKey, from: &RingId, to: &RingId) -> Result<(), LinkError> {
        self.node_mut(key)?.rescope(from, to)
    }
}

impl<T> Default for NodePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn alloc_and_get() {
        let mut pool = NodePool::new();
        let a = pool.alloc(1);
        let b = pool.alloc_named(2, "two");
        assert_eq!(pool.len(), 2);
        assert_eq!(*pool.value(a).unwrap(), 1);
        assert_eq!(pool.node(b).unwrap().name().to_string(), "two");
    }

    #[test]
    fn released_key_goes_stale() {
        let mut pool = NodePool::new();
        let a = pool.alloc("a");
        let node = pool.release(a).unwrap();
        assert_eq!(node.into_value(), "a");
        assert!(!pool.contains(a));
        assert_eq!(pool.node(a).unwrap_err(), LinkError::StaleNode { key: a });

        // Slot is reused under a new generation.
        let b = pool.alloc("b");
        assert_eq!(b.index(), a.index());
        assert_ne!(b.generation(), a.generation());
        assert!(pool.get(a).is_none());
        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn release_refused_while_linked() {
        let mut pool = NodePool::new();
        let ring = RingId::named("r");
        let a = pool.alloc(0);
        pool.link(a, &ring).unwrap();
        assert_eq!(
            pool.release(a).unwrap_err(),
            LinkError::StillLinked { key: a, rings: 1 }
        );
        pool.unlink(a, &ring).unwrap();
        assert!(pool.release(a).is_ok());
    }

    #[test]
    fn set_neighbor_rejects_dead_target() {
        let mut pool = NodePool::new();
        let ring = RingId::named("r");
        let a = pool.alloc(0);
        let b = pool.alloc(1);
        pool.release(b).unwrap();
        pool.link(a, &ring).unwrap();
        let err = pool
            .set_neighbor(a, &ring, Direction::Next, Some(b))
            .unwrap_err();
        assert_eq!(err, LinkError::StaleNode { key: b });
        assert_eq!(pool.neighbor(a, &ring, Direction::Next).unwrap(), None);
    }

    #[test]
    fn step_reports_dangling_side() {
        let mut pool = NodePool::new();
        let ring = RingId::named("r");
        let a = pool.alloc(0);
        pool.link(a, &ring).unwrap();
        assert_eq!(
            pool.next(a, &ring).unwrap_err(),
            LinkError::Dangling { ring: ring.clone() }
        );
        pool.set_next(a, &ring, a).unwrap();
        assert_eq!(pool.next(a, &ring).unwrap(), a);
    }

    #[test]
    fn iter_skips_released_slots() {
        let mut pool = NodePool::new();
        let keys: Vec<_> = (0..4).map(|v| pool.alloc(v)).collect();
        pool.release(keys[1]).unwrap();
        let seen: Vec<_> = pool.iter().map(|(_, n)| *n.value()).collect();
        assert_eq!(seen, [0, 2, 3]);
    }

    proptest! {
        #[test]
        fn live_count_tracks_alloc_and_release(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut pool = NodePool::new();
            let mut live = Vec::new();
            for alloc in ops {
                if alloc || live.is_empty() {
                    live.push(pool.alloc(0u8));
                } else {
                    let key = live.swap_remove(0);
                    pool.release(key).unwrap();
                }
                prop_assert_eq!(pool.len(), live.len());
            }
            for key in &live {
                prop_assert!(pool.contains(*key));
            }
        }
    }
}
