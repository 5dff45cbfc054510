//! The ring: one circular doubly-linked order over shared pool nodes.
//!
//! A [`Ring`] owns no nodes. It records a head key and a length, and every
//! operation reads and writes this ring's scope entry inside the nodes it
//! touches. Entries for other rings are never modified, so a node can sit
//! in any number of rings at once.
//!
//! Every mutating operation resolves all keys and checks all
//! preconditions before its first pointer write.

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;
use skein_core::{HubId, Indices, LinkError, NodeKey, NodeName, Payload, RingError, RingId};
use skein_pool::{Links, NodePool};
use tracing::{debug, warn};

use crate::config::{CloneOptions, ExtendOptions};
use crate::iter::{Iter, RevIter, Values};
use crate::select::{normalize, Filter, Item, Position, Selector, Target};

/// Serial used in default clone ids.
static CLONE_SERIAL: AtomicU64 = AtomicU64::new(0);

/// Outcome of [`Ring::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inserted {
    /// Index the new node now occupies.
    pub index: usize,
    /// The admitted node.
    pub node: NodeKey,
    /// The node it replaced, when overwriting. It no longer carries this
    /// ring's scope entry but stays in the pool.
    pub evicted: Option<NodeKey>,
}

/// A circular doubly-linked list over nodes in a [`NodePool`].
///
/// Walking `next` from the head `len` times returns to the head, and
/// `prev` undoes `next` at every member. An empty ring has no head.
#[derive(Debug)]
pub struct Ring {
    id: RingId,
    head: Option<NodeKey>,
    len: usize,
    hub: Option<HubId>,
}

impl Ring {
    /// An empty ring.
    pub fn new(id: impl Into<RingId>) -> Self {
        Self {
            id: id.into(),
            head: None,
            len: 0,
            hub: None,
        }
    }

    /// An empty ring with an automatic id.
    pub fn anonymous() -> Self {
        Self::new(RingId::auto())
    }

    /// A ring holding `items` in order.
    ///
    /// If any item is refused, the members admitted so far are unlinked
    /// again before the error is returned.
    pub fn from_items<T>(
        pool: &mut NodePool<T>,
        id: impl Into<RingId>,
        items: impl IntoIterator<Item = Item<T>>,
    ) -> Result<Self, RingError> {
        let mut ring = Self::new(id);
        for item in items {
            if let Err(e) = ring.append(pool, item) {
                ring.clear(pool)?;
                return Err(e);
            }
        }
        Ok(ring)
    }

    /// A ring of fresh nodes wrapping `values`.
    pub fn from_values<T>(
        pool: &mut NodePool<T>,
        id: impl Into<RingId>,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Self, RingError> {
        Self::from_items(pool, id, values.into_iter().map(Item::Value))
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// This ring's identifier.
    pub fn id(&self) -> &RingId {
        &self.id
    }

    /// The first member.
    pub fn head(&self) -> Option<NodeKey> {
        self.head
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the ring has no members.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The hub this ring is subscribed to.
    pub fn hub(&self) -> Option<&HubId> {
        self.hub.as_ref()
    }

    /// Record (or clear) the hub reference, returning the previous one.
    ///
    /// Only the subscription layer should call this: the hub's subscriber
    /// list must be updated in the same step.
    pub fn set_hub(&mut self, hub: Option<HubId>) -> Option<HubId> {
        std::mem::replace(&mut self.hub, hub)
    }

    /// The last member.
    pub fn tail<T>(&self, pool: &NodePool<T>) -> Result<Option<NodeKey>, RingError> {
        match self.head {
            Some(head) => Ok(Some(pool.prev(head, &self.id)?)),
            None => Ok(None),
        }
    }

    /// Forward traversal from the head.
    pub fn iter<'a, T>(&'a self, pool: &'a NodePool<T>) -> Iter<'a, T> {
        Iter::new(pool, &self.id, self.head, self.len)
    }

    /// Backward traversal from the tail.
    pub fn iter_rev<'a, T>(&'a self, pool: &'a NodePool<T>) -> RevIter<'a, T> {
        let tail = self.head.and_then(|h| pool.prev(h, &self.id).ok());
        RevIter::new(pool, &self.id, tail, self.len)
    }

    /// Member values in traversal order.
    pub fn values<'a, T>(&'a self, pool: &'a NodePool<T>) -> Values<'a, T> {
        Values::new(self.iter(pool))
    }

    /// Snapshot of the member keys in traversal order.
    pub fn keys<T>(&self, pool: &NodePool<T>) -> Vec<NodeKey> {
        self.iter(pool).collect()
    }

    /// Whether `key` is a member.
    pub fn contains<T>(&self, pool: &NodePool<T>, key: NodeKey) -> bool {
        pool.is_linked(key, &self.id) && matches!(self.position_of(pool, key), Ok(Some(_)))
    }

    // ── Insertion ──────────────────────────────────────────────────

    /// Admit `item` at `position`.
    ///
    /// Without `overwrite` the node is spliced in before the member at
    /// `position` (`End` or `len` appends). With `overwrite` the member at
    /// `position` is replaced; `End`, `len` and `-1` all name the tail.
    /// On an empty ring only index `0` (or `End`) is in range; the node
    /// becomes the head.
    pub fn insert<T>(
        &mut self,
        pool: &mut NodePool<T>,
        item: Item<T>,
        position: Position,
        overwrite: bool,
    ) -> Result<Inserted, RingError> {
        self.check_admissible(pool, &item)?;
        let index = self.resolve_position(position)?;

        let Some(head) = self.head else {
            let key = self.admit(pool, item)?;
            self.close_on(pool, key)?;
            self.head = Some(key);
            self.len = 1;
            return Ok(Inserted {
                index: 0,
                node: key,
                evicted: None,
            });
        };

        if overwrite {
            let at = index.min(self.len - 1);
            let old = self.key_at(pool, at)?;
            let prev = pool.prev(old, &self.id)?;
            let next = pool.next(old, &self.id)?;
            let key = self.admit(pool, item)?;
            if self.len == 1 {
                self.close_on(pool, key)?;
            } else {
                self.wire(pool, prev, key, next)?;
            }
            if old == head {
                self.head = Some(key);
            }
            pool.unlink(old, &self.id)?;
            return Ok(Inserted {
                index: at,
                node: key,
                evicted: Some(old),
            });
        }

        let after = if index == self.len {
            head
        } else {
            self.key_at(pool, index)?
        };
        let before = pool.prev(after, &self.id)?;
        let key = self.admit(pool, item)?;
        self.wire(pool, before, key, after)?;
        if index == 0 {
            self.head = Some(key);
        }
        self.len += 1;
        Ok(Inserted {
            index,
            node: key,
            evicted: None,
        })
    }

    /// Add `item` after the tail.
    pub fn append<T>(&mut self, pool: &mut NodePool<T>, item: Item<T>) -> Result<Inserted, RingError> {
        self.insert(pool, item, Position::End, false)
    }

    /// Add `item` before the head; it becomes the new head.
    pub fn prepend<T>(&mut self, pool: &mut NodePool<T>, item: Item<T>) -> Result<Inserted, RingError> {
        self.insert(pool, item, Position::Index(0), false)
    }

    /// Overwrite the member at `index`. Unlike [`insert`](Self::insert),
    /// `index == len` is out of range.
    pub fn set<T>(
        &mut self,
        pool: &mut NodePool<T>,
        index: isize,
        item: Item<T>,
    ) -> Result<Inserted, RingError> {
        if index == self.len as isize {
            return Err(self.out_of_range(index));
        }
        self.insert(pool, item, Position::Index(index), true)
    }

    /// Overwrite every member picked by `selector` with `item`.
    ///
    /// Name and value selectors may match several members; each gets its
    /// own copy of a value item. A node item can only replace one member.
    pub fn replace<T: Payload>(
        &mut self,
        pool: &mut NodePool<T>,
        item: Item<T>,
        selector: Selector<T>,
    ) -> Result<Vec<Inserted>, RingError> {
        let indices: Vec<usize> = match selector {
            Selector::Position(position) => {
                return self.insert(pool, item, position, true).map(|r| vec![r]);
            }
            Selector::Name(name) => self.matched_indices(pool, &Filter::Names(vec![name]))?,
            Selector::Value(value) => self.matched_indices(pool, &Filter::Values(vec![value]))?,
            Selector::Node(key) => self.position_of(pool, key)?.into_iter().collect(),
        };
        if let Item::Node(key) = &item {
            if indices.len() > 1 {
                return Err(RingError::SharedNode {
                    node: *key,
                    ring: self.id.clone(),
                });
            }
        }
        indices
            .into_iter()
            .map(|i| self.insert(pool, item.clone(), Position::Index(i as isize), true))
            .collect()
    }

    // ── Removal ────────────────────────────────────────────────────

    /// Unlink one member and return its key.
    pub fn pop<T>(&mut self, pool: &mut NodePool<T>, target: Target) -> Result<NodeKey, RingError> {
        if self.head.is_none() {
            return Err(self.empty());
        }
        let key = match target {
            Target::Index(index) => self.node_at(pool, index)?,
            Target::Name(name) => match self.find_name(pool, &name) {
                Some(key) => key,
                None => return Err(self.not_found()),
            },
            Target::Node(key) => {
                if !self.contains(pool, key) {
                    return Err(self.not_found());
                }
                key
            }
        };
        self.detach(pool, key)?;
        Ok(key)
    }

    /// Unlink every member matching `filter`.
    ///
    /// Returns `(index, key)` pairs, indices as they were before any
    /// removal. A member matched by several filter entries is removed once.
    pub fn remove<T: PartialEq>(
        &mut self,
        pool: &mut NodePool<T>,
        filter: &Filter<T>,
    ) -> Result<Vec<(usize, NodeKey)>, RingError> {
        if matches!(filter, Filter::All) {
            return Err(RingError::InvalidArgument {
                reason: "remove needs indices, names or values; use clear to empty a ring".into(),
            });
        }
        let targets = self.get_nodes(pool, filter)?;
        for &(_, key) in &targets {
            self.detach(pool, key)?;
        }
        Ok(targets)
    }

    /// Unlink every member, head first. Returns the keys in their former
    /// order so the caller can release them.
    pub fn clear<T>(&mut self, pool: &mut NodePool<T>) -> Result<Vec<NodeKey>, RingError> {
        let mut removed = Vec::with_capacity(self.len);
        while let Some(head) = self.head {
            self.detach(pool, head)?;
            removed.push(head);
        }
        Ok(removed)
    }

    // ── Search and access ──────────────────────────────────────────

    /// The member at a signed index.
    #[doc(alias = "value_of")]
    pub fn node_at<T>(&self, pool: &NodePool<T>, index: isize) -> Result<NodeKey, RingError> {
        let i = normalize(index, self.len).ok_or_else(|| self.out_of_range(index))?;
        self.key_at(pool, i)
    }

    /// The value of the member at a signed index.
    pub fn value_at<'p, T>(&self, pool: &'p NodePool<T>, index: isize) -> Result<&'p T, RingError> {
        let key = self.node_at(pool, index)?;
        Ok(pool.value(key)?)
    }

    /// Sorted indices of every member loosely equal to `value`.
    ///
    /// Scans from both ends at once, so a match near the tail is found in
    /// as few steps as one near the head.
    pub fn index_of<T: Payload>(&self, pool: &NodePool<T>, value: &T) -> Result<Indices, RingError> {
        let mut found = Indices::new();
        let Some(head) = self.head else {
            return Ok(found);
        };
        let mut forward = head;
        let mut backward = pool.prev(head, &self.id)?;
        let mut step = 0;
        while step * 2 < self.len {
            if pool.value(backward)?.loosely_eq(value) {
                found.push(self.len - 1 - step);
            }
            if forward != backward && pool.value(forward)?.loosely_eq(value) {
                found.push(step);
            }
            forward = pool.next(forward, &self.id)?;
            backward = pool.prev(backward, &self.id)?;
            step += 1;
        }
        found.sort_unstable();
        Ok(found)
    }

    /// [`index_of`](Self::index_of) using the value held by `key`.
    pub fn index_of_node<T: Payload>(&self, pool: &NodePool<T>, key: NodeKey) -> Result<Indices, RingError> {
        let value = pool.value(key)?;
        self.index_of(pool, value)
    }

    /// `(index, key)` for every member matching `filter`, in order.
    pub fn get_nodes<T: PartialEq>(
        &self,
        pool: &NodePool<T>,
        filter: &Filter<T>,
    ) -> Result<Vec<(usize, NodeKey)>, RingError> {
        let mut matched = Vec::new();
        for (i, key) in self.iter(pool).enumerate() {
            if filter.matches(i, self.len, pool.node(key)?) {
                matched.push((i, key));
            }
        }
        Ok(matched)
    }

    /// `(index, key)` for every member.
    pub fn entries<T>(&self, pool: &NodePool<T>) -> Vec<(usize, NodeKey)> {
        self.iter(pool).enumerate().collect()
    }

    /// Overwrite the value of every member matching `filter`. Links are
    /// untouched; other rings sharing a node see the new value.
    pub fn set_values<T: Clone + PartialEq>(
        &self,
        pool: &mut NodePool<T>,
        value: T,
        filter: &Filter<T>,
    ) -> Result<Vec<(usize, NodeKey)>, RingError> {
        let matched = self.get_nodes(pool, filter)?;
        for &(_, key) in &matched {
            pool.node_mut(key)?.set_value(value.clone());
        }
        Ok(matched)
    }

    /// Same length and pairwise strictly equal values.
    ///
    /// Both rings are walked to the end even after a mismatch.
    pub fn equals<T: PartialEq>(&self, pool: &NodePool<T>, other: &Ring) -> bool {
        if self.len != other.len {
            return false;
        }
        let mut equal = true;
        for (a, b) in self.values(pool).zip(other.values(pool)) {
            equal &= a == b;
        }
        equal
    }

    // ── Restructuring ──────────────────────────────────────────────

    /// Move members `index..len` into a new ring.
    ///
    /// The moved nodes keep no entry for this ring. Index `0` (or `-len`)
    /// would move everything and is refused.
    pub fn split<T>(
        &mut self,
        pool: &mut NodePool<T>,
        index: isize,
        id: Option<RingId>,
    ) -> Result<Ring, RingError> {
        let len = self.len;
        if index == 0 || index == -(len as isize) {
            return Err(self.out_of_range(index));
        }
        let at = normalize(index, len).ok_or_else(|| self.out_of_range(index))?;
        let head = self.head.ok_or_else(|| self.empty())?;
        let id = id.unwrap_or_else(RingId::auto);
        if id == self.id {
            return Err(RingError::InvalidArgument {
                reason: format!("split of {} needs a different ring id", self.id),
            });
        }

        let start = self.key_at(pool, at)?;
        let before = pool.prev(start, &self.id)?;
        let tail = pool.prev(head, &self.id)?;
        let moved: Vec<NodeKey> = Iter::new(pool, &self.id, Some(start), len - at).collect();
        if let Some(&node) = moved.iter().find(|&&k| pool.is_linked(k, &id)) {
            return Err(RingError::SharedNode { node, ring: id });
        }

        for &key in &moved {
            pool.rescope(key, &self.id, &id)?;
        }
        pool.set_prev(start, &id, tail)?;
        pool.set_next(tail, &id, start)?;
        pool.set_next(before, &self.id, head)?;
        pool.set_prev(head, &self.id, before)?;
        self.len = at;

        debug!(ring = %self.id, split = %id, index = at, moved = moved.len(), "split ring");
        Ok(Ring {
            id,
            head: Some(start),
            len: len - at,
            hub: None,
        })
    }

    /// Splice `other`'s members after this ring's tail.
    ///
    /// With `unlink_from_other` the other ring is left empty; otherwise its
    /// members belong to both rings afterwards.
    pub fn extend<T>(
        &mut self,
        pool: &mut NodePool<T>,
        other: &mut Ring,
        options: ExtendOptions,
    ) -> Result<(), RingError> {
        if other.id == self.id {
            return Err(RingError::InvalidArgument {
                reason: format!("ring {} cannot extend itself", self.id),
            });
        }
        let self_head = self.head.ok_or_else(|| self.empty())?;
        let other_head = other.head.ok_or_else(|| other.empty())?;
        if options.check_for_shared_nodes {
            if let Some(node) = self.find_shared(pool, other) {
                warn!(ring = %self.id, other = %other.id, node = %node, "refused extend over shared node");
                return Err(RingError::SharedNode {
                    node,
                    ring: self.id.clone(),
                });
            }
        }

        let self_tail = pool.prev(self_head, &self.id)?;
        let other_tail = pool.prev(other_head, &other.id)?;
        let mut entries = Vec::with_capacity(other.len);
        for key in other.iter(pool) {
            let links = pool
                .node(key)?
                .scope(&other.id)
                .copied()
                .ok_or_else(|| LinkError::MissingScope {
                    ring: other.id.clone(),
                })?;
            entries.push((key, links));
        }

        for &(key, links) in &entries {
            pool.link_with(key, &self.id, links)?;
        }
        pool.set_prev(other_head, &self.id, self_tail)?;
        pool.set_next(other_tail, &self.id, self_head)?;
        pool.set_next(self_tail, &self.id, other_head)?;
        pool.set_prev(self_head, &self.id, other_tail)?;
        self.len += other.len;

        if options.unlink_from_other {
            for &(key, _) in &entries {
                pool.unlink(key, &other.id)?;
            }
            other.head = None;
            other.len = 0;
        }
        debug!(ring = %self.id, other = %other.id, added = entries.len(), "extended ring");
        Ok(())
    }

    /// Splice `other`'s members before this ring's head, so `other`'s head
    /// becomes the head. Same checks and options as [`extend`](Self::extend).
    pub fn extend_front<T>(
        &mut self,
        pool: &mut NodePool<T>,
        other: &mut Ring,
        options: ExtendOptions,
    ) -> Result<(), RingError> {
        let first = other.head;
        self.extend(pool, other, options)?;
        self.head = first;
        Ok(())
    }

    /// The id [`clone_ring`](Self::clone_ring) would derive next:
    /// `"{id}_clone_{n}"` with `n` drawn from a process-wide counter.
    pub fn next_clone_id(&self) -> RingId {
        let n = CLONE_SERIAL.fetch_add(1, Ordering::Relaxed);
        self.id.derive(&format!("clone_{n}"))
    }

    /// A new ring of fresh nodes carrying copies of this ring's values.
    ///
    /// Clone nodes are named `"{name}_of_{clone id}"`.
    pub fn clone_ring<T: Clone>(
        &self,
        pool: &mut NodePool<T>,
        options: CloneOptions,
    ) -> Result<Ring, RingError> {
        let id = options.id.unwrap_or_else(|| self.next_clone_id());
        if id == self.id {
            return Err(RingError::InvalidArgument {
                reason: format!("clone of {} needs a different ring id", self.id),
            });
        }
        let originals = self.keys(pool);
        if options.bind_to_original {
            if let Some(&node) = originals.iter().find(|&&k| pool.is_linked(k, &id)) {
                return Err(RingError::SharedNode { node, ring: id });
            }
        }

        let mut copies = Vec::with_capacity(originals.len());
        for &key in &originals {
            let node = pool.node(key)?;
            let value = node.value().clone();
            let name = format!("{}_of_{}", node.name(), id);
            copies.push(pool.alloc_named(value, name));
        }
        let n = copies.len();
        for (i, &key) in copies.iter().enumerate() {
            let links = Links {
                prev: Some(copies[(i + n - 1) % n]),
                next: Some(copies[(i + 1) % n]),
            };
            pool.link_with(key, &id, links)?;
        }

        if options.bind_to_original {
            for (&original, &copy) in originals.iter().zip(&copies) {
                let snapshot: Vec<(RingId, Links)> = pool
                    .node(original)?
                    .links()
                    .iter()
                    .map(|(ring, links)| (ring.clone(), *links))
                    .collect();
                for (ring, links) in snapshot {
                    pool.link_with(copy, &ring, links)?;
                }
                let mirror = pool
                    .node(copy)?
                    .scope(&id)
                    .copied()
                    .ok_or_else(|| LinkError::MissingScope { ring: id.clone() })?;
                pool.link_with(original, &id, mirror)?;
            }
        }

        debug!(ring = %self.id, clone = %id, len = n, bound = options.bind_to_original, "cloned ring");
        Ok(Ring {
            id,
            head: copies.first().copied(),
            len: n,
            hub: None,
        })
    }

    /// Reverse the traversal order in place. The old tail becomes head.
    pub fn reverse<T>(&mut self, pool: &mut NodePool<T>) -> Result<(), RingError> {
        let Some(head) = self.head else {
            return Ok(());
        };
        let tail = pool.prev(head, &self.id)?;
        for key in self.keys(pool) {
            pool.flip(key, &self.id)?;
        }
        self.head = Some(tail);
        Ok(())
    }

    /// Change this ring's id, migrating every member's scope entry.
    ///
    /// Refused while subscribed: the hub lists rings by id.
    pub fn rename<T>(&mut self, pool: &mut NodePool<T>, id: impl Into<RingId>) -> Result<(), RingError> {
        let id = id.into();
        if let Some(hub) = &self.hub {
            return Err(RingError::InvalidArgument {
                reason: format!("ring {} is subscribed to hub {hub}; unsubscribe before renaming", self.id),
            });
        }
        if id == self.id {
            return Ok(());
        }
        let keys = self.keys(pool);
        if let Some(&node) = keys.iter().find(|&&k| pool.is_linked(k, &id)) {
            return Err(RingError::SharedNode { node, ring: id });
        }
        for key in keys {
            pool.rescope(key, &self.id, &id)?;
        }
        debug!(from = %self.id, to = %id, "renamed ring");
        self.id = id;
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────

    fn empty(&self) -> RingError {
        RingError::Empty {
            ring: self.id.clone(),
        }
    }

    fn not_found(&self) -> RingError {
        RingError::NotFound {
            ring: self.id.clone(),
        }
    }

    fn out_of_range(&self, index: isize) -> RingError {
        RingError::IndexOutOfRange {
            index,
            len: self.len,
        }
    }

    /// Map an insertion position onto `0..=len`.
    fn resolve_position(&self, position: Position) -> Result<usize, RingError> {
        match position {
            Position::End => Ok(self.len),
            Position::Index(index) => {
                let len = self.len as isize;
                if index < -len || index > len {
                    Err(self.out_of_range(index))
                } else if index < 0 {
                    Ok((index + len) as usize)
                } else {
                    Ok(index as usize)
                }
            }
        }
    }

    /// Walk to `index` (which must be `< len`) from the closer end.
    fn key_at<T>(&self, pool: &NodePool<T>, index: usize) -> Result<NodeKey, RingError> {
        let mut key = self.head.ok_or_else(|| self.empty())?;
        if index <= self.len / 2 {
            for _ in 0..index {
                key = pool.next(key, &self.id)?;
            }
        } else {
            for _ in 0..self.len - index {
                key = pool.prev(key, &self.id)?;
            }
        }
        Ok(key)
    }

    /// Index of `key`, scanning from both ends.
    fn position_of<T>(&self, pool: &NodePool<T>, key: NodeKey) -> Result<Option<usize>, RingError> {
        self.scan(pool, |k, _| k == key)
            .map(|found| found.map(|(i, _)| i))
    }

    /// First member named `name` in traversal order.
    fn find_name<T>(&self, pool: &NodePool<T>, name: &NodeName) -> Option<NodeKey> {
        self.iter(pool)
            .find(|&key| pool.get(key).is_some_and(|node| node.name() == name))
    }

    fn scan<T>(
        &self,
        pool: &NodePool<T>,
        mut hit: impl FnMut(NodeKey, &NodePool<T>) -> bool,
    ) -> Result<Option<(usize, NodeKey)>, RingError> {
        let Some(head) = self.head else {
            return Ok(None);
        };
        let mut forward = head;
        let mut backward = pool.prev(head, &self.id)?;
        for step in 0..=self.len / 2 {
            if hit(forward, pool) {
                return Ok(Some((step, forward)));
            }
            if hit(backward, pool) {
                return Ok(Some((self.len - 1 - step, backward)));
            }
            forward = pool.next(forward, &self.id)?;
            backward = pool.prev(backward, &self.id)?;
        }
        Ok(None)
    }

    fn matched_indices<T: PartialEq>(
        &self,
        pool: &NodePool<T>,
        filter: &Filter<T>,
    ) -> Result<Vec<usize>, RingError> {
        Ok(self.get_nodes(pool, filter)?.into_iter().map(|(i, _)| i).collect())
    }

    /// Some member shared with `other`. Collects the shorter ring's keys
    /// and probes them with the longer one.
    fn find_shared<T>(&self, pool: &NodePool<T>, other: &Ring) -> Option<NodeKey> {
        let (short, long) = if self.len <= other.len {
            (self, other)
        } else {
            (other, self)
        };
        let seen: IndexSet<NodeKey> = short.iter(pool).collect();
        long.iter(pool).find(|k| seen.contains(k))
    }

    fn check_admissible<T>(&self, pool: &NodePool<T>, item: &Item<T>) -> Result<(), RingError> {
        if let Item::Node(key) = item {
            if pool.node(*key)?.is_linked(&self.id) {
                return Err(RingError::SharedNode {
                    node: *key,
                    ring: self.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Turn `item` into a node carrying an empty scope entry for this ring.
    fn admit<T>(&self, pool: &mut NodePool<T>, item: Item<T>) -> Result<NodeKey, RingError> {
        let key = match item {
            Item::Value(value) => pool.alloc(value),
            Item::Node(key) => key,
        };
        pool.link(key, &self.id)?;
        Ok(key)
    }

    /// Make `key` its own neighbor on both sides.
    fn close_on<T>(&self, pool: &mut NodePool<T>, key: NodeKey) -> Result<(), LinkError> {
        pool.set_next(key, &self.id, key)?;
        pool.set_prev(key, &self.id, key)
    }

    /// Place `key` between `prev` and `next`.
    fn wire<T>(&self, pool: &mut NodePool<T>, prev: NodeKey, key: NodeKey, next: NodeKey) -> Result<(), LinkError> {
        pool.set_next(prev, &self.id, key)?;
        pool.set_prev(key, &self.id, prev)?;
        pool.set_next(key, &self.id, next)?;
        pool.set_prev(next, &self.id, key)
    }

    /// Unlink a member known to be in this ring.
    fn detach<T>(&mut self, pool: &mut NodePool<T>, key: NodeKey) -> Result<(), RingError> {
        if self.len == 1 {
            self.head = None;
        } else {
            let prev = pool.prev(key, &self.id)?;
            let next = pool.next(key, &self.id)?;
            pool.set_next(prev, &self.id, next)?;
            pool.set_prev(next, &self.id, prev)?;
            if self.head == Some(key) {
                self.head = Some(next);
            }
        }
        pool.unlink(key, &self.id)?;
        self.len -= 1;
        Ok(())
    }
}
