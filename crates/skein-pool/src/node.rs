//! Nodes and their per-ring link tables.
//!
//! A [`Node`] holds one value and a table mapping each ring it belongs to
//! onto a [`Links`] pair. Node methods touch at most one ring's entry per
//! call; keeping the ring as a whole consistent is the ring's job.

use indexmap::IndexMap;
use skein_core::{LinkError, NodeKey, NodeName, RingId};

/// Which side of a scope entry to read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the head (the predecessor).
    Prev,
    /// Away from the head (the successor).
    Next,
}

impl Direction {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Prev => Self::Next,
            Self::Next => Self::Prev,
        }
    }
}

/// One ring's neighbor pair inside a node.
///
/// Both sides start unset when a node is first linked; a ring fills them
/// before the operation that linked the node returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Links {
    /// Predecessor in the ring.
    pub prev: Option<NodeKey>,
    /// Successor in the ring.
    pub next: Option<NodeKey>,
}

impl Links {
    /// Read one side.
    pub fn get(&self, direction: Direction) -> Option<NodeKey> {
        match direction {
            Direction::Prev => self.prev,
            Direction::Next => self.next,
        }
    }

    /// Write one side.
    pub fn set(&mut self, direction: Direction, key: Option<NodeKey>) {
        match direction {
            Direction::Prev => self.prev = key,
            Direction::Next => self.next = key,
        }
    }

    /// Exchange `prev` and `next`.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.prev, &mut self.next);
    }
}

/// A value plus the link table of every ring it belongs to.
#[derive(Clone, Debug)]
pub struct Node<T> {
    value: T,
    name: NodeName,
    links: IndexMap<RingId, Links>,
}

impl<T> Node<T> {
    /// A node with an auto-allocated name and no ring memberships.
    pub fn new(value: T) -> Self {
        Self::named(value, NodeName::auto())
    }

    /// A node with a caller-chosen name.
    pub fn named(value: T, name: impl Into<NodeName>) -> Self {
        Self {
            value,
            name: name.into(),
            links: IndexMap::new(),
        }
    }

    /// The payload.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mutable access to the payload. Does not touch any link.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Replace the payload, returning the old one.
    pub fn set_value(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }

    /// Consume the node, returning its payload.
    pub fn into_value(self) -> T {
        self.value
    }

    /// The node's identity.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// Change the node's identity.
    pub fn rename(&mut self, name: impl Into<NodeName>) {
        self.name = name.into();
    }

    /// The whole link table, in the order rings first linked this node.
    pub fn links(&self) -> &IndexMap<RingId, Links> {
        &self.links
    }

    /// The entry for one ring, if the node belongs to it.
    pub fn scope(&self, ring: &RingId) -> Option<&Links> {
        self.links.get(ring)
    }

    /// Whether the node belongs to `ring`.
    pub fn is_linked(&self, ring: &RingId) -> bool {
        self.links.contains_key(ring)
    }

    /// Number of rings this node belongs to.
    pub fn ring_count(&self) -> usize {
        self.links.len()
    }

    /// Register an empty entry for `ring`. Idempotent: an existing entry
    /// is left untouched.
    pub fn link(&mut self, ring: &RingId) {
        if !self.links.contains_key(ring) {
            self.links.insert(ring.clone(), Links::default());
        }
    }

    /// Install a complete entry for `ring`, replacing any existing one.
    pub fn link_with(&mut self, ring: &RingId, links: Links) {
        self.links.insert(ring.clone(), links);
    }

    /// Read one side of the entry for `ring`.
    pub fn neighbor(
        &self,
        ring: &RingId,
        direction: Direction,
    ) -> Result<Option<NodeKey>, LinkError> {
        self.links
            .get(ring)
            .map(|l| l.get(direction))
            .ok_or_else(|| LinkError::MissingScope { ring: ring.clone() })
    }

    /// Write one side of the entry for `ring`.
    ///
    /// The key is not validated here; [`NodePool::set_neighbor`](crate::NodePool::set_neighbor)
    /// checks it resolves to a live node.
    pub fn set_neighbor(
        &mut self,
        ring: &RingId,
        direction: Direction,
        key: Option<NodeKey>,
    ) -> Result<(), LinkError> {
        let links = self
            .links
            .get_mut(ring)
            .ok_or_else(|| LinkError::MissingScope { ring: ring.clone() })?;
        links.set(direction, key);
        Ok(())
    }

    /// Drop the entry for `ring`, returning it.
    pub fn unlink(&mut self, ring: &RingId) -> Result<Links, LinkError> {
        self.links
            .shift_remove(ring)
            .ok_or_else(|| LinkError::MissingScope { ring: ring.clone() })
    }

    /// Swap `prev` and `next` of the entry for `ring`.
    pub fn flip(&mut self, ring: &RingId) -> Result<(), LinkError> {
        let links = self
            .links
            .get_mut(ring)
            .ok_or_else(|| LinkError::MissingScope { ring: ring.clone() })?;
        links.swap();
        Ok(())
    }

    /// Move the entry for `from` under the key `to`, keeping its position
    /// in the table.
    pub fn rescope(&mut self, from: &RingId, to: &RingId) -> Result<(), LinkError> {
        let index = self
            .links
            .get_index_of(from)
            .ok_or_else(|| LinkError::MissingScope { ring: from.clone() })?;
        let links = self.links[index];
        self.links.shift_remove_index(index);
        self.links.shift_insert(index, to.clone(), links);
        Ok(())
    }
}
