//! The closed set of operations a hub can mirror, and their results.

use skein_core::{Indices, NodeKey, RingId};
use skein_ring::{Filter, Inserted, Item, Position, Ring, Selector, Target};

/// One ring operation, applied identically to every subscriber.
///
/// Value items are copied per subscriber, so each ring gets its own node.
/// Node items are shared: every subscriber links the same node.
#[derive(Clone, Debug, PartialEq)]
pub enum Op<T> {
    /// [`Ring::append`].
    Append(Item<T>),
    /// [`Ring::prepend`].
    Prepend(Item<T>),
    /// [`Ring::insert`].
    Insert {
        /// What to admit.
        item: Item<T>,
        /// Where.
        position: Position,
        /// Replace the member at `position` instead of splicing.
        overwrite: bool,
    },
    /// [`Ring::pop`].
    Pop(Target),
    /// [`Ring::remove`].
    Remove(Filter<T>),
    /// [`Ring::replace`].
    Replace {
        /// The replacement.
        item: Item<T>,
        /// Which members to overwrite.
        selector: Selector<T>,
    },
    /// [`Ring::get_nodes`].
    GetNodes(Filter<T>),
    /// [`Ring::set_values`].
    SetValues {
        /// New value for every match.
        value: T,
        /// Which members.
        filter: Filter<T>,
    },
    /// [`Ring::clone_ring`] with a derived id.
    Clone {
        /// Cross-link clone nodes with the originals.
        bind_to_original: bool,
    },
    /// [`Ring::reverse`].
    Reverse,
    /// [`Ring::clear`].
    Clear,
    /// [`Ring::split`]; the new ring is named `"{ring}_split"`.
    Split(isize),
    /// [`Ring::index_of`].
    IndexOf(T),
    /// [`Ring::node_at`].
    ValueOf(isize),
    /// [`Ring::is_empty`].
    IsEmpty,
    /// [`Ring::head`].
    GetHead,
}

impl<T> Op<T> {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Append(_) => "append",
            Self::Prepend(_) => "prepend",
            Self::Insert { .. } => "insert",
            Self::Pop(_) => "pop",
            Self::Remove(_) => "remove",
            Self::Replace { .. } => "replace",
            Self::GetNodes(_) => "get_nodes",
            Self::SetValues { .. } => "set_values",
            Self::Clone { .. } => "clone",
            Self::Reverse => "reverse",
            Self::Clear => "clear",
            Self::Split(_) => "split",
            Self::IndexOf(_) => "index_of",
            Self::ValueOf(_) => "value_of",
            Self::IsEmpty => "is_empty",
            Self::GetHead => "get_head",
        }
    }
}

/// What one subscriber produced for an [`Op`].
#[derive(Debug)]
pub enum Outcome {
    /// From `Append`, `Prepend` and `Insert`.
    Inserted(Inserted),
    /// From `Replace`: one entry per overwritten member.
    Replaced(Vec<Inserted>),
    /// From `Pop`.
    Popped(NodeKey),
    /// `(index, key)` pairs from `Remove`, `GetNodes` and `SetValues`.
    Nodes(Vec<(usize, NodeKey)>),
    /// From `Clear`: the unlinked keys.
    Cleared(Vec<NodeKey>),
    /// A ring produced by `Clone` or `Split`, not yet owned by anyone.
    Ring(Ring),
    /// A produced ring after its owner registered it.
    Spawned(RingId),
    /// From `Reverse`.
    Done,
    /// From `IndexOf`.
    Indices(Indices),
    /// From `ValueOf`.
    Node(NodeKey),
    /// From `IsEmpty`.
    IsEmpty(bool),
    /// From `GetHead`.
    Head(Option<NodeKey>),
}

impl Outcome {
    /// The produced ring, if any.
    pub fn into_ring(self) -> Option<Ring> {
        match self {
            Self::Ring(ring) => Some(ring),
            _ => None,
        }
    }
}
