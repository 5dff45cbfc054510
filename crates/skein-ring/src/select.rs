//! Arguments that pick nodes: what to insert, where, and which members
//! an operation targets.

use skein_core::{NodeKey, NodeName, RingError};
use skein_pool::Node;

/// Something to admit into a ring.
#[derive(Clone, Debug, PartialEq)]
pub enum Item<T> {
    /// A bare value; the ring wraps it in a fresh node.
    Value(T),
    /// An existing pool node, possibly shared with other rings.
    Node(NodeKey),
}

impl<T> From<NodeKey> for Item<T> {
    fn from(key: NodeKey) -> Self {
        Self::Node(key)
    }
}

/// Insertion point.
///
/// `Index` accepts negative positions counted from the end, so `-1` sits
/// before the tail. `End` is the slot after the tail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// A signed index in `[-len, len]`.
    Index(isize),
    /// After the tail.
    End,
}

impl From<isize> for Position {
    fn from(index: isize) -> Self {
        Self::Index(index)
    }
}

/// Which single member [`Ring::pop`](crate::Ring::pop) removes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// By signed index.
    Index(isize),
    /// The first member in traversal order with this name.
    Name(NodeName),
    /// A specific node.
    Node(NodeKey),
}

/// Which members [`Ring::replace`](crate::Ring::replace) overwrites.
#[derive(Clone, Debug, PartialEq)]
pub enum Selector<T> {
    /// The member at a position; `End` means the tail.
    Position(Position),
    /// Every member with this name.
    Name(NodeName),
    /// A specific node.
    Node(NodeKey),
    /// Every member whose value equals this one strictly.
    Value(T),
}

/// Member filter for [`Ring::get_nodes`](crate::Ring::get_nodes) and the
/// batch operations built on it.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter<T> {
    /// Every member.
    All,
    /// Members at these signed indices. Out-of-range entries match nothing.
    Indices(Vec<isize>),
    /// Members carrying any of these names.
    Names(Vec<NodeName>),
    /// Members whose value strictly equals any of these.
    Values(Vec<T>),
}

impl<T: PartialEq> Filter<T> {
    /// Build a filter from optional collections, exactly one of which must
    /// be given.
    pub fn from_parts(
        indices: Option<Vec<isize>>,
        names: Option<Vec<NodeName>>,
        values: Option<Vec<T>>,
    ) -> Result<Self, RingError> {
        match (indices, names, values) {
            (Some(i), None, None) => Ok(Self::Indices(i)),
            (None, Some(n), None) => Ok(Self::Names(n)),
            (None, None, Some(v)) => Ok(Self::Values(v)),
            (None, None, None) => Err(RingError::InvalidArgument {
                reason: "a filter needs indices, names or values".into(),
            }),
            _ => Err(RingError::InvalidArgument {
                reason: "pass only one of indices, names or values".into(),
            }),
        }
    }

    /// Whether the member at `index` (of a ring of `len`) matches.
    pub(crate) fn matches(&self, index: usize, len: usize, node: &Node<T>) -> bool {
        match self {
            Self::All => true,
            Self::Indices(indices) => indices
                .iter()
                .any(|&i| normalize(i, len) == Some(index)),
            Self::Names(names) => names.iter().any(|n| n == node.name()),
            Self::Values(values) => values.iter().any(|v| v == node.value()),
        }
    }
}

/// Map a signed index onto `0..len`.
pub(crate) fn normalize(index: isize, len: usize) -> Option<usize> {
    let len = len as isize;
    let i = if index < 0 { index + len } else { index };
    (0..len).contains(&i).then_some(i as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_core::ErrorKind;

    #[test]
    fn from_parts_needs_exactly_one() {
        let f = Filter::<i32>::from_parts(Some(vec![0]), None, None).unwrap();
        assert_eq!(f, Filter::Indices(vec![0]));

        let none = Filter::<i32>::from_parts(None, None, None).unwrap_err();
        assert_eq!(none.kind(), ErrorKind::Argument);

        let both = Filter::from_parts(None, Some(vec![NodeName::named("a")]), Some(vec![1]))
            .unwrap_err();
        assert_eq!(both.kind(), ErrorKind::Argument);
    }

    #[test]
    fn normalize_handles_negatives() {
        assert_eq!(normalize(0, 3), Some(0));
        assert_eq!(normalize(-1, 3), Some(2));
        assert_eq!(normalize(-3, 3), Some(0));
        assert_eq!(normalize(-4, 3), None);
        assert_eq!(normalize(3, 3), None);
        assert_eq!(normalize(0, 0), None);
    }

    #[test]
    fn filter_matching() {
        let node = Node::named(7, "seven");
        assert!(Filter::All.matches(0, 1, &node));
        assert!(Filter::<i32>::Indices(vec![-1]).matches(4, 5, &node));
        assert!(Filter::<i32>::Names(vec![NodeName::named("seven")]).matches(0, 1, &node));
        assert!(Filter::Values(vec![1, 7]).matches(0, 1, &node));
        assert!(!Filter::Values(vec![8]).matches(0, 1, &node));
    }
}
