//! Error types for skein ring graphs.
//!
//! Organized by layer: node links ([`LinkError`]), ring structure
//! ([`RingError`]), hub subscription and fan-out ([`HubError`]) and
//! configuration ([`ConfigError`]). Every error maps onto one
//! [`ErrorKind`] so callers can branch on the category without matching
//! every variant.

use std::error::Error;
use std::fmt;

use crate::id::{HubId, NodeKey, RingId};

/// Category of a failure, shared by every error type in the workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Position or index outside the ring.
    Index,
    /// The operation needs at least one member.
    Empty,
    /// No node (or ring, or hub) matches the given filter.
    NotFound,
    /// Malformed or contradictory call arguments.
    Argument,
    /// A node is already present in both operands of a fusing operation.
    SharedNode,
    /// A key or value of the wrong category, e.g. a stale node key.
    Type,
    /// A node has no scope entry for the ring in question.
    MissingScope,
    /// A linked operation was requested by a ring without a hub.
    NotSubscribed,
    /// A ring that already has a hub tried to subscribe again.
    AlreadySubscribed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Index => "index",
            Self::Empty => "empty",
            Self::NotFound => "not found",
            Self::Argument => "argument",
            Self::SharedNode => "shared node",
            Self::Type => "type",
            Self::MissingScope => "missing scope",
            Self::NotSubscribed => "not subscribed",
            Self::AlreadySubscribed => "already subscribed",
        };
        f.write_str(s)
    }
}

/// Errors from node link tables and the node pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkError {
    /// The key does not resolve to a live node (released or never issued).
    StaleNode {
        /// The offending key.
        key: NodeKey,
    },
    /// The node has no scope entry for this ring.
    MissingScope {
        /// The ring whose entry was expected.
        ring: RingId,
    },
    /// The scope entry exists but one side of it was never set.
    Dangling {
        /// The ring whose entry is incomplete.
        ring: RingId,
    },
    /// The node cannot be released while rings still link it.
    StillLinked {
        /// The node that was asked to be released.
        key: NodeKey,
        /// Number of rings still holding a scope entry.
        rings: usize,
    },
}

impl LinkError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StaleNode { .. } => ErrorKind::Type,
            Self::MissingScope { .. } | Self::Dangling { .. } => ErrorKind::MissingScope,
            Self::StillLinked { .. } => ErrorKind::Argument,
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleNode { key } => write!(f, "key {key} does not name a live node"),
            Self::MissingScope { ring } => write!(f, "node has no scope entry for ring {ring}"),
            Self::Dangling { ring } => write!(f, "scope entry for ring {ring} is incomplete"),
            Self::StillLinked { key, rings } => {
                write!(f, "node {key} is still linked to {rings} ring(s)")
            }
        }
    }
}

impl Error for LinkError {}

/// Errors from ring structural operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RingError {
    /// A node-level failure surfaced while rewiring the ring.
    Link(LinkError),
    /// Position outside the accepted range for the operation.
    IndexOutOfRange {
        /// The requested position.
        index: isize,
        /// Ring length at the time of the call.
        len: usize,
    },
    /// The ring has no members.
    Empty {
        /// The empty ring.
        ring: RingId,
    },
    /// No member matched the filter.
    NotFound {
        /// The ring that was searched.
        ring: RingId,
    },
    /// Malformed or contradictory arguments.
    InvalidArgument {
        /// Description of the problem.
        reason: String,
    },
    /// A node already belongs to the ring it is being linked into.
    SharedNode {
        /// The node found in both operands.
        node: NodeKey,
        /// The ring that already holds it.
        ring: RingId,
    },
}

impl RingError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Link(e) => e.kind(),
            Self::IndexOutOfRange { .. } => ErrorKind::Index,
            Self::Empty { .. } => ErrorKind::Empty,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidArgument { .. } => ErrorKind::Argument,
            Self::SharedNode { .. } => ErrorKind::SharedNode,
        }
    }
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link error: {e}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for ring of length {len}")
            }
            Self::Empty { ring } => write!(f, "ring {ring} is empty"),
            Self::NotFound { ring } => write!(f, "no matching node in ring {ring}"),
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::SharedNode { node, ring } => {
                write!(f, "node {node} is already a member of ring {ring}")
            }
        }
    }
}

impl Error for RingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Link(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LinkError> for RingError {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

/// Errors from hub subscription management and fan-out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HubError {
    /// A ring-level failure on the caller's own operation.
    Ring(RingError),
    /// The ring is not subscribed to the hub (checked in both directions).
    NotSubscribed {
        /// The ring that asked.
        ring: RingId,
    },
    /// The ring already holds a hub reference, or is already listed.
    AlreadySubscribed {
        /// The ring that tried to subscribe.
        ring: RingId,
        /// The hub it is already bound to.
        hub: HubId,
    },
    /// A subscriber id has no ring behind it.
    UnknownRing {
        /// The missing ring.
        ring: RingId,
    },
}

impl HubError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ring(e) => e.kind(),
            Self::NotSubscribed { .. } => ErrorKind::NotSubscribed,
            Self::AlreadySubscribed { .. } => ErrorKind::AlreadySubscribed,
            Self::UnknownRing { .. } => ErrorKind::NotFound,
        }
    }
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ring(e) => write!(f, "ring error: {e}"),
            Self::NotSubscribed { ring } => write!(f, "ring {ring} is not subscribed to a hub"),
            Self::AlreadySubscribed { ring, hub } => {
                write!(f, "ring {ring} is already subscribed to hub {hub}")
            }
            Self::UnknownRing { ring } => write!(f, "unknown ring {ring}"),
        }
    }
}

impl Error for HubError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ring(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RingError> for HubError {
    fn from(e: RingError) -> Self {
        Self::Ring(e)
    }
}

impl From<LinkError> for HubError {
    fn from(e: LinkError) -> Self {
        Self::Ring(RingError::Link(e))
    }
}

/// Errors detected by `validate()` on configuration structs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A caller-chosen name is empty.
    EmptyName {
        /// Which setting carried the empty name.
        field: &'static str,
    },
    /// The same ring is listed twice as an initial hub subscriber.
    DuplicateSubscriber {
        /// The repeated ring.
        ring: RingId,
    },
}

impl ConfigError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName { .. } => ErrorKind::Argument,
            Self::DuplicateSubscriber { .. } => ErrorKind::AlreadySubscribed,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName { field } => write!(f, "{field} must not be an empty name"),
            Self::DuplicateSubscriber { ring } => {
                write!(f, "ring {ring} listed more than once as a subscriber")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_wrapped_error() {
        let link = LinkError::StaleNode {
            key: NodeKey::new(0, 1),
        };
        assert_eq!(link.kind(), ErrorKind::Type);
        let ring: RingError = link.into();
        assert_eq!(ring.kind(), ErrorKind::Type);
        let hub: HubError = ring.into();
        assert_eq!(hub.kind(), ErrorKind::Type);
    }

    #[test]
    fn ring_error_source_is_link_error() {
        let e = RingError::Link(LinkError::MissingScope {
            ring: RingId::named("a"),
        });
        assert!(e.source().is_some());
        assert_eq!(e.kind(), ErrorKind::MissingScope);
    }

    #[test]
    fn display_mentions_ids() {
        let e = HubError::AlreadySubscribed {
            ring: RingId::named("left"),
            hub: HubId::named("bus"),
        };
        let msg = e.to_string();
        assert!(msg.contains("left") && msg.contains("bus"), "{msg}");

        let e = RingError::IndexOutOfRange { index: -4, len: 3 };
        assert_eq!(e.to_string(), "index -4 out of range for ring of length 3");
    }
}
