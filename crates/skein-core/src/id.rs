//! Strongly-typed identifiers and the [`Indices`] type alias.

use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for auto-allocated [`Ident`] handles.
static AUTO_COUNTER: AtomicU64 = AtomicU64::new(1);

/// An identity that is either an opaque auto-allocated handle or a
/// caller-chosen name.
///
/// Two auto handles are never equal unless they came from the same
/// [`Ident::next`] call. A named identity never equals an auto handle,
/// even when the name spells the handle's number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ident {
    /// Opaque handle allocated from a process-wide monotonic counter.
    Auto(u64),
    /// Caller-chosen name.
    Named(String),
}

impl Ident {
    /// Allocate a fresh, unique auto handle. Thread-safe.
    pub fn next() -> Self {
        Self::Auto(AUTO_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// A caller-chosen identity.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Whether this identity was auto-allocated.
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto(_))
    }

    /// The caller-chosen name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Auto(_) => None,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto(n) => write!(f, "#{n}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Identifies a ring.
///
/// The ring identifier is the key of the scope entry a ring stores inside
/// every member node, so two live rings sharing nodes must never share an
/// identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RingId(Ident);

impl RingId {
    /// Allocate a fresh auto identifier.
    pub fn auto() -> Self {
        Self(Ident::next())
    }

    /// A caller-chosen identifier.
    pub fn named(name: impl Into<String>) -> Self {
        Self(Ident::named(name))
    }

    /// A named identifier built from this one and a suffix,
    /// e.g. `"orders"` + `"split"` → `"orders_split"`.
    pub fn derive(&self, suffix: &str) -> Self {
        Self::named(format!("{self}_{suffix}"))
    }

    /// The underlying identity.
    pub fn ident(&self) -> &Ident {
        &self.0
    }
}

impl fmt::Display for RingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RingId {
    fn from(v: &str) -> Self {
        Self::named(v)
    }
}

impl From<String> for RingId {
    fn from(v: String) -> Self {
        Self::named(v)
    }
}

/// Identifies a hub.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HubId(Ident);

impl HubId {
    /// Allocate a fresh auto identifier.
    pub fn auto() -> Self {
        Self(Ident::next())
    }

    /// A caller-chosen identifier.
    pub fn named(name: impl Into<String>) -> Self {
        Self(Ident::named(name))
    }

    /// The underlying identity.
    pub fn ident(&self) -> &Ident {
        &self.0
    }
}

impl fmt::Display for HubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for HubId {
    fn from(v: &str) -> Self {
        Self::named(v)
    }
}

impl From<String> for HubId {
    fn from(v: String) -> Self {
        Self::named(v)
    }
}

/// The identity of a node, distinct from its value and its [`NodeKey`].
///
/// Used by name-based lookups (`Target::Name`, name filters). Names are
/// not required to be unique; lookups report every match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeName(Ident);

impl NodeName {
    /// Allocate a fresh auto name.
    pub fn auto() -> Self {
        Self(Ident::next())
    }

    /// A caller-chosen name.
    pub fn named(name: impl Into<String>) -> Self {
        Self(Ident::named(name))
    }

    /// The underlying identity.
    pub fn ident(&self) -> &Ident {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for NodeName {
    fn from(v: &str) -> Self {
        Self::named(v)
    }
}

impl From<String> for NodeName {
    fn from(v: String) -> Self {
        Self::named(v)
    }
}

/// Stable handle to a node slot in a node pool.
///
/// Keys are generation-scoped: when a slot is released and reused, the
/// generation is bumped, so a stale key never resolves to the new node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct NodeKey {
    index: u32,
    generation: u32,
}

impl NodeKey {
    /// Build a key from its parts. Only meaningful to the pool that
    /// handed out the slot.
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index within the pool.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Slot generation this key was issued for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Ring positions reported by searches.
///
/// Uses `SmallVec<[usize; 4]>`: most searches match a handful of nodes,
/// so the common case stays off the heap.
pub type Indices = SmallVec<[usize; 4]>;
