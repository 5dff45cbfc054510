//! Presentation helpers. Neither view mutates the ring or the pool.

use std::fmt;

use skein_core::NodeKey;
use skein_pool::NodePool;

use crate::ring::Ring;

/// Single-line rendering of a ring's values, e.g. `[1, 2, 3]`.
///
/// Returned by [`Ring::display`].
pub struct RingDisplay<'a, T> {
    ring: &'a Ring,
    pool: &'a NodePool<T>,
}

/// Multi-line dump of every member with its key, name, value and links.
///
/// Returned by [`Ring::describe`].
pub struct RingDescription<'a, T> {
    ring: &'a Ring,
    pool: &'a NodePool<T>,
}

impl Ring {
    /// A [`fmt::Display`] view of this ring's values.
    pub fn display<'a, T>(&'a self, pool: &'a NodePool<T>) -> RingDisplay<'a, T> {
        RingDisplay { ring: self, pool }
    }

    /// A [`fmt::Display`] view for debugging link state.
    pub fn describe<'a, T>(&'a self, pool: &'a NodePool<T>) -> RingDescription<'a, T> {
        RingDescription { ring: self, pool }
    }
}

impl<T: fmt::Display> fmt::Display for RingDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.ring.values(self.pool).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

impl<T: fmt::Debug> fmt::Display for RingDescription<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.ring;
        write!(f, "ring {} (len {}", ring.id(), ring.len())?;
        if let Some(hub) = ring.hub() {
            write!(f, ", hub {hub}")?;
        }
        writeln!(f, ")")?;
        for (i, key) in ring.iter(self.pool).enumerate() {
            let Some(node) = self.pool.get(key) else {
                writeln!(f, "  [{i}] {key} <stale>")?;
                continue;
            };
            let side = |k: Option<NodeKey>| k.map_or_else(|| "-".to_string(), |k| k.to_string());
            let links = node.scope(ring.id()).copied().unwrap_or_default();
            let (prev, next) = (side(links.prev), side(links.next));
            let rings: Vec<String> = node.links().keys().map(ToString::to_string).collect();
            writeln!(
                f,
                "  [{i}] {key} {} = {:?}  prev {prev} next {next}  rings [{}]",
                node.name(),
                node.value(),
                rings.join(", ")
            )?;
        }
        Ok(())
    }
}
