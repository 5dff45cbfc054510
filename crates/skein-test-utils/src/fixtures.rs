//! Reusable ring and subscriber fixtures.
//!
//! - [`ring_of`] / [`values_of`]: build a ring from values and read it back.
//! - [`FailingSubscriber`]: wraps a ring and fails after N calls.
//! - [`RecordingSubscriber`]: wraps a ring and logs every op name it sees.

use std::sync::atomic::{AtomicUsize, Ordering};

use skein_core::{HubId, Payload, RingError, RingId};
use skein_hub::{HubMember, Op, Outcome, Subscriber};
use skein_pool::NodePool;
use skein_ring::Ring;

/// Build a ring of fresh nodes. Panics if the ring refuses a value, which
/// only happens for broken pools.
pub fn ring_of<T>(pool: &mut NodePool<T>, id: &str, values: impl IntoIterator<Item = T>) -> Ring {
    match Ring::from_values(pool, id, values) {
        Ok(ring) => ring,
        Err(e) => panic!("ring_of({id}) failed: {e}"),
    }
}

/// Clone a ring's values out in traversal order.
pub fn values_of<T: Clone>(ring: &Ring, pool: &NodePool<T>) -> Vec<T> {
    ring.values(pool).cloned().collect()
}

/// A ring that applies the first `succeed_count` ops normally, then
/// refuses every op after that without touching the ring.
///
/// Useful for checking that a hub keeps going past a failed subscriber.
pub struct FailingSubscriber {
    pub ring: Ring,
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingSubscriber {
    pub fn new(ring: Ring, succeed_count: usize) -> Self {
        Self {
            ring,
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `apply()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl HubMember for FailingSubscriber {
    fn ring_id(&self) -> &RingId {
        self.ring.id()
    }

    fn hub(&self) -> Option<&HubId> {
        self.ring.hub()
    }

    fn set_hub(&mut self, hub: Option<HubId>) -> Option<HubId> {
        self.ring.set_hub(hub)
    }
}

impl<T: Payload> Subscriber<T> for FailingSubscriber {
    fn apply(&mut self, pool: &mut NodePool<T>, op: &Op<T>) -> Result<Outcome, RingError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(RingError::InvalidArgument {
                reason: format!(
                    "deliberate failure of {} after {} successful calls",
                    op.name(),
                    self.succeed_count
                ),
            });
        }
        self.ring.apply(pool, op)
    }
}

/// A ring that records the name of every op before applying it.
pub struct RecordingSubscriber {
    pub ring: Ring,
    pub seen: Vec<&'static str>,
}

impl RecordingSubscriber {
    pub fn new(ring: Ring) -> Self {
        Self {
            ring,
            seen: Vec::new(),
        }
    }
}

impl HubMember for RecordingSubscriber {
    fn ring_id(&self) -> &RingId {
        self.ring.id()
    }

    fn hub(&self) -> Option<&HubId> {
        self.ring.hub()
    }

    fn set_hub(&mut self, hub: Option<HubId>) -> Option<HubId> {
        self.ring.set_hub(hub)
    }
}

impl<T: Payload> Subscriber<T> for RecordingSubscriber {
    fn apply(&mut self, pool: &mut NodePool<T>, op: &Op<T>) -> Result<Outcome, RingError> {
        self.seen.push(op.name());
        self.ring.apply(pool, op)
    }
}
