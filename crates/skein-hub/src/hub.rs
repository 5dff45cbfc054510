//! Subscription registry and fan-out.
//!
//! A [`Hub`] lists ring ids; the rings themselves live wherever the caller
//! keeps them (an `IndexMap<RingId, S>`). Every method that touches a ring
//! takes that map explicitly, the same way ring methods take the pool.
//!
//! Fan-out is sequential in subscription order and not transactional: a
//! subscriber that fails is reported as `None` and logged, and the next
//! subscriber runs as if nothing happened.

use std::mem;

use indexmap::IndexMap;
use skein_core::{HubError, HubId, RingError, RingId};
use skein_pool::NodePool;
use skein_ring::{ExtendOptions, Ring};
use tracing::debug;

use crate::op::{Op, Outcome};
use crate::subscriber::{HubMember, Subscriber};

/// Per-subscriber results of a fan-out, in subscription order. `None`
/// marks a subscriber whose operation failed.
pub type Fanout = IndexMap<RingId, Option<Outcome>>;

/// How [`Hub::extend`] combines the caller with the other subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtendMode {
    /// Append the caller's nodes to every other subscriber.
    AppendSelf,
    /// Prepend the caller's nodes to every other subscriber.
    PrependSelf,
    /// Splice every other subscriber onto the caller, in order.
    FuseAll,
}

/// A publish/subscribe registry over rings.
///
/// Invariant: a ring is listed here exactly when its own hub reference
/// names this hub. Both sides are updated together by
/// [`subscribe`](Self::subscribe) and [`unsubscribe`](Self::unsubscribe).
#[derive(Clone, Debug)]
pub struct Hub {
    id: HubId,
    subscribers: Vec<RingId>,
}

impl Hub {
    /// A hub with no subscribers.
    pub fn new(id: impl Into<HubId>) -> Self {
        Self {
            id: id.into(),
            subscribers: Vec::new(),
        }
    }

    /// A hub with an automatic id.
    pub fn anonymous() -> Self {
        Self::new(HubId::auto())
    }

    /// This hub's identifier.
    pub fn id(&self) -> &HubId {
        &self.id
    }

    /// Listed ring ids in subscription order.
    pub fn subscribers(&self) -> &[RingId] {
        &self.subscribers
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Whether `ring` is listed.
    pub fn is_subscribed(&self, ring: &RingId) -> bool {
        self.subscribers.contains(ring)
    }

    /// List `ring` and point its hub reference here.
    pub fn subscribe<S: HubMember + ?Sized>(&mut self, ring: &mut S) -> Result<(), HubError> {
        if let Some(current) = ring.hub() {
            return Err(HubError::AlreadySubscribed {
                ring: ring.ring_id().clone(),
                hub: current.clone(),
            });
        }
        if self.is_subscribed(ring.ring_id()) {
            return Err(HubError::AlreadySubscribed {
                ring: ring.ring_id().clone(),
                hub: self.id.clone(),
            });
        }
        self.subscribers.push(ring.ring_id().clone());
        ring.set_hub(Some(self.id.clone()));
        debug!(hub = %self.id, ring = %ring.ring_id(), "subscribed");
        Ok(())
    }

    /// Remove `ring` from the list and clear its hub reference.
    pub fn unsubscribe<S: HubMember + ?Sized>(&mut self, ring: &mut S) -> Result<(), HubError> {
        let Some(at) = self.subscribers.iter().position(|r| r == ring.ring_id()) else {
            return Err(HubError::NotSubscribed {
                ring: ring.ring_id().clone(),
            });
        };
        self.subscribers.remove(at);
        if ring.hub() == Some(&self.id) {
            ring.set_hub(None);
        }
        debug!(hub = %self.id, ring = %ring.ring_id(), "unsubscribed");
        Ok(())
    }

    /// Empty the list, clearing the hub reference of every listed ring
    /// still found in `rings`. Returns the ids that were listed.
    pub fn unsubscribe_all<S: HubMember>(&mut self, rings: &mut IndexMap<RingId, S>) -> Vec<RingId> {
        let listed = mem::take(&mut self.subscribers);
        for id in &listed {
            if let Some(ring) = rings.get_mut(id) {
                if ring.hub() == Some(&self.id) {
                    ring.set_hub(None);
                }
            }
        }
        debug!(hub = %self.id, count = listed.len(), "unsubscribed all");
        listed
    }

    /// Change this hub's id and repoint every listed ring at it.
    pub fn rename<S: HubMember>(&mut self, rings: &mut IndexMap<RingId, S>, id: impl Into<HubId>) {
        let id = id.into();
        for ring_id in &self.subscribers {
            if let Some(ring) = rings.get_mut(ring_id) {
                if ring.hub() == Some(&self.id) {
                    ring.set_hub(Some(id.clone()));
                }
            }
        }
        debug!(from = %self.id, to = %id, "renamed hub");
        self.id = id;
    }

    /// Apply `op` to every subscriber in subscription order.
    ///
    /// A listed id with no entry in `rings` reports `None` like any other
    /// failure.
    pub fn broadcast<T, S: Subscriber<T>>(
        &self,
        rings: &mut IndexMap<RingId, S>,
        pool: &mut NodePool<T>,
        op: &Op<T>,
    ) -> Fanout {
        let mut results = IndexMap::with_capacity(self.subscribers.len());
        for id in &self.subscribers {
            let outcome = match rings.get_mut(id) {
                Some(ring) => match ring.apply(pool, op) {
                    Ok(outcome) => Some(outcome),
                    Err(error) => {
                        debug!(hub = %self.id, ring = %id, op = op.name(), %error, "subscriber failed");
                        None
                    }
                },
                None => {
                    debug!(hub = %self.id, ring = %id, op = op.name(), "subscriber missing");
                    None
                }
            };
            results.insert(id.clone(), outcome);
        }
        results
    }

    /// Combine `caller` with every other subscriber according to `mode`.
    ///
    /// The caller itself is always skipped. Each other subscriber succeeds
    /// or fails on its own; the map reports `Some(Outcome::Done)` or `None`
    /// per subscriber. For the two self modes, `unlink_from_other` refers to
    /// the caller: once every subscriber has been offered the caller's
    /// nodes, the caller is cleared. The nodes stay linked wherever they
    /// were added.
    pub fn extend<T>(
        &self,
        rings: &mut IndexMap<RingId, Ring>,
        pool: &mut NodePool<T>,
        caller: &RingId,
        mode: ExtendMode,
        options: ExtendOptions,
    ) -> Result<Fanout, HubError> {
        if !self.is_subscribed(caller) {
            return Err(HubError::NotSubscribed {
                ring: caller.clone(),
            });
        }
        let slot = rings.get_mut(caller).ok_or_else(|| HubError::UnknownRing {
            ring: caller.clone(),
        })?;
        // Take the caller out so it can be borrowed alongside a subscriber.
        let mut source = mem::replace(slot, Ring::new(caller.clone()));

        let shared = ExtendOptions {
            unlink_from_other: false,
            ..options
        };
        let mut results = IndexMap::with_capacity(self.subscribers.len());
        for id in self.subscribers.iter().filter(|id| *id != caller) {
            let applied = match rings.get_mut(id) {
                Some(ring) => match mode {
                    ExtendMode::AppendSelf => ring.extend(pool, &mut source, shared),
                    ExtendMode::PrependSelf => ring.extend_front(pool, &mut source, shared),
                    ExtendMode::FuseAll => source.extend(pool, ring, options),
                },
                None => Err(RingError::NotFound { ring: id.clone() }),
            };
            let outcome = match applied {
                Ok(()) => Some(Outcome::Done),
                Err(error) => {
                    debug!(hub = %self.id, ring = %id, ?mode, %error, "subscriber extend failed");
                    None
                }
            };
            results.insert(id.clone(), outcome);
        }

        let cleared = match mode {
            ExtendMode::AppendSelf | ExtendMode::PrependSelf if options.unlink_from_other => {
                source.clear(pool).map(|_| ())
            }
            _ => Ok(()),
        };
        if let Some(slot) = rings.get_mut(caller) {
            *slot = source;
        }
        cleared?;
        Ok(results)
    }
}
