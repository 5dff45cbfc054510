//! One pool plus every ring and hub built over it.
//!
//! [`Weave`] is the owner most callers want: it keeps the pool, rings and
//! hubs together so that ids resolve, subscriptions stay bidirectional and
//! rings produced by split or clone are registered instead of floating
//! free.

use std::mem;

use indexmap::IndexMap;
use skein_core::{HubError, HubId, NodeKey, Payload, RingError, RingId};
use skein_hub::{ExtendMode, Fanout, Hub, Op, Outcome};
use skein_pool::NodePool;
use skein_ring::{
    CloneOptions, ExtendOptions, Filter, Item, Position, Ring, RingConfig, Selector, Target, Values,
};
use tracing::{debug, warn};

use crate::config::{HubConfig, WeaveConfig};
use crate::error::WeaveError;

/// Owner of a node pool and the rings and hubs that reference it.
pub struct Weave<T> {
    pool: NodePool<T>,
    rings: IndexMap<RingId, Ring>,
    hubs: IndexMap<HubId, Hub>,
}

impl<T> Weave<T> {
    /// An empty weave with a default-sized pool.
    pub fn new() -> Self {
        Self::with_config(&WeaveConfig::default())
    }

    /// An empty weave sized by `config`.
    pub fn with_config(config: &WeaveConfig) -> Self {
        Self {
            pool: NodePool::with_config(&config.pool),
            rings: IndexMap::new(),
            hubs: IndexMap::new(),
        }
    }

    // ── Registration ───────────────────────────────────────────────

    /// Build a ring from `items` and register it.
    ///
    /// With `config.hub` set the ring subscribes immediately; that hub must
    /// already exist. Nothing is registered if any step fails.
    pub fn create_ring(
        &mut self,
        config: RingConfig,
        items: impl IntoIterator<Item = Item<T>>,
    ) -> Result<RingId, WeaveError> {
        config.validate()?;
        let id = config.resolve_id();
        if self.rings.contains_key(&id) {
            return Err(WeaveError::DuplicateRing { ring: id });
        }
        if let Some(hub) = &config.hub {
            if !self.hubs.contains_key(hub) {
                return Err(WeaveError::UnknownHub { hub: hub.clone() });
            }
        }

        let mut ring = Ring::from_items(&mut self.pool, id.clone(), items)?;
        if let Some(hub_id) = &config.hub {
            if let Some(hub) = self.hubs.get_mut(hub_id) {
                if let Err(e) = hub.subscribe(&mut ring) {
                    ring.clear(&mut self.pool)?;
                    return Err(e.into());
                }
            }
        }
        debug!(ring = %id, len = ring.len(), hub = ?config.hub, "created ring");
        self.rings.insert(id.clone(), ring);
        Ok(id)
    }

    /// [`create_ring`](Self::create_ring) over fresh nodes holding `values`.
    pub fn create_ring_from_values(
        &mut self,
        config: RingConfig,
        values: impl IntoIterator<Item = T>,
    ) -> Result<RingId, WeaveError> {
        self.create_ring(config, values.into_iter().map(Item::Value))
    }

    /// Register a hub and subscribe its initial rings in order.
    ///
    /// Every listed ring must exist and be free of any hub; otherwise
    /// nothing is registered.
    pub fn create_hub(&mut self, config: HubConfig) -> Result<HubId, WeaveError> {
        config.validate()?;
        let id = config.resolve_id();
        if self.hubs.contains_key(&id) {
            return Err(WeaveError::DuplicateHub { hub: id });
        }
        for ring_id in &config.subscribers {
            let ring = self.lookup(ring_id)?;
            if let Some(hub) = ring.hub() {
                return Err(HubError::AlreadySubscribed {
                    ring: ring_id.clone(),
                    hub: hub.clone(),
                }
                .into());
            }
        }

        let mut hub = Hub::new(id.clone());
        for ring_id in &config.subscribers {
            if let Some(ring) = self.rings.get_mut(ring_id) {
                hub.subscribe(ring)?;
            }
        }
        debug!(hub = %id, subscribers = hub.len(), "created hub");
        self.hubs.insert(id.clone(), hub);
        Ok(id)
    }

    /// Unsubscribe, clear and forget a ring. Returns the keys it held so
    /// the caller can release the ones nothing else links.
    pub fn drop_ring(&mut self, id: &RingId) -> Result<Vec<NodeKey>, WeaveError> {
        if self.lookup(id)?.hub().is_some() {
            self.unsubscribe(id)?;
        }
        let mut ring = self
            .rings
            .shift_remove(id)
            .ok_or_else(|| WeaveError::UnknownRing { ring: id.clone() })?;
        let keys = ring.clear(&mut self.pool)?;
        debug!(ring = %id, released = keys.len(), "dropped ring");
        Ok(keys)
    }

    /// Unsubscribe every ring from a hub and forget it.
    pub fn drop_hub(&mut self, id: &HubId) -> Result<Vec<RingId>, WeaveError> {
        let mut hub = self
            .hubs
            .shift_remove(id)
            .ok_or_else(|| WeaveError::UnknownHub { hub: id.clone() })?;
        let listed = hub.unsubscribe_all(&mut self.rings);
        debug!(hub = %id, unsubscribed = listed.len(), "dropped hub");
        Ok(listed)
    }

    // ── Access ─────────────────────────────────────────────────────

    /// A registered ring.
    pub fn ring(&self, id: &RingId) -> Result<&Ring, WeaveError> {
        self.lookup(id)
    }

    /// Run `edit` against a registered ring and the pool.
    ///
    /// A rename made inside `edit` is carried into the registry. If the new
    /// id is already registered the ring is renamed back and the call fails
    /// with [`WeaveError::DuplicateRing`].
    pub fn edit_ring<R>(
        &mut self,
        id: &RingId,
        edit: impl FnOnce(&mut Ring, &mut NodePool<T>) -> Result<R, RingError>,
    ) -> Result<R, WeaveError> {
        let ring = self
            .rings
            .get_mut(id)
            .ok_or_else(|| WeaveError::UnknownRing { ring: id.clone() })?;
        let result = edit(ring, &mut self.pool);
        if ring.id() != id {
            self.rekey(id)?;
        }
        Ok(result?)
    }

    /// A registered hub.
    pub fn hub(&self, id: &HubId) -> Result<&Hub, WeaveError> {
        self.hubs
            .get(id)
            .ok_or_else(|| WeaveError::UnknownHub { hub: id.clone() })
    }

    /// The shared node pool.
    pub fn pool(&self) -> &NodePool<T> {
        &self.pool
    }

    /// The shared node pool, mutably.
    pub fn pool_mut(&mut self) -> &mut NodePool<T> {
        &mut self.pool
    }

    /// Registered rings in creation order.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.rings.values()
    }

    /// Registered hubs in creation order.
    pub fn hubs(&self) -> impl Iterator<Item = &Hub> {
        self.hubs.values()
    }

    /// Values of a ring in traversal order.
    pub fn values(&self, id: &RingId) -> Result<Values<'_, T>, WeaveError> {
        Ok(self.lookup(id)?.values(&self.pool))
    }

    // ── Subscription ───────────────────────────────────────────────

    /// Subscribe a ring to a hub.
    pub fn subscribe(&mut self, ring: &RingId, hub: &HubId) -> Result<(), WeaveError> {
        let hub = self
            .hubs
            .get_mut(hub)
            .ok_or_else(|| WeaveError::UnknownHub { hub: hub.clone() })?;
        let ring = self
            .rings
            .get_mut(ring)
            .ok_or_else(|| WeaveError::UnknownRing { ring: ring.clone() })?;
        hub.subscribe(ring)?;
        Ok(())
    }

    /// Give a registered ring a new id, keeping its place in creation order.
    ///
    /// Refused while the ring is subscribed.
    pub fn rename_ring(&mut self, id: &RingId, to: impl Into<RingId>) -> Result<(), WeaveError> {
        let to = to.into();
        if &to != id && self.rings.contains_key(&to) {
            return Err(WeaveError::DuplicateRing { ring: to });
        }
        self.edit_ring(id, |ring, pool| ring.rename(pool, to))
    }

    /// Unsubscribe a ring from whichever hub it names.
    pub fn unsubscribe(&mut self, ring_id: &RingId) -> Result<(), WeaveError> {
        let ring = self
            .rings
            .get_mut(ring_id)
            .ok_or_else(|| WeaveError::UnknownRing { ring: ring_id.clone() })?;
        let hub_id = ring
            .hub()
            .cloned()
            .ok_or_else(|| HubError::NotSubscribed { ring: ring_id.clone() })?;
        let hub = self
            .hubs
            .get_mut(&hub_id)
            .ok_or(WeaveError::UnknownHub { hub: hub_id })?;
        hub.unsubscribe(ring)?;
        Ok(())
    }

    /// Unsubscribe every ring from a hub. Returns the ids that were listed.
    pub fn unsubscribe_all(&mut self, hub: &HubId) -> Result<Vec<RingId>, WeaveError> {
        let hub = self
            .hubs
            .get_mut(hub)
            .ok_or_else(|| WeaveError::UnknownHub { hub: hub.clone() })?;
        Ok(hub.unsubscribe_all(&mut self.rings))
    }

    // ── Restructuring ──────────────────────────────────────────────

    /// Splice `other` onto the end of `target`.
    pub fn extend(&mut self, target: &RingId, other: &RingId, options: ExtendOptions) -> Result<(), WeaveError> {
        self.lookup(target)?;
        if target == other {
            return Err(RingError::InvalidArgument {
                reason: format!("cannot extend {target} with itself"),
            }
            .into());
        }
        let slot = self
            .rings
            .get_mut(other)
            .ok_or_else(|| WeaveError::UnknownRing { ring: other.clone() })?;
        // Take `other` out so both rings can be borrowed at once.
        let mut taken = mem::replace(slot, Ring::new(other.clone()));
        let result = match self.rings.get_mut(target) {
            Some(ring) => ring.extend(&mut self.pool, &mut taken, options),
            None => Ok(()),
        };
        if let Some(slot) = self.rings.get_mut(other) {
            *slot = taken;
        }
        Ok(result?)
    }

    /// Move members `index..` of a ring into a new registered ring.
    ///
    /// `id` defaults to `"{ring}_split"`. Returns the id the new ring was
    /// registered under.
    pub fn split(&mut self, ring: &RingId, index: isize, id: Option<RingId>) -> Result<RingId, WeaveError> {
        let produced = self.edit_ring(ring, |source, pool| {
            let id = id.unwrap_or_else(|| source.id().derive("split"));
            source.split(pool, index, Some(id))
        })?;
        self.register(produced)
    }

    // ── Internals ──────────────────────────────────────────────────

    fn lookup(&self, id: &RingId) -> Result<&Ring, WeaveError> {
        self.rings
            .get(id)
            .ok_or_else(|| WeaveError::UnknownRing { ring: id.clone() })
    }

    /// Register a produced ring, renaming it if its id is taken.
    ///
    /// A ring that cannot be renamed is cleared so none of its nodes keep
    /// an entry for an unregistered ring.
    fn register(&mut self, mut ring: Ring) -> Result<RingId, WeaveError> {
        if self.rings.contains_key(ring.id()) {
            let unique = self.unique_id(ring.id());
            debug!(ring = %ring.id(), renamed = %unique, "ring id taken; renaming");
            if let Err(error) = ring.rename(&mut self.pool, unique) {
                if let Err(cleanup) = ring.clear(&mut self.pool) {
                    warn!(ring = %ring.id(), error = %cleanup, "could not clear unregistered ring");
                }
                return Err(error.into());
            }
        }
        let id = ring.id().clone();
        debug!(ring = %id, len = ring.len(), "registered ring");
        self.rings.insert(id.clone(), ring);
        Ok(id)
    }

    /// Move the ring registered under `key` to the id it now carries.
    fn rekey(&mut self, key: &RingId) -> Result<(), WeaveError> {
        let (index, _, mut ring) = self
            .rings
            .shift_remove_full(key)
            .ok_or_else(|| WeaveError::UnknownRing { ring: key.clone() })?;
        let renamed = ring.id().clone();
        if self.rings.contains_key(&renamed) {
            let restored = ring.rename(&mut self.pool, key.clone());
            self.rings.shift_insert(index, key.clone(), ring);
            restored?;
            return Err(WeaveError::DuplicateRing { ring: renamed });
        }
        debug!(from = %key, to = %renamed, "renamed ring");
        self.rings.shift_insert(index, renamed, ring);
        Ok(())
    }

    fn unique_id(&self, base: &RingId) -> RingId {
        (1..)
            .map(|n: u64| base.derive(&n.to_string()))
            .find(|candidate| !self.rings.contains_key(candidate))
            .unwrap_or_else(RingId::auto)
    }

    /// The hub `caller` belongs to, confirmed from both sides.
    fn confirmed_hub(&self, caller: &RingId) -> Result<HubId, WeaveError> {
        let not_subscribed = || WeaveError::from(HubError::NotSubscribed { ring: caller.clone() });
        let hub_id = self.lookup(caller)?.hub().ok_or_else(not_subscribed)?;
        match self.hubs.get(hub_id) {
            Some(hub) if hub.is_subscribed(caller) => Ok(hub_id.clone()),
            _ => Err(not_subscribed()),
        }
    }
}

impl<T: Payload> Weave<T> {
    /// Clone a ring into fresh nodes and register the clone.
    ///
    /// The clone id is made unique before any node is created, so a bound
    /// clone's originals carry the id the clone is registered under.
    pub fn clone_ring(&mut self, ring: &RingId, mut options: CloneOptions) -> Result<RingId, WeaveError> {
        let source = self
            .rings
            .get(ring)
            .ok_or_else(|| WeaveError::UnknownRing { ring: ring.clone() })?;
        let id = options.id.take().unwrap_or_else(|| source.next_clone_id());
        let id = if &id != source.id() && self.rings.contains_key(&id) {
            self.unique_id(&id)
        } else {
            id
        };
        options.id = Some(id);
        let produced = source.clone_ring(&mut self.pool, options)?;
        self.register(produced)
    }

    // ── Linked operations ──────────────────────────────────────────

    /// Apply `op` to every ring subscribed alongside `caller`, the caller
    /// included.
    ///
    /// The caller must name its hub and the hub must list the caller.
    /// Rings produced by `Split` and `Clone` are registered here and
    /// reported as [`Outcome::Spawned`].
    pub fn linked(&mut self, caller: &RingId, op: Op<T>) -> Result<Fanout, WeaveError> {
        let hub_id = self.confirmed_hub(caller)?;
        if let Op::Clone { bind_to_original } = op {
            return Ok(self.clone_each(&hub_id, bind_to_original));
        }
        let hub = self
            .hubs
            .get(&hub_id)
            .ok_or(WeaveError::UnknownHub { hub: hub_id.clone() })?;
        let mut results = hub.broadcast(&mut self.rings, &mut self.pool, &op);
        for (id, slot) in results.iter_mut() {
            if let Some(Outcome::Ring(_)) = slot {
                if let Some(Outcome::Ring(ring)) = slot.take() {
                    *slot = match self.register(ring) {
                        Ok(spawned) => Some(Outcome::Spawned(spawned)),
                        Err(error) => {
                            debug!(hub = %hub_id, ring = %id, op = op.name(), %error, "produced ring not registered");
                            None
                        }
                    };
                }
            }
        }
        Ok(results)
    }

    /// Clone every subscriber of `hub_id` in subscription order.
    fn clone_each(&mut self, hub_id: &HubId, bind_to_original: bool) -> Fanout {
        let subscribers = self
            .hubs
            .get(hub_id)
            .map(|hub| hub.subscribers().to_vec())
            .unwrap_or_default();
        let mut results = IndexMap::with_capacity(subscribers.len());
        for id in subscribers {
            let options = CloneOptions {
                id: None,
                bind_to_original,
            };
            let outcome = match self.clone_ring(&id, options) {
                Ok(spawned) => Some(Outcome::Spawned(spawned)),
                Err(error) => {
                    debug!(hub = %hub_id, ring = %id, op = "clone", %error, "subscriber failed");
                    None
                }
            };
            results.insert(id, outcome);
        }
        results
    }

    /// Linked [`Ring::append`].
    pub fn linked_append(&mut self, caller: &RingId, item: Item<T>) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::Append(item))
    }

    /// Linked [`Ring::prepend`].
    pub fn linked_prepend(&mut self, caller: &RingId, item: Item<T>) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::Prepend(item))
    }

    /// Linked [`Ring::insert`].
    pub fn linked_insert(
        &mut self,
        caller: &RingId,
        item: Item<T>,
        position: Position,
        overwrite: bool,
    ) -> Result<Fanout, WeaveError> {
        self.linked(
            caller,
            Op::Insert {
                item,
                position,
                overwrite,
            },
        )
    }

    /// Linked [`Ring::pop`].
    pub fn linked_pop(&mut self, caller: &RingId, target: Target) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::Pop(target))
    }

    /// Linked [`Ring::remove`].
    pub fn linked_remove(&mut self, caller: &RingId, filter: Filter<T>) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::Remove(filter))
    }

    /// Linked [`Ring::replace`].
    pub fn linked_replace(
        &mut self,
        caller: &RingId,
        item: Item<T>,
        selector: Selector<T>,
    ) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::Replace { item, selector })
    }

    /// Linked [`Ring::get_nodes`].
    pub fn linked_get_nodes(&mut self, caller: &RingId, filter: Filter<T>) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::GetNodes(filter))
    }

    /// Linked [`Ring::set_values`].
    pub fn linked_set_values(&mut self, caller: &RingId, value: T, filter: Filter<T>) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::SetValues { value, filter })
    }

    /// Linked [`Ring::clone_ring`]; clones get automatic ids.
    pub fn linked_clone(&mut self, caller: &RingId, bind_to_original: bool) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::Clone { bind_to_original })
    }

    /// Linked [`Ring::reverse`].
    pub fn linked_reverse(&mut self, caller: &RingId) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::Reverse)
    }

    /// Linked [`Ring::clear`].
    pub fn linked_clear(&mut self, caller: &RingId) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::Clear)
    }

    /// Linked [`Ring::split`]; each piece is registered as `"{ring}_split"`.
    pub fn linked_split(&mut self, caller: &RingId, index: isize) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::Split(index))
    }

    /// Linked [`Ring::index_of`].
    pub fn linked_index_of(&mut self, caller: &RingId, value: T) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::IndexOf(value))
    }

    /// Linked [`Ring::node_at`].
    pub fn linked_value_of(&mut self, caller: &RingId, index: isize) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::ValueOf(index))
    }

    /// Linked [`Ring::is_empty`].
    pub fn linked_is_empty(&mut self, caller: &RingId) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::IsEmpty)
    }

    /// Linked [`Ring::head`].
    pub fn linked_get_head(&mut self, caller: &RingId) -> Result<Fanout, WeaveError> {
        self.linked(caller, Op::GetHead)
    }

    /// Combine `caller` with the other rings of its hub; see
    /// [`Hub::extend`].
    pub fn linked_extend(
        &mut self,
        caller: &RingId,
        mode: ExtendMode,
        options: ExtendOptions,
    ) -> Result<Fanout, WeaveError> {
        let hub_id = self.confirmed_hub(caller)?;
        let hub = self
            .hubs
            .get(&hub_id)
            .ok_or(WeaveError::UnknownHub { hub: hub_id.clone() })?;
        Ok(hub.extend(&mut self.rings, &mut self.pool, caller, mode, options)?)
    }
}

impl<T> Default for Weave<T> {
    fn default() -> Self {
        Self::new()
    }
}
