//! The interface a hub drives for each subscriber.

use skein_core::{HubId, Payload, RingError, RingId};
use skein_pool::NodePool;
use skein_ring::{CloneOptions, Ring};

use crate::op::{Op, Outcome};

/// The membership half of a subscriber: what a [`Hub`](crate::Hub) needs
/// to list and unlist it. Independent of the payload type.
pub trait HubMember {
    /// Identifier the hub lists this subscriber under.
    fn ring_id(&self) -> &RingId;

    /// The hub this subscriber believes it belongs to.
    fn hub(&self) -> Option<&HubId>;

    /// Record (or clear) the hub reference, returning the previous one.
    fn set_hub(&mut self, hub: Option<HubId>) -> Option<HubId>;
}

/// Something a [`Hub`](crate::Hub) can fan operations out to.
///
/// [`Ring`] is the production implementation. The trait exists so tests
/// (and wrappers that observe or veto operations) can stand in for a ring
/// without the hub knowing the difference.
pub trait Subscriber<T>: HubMember {
    /// Apply one mirrored operation.
    fn apply(&mut self, pool: &mut NodePool<T>, op: &Op<T>) -> Result<Outcome, RingError>;
}

impl HubMember for Ring {
    fn ring_id(&self) -> &RingId {
        self.id()
    }

    fn hub(&self) -> Option<&HubId> {
        Ring::hub(self)
    }

    fn set_hub(&mut self, hub: Option<HubId>) -> Option<HubId> {
        Ring::set_hub(self, hub)
    }
}

impl<T: Payload> Subscriber<T> for Ring {
    fn apply(&mut self, pool: &mut NodePool<T>, op: &Op<T>) -> Result<Outcome, RingError> {
        let outcome = match op {
            Op::Append(item) => Outcome::Inserted(self.append(pool, item.clone())?),
            Op::Prepend(item) => Outcome::Inserted(self.prepend(pool, item.clone())?),
            Op::Insert {
                item,
                position,
                overwrite,
            } => Outcome::Inserted(self.insert(pool, item.clone(), *position, *overwrite)?),
            Op::Pop(target) => Outcome::Popped(self.pop(pool, target.clone())?),
            Op::Remove(filter) => Outcome::Nodes(self.remove(pool, filter)?),
            Op::Replace { item, selector } => {
                Outcome::Replaced(self.replace(pool, item.clone(), selector.clone())?)
            }
            Op::GetNodes(filter) => Outcome::Nodes(self.get_nodes(pool, filter)?),
            Op::SetValues { value, filter } => {
                Outcome::Nodes(self.set_values(pool, value.clone(), filter)?)
            }
            Op::Clone { bind_to_original } => {
                let options = CloneOptions {
                    id: None,
                    bind_to_original: *bind_to_original,
                };
                Outcome::Ring(self.clone_ring(pool, options)?)
            }
            Op::Reverse => {
                self.reverse(pool)?;
                Outcome::Done
            }
            Op::Clear => Outcome::Cleared(self.clear(pool)?),
            Op::Split(index) => {
                let id = self.id().derive("split");
                Outcome::Ring(self.split(pool, *index, Some(id))?)
            }
            Op::IndexOf(value) => Outcome::Indices(self.index_of(pool, value)?),
            Op::ValueOf(index) => Outcome::Node(self.node_at(pool, *index)?),
            Op::IsEmpty => Outcome::IsEmpty(self.is_empty()),
            Op::GetHead => Outcome::Head(self.head()),
        };
        Ok(outcome)
    }
}

impl<S: HubMember + ?Sized> HubMember for Box<S> {
    fn ring_id(&self) -> &RingId {
        (**self).ring_id()
    }

    fn hub(&self) -> Option<&HubId> {
        (**self).hub()
    }

    fn set_hub(&mut self, hub: Option<HubId>) -> Option<HubId> {
        (**self).set_hub(hub)
    }
}

impl<T, S: Subscriber<T> + ?Sized> Subscriber<T> for Box<S> {
    fn apply(&mut self, pool: &mut NodePool<T>, op: &Op<T>) -> Result<Outcome, RingError> {
        (**self).apply(pool, op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_core::ErrorKind;
    use skein_ring::{Filter, Item, Target};

    #[test]
    fn ring_applies_each_op() {
        let mut pool = NodePool::new();
        let mut ring = Ring::from_values(&mut pool, "r", [1, 2, 3]).unwrap();

        let out = ring.apply(&mut pool, &Op::Append(Item::Value(4))).unwrap();
        assert!(matches!(out, Outcome::Inserted(i) if i.index == 3));

        let out = ring.apply(&mut pool, &Op::IndexOf(2)).unwrap();
        assert!(matches!(out, Outcome::Indices(ref ix) if ix[..] == [1]));

        let out = ring.apply(&mut pool, &Op::Split(2)).unwrap();
        let split = out.into_ring().unwrap();
        assert_eq!(split.id(), &RingId::named("r_split"));
        assert_eq!(split.len(), 2);

        let out = ring.apply(&mut pool, &Op::GetNodes(Filter::All)).unwrap();
        assert!(matches!(out, Outcome::Nodes(ref n) if n.len() == 2));

        let out = ring.apply(&mut pool, &Op::IsEmpty).unwrap();
        assert!(matches!(out, Outcome::IsEmpty(false)));

        let err = ring.apply(&mut pool, &Op::Pop(Target::Index(7))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Index);
    }

    #[test]
    fn boxed_subscriber_delegates() {
        let mut pool = NodePool::new();
        let ring = Ring::from_values(&mut pool, "r", [1]).unwrap();
        let mut boxed: Box<dyn Subscriber<i32>> = Box::new(ring);
        assert_eq!(boxed.ring_id(), &RingId::named("r"));
        boxed.set_hub(Some(HubId::named("h")));
        assert_eq!(boxed.hub(), Some(&HubId::named("h")));
        let out = boxed.apply(&mut pool, &Op::GetHead).unwrap();
        assert!(matches!(out, Outcome::Head(Some(_))));
    }
}
