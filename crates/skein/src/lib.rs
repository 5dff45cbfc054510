//! Skein: circular doubly-linked rings that share nodes, with broadcast
//! coordination between them.
//!
//! This is the top-level facade crate. It re-exports the sub-crates and adds
//! [`Weave`], which owns one node pool together with every ring and hub
//! built over it. For most users, adding `skein` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use skein::prelude::*;
//!
//! let mut weave = Weave::new();
//! let hub = weave.create_hub(HubConfig::named("hub")).unwrap();
//! let l1 = weave
//!     .create_ring_from_values(RingConfig::named("l1").with_hub(hub.clone()), [1, 2, 3])
//!     .unwrap();
//! let l2 = weave
//!     .create_ring_from_values(RingConfig::named("l2").with_hub(hub), [9])
//!     .unwrap();
//!
//! // One call, mirrored to every subscriber of l1's hub.
//! weave.linked_append(&l1, Item::Value(99)).unwrap();
//!
//! let l1_values: Vec<i32> = weave.values(&l1).unwrap().copied().collect();
//! let l2_values: Vec<i32> = weave.values(&l2).unwrap().copied().collect();
//! assert_eq!(l1_values, [1, 2, 3, 99]);
//! assert_eq!(l2_values, [9, 99]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `skein-core` | Ids, error taxonomy, payload equality |
//! | [`pool`] | `skein-pool` | Nodes, per-ring link tables, the node arena |
//! | [`ring`] | `skein-ring` | Rings, selectors, iterators, presentation |
//! | [`hub`] | `skein-hub` | Subscription registry and operation fan-out |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod weave;

pub use config::{HubConfig, WeaveConfig};
pub use error::WeaveError;
pub use weave::Weave;

/// Ids, errors and payloads (`skein-core`).
pub use skein_core as types;

/// Nodes and the node arena (`skein-pool`).
///
/// [`pool::NodePool`] owns every node; rings only hold keys into it.
pub use skein_pool as pool;

/// Rings and their operations (`skein-ring`).
pub use skein_ring as ring;

/// Subscription hubs (`skein-hub`).
pub use skein_hub as hub;

/// Common imports for typical skein usage.
///
/// ```rust
/// use skein::prelude::*;
/// ```
pub mod prelude {
    // Ids and errors
    pub use skein_core::{
        ErrorKind, HubError, HubId, LinkError, NodeKey, NodeName, Payload, RingError, RingId, Value,
    };

    // Pool
    pub use skein_pool::{NodePool, PoolConfig};

    // Rings
    pub use skein_ring::{
        CloneOptions, ExtendOptions, Filter, Item, Position, Ring, RingConfig, Selector, Target,
    };

    // Hubs
    pub use skein_hub::{ExtendMode, Hub, HubMember, Op, Outcome, Subscriber};

    // Weave
    pub use crate::{HubConfig, Weave, WeaveConfig, WeaveError};
}
