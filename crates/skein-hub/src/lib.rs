//! Publish/subscribe fan-out of ring operations.
//!
//! A [`Hub`] lists rings by id. [`Hub::broadcast`] applies one [`Op`] to
//! every listed ring in subscription order and reports a per-ring
//! [`Outcome`], or `None` where that ring refused the operation. One
//! subscriber failing never stops the others.
//!
//! ```
//! use indexmap::IndexMap;
//! use skein_hub::{Hub, Op};
//! use skein_pool::NodePool;
//! use skein_ring::{Item, Ring};
//!
//! let mut pool = NodePool::new();
//! let mut hub = Hub::new("hub");
//! let mut rings = IndexMap::new();
//! for (id, values) in [("a", vec![1, 2]), ("b", vec![3])] {
//!     let mut ring = Ring::from_values(&mut pool, id, values).unwrap();
//!     hub.subscribe(&mut ring).unwrap();
//!     rings.insert(ring.id().clone(), ring);
//! }
//!
//! let results = hub.broadcast(&mut rings, &mut pool, &Op::Append(Item::Value(9)));
//! assert!(results.values().all(Option::is_some));
//! assert_eq!(rings[0].display(&pool).to_string(), "[1, 2, 9]");
//! assert_eq!(rings[1].display(&pool).to_string(), "[3, 9]");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod hub;
pub mod op;
pub mod subscriber;

pub use hub::{ExtendMode, Fanout, Hub};
pub use op::{Op, Outcome};
pub use subscriber::{HubMember, Subscriber};
