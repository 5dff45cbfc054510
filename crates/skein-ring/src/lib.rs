//! Circular doubly-linked rings over a shared node pool.
//!
//! A [`Ring`] is one traversal order over a subset of the nodes in a
//! [`NodePool`](skein_pool::NodePool). Many rings can list the same node;
//! each keeps its own `prev`/`next` pair inside the node, keyed by ring id,
//! and never touches another ring's pair.
//!
//! Every operation takes the pool explicitly:
//!
//! ```
//! use skein_pool::NodePool;
//! use skein_ring::{Item, Ring};
//!
//! let mut pool = NodePool::new();
//! let mut evens = Ring::from_values(&mut pool, "evens", [0, 2, 4]).unwrap();
//! let mut all = Ring::from_values(&mut pool, "all", [1, 3]).unwrap();
//!
//! // Share evens' head with `all`.
//! let zero = evens.head().unwrap();
//! all.prepend(&mut pool, Item::Node(zero)).unwrap();
//!
//! assert_eq!(all.display(&pool).to_string(), "[0, 1, 3]");
//! evens.reverse(&mut pool).unwrap();
//! assert_eq!(evens.display(&pool).to_string(), "[4, 2, 0]");
//! assert_eq!(all.display(&pool).to_string(), "[0, 1, 3]");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod fmt;
pub mod iter;
pub mod ring;
pub mod select;

pub use config::{CloneOptions, ExtendOptions, RingConfig};
pub use fmt::{RingDescription, RingDisplay};
pub use iter::{Iter, RevIter, Values};
pub use ring::{Inserted, Ring};
pub use select::{Filter, Item, Position, Selector, Target};
