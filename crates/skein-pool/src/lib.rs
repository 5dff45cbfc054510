//! Generational node arena for skein ring graphs.
//!
//! Nodes are shared by every ring that lists them, so no ring can own
//! them. This crate inverts the model:
//!
//! ```text
//! NodePool<T>   - owns nodes, hands out stable NodeKeys
//! └── Node<T>   - value + name + link table (RingId → Links { prev, next })
//! Ring          - coordinates keys, owns nothing
//! ```
//!
//! # Critical invariant: same pool instance
//!
//! Every operation on a ring must use the pool its nodes were allocated
//! in. Keys from another pool may resolve to unrelated nodes.
//!
//! ```
//! use skein_core::RingId;
//! use skein_pool::{Direction, NodePool};
//!
//! let mut pool = NodePool::new();
//! let ring = RingId::named("r");
//! let a = pool.alloc(1);
//! pool.link(a, &ring).unwrap();
//! pool.set_neighbor(a, &ring, Direction::Next, Some(a)).unwrap();
//! pool.set_neighbor(a, &ring, Direction::Prev, Some(a)).unwrap();
//! assert_eq!(pool.next(a, &ring).unwrap(), a);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod node;
pub mod pool;

pub use config::PoolConfig;
pub use node::{Direction, Links, Node};
pub use pool::NodePool;
