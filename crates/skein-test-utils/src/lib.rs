//! Test utilities and fixtures for skein development.
//!
//! [`fixtures`] builds pools and rings with little ceremony and provides a
//! [`FailingSubscriber`](fixtures::FailingSubscriber) for fan-out tests.
//! [`compliance`] holds structural assertions every ring and hub must
//! satisfy after any sequence of operations.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod compliance;
pub mod fixtures;

pub use compliance::{assert_hub_consistent, assert_ring_invariants, assert_scope_consistent};
pub use fixtures::{ring_of, values_of, FailingSubscriber, RecordingSubscriber};
