//! Core types for skein ring graphs.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers shared by every layer ([`RingId`], [`HubId`],
//! [`NodeName`], [`NodeKey`]), the error taxonomy, and the [`Payload`]
//! trait that decides how node values are compared.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod payload;

pub use error::{ConfigError, ErrorKind, HubError, LinkError, RingError};
pub use id::{HubId, Ident, Indices, NodeKey, NodeName, RingId};
pub use payload::{Payload, Value};
