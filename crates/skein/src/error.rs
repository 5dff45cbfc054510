//! Errors surfaced by [`Weave`](crate::Weave).

use std::error::Error;
use std::fmt;

use skein_core::{ConfigError, ErrorKind, HubError, HubId, LinkError, RingError, RingId};

/// Failure of a weave-level operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WeaveError {
    /// A ring operation failed.
    Ring(RingError),
    /// A hub operation failed.
    Hub(HubError),
    /// A config struct failed `validate()`.
    Config(ConfigError),
    /// No ring with this id is registered.
    UnknownRing {
        /// The id that was looked up.
        ring: RingId,
    },
    /// No hub with this id is registered.
    UnknownHub {
        /// The id that was looked up.
        hub: HubId,
    },
    /// A ring with this id is already registered.
    DuplicateRing {
        /// The colliding id.
        ring: RingId,
    },
    /// A hub with this id is already registered.
    DuplicateHub {
        /// The colliding id.
        hub: HubId,
    },
}

impl WeaveError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ring(e) => e.kind(),
            Self::Hub(e) => e.kind(),
            Self::Config(e) => e.kind(),
            Self::UnknownRing { .. } | Self::UnknownHub { .. } => ErrorKind::NotFound,
            Self::DuplicateRing { .. } | Self::DuplicateHub { .. } => ErrorKind::Argument,
        }
    }
}

impl fmt::Display for WeaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ring(e) => write!(f, "ring error: {e}"),
            Self::Hub(e) => write!(f, "hub error: {e}"),
            Self::Config(e) => write!(f, "invalid config: {e}"),
            Self::UnknownRing { ring } => write!(f, "no ring {ring} in this weave"),
            Self::UnknownHub { hub } => write!(f, "no hub {hub} in this weave"),
            Self::DuplicateRing { ring } => write!(f, "ring {ring} already exists"),
            Self::DuplicateHub { hub } => write!(f, "hub {hub} already exists"),
        }
    }
}

impl Error for WeaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ring(e) => Some(e),
            Self::Hub(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RingError> for WeaveError {
    fn from(e: RingError) -> Self {
        Self::Ring(e)
    }
}

impl From<LinkError> for WeaveError {
    fn from(e: LinkError) -> Self {
        Self::Ring(RingError::Link(e))
    }
}

impl From<HubError> for WeaveError {
    fn from(e: HubError) -> Self {
        Self::Hub(e)
    }
}

impl From<ConfigError> for WeaveError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
