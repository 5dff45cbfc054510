//! Weave and hub construction parameters.

use skein_core::{ConfigError, HubId, Ident, RingId};
use skein_pool::PoolConfig;

// ── WeaveConfig ────────────────────────────────────────────────────

/// Construction parameters for a [`Weave`](crate::Weave).
#[derive(Clone, Debug, Default)]
pub struct WeaveConfig {
    /// Sizing for the shared node pool.
    pub pool: PoolConfig,
}

// ── HubConfig ──────────────────────────────────────────────────────

/// Construction parameters for a hub registered in a weave.
#[derive(Clone, Debug, Default)]
pub struct HubConfig {
    /// Hub identifier. `None` allocates an automatic one.
    pub id: Option<HubId>,
    /// Rings to subscribe right away, in order. Each must already exist in
    /// the weave and must not have a hub yet.
    pub subscribers: Vec<RingId>,
}

impl HubConfig {
    /// A config with a caller-chosen id and no subscribers.
    pub fn named(id: impl Into<HubId>) -> Self {
        Self {
            id: Some(id.into()),
            subscribers: Vec::new(),
        }
    }

    /// Builder-style subscriber list.
    pub fn with_subscribers<I, R>(mut self, rings: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RingId>,
    {
        self.subscribers = rings.into_iter().map(Into::into).collect();
        self
    }

    /// Check names and reject a ring listed twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(id) = &self.id {
            if matches!(id.ident(), Ident::Named(n) if n.is_empty()) {
                return Err(ConfigError::EmptyName { field: "hub id" });
            }
        }
        for (i, ring) in self.subscribers.iter().enumerate() {
            if self.subscribers[..i].contains(ring) {
                return Err(ConfigError::DuplicateSubscriber { ring: ring.clone() });
            }
        }
        Ok(())
    }

    /// The configured id, or a fresh automatic one.
    pub fn resolve_id(&self) -> HubId {
        self.id.clone().unwrap_or_else(HubId::auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_core::ErrorKind;

    #[test]
    fn duplicate_subscriber_rejected() {
        let config = HubConfig::named("h").with_subscribers(["a", "b", "a"]);
        let err = config.validate().unwrap_err();
        assert_eq!(err, ConfigError::DuplicateSubscriber { ring: RingId::named("a") });
        assert_eq!(err.kind(), ErrorKind::AlreadySubscribed);
    }

    #[test]
    fn empty_hub_name_rejected() {
        let err = HubConfig::named("").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert!(HubConfig::default().validate().is_ok());
    }

    #[test]
    fn default_weave_pool() {
        assert_eq!(WeaveConfig::default().pool.initial_capacity, PoolConfig::DEFAULT_INITIAL_CAPACITY);
    }
}
