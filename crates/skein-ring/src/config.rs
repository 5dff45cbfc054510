//! Ring construction and restructuring options.

use skein_core::{ConfigError, HubId, Ident, RingId};

/// Construction parameters for a ring.
#[derive(Clone, Debug, Default)]
pub struct RingConfig {
    /// Ring identifier. `None` allocates an automatic one.
    pub id: Option<RingId>,
    /// Hub to subscribe to right after construction.
    pub hub: Option<HubId>,
}

impl RingConfig {
    /// A config with a caller-chosen id and no hub.
    pub fn named(id: impl Into<RingId>) -> Self {
        Self {
            id: Some(id.into()),
            hub: None,
        }
    }

    /// Builder-style hub assignment.
    pub fn with_hub(mut self, hub: impl Into<HubId>) -> Self {
        self.hub = Some(hub.into());
        self
    }

    /// Check that chosen names are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(id) = &self.id {
            if matches!(id.ident(), Ident::Named(n) if n.is_empty()) {
                return Err(ConfigError::EmptyName { field: "ring id" });
            }
        }
        if let Some(hub) = &self.hub {
            if matches!(hub.ident(), Ident::Named(n) if n.is_empty()) {
                return Err(ConfigError::EmptyName { field: "hub id" });
            }
        }
        Ok(())
    }

    /// The configured id, or a fresh automatic one.
    pub fn resolve_id(&self) -> RingId {
        self.id.clone().unwrap_or_else(RingId::auto)
    }
}

/// Options for [`Ring::extend`](crate::Ring::extend).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtendOptions {
    /// Drop the other ring's scope entries and leave it empty.
    ///
    /// Default: `true`.
    pub unlink_from_other: bool,
    /// Refuse to fuse when any node is a member of both rings.
    ///
    /// Default: `true`. Costs one pass over each ring plus a key set the
    /// size of the shorter one.
    pub check_for_shared_nodes: bool,
}

impl Default for ExtendOptions {
    fn default() -> Self {
        Self {
            unlink_from_other: true,
            check_for_shared_nodes: true,
        }
    }
}

/// Options for [`Ring::clone_ring`](crate::Ring::clone_ring).
#[derive(Clone, Debug, Default)]
pub struct CloneOptions {
    /// Id of the clone. `None` derives `"{id}_clone_{n}"`.
    pub id: Option<RingId>,
    /// Cross-link each clone node with its original.
    ///
    /// The clone node receives a snapshot of the original's link table, and
    /// the original gains an entry for the clone mirroring the clone node's
    /// neighbors.
    pub bind_to_original: bool,
}

impl CloneOptions {
    /// Options for a clone with a chosen id.
    pub fn named(id: impl Into<RingId>) -> Self {
        Self {
            id: Some(id.into()),
            bind_to_original: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ExtendOptions::default();
        assert!(opts.unlink_from_other);
        assert!(opts.check_for_shared_nodes);
        assert!(!CloneOptions::default().bind_to_original);
        assert!(RingConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_names_rejected() {
        let err = RingConfig::named("").validate().unwrap_err();
        assert_eq!(err, ConfigError::EmptyName { field: "ring id" });

        let err = RingConfig::named("ok").with_hub("").validate().unwrap_err();
        assert_eq!(err, ConfigError::EmptyName { field: "hub id" });
    }

    #[test]
    fn resolve_id_prefers_configured() {
        assert_eq!(RingConfig::named("x").resolve_id(), RingId::named("x"));
        assert!(RingConfig::default().resolve_id().ident().is_auto());
    }
}
