//! Node pool configuration parameters.

/// Configuration for a [`NodePool`](crate::NodePool).
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Number of node slots reserved up front.
    ///
    /// Default: 64. The pool grows past this on demand; the value only
    /// avoids reallocation for workloads with a known size.
    pub initial_capacity: usize,
}

impl PoolConfig {
    /// Default initial slot reservation.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

    /// A config reserving `initial_capacity` slots.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_INITIAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity() {
        assert_eq!(PoolConfig::default().initial_capacity, 64);
        assert_eq!(PoolConfig::with_capacity(8).initial_capacity, 8);
    }
}
