//! Registry configuration

/// Configuration for the process-wide registry
///
/// Install with [`configure`](crate::configure) before the first
/// registration or query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Collect embedded sources submitted by `#[derive(Reflect)]` when the
    /// registry starts (default: true)
    pub autoload_embedded: bool,
    /// Build every name index when a descriptor is first resolved, so
    /// duplicate and unnamed entries surface immediately instead of at
    /// first lookup (default: false)
    pub eager_validation: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            autoload_embedded: true,
            eager_validation: false,
        }
    }
}
