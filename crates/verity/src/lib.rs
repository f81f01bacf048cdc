//! Facade crate for Verity features and shared modules.
//! Re-exports domain/kernel primitives and wires the registry from configuration.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust
//! let config = verity::kernel::config::load_verity_config(None).unwrap();
//! let registry = verity::init(&config);
//! assert!(registry.packages(verity::domain::UserId(0)).is_empty());
//! ```

use verity_domain::config::VerityConfig;
pub use verity_domain as domain;
pub use verity_kernel as kernel;
pub use verity_ownership as ownership;

#[cfg(feature = "codec")]
pub use verity_codec as codec;
#[cfg(feature = "timezone")]
pub use verity_timezone as timezone;

/// Feature registry for runtime introspection.
pub mod features {
    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "ownership",
        #[cfg(feature = "codec")]
        "codec",
        #[cfg(feature = "timezone")]
        "timezone",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Builds the ownership registry described by `config`.
#[must_use]
pub fn init(config: &VerityConfig) -> ownership::HostOwnershipRegistry {
    ownership::HostOwnershipRegistry::new(config.registry.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_is_always_enabled() {
        assert!(features::is_enabled("ownership"));
        assert!(!features::is_enabled("licensing"));
    }
}
