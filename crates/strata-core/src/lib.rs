//! Strata Core - Domain types and collaborator seams
//!
//! This crate provides the foundational pieces the Strata loader is built
//! from: the error taxonomy, path specifications, the load configuration,
//! and the providers for environment values, system properties, bundled
//! resources and hosting containers.

pub mod config;
pub mod error;
pub mod format;
pub mod source;
pub mod types;

pub use config::{DEFAULT_FILE_NAME, PropertiesConfig, PropertiesConfigBuilder};
pub use error::{Result, StrataError};
pub use format::PropertiesFormat;
pub use source::{
    BundledResource, CATALINA_BASE, CATALINA_COMMON, ContainerContext, DirectoryResources,
    EmbeddedResources, HostContext, MapProvider, ProcessEnv, ResourceProvider, SystemProperties,
    ValueProvider, resource_path,
};
pub use types::{PathSpec, SourceType, split_path};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }

    #[test]
    fn version_is_semver() {
        let v = version();
        assert_eq!(v.split('.').count(), 3, "Version should be semver");
    }
}
