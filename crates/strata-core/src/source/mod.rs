//! Collaborators consumed while loading and evaluating properties.
//!
//! Everything the engine reads from the outside world goes through one of
//! the seams defined here.

mod container;
mod resources;
mod values;

pub use container::{CATALINA_BASE, CATALINA_COMMON, ContainerContext, HostContext};
pub use resources::{
    BundledResource, DirectoryResources, EmbeddedResources, ResourceProvider, resource_path,
};
pub use values::{MapProvider, ProcessEnv, SystemProperties, ValueProvider};
