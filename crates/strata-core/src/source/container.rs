//! Hosting-container context.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::values::{SystemProperties, ValueProvider};
use crate::error::{Result, StrataError};

/// Setting naming the shared configuration directory of the container.
pub const CATALINA_COMMON: &str = "catalina.common";

/// Setting naming the base directory of the container instance.
pub const CATALINA_BASE: &str = "catalina.base";

/// The part of a web-hosting container that property loading relies on.
pub trait HostContext: Send + Sync + fmt::Debug {
    /// The context path the application is deployed under, e.g. `/shop`.
    fn context_path(&self) -> &str;

    /// Looks up an external configuration value of the container.
    fn setting(&self, name: &str) -> Option<String>;

    /// The context name: the context path without its leading `/`.
    fn context_name(&self) -> &str {
        let path = self.context_path();
        path.strip_prefix('/').unwrap_or(path)
    }

    /// Resolves the directory below which `servlet:` paths live.
    ///
    /// Reads [`CATALINA_COMMON`] first and falls back to [`CATALINA_BASE`].
    /// Empty values count as unset.
    fn base_directory(&self) -> Result<PathBuf> {
        [CATALINA_COMMON, CATALINA_BASE]
            .into_iter()
            .filter_map(|name| self.setting(name))
            .find(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                StrataError::configuration(format!(
                    "Failed to find {CATALINA_COMMON} or {CATALINA_BASE} settings for the hosting container"
                ))
            })
    }
}

/// A host context backed by a context path and a value provider.
#[derive(Debug, Clone)]
pub struct ContainerContext {
    context_path: String,
    settings: Arc<dyn ValueProvider>,
}

impl ContainerContext {
    /// Creates a context whose settings come from `settings`.
    pub fn new(context_path: impl Into<String>, settings: Arc<dyn ValueProvider>) -> Self {
        Self {
            context_path: context_path.into(),
            settings,
        }
    }

    /// Creates a context whose settings are `system`, usually
    /// [`SystemProperties::current`].
    pub fn from_system(context_path: impl Into<String>, system: SystemProperties) -> Self {
        Self::new(context_path, Arc::new(system))
    }
}

impl HostContext for ContainerContext {
    fn context_path(&self) -> &str {
        &self.context_path
    }

    fn setting(&self, name: &str) -> Option<String> {
        self.settings.lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MapProvider;

    fn context(settings: MapProvider) -> ContainerContext {
        ContainerContext::new("/my-servlet", Arc::new(settings))
    }

    #[test]
    fn test_context_name_strips_slash() {
        let ctx = context(MapProvider::new());
        assert_eq!(ctx.context_name(), "my-servlet");
    }

    #[test]
    fn test_common_wins_over_base() {
        let ctx = context(
            MapProvider::new()
                .with(CATALINA_COMMON, "/opt/common")
                .with(CATALINA_BASE, "/opt/base"),
        );
        assert_eq!(ctx.base_directory().unwrap(), PathBuf::from("/opt/common"));
    }

    #[test]
    fn test_falls_back_to_base() {
        let ctx = context(
            MapProvider::new()
                .with(CATALINA_COMMON, "")
                .with(CATALINA_BASE, "/opt/base"),
        );
        assert_eq!(ctx.base_directory().unwrap(), PathBuf::from("/opt/base"));
    }

    #[test]
    fn test_from_system_reads_container_env() {
        let env = MapProvider::new().with("CATALINA_BASE", "/opt/tomcat");
        let ctx = ContainerContext::from_system("/shop", SystemProperties::from_env(&env));

        assert_eq!(ctx.context_name(), "shop");
        assert_eq!(ctx.base_directory().unwrap(), PathBuf::from("/opt/tomcat"));
    }

    #[test]
    fn test_from_system_with_explicit_setting() {
        let system = SystemProperties::empty().with(CATALINA_COMMON, "/srv/shared");
        let ctx = ContainerContext::from_system("/shop", system);

        assert_eq!(ctx.base_directory().unwrap(), PathBuf::from("/srv/shared"));
    }

    #[test]
    fn test_missing_base_directory() {
        let err = context(MapProvider::new()).base_directory().unwrap_err();

        assert!(err.is_configuration_error());
        assert!(err.to_string().contains(CATALINA_BASE));
    }
}
