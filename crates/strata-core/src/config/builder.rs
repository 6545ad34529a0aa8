use std::sync::Arc;

use indexmap::IndexSet;
use tracing::debug;

use super::settings::{PropertiesConfig, default_file_name};
use crate::error::{Result, StrataError};
use crate::source::HostContext;

/// Builder for [`PropertiesConfig`].
///
/// Defaults:
///
/// | Field                     | Default                    |
/// |---------------------------|----------------------------|
/// | `file_name`               | `application.properties`   |
/// | `override_suffix`         | none                       |
/// | `load_defaults_from_root` | `true`                     |
/// | `record_sources`          | `false`                    |
/// | `paths`                   | empty                      |
/// | `host_context`            | none                       |
///
/// With a host context, the file name defaults to the context name and an
/// empty path list becomes `servlet:conf/apps/{context name}`.
#[derive(Debug, Default)]
pub struct PropertiesConfigBuilder {
    file_name: Option<String>,
    override_suffix: Option<String>,
    load_defaults_from_root: Option<bool>,
    record_sources: bool,
    paths: IndexSet<String>,
    host_context: Option<Arc<dyn HostContext>>,
}

impl PropertiesConfigBuilder {
    /// Sets the base file name.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Sets the override suffix.
    pub fn override_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.override_suffix = Some(suffix.into());
        self
    }

    /// Sets whether the resource root is loaded first as defaults.
    pub fn load_defaults_from_root(mut self, load: bool) -> Self {
        self.load_defaults_from_root = Some(load);
        self
    }

    /// Sets whether per-source records are kept.
    pub fn record_sources(mut self, record: bool) -> Self {
        self.record_sources = record;
        self
    }

    /// Appends a path. Duplicates are ignored.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.insert(path.into());
        self
    }

    /// Appends several paths. Duplicates are ignored.
    pub fn paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the hosting container context.
    pub fn host_context(mut self, context: Arc<dyn HostContext>) -> Self {
        self.host_context = Some(context);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when a host context is set, its
    /// context name is needed for a default, and that name is empty.
    pub fn build(self) -> Result<PropertiesConfig> {
        let file_name = self.file_name.filter(|name| !name.is_empty());
        let mut paths = self.paths;

        let file_name = match (&self.host_context, file_name) {
            (_, Some(name)) => name,
            (Some(ctx), None) => {
                let name = context_name(ctx.as_ref())?.to_string();
                debug!(file_name = %name, "Using container context name as file name");
                name
            },
            (None, None) => default_file_name(),
        };

        if let Some(ctx) = &self.host_context
            && paths.is_empty()
        {
            let path = format!("servlet:conf/apps/{}", context_name(ctx.as_ref())?);
            debug!(path = %path, "No paths given, using container default");
            paths.insert(path);
        }

        Ok(PropertiesConfig {
            file_name,
            override_suffix: self.override_suffix.filter(|s| !s.is_empty()),
            load_defaults_from_root: self.load_defaults_from_root.unwrap_or(true),
            record_sources: self.record_sources,
            paths,
            host_context: self.host_context,
        })
    }
}

fn context_name(ctx: &dyn HostContext) -> Result<&str> {
    let name = ctx.context_name();
    if name.is_empty() {
        return Err(StrataError::configuration(format!(
            "hosting container context path '{}' has no usable context name",
            ctx.context_path()
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ContainerContext, MapProvider};

    fn servlet_context(path: &str) -> Arc<dyn HostContext> {
        Arc::new(ContainerContext::new(path, Arc::new(MapProvider::new())))
    }

    #[test]
    fn test_builder_full() {
        let config = PropertiesConfig::builder()
            .file_name("myapp.properties")
            .override_suffix("-unittest")
            .load_defaults_from_root(false)
            .record_sources(true)
            .path("conf")
            .path("classpath:shared")
            .build()
            .unwrap();

        assert_eq!(config.file_name(), "myapp.properties");
        assert_eq!(config.override_suffix(), Some("-unittest"));
        assert!(!config.load_defaults_from_root());
        assert!(config.record_sources());
        assert_eq!(
            config.paths().collect::<Vec<_>>(),
            vec!["conf", "classpath:shared"]
        );
    }

    #[test]
    fn test_duplicate_paths_ignored() {
        let config = PropertiesConfig::builder()
            .paths(["conf", "other", "conf"])
            .build()
            .unwrap();

        assert_eq!(config.paths().collect::<Vec<_>>(), vec!["conf", "other"]);
    }

    #[test]
    fn test_empty_values_mean_defaults() {
        let config = PropertiesConfig::builder()
            .file_name("")
            .override_suffix("")
            .build()
            .unwrap();

        assert_eq!(config.file_name(), "application.properties");
        assert_eq!(config.suffixed_file_name(), None);
    }

    #[test]
    fn test_container_defaults() {
        let config = PropertiesConfig::builder()
            .host_context(servlet_context("/my-servlet"))
            .build()
            .unwrap();

        assert_eq!(config.file_name(), "my-servlet");
        assert_eq!(
            config.paths().collect::<Vec<_>>(),
            vec!["servlet:conf/apps/my-servlet"]
        );
    }

    #[test]
    fn test_container_keeps_explicit_values() {
        let config = PropertiesConfig::builder()
            .host_context(servlet_context("/my-servlet"))
            .file_name("my-servlet.conf")
            .path("custom")
            .build()
            .unwrap();

        assert_eq!(config.file_name(), "my-servlet.conf");
        assert_eq!(config.paths().collect::<Vec<_>>(), vec!["custom"]);
    }

    #[test]
    fn test_container_root_context_needs_names() {
        let err = PropertiesConfig::builder()
            .host_context(servlet_context("/"))
            .build()
            .unwrap_err();
        assert!(err.is_configuration_error());

        let ok = PropertiesConfig::builder()
            .host_context(servlet_context("/"))
            .file_name("root.properties")
            .path("conf")
            .build();
        assert!(ok.is_ok());
    }
}
