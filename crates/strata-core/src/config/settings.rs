use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::builder::PropertiesConfigBuilder;
use crate::error::Result;
use crate::source::HostContext;
use crate::types::PathSpec;

/// File name loaded when none is configured.
pub const DEFAULT_FILE_NAME: &str = "application.properties";

/// Describes which properties files to load and in what order.
///
/// A configuration is immutable once built. Use [`PropertiesConfig::builder`]
/// to create one, or [`PropertiesConfig::with_paths`] to derive a copy with
/// extra paths.
///
/// # Example
///
/// ```
/// use strata_core::PropertiesConfig;
///
/// let config = PropertiesConfig::builder()
///     .override_suffix("-unittest")
///     .path("conf")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.file_name(), "application.properties");
/// assert_eq!(
///     config.suffixed_file_name().as_deref(),
///     Some("application-unittest.properties")
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesConfig {
    /// Base file name looked up in every location.
    #[serde(default = "default_file_name")]
    pub(crate) file_name: String,

    /// Suffix inserted before the extension for override files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) override_suffix: Option<String>,

    /// Whether the resource root is loaded first as the defaults layer.
    #[serde(default = "default_true")]
    pub(crate) load_defaults_from_root: bool,

    /// Whether a per-source record is kept for diagnostics.
    #[serde(default)]
    pub(crate) record_sources: bool,

    /// Raw path strings, in load order, without duplicates.
    #[serde(default)]
    pub(crate) paths: IndexSet<String>,

    /// Hosting container, when running inside one.
    #[serde(skip)]
    pub(crate) host_context: Option<Arc<dyn HostContext>>,
}

pub(crate) fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            override_suffix: None,
            load_defaults_from_root: true,
            record_sources: false,
            paths: IndexSet::new(),
            host_context: None,
        }
    }
}

impl PropertiesConfig {
    /// Creates a new builder.
    pub fn builder() -> PropertiesConfigBuilder {
        PropertiesConfigBuilder::default()
    }

    /// Returns a copy of this configuration with `paths` appended.
    ///
    /// Paths already present keep their original position.
    pub fn with_paths<I, S>(&self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut copy = self.clone();
        copy.paths.extend(paths.into_iter().map(Into::into));
        copy
    }

    /// Returns the base file name.
    pub fn file_name(&self) -> &str {
        if self.file_name.is_empty() {
            DEFAULT_FILE_NAME
        } else {
            &self.file_name
        }
    }

    /// Returns the override suffix, if one is configured.
    pub fn override_suffix(&self) -> Option<&str> {
        self.override_suffix.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns the override file name: the suffix inserted before the
    /// extension of the base file name.
    ///
    /// `application.properties` with suffix `-dev` becomes
    /// `application-dev.properties`; a name without extension just gets
    /// the suffix appended.
    pub fn suffixed_file_name(&self) -> Option<String> {
        let suffix = self.override_suffix()?;
        let file_name = self.file_name();

        let name_start = file_name.rfind('/').map_or(0, |i| i + 1);
        let suffixed = match file_name[name_start..].rfind('.') {
            Some(dot) if dot > 0 => {
                let (stem, ext) = file_name.split_at(name_start + dot);
                format!("{stem}{suffix}{ext}")
            },
            _ => format!("{file_name}{suffix}"),
        };

        Some(suffixed)
    }

    /// Returns whether the resource root is loaded as the defaults layer.
    pub fn load_defaults_from_root(&self) -> bool {
        self.load_defaults_from_root
    }

    /// Returns whether per-source records are kept.
    pub fn record_sources(&self) -> bool {
        self.record_sources
    }

    /// Returns the raw paths in load order.
    pub fn paths(&self) -> impl ExactSizeIterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Returns the hosting container context, if any.
    pub fn host_context(&self) -> Option<&Arc<dyn HostContext>> {
        self.host_context.as_ref()
    }

    /// Parses every configured path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPathType` for the first path with an unknown prefix.
    pub fn path_specs(&self) -> Result<Vec<PathSpec>> {
        let in_container = self.host_context.is_some();
        self.paths
            .iter()
            .map(|raw| PathSpec::parse(raw, in_container))
            .collect()
    }
}

impl fmt::Display for PropertiesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "file_name={}, override_suffix={}, load_defaults_from_root={}, record_sources={}, paths=[{}]",
            self.file_name(),
            self.override_suffix().unwrap_or("<none>"),
            self.load_defaults_from_root,
            self.record_sources,
            self.paths().collect::<Vec<_>>().join(", "),
        )?;
        if let Some(ctx) = &self.host_context {
            write!(f, ", host_context={}", ctx.context_path())?;
        }
        Ok(())
    }
}
