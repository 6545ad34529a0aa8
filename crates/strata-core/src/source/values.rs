//! Read-only key/value providers for placeholder evaluation.

use std::fmt;

use indexmap::IndexMap;

use super::container::{CATALINA_BASE, CATALINA_COMMON};

/// A read-only key to string lookup.
///
/// Two providers are consumed by the expression resolver: one for
/// environment variables (`${env:...}`) and one for system-level properties
/// (`${prop:...}`).
pub trait ValueProvider: Send + Sync + fmt::Debug {
    /// Returns the value for `key`, or `None` when it is not set.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The environment of the running process.
///
/// Variables whose value is not valid Unicode are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ValueProvider for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of values.
///
/// # Example
///
/// ```
/// use strata_core::{MapProvider, ValueProvider};
///
/// let env = MapProvider::new().with("FOO", "bar");
/// assert_eq!(env.lookup("FOO").as_deref(), Some("bar"));
/// assert_eq!(env.lookup("BAR"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapProvider {
    values: IndexMap<String, String>,
}

impl MapProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the provider with one more value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the provider holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl ValueProvider for MapProvider {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapProvider
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// System-level properties of the running process.
///
/// Seeded by [`SystemProperties::current`] with:
///
/// - `user.dir` - current working directory
/// - `user.home` - home directory of the current user
/// - `user.name` - login name (from `USER` or `USERNAME`)
/// - `os.name`, `os.arch` - target operating system and architecture
/// - `file.separator`, `path.separator`, `line.separator`
/// - `catalina.common`, `catalina.base` - from the `CATALINA_COMMON` and
///   `CATALINA_BASE` environment variables
///
/// Values that cannot be determined are left unset. Callers add their own
/// entries with [`SystemProperties::with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemProperties {
    values: MapProvider,
}

impl SystemProperties {
    /// Creates an empty set of system properties.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Captures the properties of the current process.
    pub fn current() -> Self {
        Self::from_env(&ProcessEnv)
    }

    /// Captures the properties of the current process, reading the login
    /// name and container directories from `env`.
    ///
    /// `CATALINA_COMMON` and `CATALINA_BASE` become [`CATALINA_COMMON`] and
    /// [`CATALINA_BASE`] when set.
    pub fn from_env(env: &dyn ValueProvider) -> Self {
        let mut values = MapProvider::new()
            .with("os.name", std::env::consts::OS)
            .with("os.arch", std::env::consts::ARCH)
            .with("file.separator", std::path::MAIN_SEPARATOR_STR)
            .with("path.separator", if cfg!(windows) { ";" } else { ":" })
            .with("line.separator", if cfg!(windows) { "\r\n" } else { "\n" });

        if let Ok(dir) = std::env::current_dir() {
            values = values.with("user.dir", dir.to_string_lossy());
        }
        if let Some(home) = dirs::home_dir() {
            values = values.with("user.home", home.to_string_lossy());
        }
        if let Some(name) = env.lookup("USER").or_else(|| env.lookup("USERNAME")) {
            values = values.with("user.name", name);
        }
        let container_vars = [
            ("CATALINA_COMMON", CATALINA_COMMON),
            ("CATALINA_BASE", CATALINA_BASE),
        ];
        for (var, key) in container_vars {
            if let Some(dir) = env.lookup(var).filter(|dir| !dir.is_empty()) {
                values = values.with(key, dir);
            }
        }

        Self { values }
    }

    /// Returns the properties with one more value, replacing any existing one.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values = self.values.with(key, value);
        self
    }
}

impl ValueProvider for SystemProperties {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.lookup(key)
    }
}
