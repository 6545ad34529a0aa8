//! Typed, memoizing access to loaded properties.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use strata_core::{
    DirectoryResources, ProcessEnv, PropertiesConfig, ResourceProvider, Result, StrataError,
    SystemProperties, ValueProvider,
};
use tracing::{info, warn};

use crate::expression::ExpressionResolver;
use crate::loader::LayeredLoader;
use crate::store::{PropertyStore, SourceRecord};

/// Per-call options for [`ApplicationProperties::get_with`].
///
/// Defaults: no default value, escaped newlines decoded, placeholders
/// evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions<'a> {
    default: Option<&'a str>,
    decode_escaped_newlines: bool,
    evaluate: bool,
}

impl Default for GetOptions<'_> {
    fn default() -> Self {
        Self {
            default: None,
            decode_escaped_newlines: true,
            evaluate: true,
        }
    }
}

impl<'a> GetOptions<'a> {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value used when the property is absent or empty.
    pub fn with_default(mut self, default: &'a str) -> Self {
        self.default = Some(default);
        self
    }

    /// Whether a literal `\n` (backslash, `n`) becomes a newline.
    pub fn decode_escaped_newlines(mut self, decode: bool) -> Self {
        self.decode_escaped_newlines = decode;
        self
    }

    /// Whether `${env:..}`/`${prop:..}` placeholders are evaluated.
    pub fn evaluate(mut self, evaluate: bool) -> Self {
        self.evaluate = evaluate;
        self
    }
}

/// Loaded properties with typed accessors.
///
/// All sources are read and merged when the instance is built. Accessors
/// resolve a property on first use and cache the result for the lifetime
/// of the instance.
///
/// # Caching
///
/// The cache is keyed by property name only. The first successful call for
/// a name decides its value: later calls return the cached value whatever
/// default or options they pass. Failed evaluations are not cached.
///
/// ```
/// use strata_core::{EmbeddedResources, MapProvider, PropertiesConfig};
/// use strata_properties::ApplicationProperties;
///
/// let props = ApplicationProperties::builder(PropertiesConfig::default())
///     .resources(EmbeddedResources::new().with("application.properties", "n=abc\n"))
///     .env(MapProvider::new())
///     .build()
///     .unwrap();
///
/// assert_eq!(props.get_or("missing", "5").unwrap().as_deref(), Some("5"));
/// assert_eq!(props.get_or("missing", "9").unwrap().as_deref(), Some("5"));
/// assert_eq!(props.get_integer_or("n", "7").unwrap(), Some(7));
/// ```
#[derive(Debug)]
pub struct ApplicationProperties {
    config: PropertiesConfig,
    store: PropertyStore,
    resolver: ExpressionResolver,
    cache: RwLock<HashMap<String, Option<String>>>,
}

impl ApplicationProperties {
    /// Loads properties with the default providers.
    pub fn load(config: PropertiesConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Creates a builder for customizing providers before loading.
    pub fn builder(config: PropertiesConfig) -> ApplicationPropertiesBuilder {
        ApplicationPropertiesBuilder::new(config)
    }

    /// Returns the configuration the properties were loaded with.
    pub fn config(&self) -> &PropertiesConfig {
        &self.config
    }

    /// Returns the merged store.
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Returns the recorded sources in load order.
    pub fn sources(&self) -> &[SourceRecord] {
        self.store.sources()
    }

    /// Returns true if `name` already has a cached value.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.cache.read().contains_key(name)
    }

    /// Resolves a property with the default options.
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        self.get_with(name, GetOptions::default())
    }

    /// Resolves a property, falling back to `default` when absent or empty.
    pub fn get_or(&self, name: &str, default: &str) -> Result<Option<String>> {
        self.get_with(name, GetOptions::default().with_default(default))
    }

    /// Resolves a property.
    ///
    /// Returns `Ok(None)` when the property is absent (or empty) and no
    /// default is given.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedReference` when a placeholder names a value that
    /// is not set, or `SubstitutionLimit` when evaluation does not settle.
    /// Nothing is cached in either case.
    pub fn get_with(&self, name: &str, options: GetOptions<'_>) -> Result<Option<String>> {
        if let Some(cached) = self.cache.read().get(name) {
            return Ok(cached.clone());
        }

        let raw = self
            .store
            .lookup(name)
            .filter(|value| !value.is_empty())
            .or(options.default);

        let resolved = match raw {
            None => {
                if self.store.contains_key(name) {
                    warn!(property = name, "Property is empty and no default given");
                } else {
                    warn!(property = name, "Property not found and no default given");
                }
                None
            },
            Some(raw) => {
                let value = if options.evaluate {
                    self.resolver.resolve(name, raw)?
                } else {
                    raw.to_string()
                };
                Some(if options.decode_escaped_newlines {
                    value.replace("\\n", "\n")
                } else {
                    value
                })
            },
        };

        let mut cache = self.cache.write();
        Ok(cache.entry(name.to_string()).or_insert(resolved).clone())
    }

    /// Resolves a property as `i64`.
    pub fn get_long(&self, name: &str) -> Result<Option<i64>> {
        self.get_number(name, GetOptions::default())
    }

    /// Resolves a property as `i64`, falling back to `default`.
    pub fn get_long_or(&self, name: &str, default: &str) -> Result<Option<i64>> {
        self.get_number(name, GetOptions::default().with_default(default))
    }

    /// Resolves a property as `i64` with explicit options.
    pub fn get_long_with(&self, name: &str, options: GetOptions<'_>) -> Result<Option<i64>> {
        self.get_number(name, options)
    }

    /// Resolves a property as `i32`.
    pub fn get_integer(&self, name: &str) -> Result<Option<i32>> {
        self.get_number(name, GetOptions::default())
    }

    /// Resolves a property as `i32`, falling back to `default`.
    pub fn get_integer_or(&self, name: &str, default: &str) -> Result<Option<i32>> {
        self.get_number(name, GetOptions::default().with_default(default))
    }

    /// Resolves a property as `i32` with explicit options.
    pub fn get_integer_with(&self, name: &str, options: GetOptions<'_>) -> Result<Option<i32>> {
        self.get_number(name, options)
    }

    /// Resolves a property as a boolean.
    ///
    /// Only a case-insensitive `true` is true. Absent properties are false.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.get_bool_with(name, GetOptions::default())
    }

    /// Resolves a property as a boolean, falling back to `default`.
    pub fn get_bool_or(&self, name: &str, default: &str) -> Result<bool> {
        self.get_bool_with(name, GetOptions::default().with_default(default))
    }

    /// Resolves a property as a boolean with explicit options.
    ///
    /// Without an explicit default the empty string is used, so an absent
    /// property caches `""` rather than nothing.
    pub fn get_bool_with(&self, name: &str, options: GetOptions<'_>) -> Result<bool> {
        let options = GetOptions {
            default: options.default.or(Some("")),
            ..options
        };
        let value = self.get_with(name, options)?;
        Ok(value.is_some_and(|v| v.eq_ignore_ascii_case("true")))
    }

    // Malformed numbers never fail the call: the default is tried next,
    // then the result is absent.
    fn get_number<T>(&self, name: &str, options: GetOptions<'_>) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self.get_with(name, options)?;

        let Some(value) = value else {
            return Ok(parse_default(name, options.default));
        };

        match value.parse::<T>() {
            Ok(n) => Ok(Some(n)),
            Err(e) => {
                warn!(property = name, value = %value, error = %e, "Property is not a valid number");
                Ok(parse_default(name, options.default))
            },
        }
    }

    /// Passes one `key: value` line per final property to `sink`.
    pub fn dump_properties(&self, mut sink: impl FnMut(String)) {
        for (key, value) in self.store.iter() {
            sink(format!("{key}: {value}"));
        }
    }

    /// Passes a listing of every recorded source and its properties to `sink`.
    pub fn dump_sources(&self, mut sink: impl FnMut(String)) {
        for (idx, source) in self.store.sources().iter().enumerate() {
            sink(format!("Source file {}: {}", idx + 1, source.identifier()));
            for (key, value) in source.iter() {
                sink(format!("    {key}={value}"));
            }
        }
    }
}

fn parse_default<T>(name: &str, default: Option<&str>) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let default = default?;
    match default.parse::<T>() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!(property = name, default, error = %e, "Default is not a valid number either");
            None
        },
    }
}

impl fmt::Display for ApplicationProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<&str> = self
            .store
            .sources()
            .iter()
            .map(SourceRecord::identifier)
            .collect();

        write!(
            f,
            "file_name={}, suffixed_file_name={}, properties={}, config=[{}], sources=[{}]",
            self.config.file_name(),
            self.config.suffixed_file_name().as_deref().unwrap_or("<none>"),
            self.store.len(),
            self.config,
            sources.join(", "),
        )
    }
}

/// Builder for [`ApplicationProperties`].
///
/// Unset providers default to:
///
/// - environment: the process environment
/// - system properties: [`SystemProperties::current`]
/// - resources: the `resources` directory below the working directory
/// - working directory: the process current directory
#[derive(Debug)]
pub struct ApplicationPropertiesBuilder {
    config: PropertiesConfig,
    env: Option<Arc<dyn ValueProvider>>,
    system: Option<Arc<dyn ValueProvider>>,
    resources: Option<Arc<dyn ResourceProvider>>,
    working_dir: Option<PathBuf>,
    max_substitutions: usize,
}

impl ApplicationPropertiesBuilder {
    fn new(config: PropertiesConfig) -> Self {
        Self {
            config,
            env: None,
            system: None,
            resources: None,
            working_dir: None,
            max_substitutions: ExpressionResolver::DEFAULT_MAX_SUBSTITUTIONS,
        }
    }

    /// Appends paths to a copy of the configuration.
    pub fn paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.with_paths(paths);
        self
    }

    /// Sets the provider for `${env:..}` placeholders.
    pub fn env(mut self, env: impl ValueProvider + 'static) -> Self {
        self.env = Some(Arc::new(env));
        self
    }

    /// Sets the provider for `${prop:..}` placeholders.
    pub fn system(mut self, system: impl ValueProvider + 'static) -> Self {
        self.system = Some(Arc::new(system));
        self
    }

    /// Sets the provider for `classpath:` sources.
    pub fn resources(mut self, resources: impl ResourceProvider + 'static) -> Self {
        self.resources = Some(Arc::new(resources));
        self
    }

    /// Sets the directory relative paths are resolved against.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Sets the number of substitutions allowed per value.
    pub fn max_substitutions(mut self, max: usize) -> Self {
        self.max_substitutions = max;
        self
    }

    /// Loads and merges all sources.
    ///
    /// # Errors
    ///
    /// Fails with `Configuration`, `InvalidPathType` or `SourceNotFound`;
    /// no instance is returned in that case.
    pub fn build(self) -> Result<ApplicationProperties> {
        LayeredLoader::ensure_sources_configured(&self.config)?;

        let working_dir = match self.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| {
                StrataError::configuration(format!("cannot determine working directory: {e}"))
            })?,
        };
        let resources = self.resources.unwrap_or_else(|| {
            Arc::new(DirectoryResources::new(
                working_dir.join(DirectoryResources::DEFAULT_DIR),
            ))
        });

        let store = LayeredLoader::new(&self.config, resources.as_ref(), &working_dir).load()?;

        let resolver = ExpressionResolver::new(
            self.env.unwrap_or_else(|| Arc::new(ProcessEnv)),
            self.system
                .unwrap_or_else(|| Arc::new(SystemProperties::current())),
        )
        .with_max_substitutions(self.max_substitutions);

        let properties = ApplicationProperties {
            config: self.config,
            store,
            resolver,
            cache: RwLock::new(HashMap::new()),
        };
        info!("Application properties ready: {}", properties);

        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{EmbeddedResources, MapProvider};

    const APP: &str = "\
test.string=a test string
test.long=1234567891234
test.int=123
test.boolean=TRUE
test.empty=
test.multiline=line1\\\\nline2
test.string-via-env=val-from-env:${env:test-str}
test.int-via-env=99${env:my-test-env-int}
test.string-via-prop=val-from-prop:${prop:test-str}
test.broken=${env:DOES_NOT_EXIST}
test.not-a-number=abc
";

    fn props() -> ApplicationProperties {
        ApplicationProperties::builder(PropertiesConfig::default())
            .resources(EmbeddedResources::new().with("application.properties", APP))
            .env(
                MapProvider::new()
                    .with("test-str", "my-test-env-val")
                    .with("my-test-env-int", "4567"),
            )
            .system(MapProvider::new().with("test-str", "my-test-prop-val"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(props().get("test.string").unwrap().as_deref(), Some("a test string"));
    }

    #[test]
    fn test_missing_string() {
        let p = props();
        assert_eq!(p.get("missing.string").unwrap(), None);
        assert!(p.is_resolved("missing.string"));
    }

    #[test]
    fn test_empty_value_uses_default() {
        let p = props();
        assert_eq!(p.get_or("test.empty", "fallback").unwrap().as_deref(), Some("fallback"));
    }

    #[test]
    fn test_env_and_prop_placeholders() {
        let p = props();
        assert_eq!(
            p.get("test.string-via-env").unwrap().as_deref(),
            Some("val-from-env:my-test-env-val")
        );
        assert_eq!(
            p.get("test.string-via-prop").unwrap().as_deref(),
            Some("val-from-prop:my-test-prop-val")
        );
        assert_eq!(p.get_integer("test.int-via-env").unwrap(), Some(994567));
    }

    #[test]
    fn test_unresolved_reference_is_not_cached() {
        let p = props();
        let err = p.get("test.broken").unwrap_err();

        assert!(err.is_unresolved_reference());
        assert!(!p.is_resolved("test.broken"));

        let raw = p
            .get_with("test.broken", GetOptions::new().evaluate(false))
            .unwrap();
        assert_eq!(raw.as_deref(), Some("${env:DOES_NOT_EXIST}"));
    }

    #[test]
    fn test_escaped_newline_decoding() {
        let p = props();
        assert_eq!(p.get("test.multiline").unwrap().as_deref(), Some("line1\nline2"));

        let p = props();
        let raw = p
            .get_with("test.multiline", GetOptions::new().decode_escaped_newlines(false))
            .unwrap();
        assert_eq!(raw.as_deref(), Some("line1\\nline2"));
    }

    #[test]
    fn test_first_resolution_wins() {
        let p = props();
        assert_eq!(p.get_or("absent", "5").unwrap().as_deref(), Some("5"));
        assert_eq!(p.get_or("absent", "9").unwrap().as_deref(), Some("5"));

        let p = props();
        assert_eq!(p.get("absent").unwrap(), None);
        assert_eq!(p.get_or("absent", "9").unwrap(), None);
    }

    #[test]
    fn test_numbers() {
        let p = props();
        assert_eq!(p.get_long("test.long").unwrap(), Some(1_234_567_891_234));
        assert_eq!(p.get_integer("test.int").unwrap(), Some(123));
        assert_eq!(p.get_long("missing.long").unwrap(), None);
        assert_eq!(p.get_integer("missing.int").unwrap(), None);
    }

    #[test]
    fn test_integer_overflow_falls_back() {
        let p = props();
        assert_eq!(p.get_integer_or("test.long", "42").unwrap(), Some(42));
    }

    #[test]
    fn test_numeric_fallback() {
        assert_eq!(props().get_integer_or("test.not-a-number", "5").unwrap(), Some(5));
        assert_eq!(props().get_integer_or("test.not-a-number", "xyz").unwrap(), None);
    }

    #[test]
    fn test_booleans() {
        let p = props();
        assert!(p.get_bool("test.boolean").unwrap());
        assert!(!p.get_bool("test.string").unwrap());
        assert!(!p.get_bool("missing.boolean").unwrap());
        assert_eq!(p.get("missing.boolean").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_dump_properties() {
        let mut lines = Vec::new();
        props().dump_properties(|line| lines.push(line));

        assert!(lines.contains(&"test.int: 123".to_string()));
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn test_display() {
        let summary = props().to_string();
        assert!(summary.contains("file_name=application.properties"));
        assert!(summary.contains("properties=11"));
    }
}
