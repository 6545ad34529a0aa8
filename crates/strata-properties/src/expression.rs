//! Placeholder evaluation for property values.
//!
//! A value may embed `${env:NAME}` and `${prop:NAME}` placeholders. The
//! `env`/`prop` marker may be surrounded by other ASCII word characters
//! (`${sysprop:NAME}` is a `prop` reference), and the name runs up to the
//! next `}`. Nested braces are not supported.

use std::ops::Range;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use strata_core::{Result, StrataError, ValueProvider};
use tracing::{debug, warn};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?-u:\w)*?(env|prop)(?-u:\w)*?:(.*?)\}")
        .expect("placeholder pattern is valid")
});

/// Which provider a placeholder reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `${env:...}`: environment variables.
    Env,
    /// `${prop:...}`: system-level properties.
    Prop,
}

#[derive(Debug)]
struct Placeholder {
    range: Range<usize>,
    text: String,
    kind: ReferenceKind,
    key: String,
}

fn first_placeholder(value: &str) -> Option<Placeholder> {
    let caps = PLACEHOLDER.captures(value)?;
    let whole = caps.get(0)?;
    let kind = match caps.get(1)?.as_str() {
        "env" => ReferenceKind::Env,
        _ => ReferenceKind::Prop,
    };

    Some(Placeholder {
        range: whole.range(),
        text: whole.as_str().to_string(),
        kind,
        key: caps.get(2)?.as_str().to_string(),
    })
}

/// Rewrites placeholders in raw values using injected providers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use strata_core::MapProvider;
/// use strata_properties::ExpressionResolver;
///
/// let resolver = ExpressionResolver::new(
///     Arc::new(MapProvider::new().with("HOST", "db.internal")),
///     Arc::new(MapProvider::new().with("port", "5432")),
/// );
///
/// let url = resolver.resolve("db.url", "pg://${env:HOST}:${prop:port}/app").unwrap();
/// assert_eq!(url, "pg://db.internal:5432/app");
/// ```
#[derive(Debug, Clone)]
pub struct ExpressionResolver {
    env: Arc<dyn ValueProvider>,
    system: Arc<dyn ValueProvider>,
    max_substitutions: usize,
}

impl ExpressionResolver {
    /// Substitutions allowed per value unless configured otherwise.
    pub const DEFAULT_MAX_SUBSTITUTIONS: usize = 64;

    /// Creates a resolver reading `${env:..}` from `env` and `${prop:..}`
    /// from `system`.
    pub fn new(env: Arc<dyn ValueProvider>, system: Arc<dyn ValueProvider>) -> Self {
        Self {
            env,
            system,
            max_substitutions: Self::DEFAULT_MAX_SUBSTITUTIONS,
        }
    }

    /// Sets the number of substitutions allowed per value.
    pub fn with_max_substitutions(mut self, max: usize) -> Self {
        self.max_substitutions = max;
        self
    }

    /// Returns the number of substitutions allowed per value.
    pub fn max_substitutions(&self) -> usize {
        self.max_substitutions
    }

    /// Replaces every placeholder in `raw`.
    ///
    /// Substituted text is inserted verbatim, then the whole string is
    /// scanned again. A substituted value that itself looks like a
    /// placeholder is therefore expanded on the next pass.
    ///
    /// # Errors
    ///
    /// - `UnresolvedReference` when a referenced value is not set.
    /// - `SubstitutionLimit` when more than the allowed number of
    ///   substitutions is needed.
    pub fn resolve(&self, property: &str, raw: &str) -> Result<String> {
        let mut value = raw.to_string();
        let mut substitutions = 0;

        while let Some(placeholder) = first_placeholder(&value) {
            if substitutions == self.max_substitutions {
                return Err(StrataError::substitution_limit(
                    property,
                    self.max_substitutions,
                ));
            }

            let replacement = self
                .lookup(placeholder.kind, &placeholder.key)
                .ok_or_else(|| StrataError::unresolved_reference(property, &placeholder.text))?;

            if replacement.is_empty() {
                warn!(
                    property,
                    placeholder = %placeholder.text,
                    "Placeholder resolved to an empty value"
                );
            }
            debug!(property, placeholder = %placeholder.text, "Substituted placeholder");

            value.replace_range(placeholder.range, &replacement);
            substitutions += 1;
        }

        Ok(value)
    }

    fn lookup(&self, kind: ReferenceKind, key: &str) -> Option<String> {
        match kind {
            ReferenceKind::Env => self.env.lookup(key),
            ReferenceKind::Prop => self.system.lookup(key),
        }
    }
}
