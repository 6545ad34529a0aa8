//! The merged result of a load.

use indexmap::IndexMap;
use serde::Serialize;

/// The key/value subset contributed by one loaded source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    identifier: String,
    properties: IndexMap<String, String>,
}

impl SourceRecord {
    /// The absolute path or resource identifier the source was read from.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The properties exactly as parsed from this source.
    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    /// Iterates over the properties in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Final key/value mapping plus, optionally, the per-source records.
///
/// The store is filled once by the loader and is read-only afterwards:
/// there is no public way to insert or remove entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    values: IndexMap<String, String>,
    sources: Vec<SourceRecord>,
}

impl PropertyStore {
    /// Raw lookup: no defaulting, no placeholder evaluation.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no properties were loaded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the final key/value pairs.
    ///
    /// Keys appear in the order they were first loaded.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the recorded sources in load order.
    ///
    /// Empty unless source recording was enabled in the configuration.
    pub fn sources(&self) -> &[SourceRecord] {
        &self.sources
    }

    /// Renders the recorded sources as pretty-printed JSON.
    pub fn sources_to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.sources)
    }

    /// Overlays one freshly loaded source: every key overwrites any
    /// existing value.
    pub(crate) fn overlay(
        &mut self,
        identifier: String,
        properties: IndexMap<String, String>,
        record: bool,
    ) {
        for (key, value) in &properties {
            self.values.insert(key.clone(), value.clone());
        }

        if record {
            self.sources.push(SourceRecord {
                identifier,
                properties,
            });
        }
    }
}
