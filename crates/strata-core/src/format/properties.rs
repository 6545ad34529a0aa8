use std::io::Read;

use encoding_rs::UTF_8;
use indexmap::IndexMap;
use java_properties::{PropertiesError, PropertiesIter};

/// Reader for line-oriented `key=value` text.
///
/// Handles `#`/`!` comment lines, `=`/`:`/whitespace separators, line
/// continuations and `\uXXXX` escapes. Input is decoded as UTF-8.
pub struct PropertiesFormat;

impl PropertiesFormat {
    /// Reads all entries in file order. A key repeated within one input
    /// keeps its first position and its last value.
    pub fn parse<R: Read>(input: R) -> Result<IndexMap<String, String>, PropertiesError> {
        let mut entries = IndexMap::new();
        let mut iter = PropertiesIter::new_with_encoding(input, UTF_8);
        iter.read_into(|key, value| {
            entries.insert(key, value);
        })?;
        Ok(entries)
    }

    /// Reads entries from an in-memory string.
    pub fn parse_str(input: &str) -> Result<IndexMap<String, String>, PropertiesError> {
        Self::parse(input.as_bytes())
    }
}
