//! Source kinds and path specifications.

use std::fmt;

use crate::error::{Result, StrataError};

/// Where a properties file is loaded from.
///
/// Each kind is selected in a raw path string by its prefix:
///
/// | Prefix       | Kind         | Resolved against                      |
/// |--------------|--------------|---------------------------------------|
/// | `classpath:` | `Classpath`  | the bundled resource provider         |
/// | `file:`      | `FileSystem` | the working directory                 |
/// | `servlet:`   | `Servlet`    | the hosting container base directory  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    /// Resources bundled with the program.
    Classpath,
    /// A directory on the local file system.
    FileSystem,
    /// A directory below the hosting container's base directory.
    Servlet,
}

impl SourceType {
    /// Returns the path prefix for this kind, including the trailing `:`.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Classpath => "classpath:",
            Self::FileSystem => "file:",
            Self::Servlet => "servlet:",
        }
    }

    /// Matches a prefix (with its trailing `:`) against the known kinds.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.prefix() == prefix)
    }

    /// Returns all source kinds.
    pub fn all() -> &'static [Self] {
        &[Self::Classpath, Self::FileSystem, Self::Servlet]
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Splits a raw path into its optional prefix and its location.
///
/// Everything up to and including the first `:` is the prefix; the rest is
/// the location. A path without `:` (or one starting with `:`) has no
/// prefix.
///
/// # Example
///
/// ```
/// use strata_core::split_path;
///
/// assert_eq!(split_path("classpath:foo/bar"), (Some("classpath:"), "foo/bar"));
/// assert_eq!(split_path("foo/bar"), (None, "foo/bar"));
/// ```
pub fn split_path(raw: &str) -> (Option<&str>, &str) {
    match raw.find(':') {
        Some(0) => (None, &raw[1..]),
        Some(idx) => (Some(&raw[..=idx]), &raw[idx + 1..]),
        None => (None, raw),
    }
}

/// A parsed path: the kind of source and its location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSpec {
    source_type: SourceType,
    location: String,
}

impl PathSpec {
    /// Creates a path spec from its parts.
    pub fn new(source_type: SourceType, location: impl Into<String>) -> Self {
        Self {
            source_type,
            location: location.into(),
        }
    }

    /// Parses a raw path string.
    ///
    /// Without a prefix the path defaults to `Servlet` when a hosting
    /// container is present and to `FileSystem` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPathType` when the prefix is not one of the known
    /// literals.
    pub fn parse(raw: &str, in_container: bool) -> Result<Self> {
        let (prefix, location) = split_path(raw);

        let source_type = match prefix {
            Some(prefix) => SourceType::from_prefix(prefix)
                .ok_or_else(|| StrataError::invalid_path_type(prefix, raw))?,
            None if in_container => SourceType::Servlet,
            None => SourceType::FileSystem,
        };

        Ok(Self::new(source_type, location))
    }

    /// Returns the kind of source.
    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    /// Returns the location string (without prefix).
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source_type, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_prefix() {
        assert_eq!(split_path("classpath:foo/bar"), (Some("classpath:"), "foo/bar"));
        assert_eq!(split_path("file:conf"), (Some("file:"), "conf"));
        assert_eq!(split_path("servlet:conf/apps"), (Some("servlet:"), "conf/apps"));
    }

    #[test]
    fn test_split_without_prefix() {
        assert_eq!(split_path("foo/bar"), (None, "foo/bar"));
        assert_eq!(split_path(":foo"), (None, "foo"));
        assert_eq!(split_path(""), (None, ""));
    }

    #[test]
    fn test_split_only_first_colon() {
        assert_eq!(split_path("file:a:b"), (Some("file:"), "a:b"));
    }

    #[test]
    fn test_parse_defaults_to_file_system() {
        let spec = PathSpec::parse("foo/bar", false).unwrap();
        assert_eq!(spec.source_type(), SourceType::FileSystem);
        assert_eq!(spec.location(), "foo/bar");
    }

    #[test]
    fn test_parse_defaults_to_servlet_in_container() {
        let spec = PathSpec::parse("conf/apps/shop", true).unwrap();
        assert_eq!(spec.source_type(), SourceType::Servlet);
    }

    #[test]
    fn test_parse_explicit_prefix_wins_in_container() {
        let spec = PathSpec::parse("classpath:defaults", true).unwrap();
        assert_eq!(spec.source_type(), SourceType::Classpath);
        assert_eq!(spec.location(), "defaults");
    }

    #[test]
    fn test_parse_empty_location() {
        let spec = PathSpec::parse("classpath:", false).unwrap();
        assert_eq!(spec.source_type(), SourceType::Classpath);
        assert_eq!(spec.location(), "");
    }

    #[test]
    fn test_parse_unknown_prefix() {
        let err = PathSpec::parse("http:example.com", false).unwrap_err();
        match err {
            StrataError::InvalidPathType { prefix, path } => {
                assert_eq!(prefix, "http:");
                assert_eq!(path, "http:example.com");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prefix_round_trip() {
        for t in SourceType::all() {
            assert_eq!(SourceType::from_prefix(t.prefix()), Some(*t));
        }
        assert_eq!(SourceType::from_prefix("CLASSPATH:"), None);
    }

    #[test]
    fn test_display() {
        let spec = PathSpec::new(SourceType::Servlet, "conf/apps/shop");
        assert_eq!(spec.to_string(), "servlet:conf/apps/shop");
    }
}
