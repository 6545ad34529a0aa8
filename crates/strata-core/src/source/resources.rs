//! Bundled resources (the `classpath:` source kind).

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Content of one bundled resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledResource {
    /// Identifier reported in source records, e.g. an absolute path.
    pub identifier: String,
    /// Raw bytes of the resource.
    pub content: Vec<u8>,
}

/// Resolves relative resource paths to their content.
pub trait ResourceProvider: Send + Sync + fmt::Debug {
    /// Opens the resource at `path` (relative, `/`-separated).
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the resource does not exist or cannot be read.
    fn open(&self, path: &str) -> io::Result<BundledResource>;
}

/// Joins a resource location and a file name into a relative resource path.
///
/// An empty location means the resource root.
pub fn resource_path(location: &str, file_name: &str) -> String {
    let location = location.trim_matches('/');
    if location.is_empty() {
        file_name.to_string()
    } else {
        format!("{location}/{file_name}")
    }
}

/// Resources stored below a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    /// Directory name used for the default resource root.
    pub const DEFAULT_DIR: &'static str = "resources";

    /// Creates a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirectoryResources {
    fn open(&self, path: &str) -> io::Result<BundledResource> {
        let full_path = self.root.join(path);
        let content = std::fs::read(&full_path)?;
        let identifier = std::path::absolute(&full_path)
            .unwrap_or(full_path)
            .display()
            .to_string();

        Ok(BundledResource {
            identifier,
            content,
        })
    }
}

/// Resources held in memory, typically from `include_str!`.
///
/// # Example
///
/// ```
/// use strata_core::{EmbeddedResources, ResourceProvider};
///
/// let resources = EmbeddedResources::new()
///     .with("application.properties", "greeting=hello\n");
///
/// let res = resources.open("application.properties").unwrap();
/// assert_eq!(res.identifier, "embedded:application.properties");
/// assert!(resources.open("missing.properties").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedResources {
    files: IndexMap<String, Vec<u8>>,
}

impl EmbeddedResources {
    /// Creates an empty set of resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resources with one more file at `path`.
    pub fn with(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl ResourceProvider for EmbeddedResources {
    fn open(&self, path: &str) -> io::Result<BundledResource> {
        self.files
            .get(path)
            .map(|content| BundledResource {
                identifier: format!("embedded:{path}"),
                content: content.clone(),
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no embedded resource at '{path}'"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resource_path() {
        assert_eq!(resource_path("", "application.properties"), "application.properties");
        assert_eq!(resource_path("conf", "a.properties"), "conf/a.properties");
        assert_eq!(resource_path("/conf/", "a.properties"), "conf/a.properties");
    }

    #[test]
    fn test_directory_resources() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("conf")).unwrap();
        fs::write(dir.path().join("conf/app.properties"), "a=1\n").unwrap();

        let resources = DirectoryResources::new(dir.path());
        let res = resources.open("conf/app.properties").unwrap();

        assert_eq!(res.content, b"a=1\n");
        assert!(res.identifier.ends_with("app.properties"));
        assert!(Path::new(&res.identifier).is_absolute());
    }

    #[test]
    fn test_directory_resources_missing() {
        let dir = TempDir::new().unwrap();
        let resources = DirectoryResources::new(dir.path());

        let err = resources.open("nope.properties").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_embedded_resources() {
        let resources = EmbeddedResources::new().with("conf/x.properties", "x=1");

        assert_eq!(resources.open("conf/x.properties").unwrap().content, b"x=1");
        assert_eq!(
            resources.open("x.properties").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
