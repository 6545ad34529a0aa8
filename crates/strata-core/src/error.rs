//! Error types for Strata.
//!
//! This module defines the error taxonomy used throughout the Strata
//! crates. All errors implement the standard `std::error::Error` trait
//! via `thiserror`.
//!
//! # Failure classes
//!
//! - Construction-time failures (`InvalidPathType`, `SourceNotFound`,
//!   `Configuration`) abort the whole load. No partially loaded instance
//!   is ever handed out.
//! - Access-time failures (`UnresolvedReference`, `SubstitutionLimit`)
//!   affect only the call that raised them. Values cached by earlier calls
//!   stay valid.
//!
//! # Example
//!
//! ```
//! use strata_core::{Result, SourceType, StrataError};
//!
//! fn open(file: &str) -> Result<String> {
//!     Err(StrataError::source_not_found(SourceType::FileSystem, file, "conf"))
//! }
//!
//! let err = open("application.properties").unwrap_err();
//! assert!(err.is_source_not_found());
//! assert_eq!(
//!     err.to_string(),
//!     "Failed to load 'file:' properties file named 'application.properties' from path: conf"
//! );
//! ```

use thiserror::Error;

use crate::types::SourceType;

/// Boxed underlying cause attached to some variants.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for Strata operations.
#[derive(Debug, Error)]
pub enum StrataError {
    /// A path carried a prefix other than `classpath:`, `file:` or `servlet:`.
    #[error("Unknown properties path type prefix: {prefix} (in path '{path}')")]
    InvalidPathType {
        /// The offending prefix, including its trailing `:`
        prefix: String,
        /// The full raw path the prefix was taken from
        path: String,
    },

    /// A required properties source is missing or could not be read.
    #[error(
        "Failed to load '{}' properties file named '{file_name}' from path: {location}",
        source_type.prefix()
    )]
    SourceNotFound {
        /// Kind of source that was being loaded
        source_type: SourceType,
        /// File name that was requested
        file_name: String,
        /// Location (directory or resource folder) it was requested from
        location: String,
        /// Underlying I/O or syntax error, if any
        #[source]
        cause: Option<BoxedCause>,
    },

    /// The configuration cannot be loaded as given.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration
        message: String,
    },

    /// A placeholder referenced an environment or system value that is not set.
    #[error("Failed to resolve '{placeholder}' while evaluating property '{property}'")]
    UnresolvedReference {
        /// Property whose value was being evaluated
        property: String,
        /// The exact placeholder text, e.g. `${env:HOME}`
        placeholder: String,
    },

    /// Evaluating a value needed more substitutions than allowed, usually
    /// because it keeps re-introducing placeholders.
    #[error("Evaluating property '{property}' needed more than {limit} substitutions")]
    SubstitutionLimit {
        /// Property whose value was being evaluated
        property: String,
        /// Number of substitutions allowed per value
        limit: usize,
    },
}

impl StrataError {
    /// Creates an InvalidPathType error.
    pub fn invalid_path_type(prefix: impl Into<String>, path: impl Into<String>) -> Self {
        Self::InvalidPathType {
            prefix: prefix.into(),
            path: path.into(),
        }
    }

    /// Creates a SourceNotFound error without a cause.
    pub fn source_not_found(
        source_type: SourceType,
        file_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self::SourceNotFound {
            source_type,
            file_name: file_name.into(),
            location: location.into(),
            cause: None,
        }
    }

    /// Creates a SourceNotFound error with a cause.
    pub fn source_not_found_with_cause<E>(
        source_type: SourceType,
        file_name: impl Into<String>,
        location: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SourceNotFound {
            source_type,
            file_name: file_name.into(),
            location: location.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an UnresolvedReference error.
    pub fn unresolved_reference(
        property: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self::UnresolvedReference {
            property: property.into(),
            placeholder: placeholder.into(),
        }
    }

    /// Creates a SubstitutionLimit error.
    pub fn substitution_limit(property: impl Into<String>, limit: usize) -> Self {
        Self::SubstitutionLimit {
            property: property.into(),
            limit,
        }
    }

    /// Returns true if this is an unknown path prefix error.
    pub fn is_invalid_path_type(&self) -> bool {
        matches!(self, Self::InvalidPathType { .. })
    }

    /// Returns true if a source could not be found or read.
    pub fn is_source_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. })
    }

    /// Returns true if this is a configuration error.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns true if a placeholder could not be resolved.
    pub fn is_unresolved_reference(&self) -> bool {
        matches!(self, Self::UnresolvedReference { .. })
    }

    /// Returns true if a value exceeded the substitution limit.
    pub fn is_substitution_limit(&self) -> bool {
        matches!(self, Self::SubstitutionLimit { .. })
    }

    /// Returns true for errors that can only occur while loading sources.
    ///
    /// Access-time errors leave an already loaded instance usable.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPathType { .. } | Self::SourceNotFound { .. } | Self::Configuration { .. }
        )
    }
}

/// Type alias for Results with StrataError.
pub type Result<T> = std::result::Result<T, StrataError>;
