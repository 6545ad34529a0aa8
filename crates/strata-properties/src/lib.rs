//! # Strata Properties
//!
//! Layered loading of `.properties` files with placeholder evaluation and
//! typed, cached access.
//!
//! ## Load order
//!
//! For a base file `application.properties` and suffix `-prod`:
//!
//! 1. `application.properties` from the resource root
//! 2. `application-prod.properties` from the resource root
//! 3. for each configured path: `application.properties`, then
//!    `application-prod.properties`
//!
//! Later sources override earlier ones key by key. Step 1 and 2 are skipped
//! when root defaults are disabled.
//!
//! ## Placeholders
//!
//! Values may reference environment variables (`${env:NAME}`) and system
//! properties (`${prop:NAME}`). They are evaluated on first access.
//!
//! ## Example
//!
//! ```no_run
//! use strata_core::PropertiesConfig;
//! use strata_properties::ApplicationProperties;
//!
//! let config = PropertiesConfig::builder()
//!     .override_suffix("-prod")
//!     .path("conf")
//!     .build()?;
//!
//! let props = ApplicationProperties::load(config)?;
//! let port = props.get_integer_or("server.port", "8080")?;
//! let debug = props.get_bool("server.debug")?;
//! # Ok::<(), strata_core::StrataError>(())
//! ```

pub mod expression;
pub mod loader;
pub mod properties;
pub mod store;

pub use expression::{ExpressionResolver, ReferenceKind};
pub use loader::LayeredLoader;
pub use properties::{ApplicationProperties, ApplicationPropertiesBuilder, GetOptions};
pub use store::{PropertyStore, SourceRecord};

// Re-export strata_core for consumers
pub use strata_core;
