//! Properties file format.

pub mod properties;

pub use properties::PropertiesFormat;
