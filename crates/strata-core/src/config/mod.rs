pub mod builder;
pub mod settings;

pub use builder::PropertiesConfigBuilder;
pub use settings::{DEFAULT_FILE_NAME, PropertiesConfig};
