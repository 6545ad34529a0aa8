#![allow(dead_code)]
use std::fs;
use std::path::Path;

use strata_core::{MapProvider, PropertiesConfig};
use strata_properties::{ApplicationProperties, ApplicationPropertiesBuilder};
use tempfile::TempDir;

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(path, content).expect("Failed to write fixture file");
}

/// Creates a project directory with a `resources/` root and a `conf/` directory.
///
/// Every file sets `test` (overridden by each later layer) plus one key
/// unique to that file.
pub fn project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path();

    write(
        root,
        "resources/application.properties",
        "test=classpath\nclasspath-application-properties=classpath:application.properties\n",
    );
    write(
        root,
        "resources/application-unittest.properties",
        "test=classpath unittest suffix\nclasspath-unittest-application-properties=classpath:application-unittest.properties\n",
    );
    write(
        root,
        "resources/myapp.properties",
        "test=myapp classpath\nclasspath-myapp-properties=classpath-myapp.properties\n",
    );
    write(
        root,
        "resources/myapp-unittest.properties",
        "test=myapp classpath unittest suffix\nclasspath-myapp-unittest-properties=classpath-myapp-unittest.properties\n",
    );
    write(
        root,
        "conf/application.properties",
        "test=conf directory\nconf-dir-application-properties=conf-dir-application.properties\n",
    );
    write(
        root,
        "conf/application-unittest.properties",
        "test=conf directory unittest suffix\nconf-dir-application-unittest-properties=conf-dir-application-unittest.properties\n",
    );
    write(
        root,
        "conf/myapp.properties",
        "test=myapp conf directory\nconf-dir-myapp-properties=conf-dir-myapp.properties\n",
    );
    write(
        root,
        "conf/myapp-unittest.properties",
        "test=myapp conf directory unittest suffix\nconf-dir-myapp-unittest-properties=conf-dir-myapp-unittest.properties\n",
    );

    dir
}

/// Builder rooted at `dir` with empty environment and system properties.
pub fn builder(dir: &Path, config: PropertiesConfig) -> ApplicationPropertiesBuilder {
    ApplicationProperties::builder(config)
        .working_dir(dir)
        .env(MapProvider::new())
        .system(MapProvider::new())
}
