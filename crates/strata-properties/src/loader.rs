//! Layered loading of properties sources.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use strata_core::{
    PathSpec, PropertiesConfig, PropertiesFormat, ResourceProvider, Result, SourceType,
    StrataError, resource_path,
};
use tracing::{debug, info};

use crate::store::PropertyStore;

/// Loads every configured source and overlays it onto one store.
///
/// Sources are applied in this order, each overriding the ones before:
///
/// 1. `{file}` from the resource root (if root defaults are enabled)
/// 2. `{stem}{suffix}.{ext}` from the resource root (if a suffix is set)
/// 3. for every configured path, in order: `{file}`, then the suffixed file
///
/// Every source named by the configuration is required. Loading stops at
/// the first source that cannot be read.
pub struct LayeredLoader<'a> {
    config: &'a PropertiesConfig,
    resources: &'a dyn ResourceProvider,
    working_dir: &'a Path,
}

impl<'a> LayeredLoader<'a> {
    /// Creates a loader.
    ///
    /// `working_dir` anchors relative `file:` paths and a relative container
    /// base directory.
    pub fn new(
        config: &'a PropertiesConfig,
        resources: &'a dyn ResourceProvider,
        working_dir: &'a Path,
    ) -> Self {
        Self {
            config,
            resources,
            working_dir,
        }
    }

    /// Fails when the configuration names no source at all.
    pub fn ensure_sources_configured(config: &PropertiesConfig) -> Result<()> {
        if !config.load_defaults_from_root() && config.paths().len() == 0 {
            return Err(StrataError::configuration(
                "no sources configured: loading root defaults is disabled and no paths were given",
            ));
        }
        Ok(())
    }

    /// Runs the load.
    pub fn load(&self) -> Result<PropertyStore> {
        Self::ensure_sources_configured(self.config)?;
        let specs = self.config.path_specs()?;

        let suffixed = self.config.suffixed_file_name();
        let file_names: Vec<&str> = std::iter::once(self.config.file_name())
            .chain(suffixed.as_deref())
            .collect();

        let mut store = PropertyStore::default();

        if self.config.load_defaults_from_root() {
            let root = PathSpec::new(SourceType::Classpath, "");
            for file_name in &file_names {
                self.load_source(&root, file_name, &mut store)?;
            }
        }

        for spec in &specs {
            for file_name in &file_names {
                self.load_source(spec, file_name, &mut store)?;
            }
        }

        info!(
            properties = store.len(),
            paths = specs.len(),
            "Loaded properties for {}",
            self.config.file_name()
        );

        Ok(store)
    }

    fn load_source(
        &self,
        spec: &PathSpec,
        file_name: &str,
        store: &mut PropertyStore,
    ) -> Result<()> {
        let (identifier, properties) = match spec.source_type() {
            SourceType::Classpath => self.read_resource(spec, file_name)?,
            SourceType::FileSystem => {
                let dir = join_location(self.working_dir, spec.location());
                read_file(spec, file_name, &dir)?
            },
            SourceType::Servlet => {
                let dir = join_location(&self.servlet_base()?, spec.location());
                read_file(spec, file_name, &dir)?
            },
        };

        debug!(
            source = %identifier,
            properties = properties.len(),
            "Overlaying {} from {}",
            file_name,
            spec
        );

        store.overlay(identifier, properties, self.config.record_sources());
        Ok(())
    }

    fn read_resource(
        &self,
        spec: &PathSpec,
        file_name: &str,
    ) -> Result<(String, IndexMap<String, String>)> {
        let path = resource_path(spec.location(), file_name);

        let resource = self.resources.open(&path).map_err(|e| {
            StrataError::source_not_found_with_cause(
                SourceType::Classpath,
                file_name,
                spec.location(),
                e,
            )
        })?;
        let properties = PropertiesFormat::parse(resource.content.as_slice()).map_err(|e| {
            StrataError::source_not_found_with_cause(
                SourceType::Classpath,
                file_name,
                spec.location(),
                e,
            )
        })?;

        Ok((resource.identifier, properties))
    }

    fn servlet_base(&self) -> Result<PathBuf> {
        let ctx = self.config.host_context().ok_or_else(|| {
            StrataError::configuration("servlet paths require a hosting container context")
        })?;
        Ok(self.working_dir.join(ctx.base_directory()?))
    }
}

fn join_location(base: &Path, location: &str) -> PathBuf {
    if location.is_empty() {
        base.to_path_buf()
    } else {
        base.join(location)
    }
}

fn read_file(
    spec: &PathSpec,
    file_name: &str,
    dir: &Path,
) -> Result<(String, IndexMap<String, String>)> {
    let path = dir.join(file_name);
    let path = std::path::absolute(&path).unwrap_or(path);

    let file = std::fs::File::open(&path).map_err(|e| {
        StrataError::source_not_found_with_cause(spec.source_type(), file_name, spec.location(), e)
    })?;
    let properties = PropertiesFormat::parse(std::io::BufReader::new(file)).map_err(|e| {
        StrataError::source_not_found_with_cause(spec.source_type(), file_name, spec.location(), e)
    })?;

    Ok((path.display().to_string(), properties))
}
