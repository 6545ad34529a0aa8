//! Strata properties inspector.
//!
//! Loads a layered configuration and prints what every source contributed
//! and the final merged values.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use strata_core::{ContainerContext, DirectoryResources, PropertiesConfig, SystemProperties};
use strata_properties::ApplicationProperties;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base properties file name
    #[arg(long)]
    file_name: Option<String>,

    /// Suffix of the override file loaded after each base file
    #[arg(long)]
    suffix: Option<String>,

    /// Skip the base and suffixed files in the resource root
    #[arg(long)]
    no_root_defaults: bool,

    /// Print the properties contributed by each source
    #[arg(long)]
    record_sources: bool,

    /// Print the recorded sources as JSON instead of text
    #[arg(long, requires = "record_sources")]
    json: bool,

    /// Resource root for `classpath:` paths [default: <working-dir>/resources]
    #[arg(long)]
    resources: Option<PathBuf>,

    /// Context path when running inside a servlet container, e.g. `/shop`.
    /// The container directory comes from `CATALINA_COMMON` or `CATALINA_BASE`.
    #[arg(long)]
    context: Option<String>,

    /// Directory relative `file:` paths are resolved against
    #[arg(long)]
    working_dir: Option<PathBuf>,

    /// Property to resolve and print (repeatable)
    #[arg(long = "get", value_name = "KEY")]
    keys: Vec<String>,

    /// Additional source paths, e.g. `conf` or `classpath:shared`
    paths: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = PropertiesConfig::builder()
        .load_defaults_from_root(!args.no_root_defaults)
        .record_sources(args.record_sources)
        .paths(args.paths);
    if let Some(name) = args.file_name {
        config = config.file_name(name);
    }
    if let Some(suffix) = args.suffix {
        config = config.override_suffix(suffix);
    }
    if let Some(path) = args.context {
        let ctx = ContainerContext::from_system(path, SystemProperties::current());
        config = config.host_context(Arc::new(ctx));
    }
    let config = config.build().context("invalid configuration")?;

    tracing::info!("Starting strata v{}", env!("CARGO_PKG_VERSION"));

    let mut builder = ApplicationProperties::builder(config);
    if let Some(dir) = args.working_dir {
        builder = builder.working_dir(dir);
    }
    if let Some(root) = args.resources {
        builder = builder.resources(DirectoryResources::new(root));
    }
    let props = builder.build().context("failed to load properties")?;

    if args.record_sources {
        println!("Properties per file");
        if args.json {
            println!("{}", props.store().sources_to_json()?);
        } else {
            props.dump_sources(|line| println!("{line}"));
        }
        println!();
    }

    println!("Final property values");
    props.dump_properties(|line| println!("{line}"));

    for key in &args.keys {
        let value = props
            .get(key)
            .with_context(|| format!("failed to resolve '{key}'"))?;
        match value {
            Some(value) => println!("{key} = {value}"),
            None => println!("{key} is not set"),
        }
    }

    Ok(())
}
