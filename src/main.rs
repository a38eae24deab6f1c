//! page-router: drive a router configuration outside a browser.
//!
//! ```text
//! routes.toml ──▶ config ──▶ install(RecordingHost, MemoryLocation)
//!                                   │
//!               resolve / navigate ─┴─▶ mounted component + route context
//! ```
//!
//! Every component name referenced by the configuration is registered with
//! the recording host as an empty stand-in, so resolution can be inspected
//! without a renderer.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use page_router::config::{load_config, ComponentConfig, RouteConfig, RouterConfig};
use page_router::host::{HostEvent, RecordingHost};
use page_router::observability::init_logging;
use page_router::routing::RoutePattern;
use page_router::{install, ComponentDefinition, Host, MemoryLocation, Params, Router};

/// How long to wait for a navigation event to produce a mount.
const SETTLE_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "page-router")]
#[command(about = "Resolve and navigate a client-side route table", long_about = None)]
struct Cli {
    /// Router configuration file (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    /// Initial address; defaults to `initial_url` from the configuration.
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the initial address and print the mounted route
    Resolve,
    /// Navigate through each path in turn
    Navigate {
        #[arg(required = true)]
        paths: Vec<String>,

        /// Parameter substituted into `:name` placeholders (key=value)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Print the compiled segments of every configured route
    Routes,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_logging(&config.observability.log_level);

    match cli.command {
        Commands::Routes => print_routes(&config)?,
        Commands::Resolve => {
            let (router, host, location) = start(config, cli.url).await?;
            print_current(&host, &location)?;
            router.destroy().await;
        }
        Commands::Navigate { paths, params } => {
            let params: Params = params.into_iter().collect();
            let (router, host, location) = start(config, cli.url).await?;
            print_current(&host, &location)?;

            for path in paths {
                let before = host.mounts().len();
                router.navigate_with(&path, &params).await;
                // Hash-mode navigations resolve on the listener task.
                let _ = tokio::time::timeout(SETTLE_TIMEOUT, host.wait_for_mounts(before + 1)).await;
                print_current(&host, &location)?;
            }
            router.destroy().await;
        }
    }

    Ok(())
}

async fn start(
    config: RouterConfig,
    url: Option<String>,
) -> Result<(Router, Arc<RecordingHost>, Arc<MemoryLocation>), Box<dyn std::error::Error>> {
    let url = url.unwrap_or_else(|| config.initial_url.clone());
    let location = Arc::new(MemoryLocation::new(&url)?);
    let host = Arc::new(RecordingHost::new());

    for name in referenced_components(&config) {
        host.register_component(&name, ComponentDefinition::new(name.clone()));
    }

    let mut options = config.into_options();
    options.auto_start = false;
    let router = install(host.clone(), location.clone(), options)?;
    router.start().await;

    tracing::info!(url = %url, mode = %router.mode(), "Router ready");
    Ok((router, host, location))
}

fn referenced_components(config: &RouterConfig) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for route in config.routes.iter().chain(config.default_route.as_ref()) {
        match &route.component {
            Some(ComponentConfig::Name(name)) => {
                names.insert(name.clone());
            }
            Some(ComponentConfig::Inline(inline)) => {
                names.extend(inline.children.values().cloned());
            }
            None => {}
        }
    }
    names
}

fn print_current(host: &RecordingHost, location: &MemoryLocation) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", location.href());
    match host.events().last() {
        Some(HostEvent::Mounted { component, route, .. }) => {
            println!("  component: {}", component.as_deref().unwrap_or("<anonymous>"));
            println!("{}", serde_json::to_string_pretty(route)?);
        }
        _ => println!("  (nothing mounted)"),
    }
    Ok(())
}

fn print_routes(config: &RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let routes = config.routes.iter().map(|route| ("route", route));
    let fallback = config.default_route.iter().map(|route| ("default", route));

    for (kind, route) in routes.chain(fallback) {
        let pattern = RoutePattern::from_definition(RouteConfig::into_definition(route.clone()))?;
        let segments: Vec<String> = pattern.segments().iter().map(ToString::to_string).collect();
        println!(
            "{:<8} {:<24} {:<20} [{}]",
            kind,
            pattern.raw_path(),
            pattern.component().display_name(),
            segments.join(", ")
        );
    }
    Ok(())
}
