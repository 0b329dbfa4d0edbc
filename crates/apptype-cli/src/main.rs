use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::{Context, Result};
use apptype_core::{
    config::HostConfig, discover_manifests, host_version, load_registry, version, ApplicationHost,
    NavigationLog, Registry,
};
use apptype_sdk::Application;
use clap::{Parser, Subcommand};
use regex::Regex;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "apptype", author, version, about = "Application type registry")]
struct Cli {
    /// Sets the log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Host configuration file; built-in types only when omitted.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect registered application types.
    Types {
        #[command(subcommand)]
        command: TypeCommands,
    },
    /// Interact with configuration files (validate, sample output, etc.)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Inspect manifest files without registering them.
    Plugins {
        #[command(subcommand)]
        command: PluginCommands,
    },
    /// Dump the resolved configuration as JSON.
    Diag,
}

#[derive(Subcommand, Debug)]
enum TypeCommands {
    /// Lists every registered type.
    List,
    /// Prints the serialized record of one type.
    Show {
        #[arg(value_name = "TYPE")]
        type_name: String,
    },
    /// Runs populate, select and delete preview against an application JSON file.
    Preview {
        #[arg(value_name = "APPLICATION")]
        application: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validates the provided configuration file and the types it loads.
    Validate {
        #[arg(value_name = "FILE")]
        config: PathBuf,
    },
    /// Prints the bundled minimal example configuration.
    Example,
}

#[derive(Subcommand, Debug)]
enum PluginCommands {
    /// Lists manifests found in a directory.
    List {
        #[arg(long, value_name = "DIR", default_value = "types")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    match cli.command {
        Commands::Types { command } => handle_types(cli.config.as_deref(), command),
        Commands::Config { command } => handle_config(command),
        Commands::Plugins { command } => handle_plugins(command),
        Commands::Diag => handle_diag(cli.config.as_deref()),
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init().ok();
    Ok(())
}

fn handle_types(config: Option<&Path>, command: TypeCommands) -> Result<()> {
    let registry = build_registry(config)?;
    match command {
        TypeCommands::List => {
            if registry.is_empty() {
                println!("no application types registered");
            }
            for descriptor in registry.iter() {
                println!(
                    "- {} ({}) icon={}{}",
                    descriptor.type_name(),
                    descriptor.name(),
                    descriptor.icon_class(),
                    descriptor
                        .route_name()
                        .map(|route| format!(" route={route}"))
                        .unwrap_or_default()
                );
            }
        }
        TypeCommands::Show { type_name } => {
            let descriptor = registry.get(&type_name)?;
            println!("{}", serde_json::to_string_pretty(&descriptor.serialize())?);
        }
        TypeCommands::Preview { application } => {
            let raw = fs::read_to_string(&application)
                .with_context(|| format!("failed to read {}", application.display()))?;
            let app: Application = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", application.display()))?;
            let host = ApplicationHost::new(&registry);
            let app = host.populate(app)?;
            let mut nav = NavigationLog::default();
            host.select(&app, &mut nav)?;
            let preview = host.delete_preview(&app)?;
            let routes: Vec<&str> = nav.visited().iter().map(|t| t.name.as_str()).collect();
            let report = serde_json::json!({
                "application": app,
                "selectNavigatesTo": routes,
                "deletePreview": preview,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn handle_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Validate { config } => {
            let cfg = load_config(&config)?;
            cfg.validate()?;
            let (registry, report) = load_registry(&cfg, &current_host()?)?;
            for skipped in &report.skipped {
                println!("skipped {}: {}", skipped.source, skipped.reason);
            }
            println!(
                "configuration OK: {} ({} types registered)",
                config.display(),
                registry.len()
            );
        }
        ConfigCommands::Example => {
            println!("{}", include_str!("../config/minimal.apptype.toml"));
        }
    }
    Ok(())
}

fn handle_plugins(command: PluginCommands) -> Result<()> {
    match command {
        PluginCommands::List { dir } => {
            let manifests = discover_manifests(&dir)?;
            if manifests.is_empty() {
                println!("no manifests found under {}", dir.display());
            }
            for found in manifests {
                match found.manifest {
                    Ok(manifest) => println!(
                        "- {} v{} [{}]{}",
                        manifest.type_name.as_deref().unwrap_or("<unset>"),
                        manifest.version.as_deref().unwrap_or("0.0.0"),
                        found.source,
                        manifest
                            .description
                            .as_ref()
                            .map(|d| format!(": {d}"))
                            .unwrap_or_default()
                    ),
                    Err(err) => println!("- <invalid> [{}]: {err:#}", found.source),
                }
            }
        }
    }
    Ok(())
}

fn handle_diag(config: Option<&Path>) -> Result<()> {
    let cfg = match config {
        Some(path) => load_config(path)?,
        None => HostConfig::default(),
    };
    let report = serde_json::json!({
        "hostVersion": version(),
        "config": cfg,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build_registry(config: Option<&Path>) -> Result<Registry> {
    let cfg = match config {
        Some(path) => load_config(path)?,
        None => HostConfig::default(),
    };
    let (registry, report) = load_registry(&cfg, &current_host()?)?;
    tracing::info!(
        registered = report.registered.len(),
        skipped = report.skipped.len(),
        "application types loaded"
    );
    Ok(registry)
}

fn current_host() -> Result<semver::Version> {
    host_version().with_context(|| format!("host version `{}` is not valid semver", version()))
}

fn load_config(path: &Path) -> Result<HostConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let expanded = interpolate_env(&raw)?;
    let mut cfg = HostConfig::from_toml(&expanded)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    if let Some(base) = path.parent() {
        for dir in &mut cfg.registry.manifest_dirs {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
    Ok(cfg)
}

fn interpolate_env(input: &str) -> Result<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let regex = RE.get_or_init(|| Regex::new(r"\$\{([A-Z0-9_]+)(?::([^}]+))?\}").unwrap());
    let result = regex.replace_all(input, |caps: &regex::Captures| {
        let key = &caps[1];
        match (std::env::var(key), caps.get(2)) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                tracing::warn!(variable = key, "config references unset environment variable");
                String::new()
            }
        }
    });
    Ok(result.into_owned())
}
