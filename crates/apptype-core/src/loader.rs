use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use apptype_sdk::{ApplicationTypeManifest, TypeDescriptor};
use semver::Version;

use crate::{builtin::register_builtins, config::HostConfig, registry::Registry};

/// Outcome of [`load_registry`].
#[derive(Debug, Default)]
pub struct LoadReport {
    pub registered: Vec<String>,
    /// Manifests left out, with the reason. Empty in strict mode.
    pub skipped: Vec<SkippedType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedType {
    pub source: String,
    pub reason: String,
}

/// A manifest file found on disk; `manifest` holds the read or parse error
/// when the file is unusable.
#[derive(Debug)]
pub struct DiscoveredManifest {
    pub source: String,
    pub manifest: Result<ApplicationTypeManifest>,
}

/// Reads every `*.json` manifest directly under `dir`, in file name order.
/// A missing directory yields no manifests. Only failing to list `dir` is an
/// error; a bad file is reported in its own entry.
pub fn discover_manifests(dir: &Path) -> Result<Vec<DiscoveredManifest>> {
    let mut manifests = Vec::new();
    if !dir.exists() {
        return Ok(manifests);
    }
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("failed to read manifest dir {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();
    for path in paths {
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        manifests.push(DiscoveredManifest {
            source: path.display().to_string(),
            manifest: read_manifest(&path),
        });
    }
    Ok(manifests)
}

fn read_manifest(path: &Path) -> Result<ApplicationTypeManifest> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    ApplicationTypeManifest::from_json(&data)
        .with_context(|| format!("failed to parse manifest {}", path.display()))
}

/// Builds the registry described by `config`: built-ins first, then inline
/// types, then manifests from each configured directory.
pub fn load_registry(
    config: &HostConfig,
    host_version: &Version,
) -> Result<(Registry, LoadReport)> {
    config.validate()?;
    let mut registry = Registry::new();
    let mut report = LoadReport::default();

    if config.registry.builtin {
        let mut builtins = Registry::new();
        register_builtins(&mut builtins)?;
        for descriptor in builtins.iter() {
            if config.is_disabled(descriptor.type_name()) {
                tracing::info!(
                    type_name = descriptor.type_name(),
                    "built-in application type disabled"
                );
                continue;
            }
            registry.register(descriptor.clone())?;
            report.registered.push(descriptor.type_name().to_string());
        }
    }

    let mut candidates = config
        .types
        .iter()
        .enumerate()
        .map(|(index, manifest)| DiscoveredManifest {
            source: format!("inline type #{index}"),
            manifest: Ok(manifest.clone()),
        })
        .collect::<Vec<_>>();
    for dir in &config.registry.manifest_dirs {
        candidates.extend(discover_manifests(dir)?);
    }

    for DiscoveredManifest { source, manifest } in candidates {
        let outcome = manifest.and_then(|manifest| {
            let disabled = manifest
                .type_name
                .as_deref()
                .is_some_and(|key| config.is_disabled(key));
            if disabled {
                return Ok(None);
            }
            admit(&mut registry, manifest, host_version).map(Some)
        });
        match outcome {
            Ok(Some(key)) => report.registered.push(key),
            Ok(None) => {}
            Err(err) if !config.registry.strict => {
                let reason = format!("{err:#}");
                tracing::warn!(%source, error = %reason, "skipping application type");
                report.skipped.push(SkippedType { source, reason });
            }
            Err(err) => return Err(err.context(format!("failed to load {source}"))),
        }
    }

    Ok((registry, report))
}

fn admit(
    registry: &mut Registry,
    manifest: ApplicationTypeManifest,
    host_version: &Version,
) -> Result<String> {
    let compatible = manifest
        .is_compatible(host_version)
        .context("invalid minHostVersion")?;
    if !compatible {
        return Err(anyhow!(
            "requires host {}, running {host_version}",
            manifest.min_host_version.as_deref().unwrap_or_default()
        ));
    }
    let descriptor = TypeDescriptor::new(manifest)?;
    let key = descriptor.type_name().to_string();
    registry.register(descriptor)?;
    Ok(key)
}
