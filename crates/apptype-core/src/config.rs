use std::{collections::HashSet, path::PathBuf};

use anyhow::{bail, Result};
use apptype_sdk::ApplicationTypeManifest;
use serde::{Deserialize, Serialize};

/// Root host configuration deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HostConfig {
    pub registry: RegistrySettings,
    /// Application types declared inline instead of in manifest files.
    pub types: Vec<ApplicationTypeManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Register the application types compiled into the host.
    pub builtin: bool,
    /// Directories scanned for `*.json` application type manifests.
    pub manifest_dirs: Vec<PathBuf>,
    /// Type keys that are never registered.
    pub disabled: Vec<String>,
    /// Abort loading on the first bad manifest instead of skipping it.
    pub strict: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            builtin: true,
            manifest_dirs: Vec::new(),
            disabled: Vec::new(),
            strict: false,
        }
    }
}

impl HostConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Validates structural invariants and provides actionable error messages.
    pub fn validate(&self) -> Result<()> {
        self.registry.validate()?;

        let mut inline_keys = HashSet::new();
        for (index, manifest) in self.types.iter().enumerate() {
            let Some(key) = manifest.type_name.as_deref() else {
                bail!("inline application type #{index} must set `type`");
            };
            if !inline_keys.insert(key) {
                bail!("duplicate inline application type `{key}`");
            }
        }
        Ok(())
    }

    pub fn is_disabled(&self, type_name: &str) -> bool {
        self.registry.disabled.iter().any(|key| key == type_name)
    }
}

impl RegistrySettings {
    pub fn validate(&self) -> Result<()> {
        if self
            .manifest_dirs
            .iter()
            .any(|dir| dir.as_os_str().is_empty())
        {
            bail!("registry.manifest_dirs must not contain empty paths");
        }
        if self.disabled.iter().any(|key| key.trim().is_empty()) {
            bail!("registry.disabled must not contain blank type keys");
        }
        Ok(())
    }
}
