pub mod builtin;
pub mod config;
pub mod host;
pub mod loader;
pub mod registry;

pub use host::{ApplicationHost, DeletePreview, NavigationLog};
pub use loader::{discover_manifests, load_registry, DiscoveredManifest, LoadReport, SkippedType};
pub use registry::{Registry, RegistryError};

/// Returns the crate version baked in at compile time.
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The host version manifests are checked against.
pub fn host_version() -> Result<semver::Version, semver::Error> {
    semver::Version::parse(version())
}
