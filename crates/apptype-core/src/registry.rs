use std::{collections::BTreeMap, sync::Arc};

use apptype_sdk::{ApplicationType, ConfigurationError, SerializedType, TypeDescriptor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("application type `{0}` is already registered")]
    Duplicate(String),
    #[error("application type `{0}` is not registered")]
    NotFound(String),
    #[error("invalid application type: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// One descriptor per type key.
///
/// Populated during plugin loading, then frozen with [`Registry::into_shared`]
/// and handed by reference to whoever needs lookups.
#[derive(Debug, Default)]
pub struct Registry {
    types: BTreeMap<String, TypeDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<(), RegistryError> {
        let key = descriptor.type_name().to_string();
        if self.types.contains_key(&key) {
            metrics::counter!("apptype_registrations_total", "outcome" => "duplicate").increment(1);
            return Err(RegistryError::Duplicate(key));
        }
        tracing::info!(
            type_name = %key,
            display_name = descriptor.name(),
            "registered application type"
        );
        metrics::counter!("apptype_registrations_total", "outcome" => "ok").increment(1);
        self.types.insert(key, descriptor);
        Ok(())
    }

    /// Builds the descriptor for `variant` and registers it. Nothing is
    /// registered when the variant's identity is incomplete.
    pub fn register_type<T: ApplicationType>(&mut self, variant: T) -> Result<(), RegistryError> {
        let descriptor = TypeDescriptor::new(variant).inspect_err(|_| {
            metrics::counter!("apptype_registrations_total", "outcome" => "invalid").increment(1);
        })?;
        self.register(descriptor)
    }

    pub fn get(&self, type_name: &str) -> Result<&TypeDescriptor, RegistryError> {
        self.try_get(type_name)
            .ok_or_else(|| RegistryError::NotFound(type_name.to_string()))
    }

    pub fn try_get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Descriptors ordered by type key.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    pub fn serialize_all(&self) -> Vec<SerializedType> {
        self.iter().map(TypeDescriptor::serialize).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn into_shared(self) -> Arc<Registry> {
        Arc::new(self)
    }
}
