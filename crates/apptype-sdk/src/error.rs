use thiserror::Error;

/// Raised while constructing a [`TypeDescriptor`](crate::TypeDescriptor) whose
/// identity is incomplete. Always a bug in the application type itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("type name must be set")]
    MissingType,
    #[error("icon class must be set")]
    MissingIconClass,
    #[error("name must be set")]
    MissingName,
}
