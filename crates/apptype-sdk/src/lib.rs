//! Contract between a host application and the application types plugged into it.
//!
//! A plugin implements the capability traits in [`hooks`], then hands the value
//! to [`TypeDescriptor::new`], which validates its identity up front. Only
//! validated descriptors can be registered and invoked by the host.

pub mod application;
pub mod descriptor;
pub mod error;
pub mod hooks;
pub mod manifest;

pub use application::{Application, ApplicationUpdate, Dependent};
pub use descriptor::{IdentityFields, SerializedType, TypeDescriptor, ValidIdentity};
pub use error::ConfigurationError;
pub use hooks::{
    ApplicationType, ComponentRef, ContextMenuProvider, DependentsName, DependentsProvider,
    FormProvider, HostContext, Identity, LifecycleParticipant, RouteTarget, SidebarProvider,
};
pub use manifest::ApplicationTypeManifest;
