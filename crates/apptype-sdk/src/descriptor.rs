//! Validated, immutable handle to an application type.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    application::{Application, ApplicationUpdate, Dependent},
    error::ConfigurationError,
    hooks::{ApplicationType, ComponentRef, DependentsName, HostContext, Identity},
};

/// Identity values read from an [`Identity`] implementation, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityFields {
    pub type_name: Option<String>,
    pub icon_class: Option<String>,
    pub name: Option<String>,
    pub route_name: Option<String>,
}

impl IdentityFields {
    /// Calls every identity accessor exactly once.
    pub fn resolve<I: Identity + ?Sized>(identity: &I) -> Self {
        Self {
            type_name: identity.type_name().map(str::to_owned),
            icon_class: identity.icon_class().map(str::to_owned),
            name: identity.name().map(str::to_owned),
            route_name: identity.route_name().map(str::to_owned),
        }
    }

    /// Checks the required fields in declaration order and reports the first
    /// one that is missing.
    pub fn validate(self) -> Result<ValidIdentity, ConfigurationError> {
        let type_name = self.type_name.ok_or(ConfigurationError::MissingType)?;
        let icon_class = self.icon_class.ok_or(ConfigurationError::MissingIconClass)?;
        let name = self.name.ok_or(ConfigurationError::MissingName)?;
        Ok(ValidIdentity {
            type_name,
            icon_class,
            name,
            route_name: self.route_name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidIdentity {
    type_name: String,
    icon_class: String,
    name: String,
    route_name: Option<String>,
}

/// Transport-safe record of a descriptor; field names are part of the public
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedType {
    #[serde(rename = "type")]
    pub type_name: String,
    pub icon_class: String,
    pub name: String,
    pub route_name: Option<String>,
    pub has_selected_sidebar_component: bool,
}

/// An application type that passed identity validation.
///
/// Cloning is cheap; clones share the underlying variant.
#[derive(Clone)]
pub struct TypeDescriptor {
    identity: ValidIdentity,
    variant: Arc<dyn ApplicationType>,
}

impl TypeDescriptor {
    pub fn new<T: ApplicationType>(variant: T) -> Result<Self, ConfigurationError> {
        Self::from_shared(Arc::new(variant))
    }

    pub fn from_shared(variant: Arc<dyn ApplicationType>) -> Result<Self, ConfigurationError> {
        let identity = IdentityFields::resolve(variant.as_ref()).validate()?;
        Ok(Self { identity, variant })
    }

    pub fn type_name(&self) -> &str {
        &self.identity.type_name
    }

    pub fn icon_class(&self) -> &str {
        &self.identity.icon_class
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn route_name(&self) -> Option<&str> {
        self.identity.route_name.as_deref()
    }

    pub fn serialize(&self) -> SerializedType {
        SerializedType {
            type_name: self.identity.type_name.clone(),
            icon_class: self.identity.icon_class.clone(),
            name: self.identity.name.clone(),
            route_name: self.identity.route_name.clone(),
            has_selected_sidebar_component: self.selected_sidebar_component().is_some(),
        }
    }

    pub fn application_form_component(&self) -> ComponentRef {
        self.variant.application_form_component()
    }

    pub fn selected_sidebar_component(&self) -> Option<ComponentRef> {
        self.variant.selected_sidebar_component()
    }

    pub fn context_component(&self) -> Option<ComponentRef> {
        self.variant.context_component()
    }

    pub fn dependents_name(&self) -> DependentsName {
        self.variant.dependents_name()
    }

    pub fn dependents(&self, application: &Application) -> Vec<Dependent> {
        self.variant.dependents(application)
    }

    pub fn populate(&self, application: Application) -> Application {
        self.variant.populate(application)
    }

    pub fn delete(&self, application: &Application, context: &mut dyn HostContext) {
        self.variant.delete(application, context)
    }

    pub fn select(&self, application: &Application, context: &mut dyn HostContext) {
        self.variant.select(application, context)
    }

    pub fn clear_children_selected(&self, application: Application) -> Application {
        self.variant.clear_children_selected(application)
    }

    pub fn prepare_for_store_update(
        &self,
        application: &Application,
        data: ApplicationUpdate,
    ) -> ApplicationUpdate {
        self.variant.prepare_for_store_update(application, data)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type", &self.identity.type_name)
            .field("icon_class", &self.identity.icon_class)
            .field("name", &self.identity.name)
            .field("route_name", &self.identity.route_name)
            .finish()
    }
}
