//! Capability traits implemented by application types.
//!
//! Every trait except [`Identity`] has a default for each method that means
//! "capability not provided"; callers fall back to generic behaviour when they
//! see it. A variant implements all six traits (most of them as empty `impl`
//! blocks) and thereby becomes an [`ApplicationType`].

use std::{borrow::Cow, collections::BTreeMap, fmt};

use crate::application::{Application, ApplicationUpdate, Dependent};

/// Opaque reference to a rendering unit owned by the host UI.
///
/// Deliberately not `Serialize`: these references never cross into the
/// serialized type record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef(Cow<'static, str>);

impl ComponentRef {
    /// Generic creation form that only asks for a name.
    pub const APPLICATION_FORM: ComponentRef = ComponentRef::from_static("ApplicationForm");

    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Singular and plural nouns for the dependents of an application type,
/// e.g. `table` / `tables`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependentsName {
    pub singular: Option<String>,
    pub plural: Option<String>,
}

impl DependentsName {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: Some(singular.into()),
            plural: Some(plural.into()),
        }
    }

    /// `true` when the type has no notion of dependents.
    pub fn is_unset(&self) -> bool {
        self.singular.is_none() && self.plural.is_none()
    }

    /// Renders "There is 1 table" / "There are 2 tables". Returns `None`
    /// unless both nouns are known, so callers hide the message entirely.
    pub fn describe(&self, count: usize) -> Option<String> {
        let (singular, plural) = (self.singular.as_ref()?, self.plural.as_ref()?);
        Some(match count {
            1 => format!("There is 1 {singular}"),
            n => format!("There are {n} {plural}"),
        })
    }
}

/// A named navigation target plus its parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTarget {
    pub name: String,
    pub params: BTreeMap<String, String>,
}

impl RouteTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }
}

/// Mutable handle through which `delete` and `select` hooks cause side effects.
/// Asynchronous work triggered here belongs to the host, never to the hook.
pub trait HostContext {
    fn current_route(&self) -> Option<&RouteTarget>;
    fn navigate(&mut self, target: RouteTarget);
}

/// Identity of an application type. Each accessor is called exactly once,
/// when the descriptor is built; `None` for any required field is rejected.
pub trait Identity {
    fn type_name(&self) -> Option<&str>;
    fn icon_class(&self) -> Option<&str>;
    fn name(&self) -> Option<&str>;

    fn route_name(&self) -> Option<&str> {
        None
    }
}

pub trait FormProvider {
    /// Form rendered when creating a new application of this type.
    fn application_form_component(&self) -> ComponentRef {
        ComponentRef::APPLICATION_FORM
    }
}

pub trait SidebarProvider {
    /// Extra sidebar content shown while an application of this type is selected.
    fn selected_sidebar_component(&self) -> Option<ComponentRef> {
        None
    }
}

pub trait ContextMenuProvider {
    /// Extra items for the application's context menu.
    fn context_component(&self) -> Option<ComponentRef> {
        None
    }
}

pub trait DependentsProvider {
    fn dependents_name(&self) -> DependentsName {
        DependentsName::default()
    }

    /// Children shown in delete and overview previews.
    fn dependents(&self, _application: &Application) -> Vec<Dependent> {
        Vec::new()
    }
}

/// Hooks invoked by the host at fixed points of an application's life.
pub trait LifecycleParticipant {
    /// Called once for every freshly fetched application.
    fn populate(&self, application: Application) -> Application {
        application
    }

    fn delete(&self, _application: &Application, _context: &mut dyn HostContext) {}

    fn select(&self, _application: &Application, _context: &mut dyn HostContext) {}

    /// Returns the application with any "selected child" state cleared.
    fn clear_children_selected(&self, application: Application) -> Application {
        application
    }

    /// Adjusts a pending update payload before it is applied to `application`.
    fn prepare_for_store_update(
        &self,
        _application: &Application,
        data: ApplicationUpdate,
    ) -> ApplicationUpdate {
        data
    }
}

/// The full capability set. Implemented automatically for every type that
/// implements all six capability traits.
pub trait ApplicationType:
    Identity
    + FormProvider
    + SidebarProvider
    + ContextMenuProvider
    + DependentsProvider
    + LifecycleParticipant
    + Send
    + Sync
    + 'static
{
}

impl<T> ApplicationType for T where
    T: Identity
        + FormProvider
        + SidebarProvider
        + ContextMenuProvider
        + DependentsProvider
        + LifecycleParticipant
        + Send
        + Sync
        + 'static
{
}
