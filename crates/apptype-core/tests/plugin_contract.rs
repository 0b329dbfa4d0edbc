use apptype_core::{ApplicationHost, NavigationLog, Registry, RegistryError};
use apptype_sdk::{
    Application, ComponentRef, ConfigurationError, ContextMenuProvider, DependentsProvider,
    FormProvider, Identity, LifecycleParticipant, RouteTarget, SidebarProvider, TypeDescriptor,
};
use serde_json::json;

/// Identity-only type: every capability falls back to its default.
struct Simple;

impl Identity for Simple {
    fn type_name(&self) -> Option<&str> {
        Some("simple")
    }
    fn icon_class(&self) -> Option<&str> {
        Some("cube")
    }
    fn name(&self) -> Option<&str> {
        Some("Simple")
    }
}

impl FormProvider for Simple {}
impl SidebarProvider for Simple {}
impl ContextMenuProvider for Simple {}
impl DependentsProvider for Simple {}
impl LifecycleParticipant for Simple {}

struct Nameless;

impl Identity for Nameless {
    fn type_name(&self) -> Option<&str> {
        Some("nameless")
    }
    fn icon_class(&self) -> Option<&str> {
        Some("question")
    }
    fn name(&self) -> Option<&str> {
        None
    }
}

impl FormProvider for Nameless {}
impl SidebarProvider for Nameless {}
impl ContextMenuProvider for Nameless {}
impl DependentsProvider for Nameless {}
impl LifecycleParticipant for Nameless {}

struct Board;

impl Identity for Board {
    fn type_name(&self) -> Option<&str> {
        Some("board")
    }
    fn icon_class(&self) -> Option<&str> {
        Some("columns")
    }
    fn name(&self) -> Option<&str> {
        Some("Board")
    }
    fn route_name(&self) -> Option<&str> {
        Some("board-view")
    }
}

impl FormProvider for Board {
    fn application_form_component(&self) -> ComponentRef {
        ComponentRef::from_static("board.CreateForm")
    }
}

impl SidebarProvider for Board {
    fn selected_sidebar_component(&self) -> Option<ComponentRef> {
        Some(ComponentRef::from_static("board.Lanes"))
    }
}

impl ContextMenuProvider for Board {}
impl DependentsProvider for Board {}

impl LifecycleParticipant for Board {
    fn select(&self, application: &Application, context: &mut dyn apptype_sdk::HostContext) {
        context.navigate(RouteTarget::new("board-view").param("boardId", application.id));
    }
}

#[test]
fn identity_only_type_has_default_capabilities() {
    let mut registry = Registry::new();
    registry.register_type(Simple).unwrap();
    let registry = registry.into_shared();

    let descriptor = registry.get("simple").unwrap();
    assert_eq!(
        serde_json::to_value(descriptor.serialize()).unwrap(),
        json!({
            "type": "simple",
            "iconClass": "cube",
            "name": "Simple",
            "routeName": null,
            "hasSelectedSidebarComponent": false
        })
    );

    let host = ApplicationHost::new(&registry);
    let app = Application::new(1, "simple", "Mine").with_field("color", json!("blue"));
    assert_eq!(host.populate(app.clone()).unwrap(), app);

    let mut nav = NavigationLog::default();
    host.select(&app, &mut nav).unwrap();
    host.delete(&app, &mut nav).unwrap();
    assert!(nav.visited().is_empty());

    let preview = host.delete_preview(&app).unwrap();
    assert!(preview.message.is_none());
    assert!(preview.dependents.is_empty());
}

#[test]
fn nameless_type_fails_before_registration() {
    assert_eq!(
        TypeDescriptor::new(Nameless).unwrap_err(),
        ConfigurationError::MissingName
    );

    let mut registry = Registry::new();
    let err = registry.register_type(Nameless).unwrap_err();
    assert!(matches!(err, RegistryError::Configuration(_)));
    assert!(!registry.contains("nameless"));
}

#[test]
fn overridden_capabilities_flow_through_the_descriptor() {
    let mut registry = Registry::new();
    registry.register_type(Board).unwrap();
    registry.register_type(Simple).unwrap();

    let serialized = registry.serialize_all();
    let board = serialized.iter().find(|s| s.type_name == "board").unwrap();
    assert!(board.has_selected_sidebar_component);
    assert_eq!(board.route_name.as_deref(), Some("board-view"));
    let raw = serde_json::to_string(&serialized).unwrap();
    assert!(!raw.contains("board.Lanes"));

    let descriptor = registry.get("board").unwrap();
    assert_eq!(descriptor.application_form_component().id(), "board.CreateForm");

    let host = ApplicationHost::new(&registry);
    let mut nav = NavigationLog::default();
    host.select(&Application::new(8, "board", "Roadmap"), &mut nav)
        .unwrap();
    assert_eq!(nav.visited()[0].params["boardId"], "8");
}

#[test]
fn lookups_of_unregistered_types_fail() {
    let registry = Registry::new();
    assert!(matches!(
        registry.get("simple"),
        Err(RegistryError::NotFound(key)) if key == "simple"
    ));
}
