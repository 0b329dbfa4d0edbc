use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    application::{Application, ApplicationUpdate, Dependent},
    hooks::{
        ComponentRef, ContextMenuProvider, DependentsName, DependentsProvider, FormProvider,
        HostContext, Identity, LifecycleParticipant, RouteTarget, SidebarProvider,
    },
};

/// JSON manifest describing an application type without any code.
///
/// A manifest is itself a complete application type; identity fields are
/// optional here so that an incomplete manifest surfaces as a
/// [`ConfigurationError`](crate::ConfigurationError) when it is turned into a
/// descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationTypeManifest {
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub icon_class: Option<String>,
    pub name: Option<String>,
    pub route_name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    /// Oldest host version this type runs on, e.g. `"0.1.0"`.
    pub min_host_version: Option<String>,
    pub form_component: Option<String>,
    pub selected_sidebar_component: Option<String>,
    pub context_component: Option<String>,
    pub dependents_name: Option<[String; 2]>,
    /// Array field of the application whose entries are its dependents.
    pub dependents_field: Option<String>,
    pub dependent_icon_class: Option<String>,
    /// Filled into the application by `populate` when absent.
    pub defaults: Map<String, Value>,
    /// Stripped from update payloads before they reach the store.
    pub readonly_fields: Vec<String>,
    /// Route navigated to when an application of this type is selected.
    pub select_route: Option<String>,
}

impl ApplicationTypeManifest {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Whether `host` is at least `minHostVersion`. A manifest without a
    /// minimum is always compatible.
    pub fn is_compatible(&self, host: &Version) -> Result<bool, semver::Error> {
        match &self.min_host_version {
            Some(min) => Ok(*host >= Version::parse(min)?),
            None => Ok(true),
        }
    }
}

impl Identity for ApplicationTypeManifest {
    fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    fn icon_class(&self) -> Option<&str> {
        self.icon_class.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn route_name(&self) -> Option<&str> {
        self.route_name.as_deref()
    }
}

impl FormProvider for ApplicationTypeManifest {
    fn application_form_component(&self) -> ComponentRef {
        self.form_component
            .as_ref()
            .map(|id| ComponentRef::new(id.as_str()))
            .unwrap_or(ComponentRef::APPLICATION_FORM)
    }
}

impl SidebarProvider for ApplicationTypeManifest {
    fn selected_sidebar_component(&self) -> Option<ComponentRef> {
        self.selected_sidebar_component
            .as_ref()
            .map(|id| ComponentRef::new(id.as_str()))
    }
}

impl ContextMenuProvider for ApplicationTypeManifest {
    fn context_component(&self) -> Option<ComponentRef> {
        self.context_component
            .as_ref()
            .map(|id| ComponentRef::new(id.as_str()))
    }
}

impl DependentsProvider for ApplicationTypeManifest {
    fn dependents_name(&self) -> DependentsName {
        match &self.dependents_name {
            Some([singular, plural]) => DependentsName::new(singular.as_str(), plural.as_str()),
            None => DependentsName::default(),
        }
    }

    fn dependents(&self, application: &Application) -> Vec<Dependent> {
        let Some(items) = self
            .dependents_field
            .as_deref()
            .and_then(|field| application.field(field))
            .and_then(Value::as_array)
        else {
            return Vec::new();
        };
        let icon_class = self
            .dependent_icon_class
            .clone()
            .or_else(|| self.icon_class.clone())
            .unwrap_or_default();
        items
            .iter()
            .filter_map(|item| {
                Some(Dependent {
                    id: item.get("id")?.as_u64()?,
                    icon_class: icon_class.clone(),
                    name: item.get("name")?.as_str()?.to_string(),
                })
            })
            .collect()
    }
}

impl LifecycleParticipant for ApplicationTypeManifest {
    fn populate(&self, mut application: Application) -> Application {
        for (key, value) in &self.defaults {
            application
                .extra
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        application
    }

    fn select(&self, application: &Application, context: &mut dyn HostContext) {
        if let Some(route) = &self.select_route {
            context.navigate(RouteTarget::new(route.as_str()).param("applicationId", application.id));
        }
    }

    fn prepare_for_store_update(
        &self,
        _application: &Application,
        mut data: ApplicationUpdate,
    ) -> ApplicationUpdate {
        for field in &self.readonly_fields {
            data.remove(field);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn notes_manifest() -> ApplicationTypeManifest {
        serde_json::from_value(json!({
            "type": "notes",
            "iconClass": "sticky-note",
            "name": "Notes",
            "routeName": "notes-page",
            "version": "1.2.0",
            "minHostVersion": "0.1.0",
            "selectedSidebarComponent": "notes.Sidebar",
            "dependentsName": ["page", "pages"],
            "dependentsField": "pages",
            "dependentIconClass": "file",
            "defaults": { "pages": [], "archived": false },
            "readonlyFields": ["pages"],
            "selectRoute": "notes-page"
        }))
        .unwrap()
    }

    struct Recorder(Vec<RouteTarget>);

    impl HostContext for Recorder {
        fn current_route(&self) -> Option<&RouteTarget> {
            self.0.last()
        }
        fn navigate(&mut self, target: RouteTarget) {
            self.0.push(target);
        }
    }

    #[test]
    fn minimal_manifest_uses_defaults() {
        let manifest = ApplicationTypeManifest::from_json(r#"{"type":"bare"}"#).unwrap();
        assert_eq!(manifest.type_name.as_deref(), Some("bare"));
        assert!(manifest.icon_class.is_none());
        assert!(manifest.defaults.is_empty());
        assert_eq!(
            manifest.application_form_component(),
            ComponentRef::APPLICATION_FORM
        );
        assert!(manifest.dependents_name().is_unset());
    }

    #[test]
    fn min_host_version_is_a_lower_bound() {
        let manifest = notes_manifest();
        assert!(manifest.is_compatible(&Version::new(0, 1, 0)).unwrap());
        assert!(manifest.is_compatible(&Version::new(0, 2, 0)).unwrap());
        assert!(manifest.is_compatible(&Version::new(1, 0, 0)).unwrap());
        assert!(!manifest.is_compatible(&Version::new(0, 0, 9)).unwrap());
        assert!(!manifest
            .is_compatible(&Version::parse("0.1.0-alpha.1").unwrap())
            .unwrap());

        let unbounded = ApplicationTypeManifest {
            min_host_version: None,
            ..notes_manifest()
        };
        assert!(unbounded.is_compatible(&Version::new(0, 0, 1)).unwrap());

        let broken = ApplicationTypeManifest {
            min_host_version: Some("not a version".into()),
            ..notes_manifest()
        };
        assert!(broken.is_compatible(&Version::new(1, 0, 0)).is_err());

        let requirement = ApplicationTypeManifest {
            min_host_version: Some(">=0.1".into()),
            ..notes_manifest()
        };
        assert!(requirement.is_compatible(&Version::new(1, 0, 0)).is_err());
    }

    #[test]
    fn populate_fills_only_missing_defaults() {
        let manifest = notes_manifest();
        let app = Application::new(4, "notes", "Journal").with_field("archived", json!(true));
        let populated = manifest.populate(app);
        assert_eq!(populated.field("archived"), Some(&json!(true)));
        assert_eq!(populated.field("pages"), Some(&json!([])));
    }

    #[test]
    fn dependents_come_from_configured_field() {
        let manifest = notes_manifest();
        let app = Application::new(4, "notes", "Journal").with_field(
            "pages",
            json!([{ "id": 1, "name": "Monday" }, { "id": 2, "name": "Tuesday" }, { "bogus": true }]),
        );
        let dependents = manifest.dependents(&app);
        assert_eq!(dependents.len(), 2);
        assert_eq!(dependents[0].icon_class, "file");
        assert_eq!(dependents[1].name, "Tuesday");
    }

    #[test]
    fn readonly_fields_are_stripped_from_updates() {
        let manifest = notes_manifest();
        let app = Application::new(4, "notes", "Journal");
        let data = json!({ "name": "Diary", "pages": [] }).as_object().cloned().unwrap();
        let prepared = manifest.prepare_for_store_update(&app, data);
        assert!(prepared.contains_key("name"));
        assert!(!prepared.contains_key("pages"));
    }

    #[test]
    fn select_navigates_to_configured_route() {
        let manifest = notes_manifest();
        let mut context = Recorder(Vec::new());
        manifest.select(&Application::new(9, "notes", "Journal"), &mut context);
        let target = context.current_route().unwrap();
        assert_eq!(target.name, "notes-page");
        assert_eq!(target.params["applicationId"], "9");
    }
}
