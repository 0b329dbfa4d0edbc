//! Generic lifecycle dispatch: the host never names a concrete application
//! type, it looks the descriptor up by the application's `type` field.

use apptype_sdk::{
    Application, ApplicationUpdate, Dependent, HostContext, RouteTarget, TypeDescriptor,
};
use serde::Serialize;

use crate::registry::{Registry, RegistryError};

/// Summary shown before an application is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletePreview {
    pub application: String,
    /// "There are 2 tables"; absent when the type has no dependents concept.
    pub message: Option<String>,
    pub dependents: Vec<Dependent>,
}

pub struct ApplicationHost<'a> {
    registry: &'a Registry,
}

impl<'a> ApplicationHost<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn descriptor_for(
        &self,
        application: &Application,
    ) -> Result<&'a TypeDescriptor, RegistryError> {
        self.registry.get(&application.kind)
    }

    pub fn populate(&self, application: Application) -> Result<Application, RegistryError> {
        let descriptor = self.dispatch(&application, "populate")?;
        Ok(descriptor.populate(application))
    }

    pub fn populate_all(
        &self,
        applications: Vec<Application>,
    ) -> Result<Vec<Application>, RegistryError> {
        applications
            .into_iter()
            .map(|application| self.populate(application))
            .collect()
    }

    pub fn delete(
        &self,
        application: &Application,
        context: &mut dyn HostContext,
    ) -> Result<(), RegistryError> {
        self.dispatch(application, "delete")?.delete(application, context);
        Ok(())
    }

    pub fn select(
        &self,
        application: &Application,
        context: &mut dyn HostContext,
    ) -> Result<(), RegistryError> {
        self.dispatch(application, "select")?.select(application, context);
        Ok(())
    }

    pub fn clear_children_selected(
        &self,
        application: Application,
    ) -> Result<Application, RegistryError> {
        let descriptor = self.dispatch(&application, "clear_children_selected")?;
        Ok(descriptor.clear_children_selected(application))
    }

    /// Lets the type adjust `data`, then applies it to `application`.
    pub fn update(
        &self,
        application: &mut Application,
        data: ApplicationUpdate,
    ) -> Result<(), RegistryError> {
        let descriptor = self.dispatch(application, "prepare_for_store_update")?;
        let prepared = descriptor.prepare_for_store_update(application, data);
        application.apply(prepared);
        Ok(())
    }

    pub fn delete_preview(
        &self,
        application: &Application,
    ) -> Result<DeletePreview, RegistryError> {
        let descriptor = self.descriptor_for(application)?;
        let dependents = descriptor.dependents(application);
        Ok(DeletePreview {
            application: application.name.clone(),
            message: descriptor.dependents_name().describe(dependents.len()),
            dependents,
        })
    }

    fn dispatch(
        &self,
        application: &Application,
        hook: &'static str,
    ) -> Result<&'a TypeDescriptor, RegistryError> {
        let descriptor = self.descriptor_for(application)?;
        tracing::debug!(
            application = application.id,
            type_name = %application.kind,
            hook,
            "dispatching lifecycle hook"
        );
        metrics::counter!("apptype_hook_invocations_total", "hook" => hook).increment(1);
        Ok(descriptor)
    }
}

/// [`HostContext`] that records every navigation request.
#[derive(Debug, Clone, Default)]
pub struct NavigationLog {
    current: Option<RouteTarget>,
    visited: Vec<RouteTarget>,
}

impl NavigationLog {
    pub fn at(route: RouteTarget) -> Self {
        Self {
            current: Some(route),
            visited: Vec::new(),
        }
    }

    pub fn visited(&self) -> &[RouteTarget] {
        &self.visited
    }
}

impl HostContext for NavigationLog {
    fn current_route(&self) -> Option<&RouteTarget> {
        self.current.as_ref()
    }

    fn navigate(&mut self, target: RouteTarget) {
        self.current = Some(target.clone());
        self.visited.push(target);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::builtin::{register_builtins, DASHBOARD_ROUTE, DATABASE_TABLE_ROUTE};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        register_builtins(&mut registry).unwrap();
        registry
    }

    fn crm() -> Application {
        Application::new(1, "database", "CRM").with_field(
            "tables",
            json!([{ "id": 5, "name": "Customers" }, { "id": 6, "name": "Orders" }]),
        )
    }

    #[test]
    fn unknown_types_are_reported() {
        let registry = registry();
        let host = ApplicationHost::new(&registry);
        let err = host
            .populate(Application::new(1, "spreadsheet", "Sheet"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(key) if key == "spreadsheet"));
    }

    #[test]
    fn select_then_delete_navigates_through_context() {
        let registry = registry();
        let host = ApplicationHost::new(&registry);
        let mut nav = NavigationLog::default();
        let app = host.populate(crm()).unwrap();

        host.select(&app, &mut nav).unwrap();
        assert_eq!(nav.current_route().unwrap().name, DATABASE_TABLE_ROUTE);

        host.delete(&app, &mut nav).unwrap();
        assert_eq!(nav.visited().len(), 2);
        assert_eq!(nav.current_route().unwrap().name, DASHBOARD_ROUTE);
    }

    #[test]
    fn update_prepares_then_applies() {
        let registry = registry();
        let host = ApplicationHost::new(&registry);
        let mut app = host.populate(crm()).unwrap();
        let data = json!({ "name": "Sales", "tables": [{ "id": 7, "name": "Leads" }] })
            .as_object()
            .cloned()
            .unwrap();
        host.update(&mut app, data).unwrap();
        assert_eq!(app.name, "Sales");
        assert_eq!(
            app.field("tables").unwrap()[0]["_"],
            json!({ "selected": false, "disabled": false })
        );
    }

    #[test]
    fn delete_preview_counts_dependents() {
        let registry = registry();
        let host = ApplicationHost::new(&registry);
        let preview = host.delete_preview(&crm()).unwrap();
        assert_eq!(preview.application, "CRM");
        assert_eq!(preview.message.as_deref(), Some("There are 2 tables"));
        assert_eq!(preview.dependents.len(), 2);
    }
}
