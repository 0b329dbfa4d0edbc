//! Application types compiled into the host.

use apptype_sdk::{
    Application, ApplicationUpdate, ComponentRef, ContextMenuProvider, Dependent, DependentsName,
    DependentsProvider, FormProvider, HostContext, Identity, LifecycleParticipant, RouteTarget,
    SidebarProvider,
};
use serde_json::{json, Map, Value};

use crate::registry::{Registry, RegistryError};

pub const DATABASE_TABLE_ROUTE: &str = "database-table";
pub const DASHBOARD_ROUTE: &str = "dashboard";

const TABLES: &str = "tables";
const UI_STATE: &str = "_";

/// Registers every built-in application type.
pub fn register_builtins(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_type(DatabaseType)
}

/// A database groups tables; selecting it opens its first table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseType;

impl Identity for DatabaseType {
    fn type_name(&self) -> Option<&str> {
        Some("database")
    }

    fn icon_class(&self) -> Option<&str> {
        Some("database")
    }

    fn name(&self) -> Option<&str> {
        Some("Database")
    }

    fn route_name(&self) -> Option<&str> {
        Some(DATABASE_TABLE_ROUTE)
    }
}

impl FormProvider for DatabaseType {}

impl SidebarProvider for DatabaseType {
    fn selected_sidebar_component(&self) -> Option<ComponentRef> {
        Some(ComponentRef::from_static("database.Sidebar"))
    }
}

impl ContextMenuProvider for DatabaseType {
    fn context_component(&self) -> Option<ComponentRef> {
        Some(ComponentRef::from_static("database.Context"))
    }
}

impl DependentsProvider for DatabaseType {
    fn dependents_name(&self) -> DependentsName {
        DependentsName::new("table", "tables")
    }

    fn dependents(&self, application: &Application) -> Vec<Dependent> {
        tables(application)
            .filter_map(|table| {
                Some(Dependent {
                    id: table.get("id")?.as_u64()?,
                    icon_class: "th".to_string(),
                    name: table.get("name")?.as_str()?.to_string(),
                })
            })
            .collect()
    }
}

impl LifecycleParticipant for DatabaseType {
    fn populate(&self, mut application: Application) -> Application {
        let tables = application
            .extra
            .entry(TABLES)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = tables {
            items.iter_mut().for_each(|table| populate_table(table, false));
        }
        application
    }

    fn delete(&self, application: &Application, context: &mut dyn HostContext) {
        let viewing_deleted = context
            .current_route()
            .and_then(|route| route.params.get("databaseId"))
            .is_some_and(|id| *id == application.id.to_string());
        if viewing_deleted {
            context.navigate(RouteTarget::new(DASHBOARD_ROUTE));
        }
    }

    fn select(&self, application: &Application, context: &mut dyn HostContext) {
        let first_table = tables(application).find_map(|table| table.get("id")?.as_u64());
        if let Some(table_id) = first_table {
            context.navigate(
                RouteTarget::new(DATABASE_TABLE_ROUTE)
                    .param("databaseId", application.id)
                    .param("tableId", table_id),
            );
        }
    }

    fn clear_children_selected(&self, mut application: Application) -> Application {
        if let Some(Value::Array(items)) = application.extra.get_mut(TABLES) {
            for table in items.iter_mut() {
                if let Some(state) = table.get_mut(UI_STATE).and_then(Value::as_object_mut) {
                    state.insert("selected".into(), Value::Bool(false));
                }
            }
        }
        application
    }

    fn prepare_for_store_update(
        &self,
        application: &Application,
        mut data: ApplicationUpdate,
    ) -> ApplicationUpdate {
        if let Some(Value::Array(incoming)) = data.get_mut(TABLES) {
            for table in incoming.iter_mut() {
                let selected = table
                    .get("id")
                    .and_then(Value::as_u64)
                    .is_some_and(|id| is_table_selected(application, id));
                populate_table(table, selected);
            }
        }
        data
    }
}

fn tables(application: &Application) -> impl Iterator<Item = &Value> {
    application
        .field(TABLES)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn is_table_selected(application: &Application, table_id: u64) -> bool {
    tables(application)
        .find(|table| table.get("id").and_then(Value::as_u64) == Some(table_id))
        .and_then(|table| table.get(UI_STATE)?.get("selected")?.as_bool())
        .unwrap_or(false)
}

fn populate_table(table: &mut Value, selected: bool) {
    if let Value::Object(fields) = table {
        fields
            .entry(UI_STATE)
            .or_insert_with(|| ui_state(selected));
    }
}

fn ui_state(selected: bool) -> Value {
    let mut state = Map::new();
    state.insert("selected".into(), json!(selected));
    state.insert("disabled".into(), json!(false));
    Value::Object(state)
}
