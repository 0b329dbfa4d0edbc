use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Partial update payload for an [`Application`], keyed by field name.
pub type ApplicationUpdate = Map<String, Value>;

/// Host-owned application instance. `kind` selects the governing type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    /// Variant specific fields, e.g. the tables of a database.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Application {
    pub fn new(id: u64, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Applies an update payload. `id` and `type` are never changed by an update.
    pub fn apply(&mut self, update: ApplicationUpdate) {
        for (key, value) in update {
            match key.as_str() {
                "id" | "type" => continue,
                "name" => {
                    if let Value::String(name) = value {
                        self.name = name;
                    }
                }
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
    }
}

/// A child entity listed when previewing what an application contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependent {
    pub id: u64,
    pub icon_class: String,
    pub name: String,
}
