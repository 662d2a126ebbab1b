//! Serializable description of a component's bindings

use crate::component::Component;
use crate::declaration::{Kind, Visibility};
use crate::error::{DiError, DiResult};
use crate::key::{ComponentId, Key};
use serde::Serialize;

/// Snapshot of a component's own bindings and visible keys
#[derive(Debug, Clone, Serialize)]
pub struct ComponentManifest {
    pub id: ComponentId,
    pub name: Option<String>,
    pub parents: Vec<ComponentId>,
    /// Own bindings in declaration order
    pub bindings: Vec<BindingEntry>,
    /// Keys dependent components can reach through this one, sorted
    pub exposed: Vec<ExposedEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BindingEntry {
    pub key: String,
    pub type_name: &'static str,
    pub name: Option<String>,
    pub kind: Kind,
    pub visibility: Visibility,
    pub module: Option<String>,
    pub module_index: usize,
    /// Cached bindings only: whether the instance exists yet
    pub instantiated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExposedEntry {
    pub key: String,
    pub owner: ComponentId,
    pub via: Option<ComponentId>,
}

impl Component {
    /// Describe this component without instantiating anything
    pub fn manifest(&self) -> ComponentManifest {
        let bindings = self
            .table()
            .declarations_with_origin()
            .map(|(declaration, origin)| BindingEntry {
                key: declaration.key().to_string(),
                type_name: declaration.key().type_name(),
                name: declaration.key().name().map(str::to_string),
                kind: declaration.kind(),
                visibility: declaration.visibility(),
                module: origin.name.clone(),
                module_index: origin.index,
                instantiated: self.is_instantiated(declaration.key()),
            })
            .collect();

        let mut exposed: Vec<ExposedEntry> = self
            .table()
            .exposed()
            .map(|(key, exposure)| ExposedEntry {
                key: key.to_string(),
                owner: exposure.owner,
                via: exposure.via,
            })
            .collect();
        exposed.sort_by(|a, b| a.key.cmp(&b.key));

        ComponentManifest {
            id: self.id(),
            name: self.config().name.clone(),
            parents: self.parents().iter().map(Component::id).collect(),
            bindings,
            exposed,
        }
    }
}

impl ComponentManifest {
    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DiError::ConfigError(format!("Failed to serialize manifest: {}", e)))
    }

    pub fn binding(&self, key: &Key) -> Option<&BindingEntry> {
        let rendered = key.to_string();
        self.bindings.iter().find(|entry| entry.key == rendered)
    }
}
