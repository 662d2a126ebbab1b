//! Validated binding tables
//!
//! A table is built once per component. It holds the component's own
//! declarations in module order and the externally visible view: every key a
//! dependent component may reach through this one, mapped to the component
//! that declares it.

use crate::component::Component;
use crate::declaration::Declaration;
use crate::error::{ModuleLabel, OverrideError};
use crate::key::{ComponentId, Key};
use crate::module::Module;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::trace;

/// Whether a lookup originates inside the component or crosses a delegation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Local,
    Delegated,
}

/// Where an externally visible key comes from
#[derive(Debug, Clone, Copy)]
pub(crate) struct Exposure {
    /// Component that declares the binding
    pub owner: ComponentId,
    /// Parent the key is reached through, `None` for own bindings
    pub via: Option<ComponentId>,
}

pub(crate) struct BindingTable {
    declarations: Vec<Arc<Declaration>>,
    origins: Vec<ModuleLabel>,
    index: FxHashMap<Key, usize>,
    exposed: FxHashMap<Key, Exposure>,
}

impl BindingTable {
    /// Merge `modules` and validate them against the visible tables of `parents`
    pub(crate) fn build(
        id: ComponentId,
        modules: &[Module],
        parents: &[Component],
    ) -> Result<Self, OverrideError> {
        let mut declarations = Vec::new();
        let mut origins: Vec<ModuleLabel> = Vec::new();
        let mut index: FxHashMap<Key, usize> = FxHashMap::default();

        for (module_index, module) in modules.iter().enumerate() {
            let label = ModuleLabel {
                index: module_index,
                name: module.name().map(str::to_string),
            };
            for declaration in module.declarations() {
                match index.entry(declaration.key().clone()) {
                    Entry::Occupied(existing) => {
                        return Err(OverrideError::Duplicate {
                            key: declaration.key().clone(),
                            first: origins[*existing.get()].clone(),
                            second: label,
                        });
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(declarations.len());
                    }
                }
                declarations.push(declaration.clone());
                origins.push(label.clone());
            }
        }

        let mut exposed: FxHashMap<Key, Exposure> = declarations
            .iter()
            .filter(|declaration| declaration.is_public())
            .map(|declaration| {
                (
                    declaration.key().clone(),
                    Exposure {
                        owner: id,
                        via: None,
                    },
                )
            })
            .collect();

        for parent in parents {
            for (key, exposure) in parent.table().exposed.iter() {
                let overridden = index.contains_key(key);
                match exposed.entry(key.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(Exposure {
                            owner: exposure.owner,
                            via: Some(parent.id()),
                        });
                    }
                    Entry::Occupied(existing) => {
                        let first = *existing.get();
                        // Reaching the same declaration through two parents is not a conflict
                        if !overridden && first.owner != exposure.owner {
                            return Err(OverrideError::Ambiguous {
                                key: key.clone(),
                                parents: first.via.into_iter().chain(Some(parent.id())).collect(),
                            });
                        }
                    }
                }
            }
        }

        trace!(
            "Binding table for component {}: {} own, {} visible",
            id,
            declarations.len(),
            exposed.len()
        );

        Ok(Self {
            declarations,
            origins,
            index,
            exposed,
        })
    }

    /// Own declaration for `key`, honoring visibility for delegated lookups
    pub(crate) fn lookup(&self, key: &Key, scope: Scope) -> Option<&Arc<Declaration>> {
        let declaration = &self.declarations[*self.index.get(key)?];
        match scope {
            Scope::Local => Some(declaration),
            Scope::Delegated if declaration.is_public() => Some(declaration),
            Scope::Delegated => None,
        }
    }

    /// Whether a dependent component can reach `key` through this table
    pub(crate) fn exposes(&self, key: &Key) -> bool {
        self.exposed.contains_key(key)
    }

    pub(crate) fn declarations(&self) -> &[Arc<Declaration>] {
        &self.declarations
    }

    pub(crate) fn declarations_with_origin(
        &self,
    ) -> impl Iterator<Item = (&Arc<Declaration>, &ModuleLabel)> {
        self.declarations.iter().zip(self.origins.iter())
    }

    pub(crate) fn exposed(&self) -> impl Iterator<Item = (&Key, &Exposure)> {
        self.exposed.iter()
    }
}
