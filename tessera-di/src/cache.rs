//! Per-component instance cache

use crate::error::DiResult;
use crate::key::Key;
use crate::service::Instance;
use crate::table::BindingTable;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Cached instances of a component's singleton bindings
///
/// Slots are allocated up front for every cached declaration, so the map
/// itself never changes after construction. Each slot initializes at most
/// once; concurrent first requests block on the slot until the provider
/// returns. A failed provider leaves the slot empty.
pub(crate) struct InstanceCache {
    slots: FxHashMap<Key, OnceCell<Instance>>,
}

impl InstanceCache {
    pub(crate) fn for_table(table: &BindingTable) -> Self {
        let slots = table
            .declarations()
            .iter()
            .filter(|declaration| declaration.kind().is_cached())
            .map(|declaration| (declaration.key().clone(), OnceCell::new()))
            .collect();
        Self { slots }
    }

    /// Cached instance, if already created
    pub(crate) fn get(&self, key: &Key) -> Option<Instance> {
        self.slots.get(key).and_then(|slot| slot.get()).cloned()
    }

    /// Return the cached instance, creating it with `init` on first use
    pub(crate) fn get_or_try_init<F>(&self, key: &Key, init: F) -> DiResult<Instance>
    where
        F: FnOnce() -> DiResult<Instance>,
    {
        match self.slots.get(key) {
            Some(slot) => slot
                .get_or_try_init(|| {
                    trace!("Creating cached instance for {}", key);
                    init()
                })
                .cloned(),
            None => {
                debug_assert!(false, "no cache slot for {key}");
                init()
            }
        }
    }

    pub(crate) fn is_populated(&self, key: &Key) -> bool {
        self.slots.get(key).is_some_and(|slot| slot.get().is_some())
    }
}
