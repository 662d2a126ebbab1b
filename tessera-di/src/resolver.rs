//! Resolution walk and the context handed to providers
//!
//! A request for a key first consults the component's own table, then each
//! parent in declared order whose visible table contains the key. Delegated
//! lookups never see internal bindings. Cached values stay in the cache of
//! the component that declares them, so every descendant shares them.

use crate::component::Component;
use crate::declaration::{Declaration, Kind};
use crate::error::{DiError, DiResult};
use crate::key::{ComponentId, Key};
use crate::lazy::{Lazy, ProviderHandle};
use crate::service::{downcast_instance, Instance, Service};
use crate::table::Scope;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::trace;

thread_local! {
    /// Declarations whose providers are running on this thread, outermost first
    static IN_FLIGHT: RefCell<Vec<(ComponentId, Key)>> = const { RefCell::new(Vec::new()) };
}

/// Resolution context passed to provider bodies
///
/// Bound to the component that declares the binding being provided, so
/// that component's internal bindings are reachable from here.
pub struct Context<'a> {
    component: &'a Component,
}

impl<'a> Context<'a> {
    /// The declaring component
    pub fn component(&self) -> &Component {
        self.component
    }

    /// Resolve an unnamed binding of `T`
    pub fn get<T: Service>(&self) -> DiResult<Arc<T>> {
        self.get_key(&Key::of::<T>())
    }

    /// Resolve a named binding of `T`
    pub fn get_named<T: Service>(&self, name: &str) -> DiResult<Arc<T>> {
        self.get_key(&Key::named::<T>(name))
    }

    /// Resolve `key` to its type-erased instance
    pub fn resolve(&self, key: &Key) -> DiResult<Instance> {
        resolve(self.component, key, Scope::Local)
    }

    pub fn can_inject<T: Service>(&self) -> bool {
        probe(self.component, &Key::of::<T>(), Scope::Local)
    }

    pub fn can_inject_named<T: Service>(&self, name: &str) -> bool {
        probe(self.component, &Key::named::<T>(name), Scope::Local)
    }

    /// Deferred handle resolving `T` on first access
    pub fn lazy<T: Service>(&self) -> Lazy<T> {
        Lazy::new(self.component.clone(), Key::of::<T>())
    }

    pub fn lazy_named<T: Service>(&self, name: &str) -> Lazy<T> {
        Lazy::new(self.component.clone(), Key::named::<T>(name))
    }

    /// Handle resolving `T` anew on every access
    pub fn provider<T: Service>(&self) -> ProviderHandle<T> {
        ProviderHandle::new(self.component.clone(), Key::of::<T>())
    }

    pub fn provider_named<T: Service>(&self, name: &str) -> ProviderHandle<T> {
        ProviderHandle::new(self.component.clone(), Key::named::<T>(name))
    }

    fn get_key<T: Service>(&self, key: &Key) -> DiResult<Arc<T>> {
        downcast_instance(key, self.resolve(key)?)
    }
}

/// Walk `component` and its parents for `key`
pub(crate) fn resolve(component: &Component, key: &Key, scope: Scope) -> DiResult<Instance> {
    if let Some(declaration) = component.table().lookup(key, scope) {
        return instantiate(component, declaration);
    }

    for parent in component.parents() {
        if parent.table().exposes(key) {
            trace!(
                "Delegating {} from component {} to {}",
                key,
                component.id(),
                parent.id()
            );
            return resolve(parent, key, Scope::Delegated);
        }
    }

    trace!("No binding for {} in component {}", key, component.id());
    Err(DiError::Injection { key: key.clone() })
}

/// Same walk as [`resolve`] without instantiating anything
pub(crate) fn probe(component: &Component, key: &Key, scope: Scope) -> bool {
    component.table().lookup(key, scope).is_some()
        || component
            .parents()
            .iter()
            .any(|parent| parent.table().exposes(key))
}

/// Produce a value for one of `component`'s own declarations
pub(crate) fn instantiate(component: &Component, declaration: &Declaration) -> DiResult<Instance> {
    let key = declaration.key();
    if declaration.kind().is_cached() {
        if let Some(instance) = component.cache().get(key) {
            trace!("Cache hit for {} in component {}", key, component.id());
            return Ok(instance);
        }
    }

    let _guard = InFlight::enter(component, key)?;
    let ctx = Context { component };

    match declaration.kind() {
        Kind::Transient => declaration.provide(&ctx),
        Kind::CachedLazy | Kind::CachedEager => component
            .cache()
            .get_or_try_init(key, || declaration.provide(&ctx)),
    }
}

/// Marks a declaration as being provided on the current thread until dropped
///
/// Every nested request on the thread passes through here, including ones
/// made through handles or the declaring component, so a re-entrant request
/// fails before it can block on its own cache slot.
struct InFlight;

impl InFlight {
    fn enter(component: &Component, key: &Key) -> DiResult<Self> {
        let id = component.id();
        IN_FLIGHT.with(|stack| {
            let mut stack = stack.borrow_mut();

            if let Some(start) = stack
                .iter()
                .position(|(owner, pending)| *owner == id && pending == key)
            {
                let mut chain: Vec<String> = stack[start..]
                    .iter()
                    .map(|(_, pending)| pending.to_string())
                    .collect();
                chain.push(key.to_string());
                return Err(DiError::CircularDependency {
                    path: chain.join(" -> "),
                });
            }

            let max_depth = component.config().max_resolution_depth;
            if stack.len() >= max_depth {
                return Err(DiError::ResolutionTooDeep {
                    key: key.clone(),
                    depth: max_depth,
                });
            }

            stack.push((id, key.clone()));
            Ok(InFlight)
        })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let _ = IN_FLIGHT.try_with(|stack| stack.borrow_mut().pop());
    }
}
