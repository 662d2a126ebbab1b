//! Deferred injection handles

use crate::component::Component;
use crate::error::DiResult;
use crate::key::Key;
use crate::service::Service;
use once_cell::sync::OnceCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Resolves its key on first access and keeps the result
///
/// The memo lives in the handle, not in the component: a transient binding
/// accessed through one `Lazy` yields the same instance on every `get`, while
/// a second handle resolves again. A failed resolution is not memoized.
pub struct Lazy<T> {
    component: Component,
    key: Key,
    value: OnceCell<Arc<T>>,
}

impl<T: Service> Lazy<T> {
    pub(crate) fn new(component: Component, key: Key) -> Self {
        Self {
            component,
            key,
            value: OnceCell::new(),
        }
    }

    /// Resolve on first call, return the memoized value afterwards
    pub fn get(&self) -> DiResult<Arc<T>> {
        if let Some(value) = self.value.get() {
            return Ok(value.clone());
        }
        // Resolve outside the cell; concurrent callers keep the first stored value
        let resolved = self.component.resolve_as::<T>(&self.key)?;
        Ok(self.value.get_or_init(|| resolved).clone())
    }

    /// Whether the handle has already resolved its value
    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn key(&self) -> &Key {
        &self.key
    }
}

impl<T> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("key", &self.key)
            .field("component", &self.component.id())
            .field("resolved", &self.value.get().is_some())
            .finish()
    }
}

/// Resolves its key on every access
///
/// Each `get` runs a full resolution, so transient bindings produce a fresh
/// instance per call while cached bindings return their shared instance.
pub struct ProviderHandle<T> {
    component: Component,
    key: Key,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Service> ProviderHandle<T> {
    pub(crate) fn new(component: Component, key: Key) -> Self {
        Self {
            component,
            key,
            _marker: PhantomData,
        }
    }

    pub fn get(&self) -> DiResult<Arc<T>> {
        self.component.resolve_as::<T>(&self.key)
    }

    pub fn key(&self) -> &Key {
        &self.key
    }
}

impl<T> Clone for ProviderHandle<T> {
    fn clone(&self) -> Self {
        Self {
            component: self.component.clone(),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ProviderHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("key", &self.key)
            .field("component", &self.component.id())
            .finish()
    }
}
