//! Type-erased service values

use crate::error::{DiError, DiResult};
use crate::key::Key;
use downcast_rs::{impl_downcast, DowncastSync};
use std::any::Any;
use std::sync::Arc;

/// Trait that every injectable value implements
///
/// Blanket-implemented for all `Any + Send + Sync` types, so any owned,
/// thread-safe value can be bound. Nullable bindings use `Option<T>`.
pub trait Service: DowncastSync {
    /// Get the type name of the concrete value
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl_downcast!(sync Service);

impl<T: Any + Send + Sync> Service for T {}

/// A resolved, shared value
pub type Instance = Arc<dyn Service>;

/// Recover the concrete type of an instance resolved for `key`
pub(crate) fn downcast_instance<T: Service>(key: &Key, instance: Instance) -> DiResult<Arc<T>> {
    instance.downcast_arc::<T>().map_err(|found| DiError::TypeMismatch {
        key: key.clone(),
        found: Service::type_name(&*found),
    })
}
