//! Modules: ordered, reusable collections of declarations

use crate::declaration::{Declaration, Kind, Visibility};
use crate::error::DiResult;
use crate::key::Key;
use crate::resolver::Context;
use std::marker::PhantomData;
use std::sync::Arc;

/// An ordered collection of declarations
///
/// Modules hold no runtime state. The same module can be handed to any
/// number of components; each component keeps its own cache. Declarations
/// are not validated here, only when a component is built from them.
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: Option<Arc<str>>,
    declarations: Vec<Arc<Declaration>>,
}

impl Module {
    /// Create an unnamed module
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a module with a name used in diagnostics
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: Some(name.into()),
            declarations: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn declarations(&self) -> &[Arc<Declaration>] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Append a declaration
    pub fn declare(&mut self, declaration: Declaration) -> &mut Self {
        self.declarations.push(Arc::new(declaration));
        self
    }

    /// Start a binding of `T` with options (name, visibility)
    pub fn bind<T: Send + Sync + 'static>(&mut self) -> Binding<'_, T> {
        Binding {
            module: self,
            name: None,
            visibility: Visibility::Public,
            _marker: PhantomData,
        }
    }

    /// Bind `T` so that every request creates a new instance
    pub fn factory<T, F>(&mut self, provider: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Context<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.bind::<T>().factory(provider)
    }

    /// Bind `T` as a singleton created on first request
    pub fn singleton<T, F>(&mut self, provider: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Context<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.bind::<T>().singleton(provider)
    }

    /// Bind `T` as a singleton created when the component is built
    pub fn eager_singleton<T, F>(&mut self, provider: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Context<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.bind::<T>().eager_singleton(provider)
    }
}

/// Options for a binding under construction
pub struct Binding<'m, T> {
    module: &'m mut Module,
    name: Option<String>,
    visibility: Visibility,
    _marker: PhantomData<fn() -> T>,
}

impl<'m, T: Send + Sync + 'static> Binding<'m, T> {
    /// Register under a name, distinguishing it from other bindings of `T`
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Hide the binding from dependent components
    pub fn internal(mut self) -> Self {
        self.visibility = Visibility::Internal;
        self
    }

    pub fn factory<F>(self, provider: F) -> &'m mut Module
    where
        F: Fn(&Context<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.finish(Kind::Transient, provider)
    }

    pub fn singleton<F>(self, provider: F) -> &'m mut Module
    where
        F: Fn(&Context<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.finish(Kind::CachedLazy, provider)
    }

    pub fn eager_singleton<F>(self, provider: F) -> &'m mut Module
    where
        F: Fn(&Context<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.finish(Kind::CachedEager, provider)
    }

    /// Make this key resolve to another binding of `T`
    ///
    /// The target is resolved through the declaring component on every
    /// request, so its kind (and cached identity) is preserved.
    pub fn alias_of(self, target_name: Option<&str>) -> &'m mut Module {
        let Binding {
            module,
            name,
            visibility,
            ..
        } = self;
        let key = Key::with_name::<T>(name.as_deref());
        let target = key.renamed(target_name);
        module.declare(Declaration::new(
            key,
            Kind::Transient,
            visibility,
            Arc::new(move |ctx: &Context<'_>| ctx.resolve(&target)),
        ))
    }

    fn finish<F>(self, kind: Kind, provider: F) -> &'m mut Module
    where
        F: Fn(&Context<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        let Binding {
            module,
            name,
            visibility,
            ..
        } = self;
        module.declare(Declaration::typed::<T, F>(
            name.as_deref(),
            kind,
            visibility,
            provider,
        ))
    }
}
