//! Components: validated binding tables with a cache and parent chain

use crate::cache::InstanceCache;
use crate::config::ComponentConfig;
use crate::declaration::Kind;
use crate::error::DiResult;
use crate::key::{ComponentId, Key};
use crate::lazy::{Lazy, ProviderHandle};
use crate::module::Module;
use crate::resolver;
use crate::service::{downcast_instance, Instance, Service};
use crate::table::{BindingTable, Scope};
use std::fmt;
use std::ops::Add;
use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable, shareable unit of composition
///
/// Cloning is cheap and clones share the same table and cache. A component
/// is released when the last clone (including those held by dependent
/// components and injection handles) is dropped.
#[derive(Clone)]
pub struct Component {
    inner: Arc<ComponentInner>,
}

struct ComponentInner {
    id: ComponentId,
    config: ComponentConfig,
    table: BindingTable,
    parents: Vec<Component>,
    cache: InstanceCache,
}

impl Component {
    /// Build a component from modules, without parents
    pub fn new(modules: &[Module]) -> DiResult<Self> {
        Self::builder().modules(modules.iter().cloned()).build()
    }

    /// Build a component from modules that delegates to `parents`
    pub fn with_parents(modules: &[Module], parents: &[Component]) -> DiResult<Self> {
        Self::builder()
            .modules(modules.iter().cloned())
            .depends_on_all(parents.iter().cloned())
            .build()
    }

    /// Create a new component builder
    pub fn builder() -> ComponentBuilder {
        ComponentBuilder::new()
    }

    /// New component with `parents` as parents and `modules` as own modules
    ///
    /// The parents are not modified.
    pub fn compose(parents: &[Component], modules: &[Module]) -> DiResult<Self> {
        Self::with_parents(modules, parents)
    }

    /// New component depending on this one, with `modules` as own modules
    pub fn plus(&self, modules: &[Module]) -> DiResult<Self> {
        Self::compose(std::slice::from_ref(self), modules)
    }

    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    /// Configured name, or the id when unnamed
    pub fn label(&self) -> String {
        match &self.inner.config.name {
            Some(name) => format!("{} ({})", name, self.inner.id),
            None => self.inner.id.to_string(),
        }
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.inner.config
    }

    pub fn parents(&self) -> &[Component] {
        &self.inner.parents
    }

    /// Resolve an unnamed binding of `T` now
    pub fn inject_now<T: Service>(&self) -> DiResult<Arc<T>> {
        self.resolve_as(&Key::of::<T>())
    }

    /// Resolve a named binding of `T` now
    pub fn inject_now_named<T: Service>(&self, name: &str) -> DiResult<Arc<T>> {
        self.resolve_as(&Key::named::<T>(name))
    }

    /// Handle that resolves `T` on first access
    pub fn inject<T: Service>(&self) -> Lazy<T> {
        Lazy::new(self.clone(), Key::of::<T>())
    }

    pub fn inject_named<T: Service>(&self, name: &str) -> Lazy<T> {
        Lazy::new(self.clone(), Key::named::<T>(name))
    }

    /// Handle that resolves `T` on every access
    pub fn provider<T: Service>(&self) -> ProviderHandle<T> {
        ProviderHandle::new(self.clone(), Key::of::<T>())
    }

    pub fn provider_named<T: Service>(&self, name: &str) -> ProviderHandle<T> {
        ProviderHandle::new(self.clone(), Key::named::<T>(name))
    }

    /// Whether `T` can be resolved, without instantiating anything
    pub fn can_inject<T: Service>(&self) -> bool {
        self.contains(&Key::of::<T>())
    }

    pub fn can_inject_named<T: Service>(&self, name: &str) -> bool {
        self.contains(&Key::named::<T>(name))
    }

    /// Resolve `key` to its type-erased instance
    pub fn resolve(&self, key: &Key) -> DiResult<Instance> {
        resolver::resolve(self, key, Scope::Local)
    }

    /// Whether `key` is reachable from this component
    pub fn contains(&self, key: &Key) -> bool {
        resolver::probe(self, key, Scope::Local)
    }

    /// Whether a cached binding declared by this component has been created
    pub fn is_instantiated(&self, key: &Key) -> bool {
        self.inner.cache.is_populated(key)
    }

    pub(crate) fn resolve_as<T: Service>(&self, key: &Key) -> DiResult<Arc<T>> {
        downcast_instance(key, self.resolve(key)?)
    }

    pub(crate) fn table(&self) -> &BindingTable {
        &self.inner.table
    }

    pub(crate) fn cache(&self) -> &InstanceCache {
        &self.inner.cache
    }

    fn construct(
        modules: &[Module],
        parents: Vec<Component>,
        config: ComponentConfig,
    ) -> DiResult<Self> {
        let id = ComponentId::next();
        let table = BindingTable::build(id, modules, &parents)?;
        let cache = InstanceCache::for_table(&table);

        let component = Component {
            inner: Arc::new(ComponentInner {
                id,
                config,
                table,
                parents,
                cache,
            }),
        };

        debug!(
            "Built component {} with {} bindings from {} modules and {} parents",
            component.label(),
            component.table().declarations().len(),
            modules.len(),
            component.parents().len()
        );

        component.instantiate_eager()?;
        Ok(component)
    }

    /// Create every eager singleton, in module order then declaration order
    fn instantiate_eager(&self) -> DiResult<()> {
        for declaration in self
            .table()
            .declarations()
            .iter()
            .filter(|declaration| declaration.kind() == Kind::CachedEager)
        {
            if let Err(err) = resolver::instantiate(self, declaration) {
                warn!(
                    "Eager instantiation of {} failed in component {}: {}",
                    declaration.key(),
                    self.label(),
                    err
                );
                return Err(err);
            }
            debug!(
                "Eagerly instantiated {} in component {}",
                declaration.key(),
                self.label()
            );
        }
        Ok(())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.inner.id)
            .field("name", &self.inner.config.name)
            .field("bindings", &self.inner.table.declarations().len())
            .field(
                "parents",
                &self.inner.parents.iter().map(Component::id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Add<&Module> for &Component {
    type Output = DiResult<Component>;

    fn add(self, module: &Module) -> Self::Output {
        self.plus(std::slice::from_ref(module))
    }
}

impl Add<&[Module]> for &Component {
    type Output = DiResult<Component>;

    fn add(self, modules: &[Module]) -> Self::Output {
        self.plus(modules)
    }
}

impl Add<&Module> for &[Component] {
    type Output = DiResult<Component>;

    fn add(self, module: &Module) -> Self::Output {
        Component::compose(self, std::slice::from_ref(module))
    }
}

impl<const N: usize> Add<&Module> for &[Component; N] {
    type Output = DiResult<Component>;

    fn add(self, module: &Module) -> Self::Output {
        &self[..] + module
    }
}

/// Builder for constructing a component
#[derive(Default)]
pub struct ComponentBuilder {
    modules: Vec<Module>,
    parents: Vec<Component>,
    config: Option<ComponentConfig>,
}

impl ComponentBuilder {
    /// Create a new component builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an own module
    pub fn module(&mut self, module: Module) -> &mut Self {
        self.modules.push(module);
        self
    }

    pub fn modules(&mut self, modules: impl IntoIterator<Item = Module>) -> &mut Self {
        self.modules.extend(modules);
        self
    }

    /// Add a parent component to delegate to
    pub fn depends_on(&mut self, parent: Component) -> &mut Self {
        self.parents.push(parent);
        self
    }

    pub fn depends_on_all(&mut self, parents: impl IntoIterator<Item = Component>) -> &mut Self {
        self.parents.extend(parents);
        self
    }

    /// Use `config` instead of inheriting the first parent's
    pub fn config(&mut self, config: ComponentConfig) -> &mut Self {
        self.config = Some(config);
        self
    }

    /// Validate the bindings and create eager singletons
    pub fn build(&self) -> DiResult<Component> {
        let config = match (&self.config, self.parents.first()) {
            (Some(config), _) => config.clone(),
            (None, Some(parent)) => ComponentConfig {
                name: None,
                ..parent.config().clone()
            },
            (None, None) => ComponentConfig::default(),
        };
        Component::construct(&self.modules, self.parents.clone(), config)
    }
}
