//! Binding declarations

use crate::error::DiResult;
use crate::key::Key;
use crate::resolver::Context;
use crate::service::Instance;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a binding is instantiated and cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// A new instance is created for each request
    Transient,
    /// Created on first request, then reused for the component lifetime
    CachedLazy,
    /// Created while the component is constructed, then reused
    CachedEager,
}

impl Kind {
    /// Whether resolved values are kept in the component cache
    pub fn is_cached(self) -> bool {
        !matches!(self, Kind::Transient)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Transient => write!(f, "Transient"),
            Kind::CachedLazy => write!(f, "CachedLazy"),
            Kind::CachedEager => write!(f, "CachedEager"),
        }
    }
}

/// Whether a binding can be seen by dependent components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    /// Only resolvable from providers of the declaring component
    Internal,
}

/// Type-erased provider body
pub type ProviderFn = Arc<dyn Fn(&Context<'_>) -> DiResult<Instance> + Send + Sync>;

/// A single binding: key, kind, visibility and provider
#[derive(Clone)]
pub struct Declaration {
    key: Key,
    kind: Kind,
    visibility: Visibility,
    provider: ProviderFn,
}

impl Declaration {
    /// Create a declaration from an already type-erased provider
    pub fn new(key: Key, kind: Kind, visibility: Visibility, provider: ProviderFn) -> Self {
        Self {
            key,
            kind,
            visibility,
            provider,
        }
    }

    /// Create a declaration whose provider produces a `T`
    pub fn typed<T, F>(name: Option<&str>, kind: Kind, visibility: Visibility, provider: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Context<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        Self::new(
            Key::with_name::<T>(name),
            kind,
            visibility,
            Arc::new(move |ctx: &Context<'_>| {
                provider(ctx).map(|value| Arc::new(value) as Instance)
            }),
        )
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Run the provider body
    pub(crate) fn provide(&self, ctx: &Context<'_>) -> DiResult<Instance> {
        (self.provider)(ctx)
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declaration")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("visibility", &self.visibility)
            .finish()
    }
}
