//! Component-based dependency injection runtime
//!
//! Bindings are declared in [`Module`]s and merged into [`Component`]s. A
//! component validates its bindings when it is built, creates its eager
//! singletons, and afterwards resolves type-keyed requests against its own
//! table and then against the components it depends on.
//!
//! ```
//! use tessera_di::prelude::*;
//!
//! let mut core = Module::named("core");
//! core.singleton(|_| Ok("postgres://localhost/app".to_string()));
//! let app = Component::new(&[core]).unwrap();
//!
//! let mut screen = Module::named("screen");
//! screen.factory(|ctx| Ok(ctx.get::<String>()?.len()));
//! let screen = app.plus(&[screen]).unwrap();
//!
//! assert_eq!(*screen.inject_now::<usize>().unwrap(), 24);
//! ```

mod cache;
pub mod component;
pub mod config;
pub mod declaration;
pub mod error;
pub mod key;
pub mod lazy;
pub mod manifest;
pub mod module;
pub mod resolver;
pub mod service;
mod table;

pub use component::{Component, ComponentBuilder};
pub use config::ComponentConfig;
pub use declaration::{Declaration, Kind, ProviderFn, Visibility};
pub use error::{DiError, DiResult, ModuleLabel, OverrideError};
pub use key::{ComponentId, Key};
pub use lazy::{Lazy, ProviderHandle};
pub use manifest::{BindingEntry, ComponentManifest, ExposedEntry};
pub use module::{Binding, Module};
pub use resolver::Context;
pub use service::{Instance, Service};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{
        Component, ComponentBuilder, ComponentConfig, Context, DiError, DiResult, Key, Kind,
        Lazy, Module, OverrideError, ProviderHandle, Service, Visibility,
    };
}
