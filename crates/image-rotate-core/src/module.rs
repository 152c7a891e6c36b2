//! Pluggable overlay modules.
//!
//! A module is a unit of overlay UI with a fixed lifecycle. The controller
//! creates a fresh instance of every configured module each time an image
//! becomes active and destroys them all when it becomes inactive, so no
//! module state survives a selection change.
//!
//! Modules are looked up by name in a [`ModuleRegistry`]. Unknown names are
//! rejected when the controller is configured, not on first use.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, RotateError};
use crate::host::Host;
use crate::options::Options;
use crate::toolbar::{RotationToolbar, TOOLBAR_MODULE};

/// What a module sees of the active session.
pub struct ModuleContext<'a, H: Host> {
    pub host: &'a mut H,
    /// The active image
    pub image: &'a H::Node,
    /// The overlay drawn over the image
    pub overlay: &'a H::Node,
    pub options: &'a Options,
}

/// A module's answer to a click on one of its controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The click was not on a control owned by this module.
    Ignored,
    /// Handled; geometry is unaffected.
    Handled,
    /// Handled; the image may have moved, so geometry must be refreshed.
    RequestUpdate,
}

/// Lifecycle of an overlay module.
pub trait Module<H: Host> {
    /// Build UI inside the overlay and read initial state from the image.
    fn on_create(&mut self, ctx: &mut ModuleContext<'_, H>) -> Result<()>;

    /// Called after every geometry refresh.
    fn on_update(&mut self, ctx: &mut ModuleContext<'_, H>) -> Result<()>;

    /// Called once before the instance is dropped.
    fn on_destroy(&mut self, ctx: &mut ModuleContext<'_, H>) -> Result<()>;

    /// A click landed on an element registered through
    /// [`Listener::element_click`](crate::host::Listener::element_click).
    fn on_click(&mut self, _ctx: &mut ModuleContext<'_, H>, _target: &H::Node) -> Result<Outcome> {
        Ok(Outcome::Ignored)
    }
}

/// Creates a fresh module instance.
pub type ModuleFactory<H> = fn() -> Box<dyn Module<H>>;

/// Maps stable module names to factories.
pub struct ModuleRegistry<H: Host> {
    factories: BTreeMap<String, ModuleFactory<H>>,
}

impl<H: Host> ModuleRegistry<H> {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry holding the built-in modules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(TOOLBAR_MODULE, RotationToolbar::<H>::boxed);
        registry
    }

    /// Register (or replace) a module under `name`.
    pub fn register(&mut self, name: &str, factory: ModuleFactory<H>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Resolve configured names to factories, preserving order.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<ModuleFactory<H>>> {
        names
            .iter()
            .map(|name| {
                self.factories
                    .get(name)
                    .copied()
                    .ok_or_else(|| RotateError::UnknownModule(name.clone()))
            })
            .collect()
    }
}

impl<H: Host> Default for ModuleRegistry<H> {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl<H: Host> fmt::Debug for ModuleRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
