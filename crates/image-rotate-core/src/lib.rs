//! Image Rotate Core - select and rotate images in a rich-text editor
//!
//! This crate holds the browser-independent part of the image rotation
//! behaviour: which image is active, where its overlay goes, and the
//! quarter-turn rotation state the toolbar maintains.
//!
//! # Module Structure
//!
//! - `controller` - Selection controller owning the active image and overlay
//! - `module` - Overlay module lifecycle and registry
//! - `toolbar` - Built-in rotate-left / rotate-right toolbar module
//! - `rotation` - Quarter-turn rotation state
//! - `geometry` - Overlay placement math
//! - `options` - Configuration and defaults
//! - `host` - Seams to the DOM and the host editor
//!
//! The DOM itself is reached only through the [`Dom`] and [`Editor`] traits;
//! `image-rotate-wasm` implements them with `web-sys`.

pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod module;
pub mod options;
pub mod rotation;
pub mod style;
pub mod toolbar;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{ImageRotate, CLICK_COUNT_ATTRIBUTE};
pub use error::{Result, RotateError};
pub use geometry::{OverlayPlacement, Rect, ScrollOffset, Size};
pub use host::{Dom, Editor, EventKind, Host, HostEvent, Listener, ListenerTarget};
pub use module::{Module, ModuleContext, ModuleFactory, ModuleRegistry, Outcome};
pub use options::{Options, OptionsOverrides};
pub use rotation::{Direction, Rotation, ROTATION_ATTRIBUTE};
pub use style::StyleMap;
pub use toolbar::{RotationToolbar, TOOLBAR_MODULE};

/// Name under which the behaviour registers with the host editor.
pub const MODULE_NAME: &str = "modules/imageRotate";
