//! Seams to the browser and to the host editor.
//!
//! The controller never touches the DOM directly. Everything it needs is
//! expressed through [`Dom`] (generic element operations) and [`Editor`]
//! (the editing surface it is attached to). The wasm crate implements both
//! on top of `web-sys`; tests use an in-memory host.

use std::time::Duration;

use crate::error::Result;
use crate::geometry::{Rect, ScrollOffset, Size};

/// Key code of the Backspace key.
pub const KEY_BACKSPACE: u32 = 8;
/// Key code of the Delete key.
pub const KEY_DELETE: u32 = 46;

/// Where a listener is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerTarget<N> {
    /// The editor's editable root element
    Root,
    /// The document
    Document,
    /// A specific element, e.g. a toolbar button
    Element(N),
}

/// Events the controller listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyUp,
    Input,
}

/// A listener registration.
///
/// Registration and removal use identical `Listener` values, so every
/// `listen` can be paired with exactly one `unlisten`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener<N> {
    pub target: ListenerTarget<N>,
    pub kind: EventKind,
    pub capture: bool,
}

impl<N> Listener<N> {
    /// Surface clicks, bubbling phase.
    pub const fn root_click() -> Self {
        Self {
            target: ListenerTarget::Root,
            kind: EventKind::Click,
            capture: false,
        }
    }

    /// Document key-ups, capture phase.
    pub const fn document_keyup() -> Self {
        Self {
            target: ListenerTarget::Document,
            kind: EventKind::KeyUp,
            capture: true,
        }
    }

    /// Surface content mutations, capture phase.
    pub const fn root_input() -> Self {
        Self {
            target: ListenerTarget::Root,
            kind: EventKind::Input,
            capture: true,
        }
    }

    /// Clicks on a single element.
    pub fn element_click(node: N) -> Self {
        Self {
            target: ListenerTarget::Element(node),
            kind: EventKind::Click,
            capture: false,
        }
    }
}

/// A key-up or input event observed while an image is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    KeyUp { key_code: u32 },
    Input,
}

impl HostEvent {
    /// Returns true for Delete and Backspace key-ups.
    pub fn is_delete_key(self) -> bool {
        matches!(
            self,
            HostEvent::KeyUp {
                key_code: KEY_DELETE | KEY_BACKSPACE
            }
        )
    }
}

/// Element operations the controller performs.
///
/// `Node` is a handle to a live element. Cloning it must not clone the
/// element; equality must be identity.
pub trait Dom {
    type Node: Clone + PartialEq + std::fmt::Debug;

    /// Returns true if `node` is an `<img>` element.
    fn is_image(&self, node: &Self::Node) -> bool;

    /// Returns true if `node` is attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// The document's root (`<html>`) element.
    fn document_element(&self) -> Self::Node;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    fn first_element_child(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Replace the element's children with parsed markup.
    fn set_inner_html(&mut self, node: &Self::Node, html: &str);

    /// Inline style value, empty if unset.
    fn style(&self, node: &Self::Node, property: &str) -> String;

    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str) -> Result<()>;

    fn remove_style(&mut self, node: &Self::Node, property: &str) -> Result<()>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<()>;

    /// The element's bounding client rectangle.
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// The image's own `width`/`height` (not its rendered box).
    fn intrinsic_size(&self, image: &Self::Node) -> Size;

    fn scroll_offset(&self, node: &Self::Node) -> ScrollOffset;

    /// Dispatch a synthetic click on `node` now.
    fn click(&mut self, node: &Self::Node);

    /// After `delay`, call
    /// [`ImageRotate::handle_refocus_click`](crate::ImageRotate::handle_refocus_click)
    /// with `image`.
    ///
    /// There is no cancellation; the controller decides when the timer
    /// fires whether the click is still wanted.
    fn refocus_later(&mut self, image: &Self::Node, delay: Duration);

    fn listen(&mut self, listener: &Listener<Self::Node>) -> Result<()>;

    fn unlisten(&mut self, listener: &Listener<Self::Node>) -> Result<()>;
}

/// The editing surface the controller is attached to.
pub trait Editor: Dom {
    /// The editable root element.
    fn root(&self) -> Self::Node;

    /// The root's parent; overlays are positioned inside it.
    fn container(&self) -> Self::Node;

    /// Drop the editor's current text selection.
    fn clear_selection(&mut self) -> Result<()>;

    /// Remove the embedded content that `node` renders.
    fn delete_embed(&mut self, node: &Self::Node) -> Result<()>;
}

/// Everything the controller needs from its host.
pub trait Host: Editor + 'static {}

impl<T: Editor + 'static> Host for T {}
