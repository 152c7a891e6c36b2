//! `web-sys` implementation of the controller's host seams.
//!
//! Listeners are stored alongside the `Listener` value they were registered
//! with, so `unlisten` removes the identical JS function `listen` added.
//! Handlers reach the controller through a weak reference and skip events
//! that arrive while it is already borrowed: the synthetic surface click
//! fired during activation is dispatched synchronously and would otherwise
//! re-enter the controller.

use std::cell::RefCell;
use std::rc::Weak;
use std::time::Duration;

use image_rotate_core::{
    Dom, Editor, EventKind, HostEvent, ImageRotate, Listener, ListenerTarget, Rect, Result,
    RotateError, ScrollOffset, Size,
};
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CssStyleDeclaration, Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement,
    KeyboardEvent,
};

use crate::quill::Quill;

/// Weak handle the event handlers use to reach the controller.
pub type ControllerRef = Weak<RefCell<ImageRotate<WebHost>>>;

type Handler = Closure<dyn FnMut(Event)>;

/// DOM and editor access for the controller.
pub struct WebHost {
    quill: Quill,
    document: Document,
    controller: ControllerRef,
    listeners: Vec<(Listener<Element>, Handler)>,
    /// Removed handlers, dropped on the next `listen`. A handler may be
    /// removed from inside its own invocation.
    retired: Vec<Handler>,
}

impl WebHost {
    pub fn new(quill: Quill, document: Document, controller: ControllerRef) -> Self {
        Self {
            quill,
            document,
            controller,
            listeners: Vec::new(),
            retired: Vec::new(),
        }
    }

    fn event_target(&self, target: &ListenerTarget<Element>) -> EventTarget {
        match target {
            ListenerTarget::Root => self.quill.root().clone().into(),
            ListenerTarget::Document => self.document.clone().into(),
            ListenerTarget::Element(element) => element.clone().into(),
        }
    }

    fn handler(&self, listener: &Listener<Element>) -> Handler {
        let controller = self.controller.clone();
        match (&listener.target, listener.kind) {
            (ListenerTarget::Element(element), _) => {
                let element = element.clone();
                Closure::new(move |_event: Event| {
                    dispatch(&controller, |ctl| ctl.handle_control_click(&element));
                })
            }
            (_, EventKind::Click) => Closure::new(move |event: Event| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok())
                else {
                    return;
                };
                dispatch(&controller, |ctl| ctl.handle_click(&target));
            }),
            (_, EventKind::KeyUp) => Closure::new(move |event: Event| {
                let key_code = event
                    .dyn_ref::<KeyboardEvent>()
                    .map_or(0, |key| key.key_code());
                dispatch(&controller, |ctl| {
                    ctl.handle_key_or_input(HostEvent::KeyUp { key_code })
                });
            }),
            (_, EventKind::Input) => Closure::new(move |_event: Event| {
                dispatch(&controller, |ctl| ctl.handle_key_or_input(HostEvent::Input));
            }),
        }
    }

    fn remove_at(&mut self, index: usize) -> Result<()> {
        let (listener, handler) = self.listeners.remove(index);
        let target = self.event_target(&listener.target);
        let result = target
            .remove_event_listener_with_callback_and_bool(
                event_name(listener.kind),
                handler.as_ref().unchecked_ref(),
                listener.capture,
            )
            .map_err(|e| host_error("removeEventListener", e));
        self.retired.push(handler);
        result
    }
}

/// Run `f` against the controller unless it is gone or busy.
fn dispatch(
    controller: &ControllerRef,
    f: impl FnOnce(&mut ImageRotate<WebHost>) -> Result<()>,
) {
    let Some(controller) = controller.upgrade() else {
        return;
    };
    let Ok(mut ctl) = controller.try_borrow_mut() else {
        log::debug!("ignoring re-entrant event");
        return;
    };
    if let Err(err) = f(&mut ctl) {
        log::error!("image rotate: {}", err);
    }
}

/// DOM event name for an event kind.
pub(crate) fn event_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Click => "click",
        EventKind::KeyUp => "keyup",
        EventKind::Input => "input",
    }
}

fn host_error(operation: &str, err: JsValue) -> RotateError {
    RotateError::Host(format!("{} failed: {:?}", operation, err))
}

fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    Reflect::get(element, &JsValue::from_str("style"))
        .ok()?
        .dyn_into()
        .ok()
}

impl Dom for WebHost {
    type Node = Element;

    fn is_image(&self, node: &Element) -> bool {
        node.tag_name().eq_ignore_ascii_case("img")
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn document_element(&self) -> Element {
        self.document
            .document_element()
            .unwrap_or_else(|| self.quill.container().clone())
    }

    fn create_element(&mut self, tag: &str) -> Result<Element> {
        self.document
            .create_element(tag)
            .map_err(|e| host_error("createElement", e))
    }

    fn append_child(&mut self, parent: &Element, child: &Element) -> Result<()> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| host_error("appendChild", e))
    }

    fn remove_child(&mut self, parent: &Element, child: &Element) -> Result<()> {
        parent
            .remove_child(child)
            .map_err(|e| host_error("removeChild", e))?;

        // Element listeners die with their element
        while let Some(index) = self.listeners.iter().position(|(listener, _)| {
            matches!(&listener.target, ListenerTarget::Element(el) if !el.is_connected())
        }) {
            let (_, handler) = self.listeners.remove(index);
            self.retired.push(handler);
        }
        Ok(())
    }

    fn first_element_child(&self, node: &Element) -> Option<Element> {
        node.first_element_child()
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn style(&self, node: &Element, property: &str) -> String {
        style_of(node)
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) -> Result<()> {
        let style = style_of(node).ok_or_else(|| RotateError::Host("element has no style".into()))?;
        style
            .set_property(property, value)
            .map_err(|e| host_error("style.setProperty", e))
    }

    fn remove_style(&mut self, node: &Element, property: &str) -> Result<()> {
        let Some(style) = style_of(node) else {
            return Ok(());
        };
        style
            .remove_property(property)
            .map(|_| ())
            .map_err(|e| host_error("style.removeProperty", e))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) -> Result<()> {
        node.set_attribute(name, value)
            .map_err(|e| host_error("setAttribute", e))
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn intrinsic_size(&self, image: &Element) -> Size {
        match image.dyn_ref::<HtmlImageElement>() {
            Some(img) => Size::new(f64::from(img.width()), f64::from(img.height())),
            None => Size::new(
                f64::from(image.client_width()),
                f64::from(image.client_height()),
            ),
        }
    }

    fn scroll_offset(&self, node: &Element) -> ScrollOffset {
        ScrollOffset::new(f64::from(node.scroll_left()), f64::from(node.scroll_top()))
    }

    fn click(&mut self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            element.click();
        }
    }

    fn refocus_later(&mut self, image: &Element, delay: Duration) {
        let Some(window) = web_sys::window() else {
            log::warn!("no window; skipping refocus click");
            return;
        };
        let controller = self.controller.clone();
        let image = image.clone();
        let callback = Closure::once_into_js(move || {
            dispatch(&controller, |ctl| {
                ctl.handle_refocus_click(&image);
                Ok(())
            });
        });
        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(err) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)
        {
            log::warn!("setTimeout failed: {:?}", err);
        }
    }

    fn listen(&mut self, listener: &Listener<Element>) -> Result<()> {
        self.retired.clear();

        let handler = self.handler(listener);
        self.event_target(&listener.target)
            .add_event_listener_with_callback_and_bool(
                event_name(listener.kind),
                handler.as_ref().unchecked_ref(),
                listener.capture,
            )
            .map_err(|e| host_error("addEventListener", e))?;
        self.listeners.push((listener.clone(), handler));
        Ok(())
    }

    fn unlisten(&mut self, listener: &Listener<Element>) -> Result<()> {
        match self.listeners.iter().position(|(l, _)| l == listener) {
            Some(index) => self.remove_at(index),
            None => Ok(()),
        }
    }
}

impl Editor for WebHost {
    fn root(&self) -> Element {
        self.quill.root().clone().into()
    }

    fn container(&self) -> Element {
        self.quill.container().clone()
    }

    fn clear_selection(&mut self) -> Result<()> {
        self.quill
            .clear_selection()
            .map_err(|e| host_error("quill.setSelection", e))
    }

    fn delete_embed(&mut self, node: &Element) -> Result<()> {
        self.quill
            .delete_embed(node)
            .map_err(|e| host_error("quill.find(..).deleteAt", e))
    }
}
