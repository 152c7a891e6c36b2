//! Thin handle on a Quill editor instance.
//!
//! Quill is reached through the instance passed to the module constructor,
//! never through a global. Static helpers such as `Quill.find` are looked
//! up on the instance's constructor.

use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

/// A Quill editor instance.
pub struct Quill {
    instance: JsValue,
    root: HtmlElement,
    container: Element,
}

impl Quill {
    /// Wrap a Quill instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has no `root` element or the root is
    /// not attached to a parent element.
    pub fn new(instance: JsValue) -> Result<Self, JsValue> {
        let root: HtmlElement = Reflect::get(&instance, &JsValue::from_str("root"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("quill.root is not an HTML element"))?;
        let container = root
            .parent_element()
            .ok_or_else(|| JsValue::from_str("quill.root has no parent element"))?;
        Ok(Self {
            instance,
            root,
            container,
        })
    }

    /// The editable root element.
    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// The root's parent element.
    pub fn container(&self) -> &Element {
        &self.container
    }

    /// `quill.setSelection(null)`
    pub fn clear_selection(&self) -> Result<(), JsValue> {
        let set_selection = method(&self.instance, "setSelection")?;
        set_selection.call1(&self.instance, &JsValue::NULL)?;
        Ok(())
    }

    /// `Quill.find(node).deleteAt(0)`
    ///
    /// Nodes Quill does not know about are left alone.
    pub fn delete_embed(&self, node: &Element) -> Result<(), JsValue> {
        let class = Reflect::get(&self.instance, &JsValue::from_str("constructor"))?;
        let find = method(&class, "find")?;
        let blot = find.call1(&class, node)?;
        if blot.is_null() || blot.is_undefined() {
            log::warn!("no quill blot for {:?}", node.tag_name());
            return Ok(());
        }
        let delete_at = method(&blot, "deleteAt")?;
        delete_at.call1(&blot, &JsValue::from_f64(0.0))?;
        Ok(())
    }
}

/// `Quill.register(name, class)` on an explicitly supplied Quill class.
pub fn register(quill_class: &JsValue, name: &str, module_class: &JsValue) -> Result<(), JsValue> {
    let register = method(quill_class, "register")?;
    register.call2(quill_class, &JsValue::from_str(name), module_class)?;
    Ok(())
}

fn method(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("{} is not a function", name)))
}
