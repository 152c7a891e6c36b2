//! The `ImageRotate` class exposed to JavaScript.
//!
//! Quill instantiates registered modules as `new Module(quill, options)`;
//! this class has that constructor shape, so it can be registered directly.

use std::cell::RefCell;
use std::rc::Rc;

use image_rotate_core::{
    ImageRotate as Controller, ModuleRegistry, Options, OptionsOverrides, MODULE_NAME,
};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::WebHost;
use crate::quill::{self, Quill};

/// Image selection and rotation for a Quill editor.
///
/// # Example (TypeScript)
///
/// ```typescript
/// import Quill from 'quill';
/// import init, { ImageRotate, register } from '@image-rotate/wasm';
///
/// await init();
/// register(Quill, ImageRotate);
///
/// const quill = new Quill('#editor', {
///   modules: { imageRotate: { overlayStyles: { border: '1px dashed #444' } } },
/// });
/// ```
#[wasm_bindgen]
pub struct ImageRotate {
    inner: Rc<RefCell<Controller<WebHost>>>,
}

#[wasm_bindgen]
impl ImageRotate {
    /// Attach to a Quill instance.
    ///
    /// # Arguments
    ///
    /// * `quill` - The Quill editor instance
    /// * `options` - Optional configuration, merged over the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the options are malformed, name an unknown
    /// module, or the editor root is not attached to a container.
    #[wasm_bindgen(constructor)]
    pub fn new(quill: JsValue, options: JsValue) -> Result<ImageRotate, JsValue> {
        let quill = Quill::new(quill)?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;

        let options = Options::merged(parse_overrides(options)?);
        let modules = ModuleRegistry::<WebHost>::with_builtins()
            .resolve(&options.modules)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let inner = Rc::new_cyclic(|weak| {
            let host = WebHost::new(quill, document, weak.clone());
            RefCell::new(Controller::new(host, options, modules))
        });
        inner
            .borrow_mut()
            .attach()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(ImageRotate { inner })
    }

    /// Select `img` and show the overlay over it.
    pub fn show(&self, img: Element) -> Result<(), JsValue> {
        self.with(|ctl| ctl.activate(img))
    }

    /// Remove the overlay and forget the selected image.
    pub fn hide(&self) -> Result<(), JsValue> {
        self.with(|ctl| ctl.deactivate())
    }

    /// Re-place the overlay, e.g. after a window resize or scroll.
    #[wasm_bindgen(js_name = onUpdate)]
    pub fn on_update(&self) -> Result<(), JsValue> {
        self.with(|ctl| ctl.update())
    }

    /// Stop listening to the editor.
    pub fn destroy(&self) -> Result<(), JsValue> {
        self.with(|ctl| ctl.detach())
    }

    /// Whether an image is currently selected.
    #[wasm_bindgen(getter, js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.inner
            .try_borrow()
            .map(|ctl| ctl.active_image().is_some())
            .unwrap_or(false)
    }

    /// The selected image, if any.
    #[wasm_bindgen(getter)]
    pub fn img(&self) -> Option<Element> {
        self.inner.try_borrow().ok()?.active_image().cloned()
    }

    /// The overlay element, if any.
    #[wasm_bindgen(getter)]
    pub fn overlay(&self) -> Option<Element> {
        self.inner.try_borrow().ok()?.overlay().cloned()
    }
}

impl ImageRotate {
    fn with(
        &self,
        f: impl FnOnce(&mut Controller<WebHost>) -> image_rotate_core::Result<()>,
    ) -> Result<(), JsValue> {
        let mut ctl = self
            .inner
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("image rotate is busy"))?;
        f(&mut ctl).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Register the module class with Quill as `modules/imageRotate`.
///
/// Both classes are passed in explicitly; no globals are consulted.
#[wasm_bindgen]
pub fn register(quill_class: &JsValue, module_class: &JsValue) -> Result<(), JsValue> {
    quill::register(quill_class, MODULE_NAME, module_class)
}

/// Decode host options; `undefined`, `null` and `true` mean "all defaults".
pub(crate) fn parse_overrides(options: JsValue) -> Result<OptionsOverrides, JsValue> {
    if options.is_undefined() || options.is_null() || options.as_bool().is_some() {
        return Ok(OptionsOverrides::default());
    }
    serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
}
