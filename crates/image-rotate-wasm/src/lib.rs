//! Image Rotate WASM - WebAssembly bindings for Image Rotate
//!
//! This crate attaches the image-rotate-core controller to a Quill editor
//! running in the browser.
//!
//! # Module Structure
//!
//! - `plugin` - The exported `ImageRotate` class and `register` hook
//! - `dom` - `web-sys` implementation of the controller's host seams
//! - `quill` - Thin handle on a Quill instance
//!
//! # Usage
//!
//! ```typescript
//! import Quill from 'quill';
//! import init, { ImageRotate, register } from '@image-rotate/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! register(Quill, ImageRotate);
//! const quill = new Quill('#editor', { modules: { imageRotate: {} } });
//! ```

use wasm_bindgen::prelude::*;

mod dom;
mod plugin;
mod quill;

// Re-export public types
pub use plugin::{register, ImageRotate};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (e.g. in tests) finds the logger already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Name the module registers under in Quill
#[wasm_bindgen(js_name = moduleName)]
pub fn module_name() -> String {
    image_rotate_core::MODULE_NAME.to_string()
}


/// WASM-specific tests that need a browser DOM.
///
/// Run with `wasm-pack test --headless --firefox`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use image_rotate_core::ROTATION_ATTRIBUTE;
    use js_sys::{Function, Object, Reflect};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::{Document, Element, HtmlElement};

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    /// A container holding an editor root holding a 200x100 image, plus a
    /// minimal stand-in for a Quill instance.
    fn fixture() -> (JsValue, HtmlElement, Element) {
        let doc = document();
        let container = doc.create_element("div").unwrap();
        let root: HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
        let img = doc.create_element("img").unwrap();
        img.set_attribute("width", "200").unwrap();
        img.set_attribute("height", "100").unwrap();
        root.append_child(&img).unwrap();
        container.append_child(&root).unwrap();
        doc.body().unwrap().append_child(&container).unwrap();

        let quill = Object::new();
        Reflect::set(&quill, &"root".into(), &root).unwrap();
        Reflect::set(&quill, &"setSelection".into(), &Function::new_no_args("")).unwrap();
        (quill.into(), root, img)
    }

    fn no_refocus() -> JsValue {
        let options = Object::new();
        Reflect::set(&options, &"refocusWorkaround".into(), &JsValue::FALSE).unwrap();
        options.into()
    }

    #[wasm_bindgen_test]
    fn test_attach_positions_container() {
        let (quill, root, _img) = fixture();
        let _rotate = ImageRotate::new(quill, JsValue::UNDEFINED).unwrap();
        let container: HtmlElement = root.parent_element().unwrap().dyn_into().unwrap();
        assert_eq!(container.style().get_property_value("position").unwrap(), "relative");
    }

    #[wasm_bindgen_test]
    fn test_show_creates_overlay_with_toolbar() {
        let (quill, root, img) = fixture();
        let rotate = ImageRotate::new(quill, no_refocus()).unwrap();
        rotate.show(img.clone()).unwrap();

        assert!(rotate.is_active());
        let overlay = rotate.overlay().unwrap();
        assert_eq!(overlay.parent_element(), root.parent_element());
        let toolbar = overlay.first_element_child().unwrap();
        assert_eq!(toolbar.child_element_count(), 2);

        rotate.hide().unwrap();
        assert!(!rotate.is_active());
        assert!(!overlay.is_connected());
    }

    #[wasm_bindgen_test]
    fn test_toolbar_click_rotates_image() {
        let (quill, _root, img) = fixture();
        let rotate = ImageRotate::new(quill, no_refocus()).unwrap();
        rotate.show(img.clone()).unwrap();

        let toolbar = rotate.overlay().unwrap().first_element_child().unwrap();
        let right: HtmlElement = toolbar.last_element_child().unwrap().dyn_into().unwrap();
        right.click();

        assert_eq!(img.get_attribute(ROTATION_ATTRIBUTE).as_deref(), Some("90"));
        let img: HtmlElement = img.dyn_into().unwrap();
        assert_eq!(
            img.style().get_property_value("transform").unwrap(),
            "rotate(90deg)"
        );
        let overlay: HtmlElement = rotate.overlay().unwrap().dyn_into().unwrap();
        assert_eq!(overlay.style().get_property_value("width").unwrap(), "100px");
        assert_eq!(overlay.style().get_property_value("height").unwrap(), "200px");
    }

    #[wasm_bindgen_test]
    fn test_unknown_module_is_rejected() {
        let (quill, _root, _img) = fixture();
        let options = Object::new();
        let modules = js_sys::Array::of1(&"Resize".into());
        Reflect::set(&options, &"modules".into(), &modules).unwrap();
        assert!(ImageRotate::new(quill, options.into()).is_err());
    }
}
