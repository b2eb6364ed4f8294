use crate::error;
use crate::Session;
use colorbook::{LayerMap, SessionError, SvgImage};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
impl Session {
    #[wasm_bindgen(constructor)]
    pub fn new(user_id: String) -> Session {
        Session::rs_new(user_id)
    }

    /// Identify the image's regions and make it current. Progress restore
    /// is host-driven: call `import_layers` with the fetched record.
    pub fn load_image(&mut self, id: String, name: String, svg_content: String) -> JsValue {
        let image = SvgImage {
            id,
            name,
            svg_content,
        };
        match self.inner.select_image(image) {
            Ok(()) => error::ok(JsValue::NULL),
            Err(e) => error::parse_error(e.to_string()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    pub fn current_color(&self) -> String {
        self.inner.current_color().to_string()
    }

    pub fn set_color(&mut self, color: String) {
        self.inner.set_color(color);
    }

    /// Click-to-fill with the current color.
    pub fn fill(&mut self, region: String) -> JsValue {
        match self.inner.fill(region) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(_) => error::no_image(),
        }
    }

    pub fn fill_with(&mut self, region: String, color: String) -> JsValue {
        match self.inner.fill_region(region, color) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(_) => error::no_image(),
        }
    }

    /// Remove the most recent fill; value is the cleared region id. An
    /// empty stack is a typed `empty_undo` error so hosts can disable
    /// their undo button without inspecting the value.
    pub fn undo(&mut self) -> JsValue {
        match self.inner.undo() {
            Ok(Some(region)) => error::ok(JsValue::from_str(&region)),
            Ok(None) => error::empty_undo(),
            Err(_) => error::no_image(),
        }
    }

    pub fn undo_depth(&self) -> u32 {
        self.inner.undo_depth() as u32
    }

    pub fn clear(&mut self) -> JsValue {
        match self.inner.clear_all() {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(_) => error::no_image(),
        }
    }

    /// The identified image with all current fills applied, ready to
    /// inject into the DOM.
    pub fn rendered(&self) -> JsValue {
        match self.inner.rendered_svg() {
            Ok(svg) => error::ok(JsValue::from_str(&svg)),
            Err(SessionError::NoImage) => error::no_image(),
            Err(e) => error::parse_error(e.to_string()),
        }
    }

    /// Current layer map as a plain object, for the host to persist.
    pub fn layers(&self) -> JsValue {
        match self.inner.layers() {
            Some(layers) => match serde_wasm_bindgen::to_value(layers) {
                Ok(v) => error::ok(v),
                Err(e) => error::bad_json(e.to_string()),
            },
            None => error::no_image(),
        }
    }

    /// Replace the layer map from a fetched progress record. Clears the
    /// undo stack: restored fills carry no session ordering.
    pub fn import_layers(&mut self, layers: JsValue) -> JsValue {
        let layers: LayerMap = match serde_wasm_bindgen::from_value(layers) {
            Ok(layers) => layers,
            Err(e) => return error::bad_json(e.to_string()),
        };
        match self.inner.set_layers(layers) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(_) => error::no_image(),
        }
    }

    /// String variants of layers()/import_layers() for hosts that persist
    /// raw JSON.
    pub fn export_json(&self) -> JsValue {
        match self.inner.layers() {
            Some(layers) => match serde_json::to_string(layers) {
                Ok(json) => error::ok(JsValue::from_str(&json)),
                Err(e) => error::bad_json(e.to_string()),
            },
            None => error::no_image(),
        }
    }

    pub fn import_json(&mut self, json: String) -> JsValue {
        let layers: LayerMap = match serde_json::from_str(&json) {
            Ok(layers) => layers,
            Err(e) => return error::bad_json(e.to_string()),
        };
        match self.inner.set_layers(layers) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(_) => error::no_image(),
        }
    }
}
