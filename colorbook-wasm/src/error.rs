//! `{ok, value}` / `{ok: false, error: {code, message}}` envelopes for the
//! binding layer. Every exported method returns one, so JS callers branch
//! on `ok` instead of catching thrown exceptions.

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

fn set(obj: &Object, key: &str, value: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), value);
}

pub fn ok(value: JsValue) -> JsValue {
    let envelope = Object::new();
    set(&envelope, "ok", &JsValue::TRUE);
    set(&envelope, "value", &value);
    envelope.into()
}

pub fn err(code: &str, message: &str) -> JsValue {
    let detail = Object::new();
    set(&detail, "code", &JsValue::from_str(code));
    set(&detail, "message", &JsValue::from_str(message));
    let envelope = Object::new();
    set(&envelope, "ok", &JsValue::FALSE);
    set(&envelope, "error", &detail.into());
    envelope.into()
}

pub fn parse_error(message: impl Into<String>) -> JsValue {
    err("parse_error", &message.into())
}

pub fn no_image() -> JsValue {
    err("no_image", "no image selected")
}

pub fn empty_undo() -> JsValue {
    err("empty_undo", "nothing to undo")
}

pub fn bad_json(message: impl Into<String>) -> JsValue {
    err("bad_json", &message.into())
}
