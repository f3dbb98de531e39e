//! Page Context
//!
//! Reads the globals the server template renders into a [`PageContext`].

use brightsmile::{PageContext, PortalResult};
use js_sys::{Reflect, JSON};
use serde_json::{Map, Value};
use wasm_bindgen::JsValue;

/// Template global holding the signed-in user id
pub const USER_GLOBAL: &str = "currentUserId";

/// Template global holding the upcoming appointment ids
pub const APPOINTMENTS_GLOBAL: &str = "upcomingAppointments";

/// Build the context from `window` globals and the current location
pub fn from_window() -> PortalResult<PageContext> {
    let Some(window) = web_sys::window() else {
        return Ok(PageContext::default());
    };

    let mut fields = Map::new();
    if let Some(user) = global_json(&window, USER_GLOBAL) {
        fields.insert("current_user_id".to_string(), user);
    }
    if let Some(ids) = global_json(&window, APPOINTMENTS_GLOBAL) {
        fields.insert("upcoming_appointments".to_string(), ids);
    }
    if let Ok(path) = window.location().pathname() {
        fields.insert("path".to_string(), Value::String(path));
    }

    PageContext::from_json(&Value::Object(fields).to_string())
}

/// A `window` property as JSON, skipping unset values
fn global_json(window: &web_sys::Window, name: &str) -> Option<Value> {
    let value = Reflect::get(window, &JsValue::from_str(name)).ok()?;
    to_json(&value)
}

/// Convert a JS value to JSON; `undefined` and functions have no JSON form
pub fn to_json(value: &JsValue) -> Option<Value> {
    if value.is_undefined() || value.is_function() {
        return None;
    }
    let text = JSON::stringify(value).ok()?.as_string()?;
    serde_json::from_str(&text).ok()
}
