//! Page Widgets
//!
//! Event listeners for the dark mode toggle, the footer logo, the password
//! eye icon and Bootstrap tooltips.

use brightsmile::logo::{self, LogoEvent, LOGO_SELECTOR};
use brightsmile::page::TOOLTIP_SELECTOR;
use brightsmile::theme::{self, TOGGLE_ID};
use brightsmile::{password, LogLevel, Target};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlElement, KeyboardEvent};

use crate::dom::{self, DomPage};

/// Global name of the password visibility toggle
pub const TOGGLE_PASSWORD_GLOBAL: &str = "togglePassword";

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        dom::log(LogLevel::Error, &format!("Could not listen for {}", event));
    }
    closure.forget();
}

/// Flip the theme when the toggle button is clicked
pub fn bind_dark_mode_toggle(page: &DomPage) {
    let Some(button) = page.element(&Target::id(TOGGLE_ID)) else {
        return;
    };
    let page = page.clone();
    listen(&button, "click", move |_: Event| {
        page.apply(theme::toggle(&page));
    });
}

/// Hover and focus feedback on the footer logo, plus keyboard activation
pub fn bind_logo(page: &DomPage) {
    let Some(img) = page.element(&Target::selector(LOGO_SELECTOR)) else {
        return;
    };

    for event in LogoEvent::all() {
        let page = page.clone();
        listen(&img, event.dom_name(), move |_: Event| {
            page.apply(logo::react(event));
        });
    }

    let anchor = img.clone();
    listen(&img, "keydown", move |e: Event| {
        let Some(key) = e.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
            return;
        };
        if !logo::activates_link(&key) {
            return;
        }
        let link = anchor
            .closest("a")
            .ok()
            .flatten()
            .and_then(|a| a.dyn_into::<HtmlElement>().ok());
        if let Some(link) = link {
            e.prevent_default();
            link.click();
        }
    });
}

/// Install `window.togglePassword` for the login form's eye icon
pub fn expose_toggle_password(page: &DomPage) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let page = page.clone();
    let toggle = Closure::<dyn FnMut()>::new(move || {
        page.apply(password::toggle(&page));
    });
    let _ = Reflect::set(&window, &TOGGLE_PASSWORD_GLOBAL.into(), toggle.as_ref());
    toggle.forget();
}

/// Create a Bootstrap tooltip for every marked element, if Bootstrap is loaded
pub fn init_tooltips(page: &DomPage) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(tooltip) = Reflect::get(&window, &"bootstrap".into())
        .ok()
        .filter(|b| b.is_object())
        .and_then(|b| Reflect::get(&b, &"Tooltip".into()).ok())
        .and_then(|t| t.dyn_into::<Function>().ok())
    else {
        return;
    };
    let Ok(nodes) = page.document().query_selector_all(TOOLTIP_SELECTOR) else {
        return;
    };

    for i in 0..nodes.length() {
        if let Some(node) = nodes.get(i) {
            if let Err(e) = Reflect::construct(&tooltip, &Array::of1(&node)) {
                dom::log(LogLevel::Warn, &format!("Tooltip init failed: {:?}", e));
            }
        }
    }
}
