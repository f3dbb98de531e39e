//! DOM Page
//!
//! [`PageView`] over the live document, and the interpreter that applies
//! [`Effect`]s to it.

use brightsmile::{ClientEvent, Effect, LogLevel, PageView, Target};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Storage};

use crate::{charts, components};

/// The loaded document plus its local storage
#[derive(Clone)]
pub struct DomPage {
    document: Document,
    storage: Option<Storage>,
}

impl DomPage {
    /// Page of the current window
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let storage = window.local_storage().ok().flatten();
        Some(Self { document, storage })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Resolve a target to an element
    pub fn element(&self, target: &Target) -> Option<Element> {
        match target {
            Target::Body => self.document.body().map(Element::from),
            Target::Id(id) => self.document.get_element_by_id(id),
            Target::Selector(selector) => self.document.query_selector(selector).ok().flatten(),
        }
    }

    fn html_element(&self, target: &Target) -> Option<HtmlElement> {
        self.element(target)?.dyn_into::<HtmlElement>().ok()
    }

    /// Apply effects in order. Events meant for the socket are returned to
    /// the caller.
    pub fn apply(&self, effects: Vec<Effect>) -> Vec<ClientEvent> {
        let mut outbound = Vec::new();
        for effect in effects {
            if let Effect::Emit(event) = effect {
                outbound.push(event);
            } else {
                self.apply_one(effect);
            }
        }
        outbound
    }

    fn apply_one(&self, effect: Effect) {
        match effect {
            Effect::SetText { target, text } => {
                if let Some(el) = self.element(&target) {
                    el.set_text_content(Some(&text));
                }
            }
            Effect::SetAttribute {
                target,
                name,
                value,
            } => {
                if let Some(el) = self.element(&target) {
                    let _ = el.set_attribute(&name, &value);
                }
            }
            Effect::SetClass {
                target,
                class,
                enabled,
            } => {
                if let Some(el) = self.element(&target) {
                    let _ = el.class_list().toggle_with_force(&class, enabled);
                }
            }
            Effect::SetStyle {
                target,
                property,
                value,
            } => {
                if let Some(el) = self.html_element(&target) {
                    let _ = el.style().set_property(&property, &value);
                }
            }
            Effect::AppendElement {
                parent,
                tag,
                class,
                text,
            } => {
                if let Some(parent) = self.element(&parent) {
                    if let Ok(child) = self.document.create_element(&tag) {
                        child.set_class_name(&class);
                        child.set_text_content(Some(&text));
                        let _ = parent.append_child(&child);
                    }
                }
            }
            Effect::Persist { key, value } => {
                if let Some(storage) = &self.storage {
                    let _ = storage.set_item(&key, &value);
                }
            }
            Effect::ShowToast(toast) => components::toast::show(&self.document, &toast),
            Effect::UpdateChart(update) => {
                if let Err(e) = charts::apply_update(&update) {
                    log(LogLevel::Error, &format!("Chart update failed: {:?}", e));
                }
            }
            Effect::InjectStyle(css) => self.inject_style(&css),
            Effect::Reload => {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            }
            Effect::Log { level, message } => log(level, &message),
            Effect::Emit(event) => {
                log(
                    LogLevel::Warn,
                    &format!("Dropping '{}' outside the socket", event.name()),
                );
            }
        }
    }

    fn inject_style(&self, css: &str) {
        let Some(head) = self.document.head() else {
            return;
        };
        if let Ok(style) = self.document.create_element("style") {
            style.set_text_content(Some(css));
            let _ = head.append_child(&style);
        }
    }
}

impl PageView for DomPage {
    fn exists(&self, target: &Target) -> bool {
        self.element(target).is_some()
    }

    fn text(&self, target: &Target) -> Option<String> {
        self.element(target)?.text_content()
    }

    fn attribute(&self, target: &Target, name: &str) -> Option<String> {
        self.element(target)?.get_attribute(name)
    }

    fn has_class(&self, target: &Target, class: &str) -> bool {
        self.element(target)
            .map(|el| el.class_list().contains(class))
            .unwrap_or(false)
    }

    fn stored(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }
}

/// Write a diagnostic line to the browser console
pub fn log(level: LogLevel, message: &str) {
    let message = JsValue::from_str(message);
    match level {
        LogLevel::Info => web_sys::console::log_1(&message),
        LogLevel::Warn => web_sys::console::warn_1(&message),
        LogLevel::Error => web_sys::console::error_1(&message),
    }
}
