//! Toast Notification Component
//!
//! Renders a [`Toast`] into a container of its own. The container goes away
//! when the toast is closed or times out.

use brightsmile::toast::{CONTAINER_CLASS, DISMISS_AFTER_MS};
use brightsmile::Toast;
use gloo_timers::callback::Timeout;
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

/// Show a toast and schedule its removal
pub fn show(document: &Document, toast: &Toast) {
    let Some(container) = create_container(document) else {
        web_sys::console::error_1(&"No place to show toast".into());
        return;
    };

    let toast = toast.clone();
    let host = container.clone();
    mount_to(container.clone(), move || view! { <ToastMessage toast=toast host=host /> });

    Timeout::new(DISMISS_AFTER_MS, move || container.remove()).forget();
}

/// Fresh container appended to the body
fn create_container(document: &Document) -> Option<HtmlElement> {
    let body = document.body()?;
    let container = document
        .create_element("div")
        .ok()?
        .dyn_into::<HtmlElement>()
        .ok()?;
    container.set_class_name(CONTAINER_CLASS);
    body.append_child(&container).ok()?;
    Some(container)
}

#[component]
fn ToastMessage(toast: Toast, host: HtmlElement) -> impl IntoView {
    let root = toast
        .aria_attributes()
        .into_iter()
        .fold(html::div().attr("class", toast.class_name()), |el, (name, value)| {
            el.attr(name, value)
        });

    root.child(view! {
        <div class="d-flex">
            <div class="toast-body">
                <strong>{toast.title.clone()}</strong>
                <br/>
                {toast.message.clone()}
            </div>
            <button
                type="button"
                class="btn-close btn-close-white me-2 m-auto"
                aria-label="Close"
                on:click=move |_| host.remove()
            ></button>
        </div>
    })
}
