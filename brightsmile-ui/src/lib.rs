//! BrightSmile Page Script
//!
//! Browser glue for the clinic portal, built with Leptos (WASM).
//!
//! # Features
//!
//! - Dark mode toggle with persisted preference
//! - Toast notifications for pushed events
//! - Live updates over the portal's Socket.IO endpoint
//! - Dashboard stat polling and chart refreshes
//! - Password visibility, logo hover and admin styling
//!
//! # Architecture
//!
//! Every behavior is a pure handler from the `brightsmile` crate that returns
//! effects. This crate only reads the DOM through [`dom::DomPage`], applies the
//! effects it gets back and wires up browser events and timers.

use std::rc::Rc;

use brightsmile::page;

pub mod charts;
pub mod components;
pub mod context;
pub mod dom;
pub mod realtime;
pub mod stats;
pub mod widgets;

/// Attach every page behavior. Call once after the document has loaded.
pub fn start() {
    let Some(page) = dom::DomPage::current() else {
        web_sys::console::error_1(&"No document to attach to".into());
        return;
    };

    let ctx = match context::from_window() {
        Ok(ctx) => Rc::new(ctx),
        Err(e) => {
            web_sys::console::error_1(&format!("Invalid page context: {}", e).into());
            Rc::new(brightsmile::PageContext::default())
        }
    };

    page.apply(page::on_load(&ctx, &page));

    widgets::bind_dark_mode_toggle(&page);
    widgets::bind_logo(&page);
    widgets::expose_toggle_password(&page);
    charts::expose_updaters(&page);
    widgets::init_tooltips(&page);

    stats::start_polling(Rc::clone(&ctx), page.clone());
    realtime::connect(ctx, page);
}
