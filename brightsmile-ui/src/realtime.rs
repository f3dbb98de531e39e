//! Real-time Client
//!
//! Socket.IO connection to the portal over a raw WebSocket. Protocol state
//! lives in [`Session`]; server events go through the binding table and the
//! resulting effects are applied to the page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use brightsmile::{dispatch, ClientEvent, LogLevel, PageContext, Session};
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use crate::dom::{self, DomPage};

/// Engine.IO endpoint path and query
pub const SOCKET_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

/// Global defined by the Socket.IO client script
pub const SOCKET_CLIENT_GLOBAL: &str = "io";

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

const BASE_DELAY_MS: u32 = 1000;
const MAX_DELAY_MS: u32 = 30_000;

/// Delay before reconnect attempt `attempt` (zero-based), or `None` once
/// the attempts are used up
pub fn reconnect_delay(attempt: u32) -> Option<u32> {
    if attempt >= MAX_RECONNECT_ATTEMPTS {
        return None;
    }
    Some(
        2_u32
            .saturating_pow(attempt)
            .saturating_mul(BASE_DELAY_MS)
            .min(MAX_DELAY_MS),
    )
}

/// WebSocket URL for a page served from `protocol` and `host`
pub fn socket_url(protocol: &str, host: &str) -> String {
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    format!("{}://{}{}", scheme, host, SOCKET_PATH)
}

/// Live connection to the portal
#[derive(Clone)]
pub struct RealtimeClient {
    ws: Rc<RefCell<Option<WebSocket>>>,
    session: Rc<RefCell<Session>>,
    reconnect_attempts: Rc<Cell<u32>>,
    url: Rc<str>,
    ctx: Rc<PageContext>,
    page: DomPage,
}

impl RealtimeClient {
    pub fn new(url: &str, ctx: Rc<PageContext>, page: DomPage) -> Self {
        Self {
            ws: Rc::new(RefCell::new(None)),
            session: Rc::new(RefCell::new(Session::new())),
            reconnect_attempts: Rc::new(Cell::new(0)),
            url: Rc::from(url),
            ctx,
            page,
        }
    }

    /// Open the WebSocket; failures schedule a reconnect
    pub fn connect(&self) {
        match WebSocket::new(&self.url) {
            Ok(ws) => {
                *self.session.borrow_mut() = Session::new();
                self.setup_handlers(&ws);
                *self.ws.borrow_mut() = Some(ws);
            }
            Err(e) => {
                dom::log(
                    LogLevel::Error,
                    &format!("WebSocket connection failed: {:?}", e),
                );
                self.schedule_reconnect();
            }
        }
    }

    fn setup_handlers(&self, ws: &WebSocket) {
        let client = self.clone();
        let on_open = Closure::wrap(Box::new(move |_: JsValue| {
            client.reconnect_attempts.set(0);
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        let client = self.clone();
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                client.handle_message(&text);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        let client = self.clone();
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            dom::log(
                LogLevel::Info,
                &format!(
                    "WebSocket closed: code={}, reason={}",
                    event.code(),
                    event.reason()
                ),
            );
            client.ws.borrow_mut().take();
            client.schedule_reconnect();
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            dom::log(LogLevel::Error, &format!("WebSocket error: {:?}", e));
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }

    fn schedule_reconnect(&self) {
        let attempts = self.reconnect_attempts.get();
        let Some(delay) = reconnect_delay(attempts) else {
            dom::log(LogLevel::Error, "Max reconnect attempts reached");
            return;
        };
        self.reconnect_attempts.set(attempts + 1);

        let client = self.clone();
        gloo_timers::callback::Timeout::new(delay, move || {
            dom::log(
                LogLevel::Info,
                &format!("Attempting reconnect (attempt {})", client.reconnect_attempts.get()),
            );
            client.connect();
        })
        .forget();
    }

    /// Handle one incoming text frame
    fn handle_message(&self, text: &str) {
        let reaction = match self.session.borrow_mut().receive(text) {
            Ok(reaction) => reaction,
            Err(e) => {
                dom::log(LogLevel::Error, &format!("Failed to parse socket frame: {}", e));
                return;
            }
        };

        for reply in reaction.replies {
            self.send_raw(&reply.encode());
        }

        let Some(event) = reaction.event else {
            return;
        };
        match dispatch(&event.name, &self.ctx, &self.page, &event.payload) {
            Ok(effects) => {
                for outbound in self.page.apply(effects) {
                    self.emit(&outbound);
                }
            }
            Err(e) => dom::log(LogLevel::Error, &e.to_string()),
        }
    }

    /// Send a client event to the server
    pub fn emit(&self, event: &ClientEvent) {
        let frame = self.session.borrow().outbound(event);
        self.send_raw(&frame);
    }

    fn send_raw(&self, frame: &str) {
        let ws = self.ws.borrow();
        let Some(ws) = ws.as_ref() else {
            dom::log(LogLevel::Warn, "WebSocket not connected");
            return;
        };
        if let Err(e) = ws.send_with_str(frame) {
            dom::log(LogLevel::Error, &format!("WebSocket send failed: {:?}", e));
        }
    }

    /// Whether the socket is open and the namespace connect was acknowledged
    pub fn is_connected(&self) -> bool {
        let open = self
            .ws
            .borrow()
            .as_ref()
            .map(|ws| ws.ready_state() == WebSocket::OPEN)
            .unwrap_or(false);
        open && self.session.borrow().is_connected()
    }
}

/// Whether this page opted into live updates by loading the Socket.IO client
pub fn is_enabled(window: &web_sys::Window) -> bool {
    Reflect::get(window, &SOCKET_CLIENT_GLOBAL.into())
        .map(|io| !io.is_undefined() && !io.is_null())
        .unwrap_or(false)
}

/// Connect to the portal's socket endpoint for the current location.
///
/// Pages without the Socket.IO client script get no connection.
pub fn connect(ctx: Rc<PageContext>, page: DomPage) -> Option<RealtimeClient> {
    let window = web_sys::window()?;
    if !is_enabled(&window) {
        return None;
    }
    let location = window.location();
    let protocol = location.protocol().ok()?;
    let host = location.host().ok()?;

    let client = RealtimeClient::new(&socket_url(&protocol, &host), ctx, page);
    client.connect();
    Some(client)
}
