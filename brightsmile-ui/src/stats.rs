//! Stat Polling
//!
//! Re-fetches the dashboard counters on a fixed interval.

use std::rc::Rc;

use brightsmile::stats::{poll_failed, render, should_poll};
use brightsmile::{PageContext, PortalError, PortalResult, UserStats};
use gloo_net::http::Request;
use gloo_timers::callback::Interval;
use wasm_bindgen_futures::spawn_local;

use crate::dom::DomPage;

/// Start polling if the page shows the stat counters
///
/// The first fetch happens one interval after load. Polling runs for the
/// life of the page.
pub fn start_polling(ctx: Rc<PageContext>, page: DomPage) {
    if !should_poll(&page) {
        return;
    }

    let period = u32::try_from(ctx.poll_interval_ms).unwrap_or(u32::MAX);
    Interval::new(period, move || {
        let ctx = Rc::clone(&ctx);
        let page = page.clone();
        spawn_local(async move {
            let effects = match fetch_stats(&ctx.stats_endpoint).await {
                Ok(stats) => render(&page, &stats),
                Err(e) => vec![poll_failed(e)],
            };
            page.apply(effects);
        });
    })
    .forget();
}

/// Fetch and parse the stats endpoint
pub async fn fetch_stats(endpoint: &str) -> PortalResult<UserStats> {
    let response = Request::get(endpoint)
        .send()
        .await
        .map_err(|e| PortalError::Http(format!("Network error: {}", e)))?;

    if !response.ok() {
        return Err(PortalError::Http(format!(
            "{} returned {}",
            endpoint,
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| PortalError::Http(format!("Failed to read body: {}", e)))?;
    UserStats::parse(&body)
}
