//! Chart Bindings
//!
//! Charts are constructed by page scripts and reached through `window`
//! globals. Updates overwrite labels and dataset data, then redraw.

use brightsmile::charts::refresh;
use brightsmile::{ChartKind, ChartUpdate, LogLevel};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::to_json;
use crate::dom::{self, DomPage};

/// Apply an update to its chart. Returns `false` when the chart is absent.
pub fn apply_update(update: &ChartUpdate) -> Result<bool, JsValue> {
    let Some(window) = web_sys::window() else {
        return Ok(false);
    };
    let chart = Reflect::get(&window, &update.chart.binding().into())?;
    if chart.is_undefined() || chart.is_null() {
        return Ok(false);
    }

    let data = Reflect::get(&chart, &"data".into())?;
    let labels: Array = update.labels.iter().map(|l| JsValue::from_str(l)).collect();
    Reflect::set(&data, &"labels".into(), &labels)?;

    let datasets = Reflect::get(&data, &"datasets".into())?;
    for (index, values) in update.datasets.iter().enumerate() {
        let dataset = Reflect::get_u32(&datasets, index as u32)?;
        if dataset.is_undefined() {
            continue;
        }
        let points: Array = values
            .iter()
            .map(|v| v.map(JsValue::from_f64).unwrap_or(JsValue::NULL))
            .collect();
        Reflect::set(&dataset, &"data".into(), &points)?;
    }

    let redraw = Reflect::get(&chart, &"update".into())?.dyn_into::<Function>()?;
    redraw.call0(&chart)?;
    Ok(true)
}

/// Install `window.updateTrendsChart` and friends
pub fn expose_updaters(page: &DomPage) {
    let Some(window) = web_sys::window() else {
        return;
    };

    for chart in ChartKind::all() {
        let page = page.clone();
        let updater = Closure::wrap(Box::new(move |payload: JsValue| {
            let Some(payload) = to_json(&payload) else {
                dom::log(LogLevel::Warn, &format!("{} called without data", chart.updater()));
                return;
            };
            match refresh(chart, &payload) {
                Ok(effect) => {
                    page.apply(vec![effect]);
                }
                Err(e) => dom::log(LogLevel::Error, &e.to_string()),
            }
        }) as Box<dyn FnMut(JsValue)>);

        let _ = Reflect::set(&window, &chart.updater().into(), updater.as_ref());
        updater.forget();
    }
}
