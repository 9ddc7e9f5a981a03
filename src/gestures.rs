//! Zoom and bounce suppression: double-tap zoom, pinch zoom and body
//! overscroll.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, TouchEvent};

use crate::config::{OverscrollPolicy, PlatformConfig};
use crate::dom::listen;

/// Remembers the previous touch-end so a second tap inside the window can
/// have its default (zoom) cancelled. Sequential taps still reach the page as
/// clicks; only the browser gesture is lost.
#[derive(Clone, Debug)]
pub struct DoubleTapGuard {
    window_ms: f64,
    last_touch_end: Option<f64>,
}

impl DoubleTapGuard {
    pub fn new(window_ms: f64) -> Self {
        Self { window_ms, last_touch_end: None }
    }

    /// Record a touch-end at `now_ms`; returns true when it should be
    /// cancelled. The timestamp is updated either way.
    pub fn register_touch_end(&mut self, now_ms: f64) -> bool {
        let suppress = self
            .last_touch_end
            .is_some_and(|last| now_ms - last <= self.window_ms);
        self.last_touch_end = Some(now_ms);
        suppress
    }
}

/// Whether the body sits at a scroll boundary, where a further drag would
/// start the rubber-band bounce.
pub fn at_scroll_boundary(scroll_top: i32, scroll_height: i32, client_height: i32) -> bool {
    scroll_top == 0 || scroll_height - scroll_top == client_height
}

pub fn install_double_tap_guard(doc: &Document, cfg: &PlatformConfig) -> Result<(), JsValue> {
    let mut guard = DoubleTapGuard::new(cfg.double_tap_window_ms);
    listen(doc, "touchend", false, move |evt: TouchEvent| {
        if guard.register_touch_end(js_sys::Date::now()) {
            evt.prevent_default();
        }
    })
}

pub fn install_pinch_guard(doc: &Document) -> Result<(), JsValue> {
    // Safari-only gesture events; other browsers never fire them.
    for name in ["gesturestart", "gesturechange"] {
        listen(doc, name, false, |evt: Event| evt.prevent_default())?;
    }
    Ok(())
}

/// Body `touchmove` handling. Must run once the body exists. Under
/// [`OverscrollPolicy::Allow`] nothing is registered; returns whether a
/// listener was added.
pub fn install_overscroll_guard(doc: &Document, cfg: &PlatformConfig) -> Result<bool, JsValue> {
    if cfg.overscroll == OverscrollPolicy::Allow {
        return Ok(false);
    }
    let Some(body) = doc.body() else {
        return Ok(false);
    };
    let containers = cfg.scroll_container_selector();
    let body_cb = body.clone();
    listen(&body, "touchmove", false, move |evt: TouchEvent| {
        let in_container = evt
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&containers).ok().flatten())
            .is_some();
        if !in_container
            && at_scroll_boundary(body_cb.scroll_top(), body_cb.scroll_height(), body_cb.client_height())
        {
            evt.prevent_default();
        }
    })?;
    Ok(true)
}
