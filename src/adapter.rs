//! Platform adapter: detects the platform once and wires every listener the
//! game pages rely on. The descriptor is handed to each installer directly;
//! `window.Platform` is only a frozen copy for scripts outside this module.

use std::cell::Cell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::config::PlatformConfig;
use crate::dom::{doc, listen, on_dom_ready, win};
use crate::gestures::{install_double_tap_guard, install_overscroll_guard, install_pinch_guard};
use crate::log::{clog, cwarn};
use crate::platform::Platform;
use crate::speech::install_speech_recovery;
use crate::touch_feedback::install_touch_feedback;
use crate::viewport::{install_orientation_reflow, install_viewport_height};

const INPUT_SELECTOR: &str = "input, textarea, select";

thread_local! {
    static INSTALLED: Cell<bool> = const { Cell::new(false) };
    static DETECTED: Cell<Option<Platform>> = const { Cell::new(None) };
}

fn apply_body_classes(doc: &Document, platform: &Platform) -> Result<(), JsValue> {
    let Some(body) = doc.body() else {
        return Ok(());
    };
    for class in platform.body_classes() {
        body.class_list().add_1(class)?;
    }
    Ok(())
}

/// iOS keeps the keyboard up when tapping outside a field; blur it.
fn install_input_blur(doc: &Document) -> Result<(), JsValue> {
    let d = doc.clone();
    listen(doc, "touchstart", true, move |evt: web_sys::TouchEvent| {
        let on_input = evt
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .is_some_and(|el| el.matches(INPUT_SELECTOR).unwrap_or(false));
        if on_input {
            return;
        }
        if let Some(active) = d.active_element() {
            if active.matches(INPUT_SELECTOR).unwrap_or(false) {
                if let Ok(html) = active.dyn_into::<HtmlElement>() {
                    let _ = html.blur();
                }
            }
        }
    })
}

/// Everything that needs `document.body`.
fn on_body_ready(doc: &Document, platform: &Platform, cfg: &PlatformConfig) -> Result<(), JsValue> {
    apply_body_classes(doc, platform)?;
    install_overscroll_guard(doc, cfg)?;
    Ok(())
}

fn install(win: &Window, doc: &Document, platform: Platform, cfg: PlatformConfig) -> Result<(), JsValue> {
    platform.expose(win)?;

    {
        let (d, c) = (doc.clone(), cfg.clone());
        on_dom_ready(doc, move || {
            if let Err(e) = on_body_ready(&d, &platform, &c) {
                cwarn(&format!("body setup failed: {:?}", e));
            }
        })?;
    }

    install_double_tap_guard(doc, &cfg)?;
    install_pinch_guard(doc)?;
    install_viewport_height(win, doc, &cfg)?;
    install_touch_feedback(win, doc, &cfg)?;
    install_speech_recovery(win, doc, &platform)?;
    if platform.is_ios {
        install_input_blur(doc)?;
    }
    install_orientation_reflow(win, doc, &cfg)?;

    clog(&format!("Platform detected: {}", platform.summary()));
    Ok(())
}

/// Run `f` unless `done` is already set; `done` is set only when `f`
/// succeeds, so a failed install can be retried. Returns whether `f` ran.
fn run_once<E>(done: &Cell<bool>, f: impl FnOnce() -> Result<(), E>) -> Result<bool, E> {
    if done.get() {
        return Ok(false);
    }
    f()?;
    done.set(true);
    Ok(true)
}

/// Detect the platform and register listeners with `cfg`. Once a call
/// succeeds, later calls have no effect.
pub fn install_platform_config(cfg: PlatformConfig) -> Result<(), JsValue> {
    let ran = INSTALLED.with(|flag| {
        run_once(flag, || {
            let win = win()?;
            let doc = doc()?;
            let platform = Platform::from_window(&win)?;
            DETECTED.with(|slot| slot.set(Some(platform)));
            install(&win, &doc, platform, cfg)
        })
    })?;
    if !ran {
        cwarn("platform adapter already installed; ignoring");
    }
    Ok(())
}

#[wasm_bindgen]
pub fn install_platform() -> Result<(), JsValue> {
    install_platform_config(PlatformConfig::default())
}

/// Same as `install_platform`, reading overrides from a JSON object. Missing
/// keys keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn install_platform_with_config(json: &str) -> Result<(), JsValue> {
    let cfg: PlatformConfig = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("invalid platform config: {}", e)))?;
    install_platform_config(cfg)
}

/// The descriptor as a frozen JS object. Uses the installed descriptor when
/// available, otherwise detects on the spot.
#[wasm_bindgen]
pub fn platform_descriptor() -> Result<JsValue, JsValue> {
    let platform = match DETECTED.with(|slot| slot.get()) {
        Some(p) => p,
        None => Platform::from_window(&win()?)?,
    };
    Ok(platform.to_js_object()?.into())
}
