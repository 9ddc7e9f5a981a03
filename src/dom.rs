// Small DOM helpers shared by the loader and the adapter modules.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, EventTarget, Window, window};

pub fn win() -> Result<Window, JsValue> {
    window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn doc() -> Result<Document, JsValue> {
    win()?.document().ok_or_else(|| JsValue::from_str("no document"))
}

pub fn has_global(win: &Window, name: &str) -> bool {
    js_sys::Reflect::has(win.as_ref(), &JsValue::from_str(name)).unwrap_or(false)
}

/// Passive listeners can never cancel the event; handlers that call
/// `prevent_default` must be registered with `passive = false`.
pub fn listen<E, F>(target: &EventTarget, event: &str, passive: bool, handler: F) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let mut handler = handler;
    let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
        handler(evt.unchecked_into::<E>());
    }) as Box<dyn FnMut(_)>);
    let opts = AddEventListenerOptions::new();
    opts.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &opts,
    )?;
    // Listeners live for the whole page.
    closure.forget();
    Ok(())
}

/// Run `f` once after `delay_ms`.
pub fn after<F>(win: &Window, delay_ms: i32, f: F) -> Result<(), JsValue>
where
    F: FnOnce() + 'static,
{
    let cb = Closure::once_into_js(f);
    win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms)?;
    Ok(())
}

/// Run `f` on DOMContentLoaded, or right away if parsing already finished.
pub fn on_dom_ready<F>(doc: &Document, f: F) -> Result<(), JsValue>
where
    F: FnOnce() + 'static,
{
    if doc.ready_state() != "loading" {
        f();
        return Ok(());
    }
    let cb = Closure::once_into_js(f);
    let opts = AddEventListenerOptions::new();
    opts.set_once(true);
    doc.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        cb.unchecked_ref(),
        &opts,
    )
}
