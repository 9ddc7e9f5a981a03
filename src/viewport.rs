//! Viewport fixes: scaling directives in `<meta name="viewport">`, the `--vh`
//! custom property (iOS `100vh` includes the toolbar) and the reflow kick
//! after rotation.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use crate::config::PlatformConfig;
use crate::dom::{after, listen};

/// Directives forced onto the viewport tag for a game-like, non-zoomable page.
pub const SCALE_DIRECTIVES: &[(&str, &str)] = &[("user-scalable", "no"), ("maximum-scale", "1.0")];

/// True if `content` already carries a directive named `key`. Matches the
/// directive name, so `initial-scale` does not count as `maximum-scale`.
pub fn has_directive(content: &str, key: &str) -> bool {
    content
        .split([',', ';'])
        .filter_map(|part| part.split('=').next())
        .any(|name| name.trim().eq_ignore_ascii_case(key))
}

/// Append every missing scale directive. Existing values are kept as is.
pub fn normalize_viewport_content(content: &str) -> String {
    let mut out = content
        .trim_end_matches(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .to_string();
    for (key, value) in SCALE_DIRECTIVES {
        if has_directive(&out, key) {
            continue;
        }
        if !out.trim().is_empty() {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}

/// `--vh` value for a given `innerHeight`.
pub fn vh_value(inner_height: f64) -> String {
    format!("{}px", inner_height * 0.01)
}

pub fn set_viewport_height(win: &Window, doc: &Document) -> Result<(), JsValue> {
    let Some(root) = doc.document_element() else {
        return Ok(());
    };
    let height = win.inner_height()?.as_f64().unwrap_or(0.0);
    root.dyn_into::<HtmlElement>()?
        .style()
        .set_property("--vh", &vh_value(height))
}

pub fn install_viewport_height(win: &Window, doc: &Document, cfg: &PlatformConfig) -> Result<(), JsValue> {
    set_viewport_height(win, doc)?;
    {
        let (w, d) = (win.clone(), doc.clone());
        listen(win, "resize", true, move |_evt: web_sys::Event| {
            let _ = set_viewport_height(&w, &d);
        })?;
    }
    let settle = cfg.orientation_settle_ms;
    let (w, d) = (win.clone(), doc.clone());
    listen(win, "orientationchange", true, move |_evt: web_sys::Event| {
        let (w2, d2) = (w.clone(), d.clone());
        let _ = after(&w, settle, move || {
            let _ = set_viewport_height(&w2, &d2);
        });
    })
}

/// Safari sometimes keeps the pre-rotation layout; scrolling to the top and
/// toggling the body's display forces a fresh one.
pub fn install_orientation_reflow(win: &Window, doc: &Document, cfg: &PlatformConfig) -> Result<(), JsValue> {
    let settle = cfg.orientation_settle_ms;
    let (w, d) = (win.clone(), doc.clone());
    listen(win, "orientationchange", true, move |_evt: web_sys::Event| {
        let (w2, d2) = (w.clone(), d.clone());
        let _ = after(&w, settle, move || {
            w2.scroll_to_with_x_and_y(0.0, 0.0);
            if let Some(body) = d2.body() {
                let style = body.style();
                let _ = style.set_property("display", "none");
                let _ = body.offset_height();
                let _ = style.set_property("display", "");
            }
        });
    })
}
