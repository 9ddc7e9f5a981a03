//! Bootstrap injector: pulls the platform stylesheet, behavior script and
//! PWA metadata into whatever page loads it, and locks viewport scaling.
//!
//! Asset paths are resolved against the directory of the loader script, so the
//! platform files only need to be co-located with it.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlHeadElement, HtmlLinkElement, HtmlMetaElement, HtmlScriptElement};

use crate::config::{LoaderConfig, MetaTag};
use crate::dom::doc;
use crate::viewport::normalize_viewport_content;

/// Directory part of a script URL, including the trailing slash. Empty when
/// the URL has no slash, which leaves assets relative to the page.
pub fn base_path(script_src: &str) -> &str {
    match script_src.rfind('/') {
        Some(idx) => &script_src[..=idx],
        None => "",
    }
}

pub fn resolve_asset(base: &str, asset: &str) -> String {
    format!("{}{}", base, asset)
}

/// `src` of the last `<script>` in the document: the one being evaluated
/// when the loader runs from a classic script tag.
fn last_script_src(doc: &Document) -> String {
    let scripts = doc.get_elements_by_tag_name("script");
    scripts
        .length()
        .checked_sub(1)
        .and_then(|last| scripts.item(last))
        .and_then(|el| el.get_attribute("src"))
        .unwrap_or_default()
}

fn append_link(doc: &Document, head: &HtmlHeadElement, rel: &str, href: &str) -> Result<(), JsValue> {
    let link: HtmlLinkElement = doc.create_element("link")?.dyn_into()?;
    link.set_rel(rel);
    link.set_href(href);
    head.append_child(&link)?;
    Ok(())
}

/// Add `tag` unless the page already declares one with the same key.
/// Returns whether a tag was added.
fn add_meta_if_missing(doc: &Document, head: &HtmlHeadElement, tag: &MetaTag) -> Result<bool, JsValue> {
    if doc.query_selector(&tag.selector())?.is_some() {
        return Ok(false);
    }
    let meta: HtmlMetaElement = doc.create_element("meta")?.dyn_into()?;
    meta.set_attribute(&tag.attr, &tag.name)?;
    meta.set_content(&tag.content);
    head.append_child(&meta)?;
    Ok(true)
}

fn normalize_viewport(doc: &Document) -> Result<(), JsValue> {
    let Some(el) = doc.query_selector("meta[name=\"viewport\"]")? else {
        return Ok(());
    };
    let meta: HtmlMetaElement = el.dyn_into()?;
    let current = meta.content();
    let next = normalize_viewport_content(&current);
    if next != current {
        meta.set_content(&next);
    }
    Ok(())
}

/// Inject assets and metadata into `doc`, resolving paths against
/// `script_src`.
pub fn inject(doc: &Document, script_src: &str, cfg: &LoaderConfig) -> Result<(), JsValue> {
    let head = doc.head().ok_or_else(|| JsValue::from_str("no document head"))?;
    let base = base_path(script_src);

    append_link(doc, &head, "stylesheet", &resolve_asset(base, &cfg.stylesheet))?;

    // Loads asynchronously; nothing here waits on it.
    let script: HtmlScriptElement = doc.create_element("script")?.dyn_into()?;
    script.set_src(&resolve_asset(base, &cfg.script));
    head.append_child(&script)?;

    append_link(doc, &head, "manifest", &resolve_asset(base, &cfg.manifest))?;

    for tag in &cfg.meta_tags {
        add_meta_if_missing(doc, &head, tag)?;
    }

    if doc.query_selector("link[rel=\"apple-touch-icon\"]")?.is_none() {
        append_link(doc, &head, "apple-touch-icon", &resolve_asset(base, &cfg.touch_icon))?;
    }

    normalize_viewport(doc)
}

/// Run the loader with the default asset layout. `script_src` is the URL of
/// the loader script; when absent the last `<script>` tag is used.
#[wasm_bindgen]
pub fn run_loader(script_src: Option<String>) -> Result<(), JsValue> {
    let doc = doc()?;
    let src = script_src.unwrap_or_else(|| last_script_src(&doc));
    inject(&doc, &src, &LoaderConfig::default())
}

/// Same as `run_loader` with asset names and meta tags read from a JSON
/// object. Missing keys keep their defaults; a meta tag without `attr` keys on
/// `name`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn run_loader_with_config(script_src: Option<String>, json: &str) -> Result<(), JsValue> {
    let cfg: LoaderConfig = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("invalid loader config: {}", e)))?;
    let doc = doc()?;
    let src = script_src.unwrap_or_else(|| last_script_src(&doc));
    inject(&doc, &src, &cfg)
}
