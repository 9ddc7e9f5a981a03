// Browser tests, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use js_sys::{Object, Promise, Reflect};
use number_blocks_platform::gestures::install_overscroll_guard;
use number_blocks_platform::touch_feedback::TouchFeedback;
use number_blocks_platform::{
    LoaderConfig, OverscrollPolicy, PlatformConfig, install_platform, loader, run_loader,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, EventInit, HtmlElement, HtmlMetaElement};

wasm_bindgen_test_configure!(run_in_browser);

const LOADER_SRC: &str = "https://games.example.com/number-blocks/platform/loader.js";

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

// Lets queued MutationObserver records be delivered.
async fn next_tick() {
    sleep(0).await;
}

fn cancelable(name: &str, bubbles: bool) -> Event {
    let init = EventInit::new();
    init.set_cancelable(true);
    init.set_bubbles(bubbles);
    Event::new_with_event_init_dict(name, &init).unwrap()
}

fn control(doc: &Document, class: &str) -> HtmlElement {
    let button: HtmlElement = doc.create_element("button").unwrap().dyn_into().unwrap();
    button.set_class_name(class);
    doc.body().unwrap().append_child(&button).unwrap();
    button
}

fn assert_touch_feedback(el: &HtmlElement) {
    el.dispatch_event(&Event::new("touchstart").unwrap()).unwrap();
    assert!(el.class_list().contains("touch-active"));
    el.dispatch_event(&Event::new("touchcancel").unwrap()).unwrap();
    assert!(!el.class_list().contains("touch-active"));
}

fn remove_all(doc: &Document, selector: &str) {
    let nodes = doc.query_selector_all(selector).unwrap();
    for i in 0..nodes.length() {
        let el: Element = nodes.item(i).unwrap().dyn_into().unwrap();
        el.remove();
    }
}

fn add_meta(doc: &Document, name: &str, content: &str) -> HtmlMetaElement {
    let meta: HtmlMetaElement = doc.create_element("meta").unwrap().dyn_into().unwrap();
    meta.set_name(name);
    meta.set_content(content);
    doc.head().unwrap().append_child(&meta).unwrap();
    meta
}

fn count(doc: &Document, selector: &str) -> u32 {
    doc.query_selector_all(selector).unwrap().length()
}

#[wasm_bindgen_test]
fn existing_capable_meta_is_not_overwritten() {
    let doc = document();
    remove_all(&doc, "meta[name=\"apple-mobile-web-app-capable\"]");
    let meta = add_meta(&doc, "apple-mobile-web-app-capable", "no");
    loader::inject(&doc, LOADER_SRC, &LoaderConfig::default()).unwrap();
    assert_eq!(meta.content(), "no");
    assert_eq!(count(&doc, "meta[name=\"apple-mobile-web-app-capable\"]"), 1);
    assert_eq!(count(&doc, "meta[name=\"theme-color\"]"), 1);
}

#[wasm_bindgen_test]
fn viewport_directives_appear_once_after_two_runs() {
    let doc = document();
    remove_all(&doc, "meta[name=\"viewport\"]");
    let viewport = add_meta(&doc, "viewport", "width=device-width");
    run_loader(Some(LOADER_SRC.to_string())).unwrap();
    run_loader(Some(LOADER_SRC.to_string())).unwrap();
    let content = viewport.content();
    assert_eq!(content.matches("user-scalable=no").count(), 1, "{}", content);
    assert_eq!(content.matches("maximum-scale=1.0").count(), 1, "{}", content);
    assert_eq!(count(&doc, "link[rel=\"apple-touch-icon\"]"), 1);
}

#[wasm_bindgen_test]
fn assets_resolve_against_loader_directory() {
    let doc = document();
    run_loader(Some(LOADER_SRC.to_string())).unwrap();
    let manifest = doc.query_selector("link[rel=\"manifest\"]").unwrap().unwrap();
    assert_eq!(
        manifest.get_attribute("href").unwrap(),
        "https://games.example.com/number-blocks/platform/manifest.json"
    );
}

#[wasm_bindgen_test]
fn platform_global_is_frozen() {
    install_platform().unwrap();
    let win = web_sys::window().unwrap();
    let global = Reflect::get(win.as_ref(), &JsValue::from_str("Platform")).unwrap();
    let obj: Object = global.dyn_into().unwrap();
    assert!(Object::is_frozen(&obj));
    for key in ["isIOS", "isIPad", "isSafari", "isStandalone", "isTouchDevice"] {
        let v = Reflect::get(&obj, &JsValue::from_str(key)).unwrap();
        assert!(v.as_bool().is_some(), "{} is not a boolean", key);
    }
}

#[wasm_bindgen_test]
fn viewport_height_variable_is_set() {
    install_platform().unwrap();
    let root: HtmlElement = document().document_element().unwrap().dyn_into().unwrap();
    let vh = root.style().get_property_value("--vh").unwrap();
    assert!(vh.ends_with("px"), "unexpected --vh '{}'", vh);
}

#[wasm_bindgen_test]
async fn late_button_gets_touch_feedback() {
    install_platform().unwrap();
    let doc = document();
    let button = control(&doc, "num-btn");
    next_tick().await;

    button.dispatch_event(&Event::new("touchstart").unwrap()).unwrap();
    assert!(button.class_list().contains("touch-active"));
    button.dispatch_event(&Event::new("touchend").unwrap()).unwrap();
    assert!(!button.class_list().contains("touch-active"));

    let menu = cancelable("contextmenu", false);
    button.dispatch_event(&menu).unwrap();
    assert!(menu.default_prevented());
    button.remove();
}

#[wasm_bindgen_test]
async fn cloned_control_gets_its_own_listeners() {
    install_platform().unwrap();
    let doc = document();
    let original = control(&doc, "action-btn");
    next_tick().await;
    assert_touch_feedback(&original);

    let copy: HtmlElement = original.clone_node_with_deep(true).unwrap().dyn_into().unwrap();
    doc.body().unwrap().append_child(&copy).unwrap();
    next_tick().await;
    assert_touch_feedback(&copy);

    let menu = cancelable("contextmenu", false);
    copy.dispatch_event(&menu).unwrap();
    assert!(menu.default_prevented());
    original.remove();
    copy.remove();
}

#[wasm_bindgen_test]
fn rescan_skips_enhanced_elements_but_not_copies() {
    let doc = document();
    let cfg = PlatformConfig { control_selectors: vec![".rescan-btn".to_string()], ..Default::default() };
    let feedback = TouchFeedback::new(&cfg);
    let button = control(&doc, "rescan-btn");
    assert_eq!(feedback.enhance(&doc).unwrap(), 1);
    assert_eq!(feedback.enhance(&doc).unwrap(), 0);
    assert!(feedback.is_enhanced(&button));

    let copy: HtmlElement = button.clone_node_with_deep(true).unwrap().dyn_into().unwrap();
    doc.body().unwrap().append_child(&copy).unwrap();
    assert!(!feedback.is_enhanced(&copy));
    assert_eq!(feedback.enhance(&doc).unwrap(), 1);
    assert_touch_feedback(&copy);
    button.remove();
    copy.remove();
}

#[wasm_bindgen_test]
fn body_classes_follow_descriptor() {
    install_platform().unwrap();
    let win = web_sys::window().unwrap();
    let global = Reflect::get(win.as_ref(), &JsValue::from_str("Platform")).unwrap();
    let body = document().body().unwrap();
    for (key, class) in [
        ("isIOS", "ios"),
        ("isIPad", "ipad"),
        ("isSafari", "safari"),
        ("isStandalone", "standalone"),
        ("isTouchDevice", "touch-device"),
    ] {
        let on = Reflect::get(&global, &JsValue::from_str(key)).unwrap().as_bool().unwrap();
        assert_eq!(body.class_list().contains(class), on, "{} vs class '{}'", key, class);
    }
}

#[wasm_bindgen_test]
fn gesture_events_are_cancelled() {
    install_platform().unwrap();
    let doc = document();
    for name in ["gesturestart", "gesturechange"] {
        let evt = cancelable(name, false);
        doc.dispatch_event(&evt).unwrap();
        assert!(evt.default_prevented(), "{} not cancelled", name);
    }
}

#[wasm_bindgen_test]
async fn only_second_quick_touchend_is_cancelled() {
    install_platform().unwrap();
    let doc = document();
    // Clear any touch-end recorded by earlier tests.
    sleep(400).await;
    let first = cancelable("touchend", false);
    doc.dispatch_event(&first).unwrap();
    let second = cancelable("touchend", false);
    doc.dispatch_event(&second).unwrap();
    assert!(!first.default_prevented());
    assert!(second.default_prevented());
}

#[wasm_bindgen_test]
fn overscroll_allow_registers_nothing() {
    let cfg = PlatformConfig::default();
    assert_eq!(cfg.overscroll, OverscrollPolicy::Allow);
    assert!(!install_overscroll_guard(&document(), &cfg).unwrap());
}

#[wasm_bindgen_test]
fn overscroll_prevented_only_outside_scroll_containers() {
    let doc = document();
    let cfg = PlatformConfig { overscroll: OverscrollPolicy::PreventAtBoundary, ..Default::default() };
    assert!(install_overscroll_guard(&doc, &cfg).unwrap());
    let body = doc.body().unwrap();
    assert_eq!(body.scroll_top(), 0);

    let loose = doc.create_element("div").unwrap();
    body.append_child(&loose).unwrap();
    let outside = cancelable("touchmove", true);
    loose.dispatch_event(&outside).unwrap();
    assert!(outside.default_prevented());

    let area = doc.create_element("div").unwrap();
    area.set_class_name("quiz-area");
    let inner = doc.create_element("span").unwrap();
    area.append_child(&inner).unwrap();
    body.append_child(&area).unwrap();
    let inside = cancelable("touchmove", true);
    inner.dispatch_event(&inside).unwrap();
    assert!(!inside.default_prevented());

    loose.remove();
    area.remove();
}
