// Console logging helpers. On the host (cargo test) there is no browser
// console, so messages go to stderr instead.

#[cfg(target_arch = "wasm32")]
pub fn clog(msg: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg));
}

#[cfg(target_arch = "wasm32")]
pub fn cwarn(msg: &str) {
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(msg));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn clog(msg: &str) {
    eprintln!("{}", msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cwarn(msg: &str) {
    eprintln!("warning: {}", msg);
}
