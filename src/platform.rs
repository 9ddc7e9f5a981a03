//! Platform detection.
//!
//! Detection is split into two halves: [`EnvSignals`] reads the raw browser
//! inputs once, and [`Platform::detect`] turns them into the descriptor. The
//! second half is pure so it can be checked on the host.

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::Window;

/// Raw inputs for platform detection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvSignals {
    pub user_agent: String,
    /// `navigator.platform`, e.g. `MacIntel` or `iPhone`.
    pub platform: String,
    pub max_touch_points: i32,
    /// `(display-mode: standalone)` media query match.
    pub display_mode_standalone: bool,
    /// Legacy iOS `navigator.standalone` flag.
    pub navigator_standalone: bool,
    /// `'ontouchstart' in window`.
    pub has_touch_start: bool,
}

impl EnvSignals {
    pub fn from_window(win: &Window) -> Result<Self, JsValue> {
        let nav = win.navigator();
        let display_mode_standalone = win
            .match_media("(display-mode: standalone)")?
            .map(|mq| mq.matches())
            .unwrap_or(false);
        let navigator_standalone = Reflect::get(nav.as_ref(), &JsValue::from_str("standalone"))
            .map(|v| v.as_bool() == Some(true))
            .unwrap_or(false);
        let has_touch_start =
            Reflect::has(win.as_ref(), &JsValue::from_str("ontouchstart")).unwrap_or(false);
        Ok(Self {
            user_agent: nav.user_agent()?,
            platform: nav.platform()?,
            max_touch_points: nav.max_touch_points(),
            display_mode_standalone,
            navigator_standalone,
            has_touch_start,
        })
    }
}

/// Immutable platform descriptor, computed once per page load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Platform {
    #[cfg_attr(feature = "serde", serde(rename = "isIOS"))]
    pub is_ios: bool,
    #[cfg_attr(feature = "serde", serde(rename = "isIPad"))]
    pub is_ipad: bool,
    #[cfg_attr(feature = "serde", serde(rename = "isSafari"))]
    pub is_safari: bool,
    #[cfg_attr(feature = "serde", serde(rename = "isStandalone"))]
    pub is_standalone: bool,
    #[cfg_attr(feature = "serde", serde(rename = "isTouchDevice"))]
    pub is_touch_device: bool,
}

/// iPadOS 13+ reports a desktop Safari UA; a touch-capable Mac is an iPad.
fn is_spoofed_ipad(env: &EnvSignals) -> bool {
    env.platform == "MacIntel" && env.max_touch_points > 1
}

/// True when a `safari` token appears before any `chrome` or `android` token
/// (case-insensitive). Chrome and Android UAs also advertise Safari.
pub fn is_safari_user_agent(ua: &str) -> bool {
    let lower = ua.to_ascii_lowercase();
    let Some(safari) = lower.find("safari") else {
        return false;
    };
    [lower.find("chrome"), lower.find("android")]
        .into_iter()
        .flatten()
        .min()
        .is_none_or(|blocker| blocker > safari)
}

impl Platform {
    pub fn detect(env: &EnvSignals) -> Self {
        let ua = env.user_agent.as_str();
        let spoofed = is_spoofed_ipad(env);
        Self {
            is_ios: ["iPad", "iPhone", "iPod"].iter().any(|t| ua.contains(t)) || spoofed,
            is_ipad: ua.contains("iPad") || spoofed,
            is_safari: is_safari_user_agent(ua),
            is_standalone: env.display_mode_standalone || env.navigator_standalone,
            is_touch_device: env.has_touch_start || env.max_touch_points > 0,
        }
    }

    pub fn from_window(win: &Window) -> Result<Self, JsValue> {
        Ok(Self::detect(&EnvSignals::from_window(win)?))
    }

    /// Body classes for every true field, in declaration order.
    pub fn body_classes(&self) -> Vec<&'static str> {
        [
            (self.is_ios, "ios"),
            (self.is_ipad, "ipad"),
            (self.is_safari, "safari"),
            (self.is_standalone, "standalone"),
            (self.is_touch_device, "touch-device"),
        ]
        .into_iter()
        .filter_map(|(on, class)| on.then_some(class))
        .collect()
    }

    /// Keys as seen by page scripts on `window.Platform`.
    pub fn fields(&self) -> [(&'static str, bool); 5] {
        [
            ("isIOS", self.is_ios),
            ("isIPad", self.is_ipad),
            ("isSafari", self.is_safari),
            ("isStandalone", self.is_standalone),
            ("isTouchDevice", self.is_touch_device),
        ]
    }

    /// Frozen plain JS object, so foreign scripts can read but not edit it.
    pub fn to_js_object(&self) -> Result<Object, JsValue> {
        let obj = Object::new();
        for (key, value) in self.fields() {
            Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_bool(value))?;
        }
        Ok(Object::freeze(&obj))
    }

    /// Publish the descriptor as `window.Platform`.
    pub fn expose(&self, win: &Window) -> Result<(), JsValue> {
        let obj = self.to_js_object()?;
        Reflect::set(win.as_ref(), &JsValue::from_str("Platform"), &obj)?;
        Ok(())
    }

    /// One-line summary for the console.
    pub fn summary(&self) -> String {
        #[cfg(feature = "serde_json")]
        {
            if let Ok(json) = serde_json::to_string(self) {
                return json;
            }
        }
        self.fields()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
