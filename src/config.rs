//! Tunables for the loader and the platform adapter.
//!
//! Both configs default to the values the Number Blocks pages ship with. With
//! the `serde` feature they can be deserialized (missing keys fall back to the
//! defaults), which is how `install_platform_with_config` and
//! `run_loader_with_config` accept JSON.

/// Interactive controls that get touch feedback.
pub const CONTROL_SELECTORS: &[&str] = &[
    ".control-btn",
    ".num-btn",
    ".action-btn",
    ".nav-btn",
    ".home-btn",
    ".language-btn",
    ".say-number",
];

/// Containers that are allowed to scroll on their own.
pub const SCROLL_CONTAINERS: &[&str] = &[".blocks-container", ".quiz-area", ".games-grid"];

/// Two touch-ends closer than this (ms) are treated as a zoom double-tap.
pub const DOUBLE_TAP_WINDOW_MS: f64 = 300.0;

/// Delay (ms) before trusting `innerHeight` after a rotation.
pub const ORIENTATION_SETTLE_MS: i32 = 100;

/// What the body `touchmove` listener does outside scroll containers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OverscrollPolicy {
    /// Observe only; the browser bounce is left alone.
    #[default]
    Allow,
    /// Cancel moves that would bounce the body at a scroll boundary.
    PreventAtBoundary,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlatformConfig {
    pub control_selectors: Vec<String>,
    pub touch_active_class: String,
    pub scroll_containers: Vec<String>,
    pub double_tap_window_ms: f64,
    pub orientation_settle_ms: i32,
    pub overscroll: OverscrollPolicy,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            control_selectors: CONTROL_SELECTORS.iter().map(|s| s.to_string()).collect(),
            touch_active_class: "touch-active".to_string(),
            scroll_containers: SCROLL_CONTAINERS.iter().map(|s| s.to_string()).collect(),
            double_tap_window_ms: DOUBLE_TAP_WINDOW_MS,
            orientation_settle_ms: ORIENTATION_SETTLE_MS,
            overscroll: OverscrollPolicy::Allow,
        }
    }
}

impl PlatformConfig {
    /// Selector list joined for `querySelectorAll` / `closest`.
    pub fn control_selector(&self) -> String {
        self.control_selectors.join(", ")
    }

    pub fn scroll_container_selector(&self) -> String {
        self.scroll_containers.join(", ")
    }
}

/// A `<meta>` tag the loader adds when the page lacks one with the same key.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct MetaTag {
    /// Attribute that identifies the tag, usually `name`.
    #[cfg_attr(feature = "serde", serde(default = "default_meta_attr"))]
    pub attr: String,
    pub name: String,
    pub content: String,
}

#[cfg(feature = "serde")]
fn default_meta_attr() -> String {
    "name".to_string()
}

impl MetaTag {
    pub fn named(name: &str, content: &str) -> Self {
        Self { attr: "name".to_string(), name: name.to_string(), content: content.to_string() }
    }

    /// Selector matching any existing tag with this key, whatever its content.
    pub fn selector(&self) -> String {
        format!("meta[{}=\"{}\"]", self.attr, self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoaderConfig {
    pub stylesheet: String,
    pub script: String,
    pub manifest: String,
    pub touch_icon: String,
    pub meta_tags: Vec<MetaTag>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            stylesheet: "platform.css".to_string(),
            script: "platform.js".to_string(),
            manifest: "manifest.json".to_string(),
            touch_icon: "icons/icon.svg".to_string(),
            meta_tags: vec![
                MetaTag::named("apple-mobile-web-app-capable", "yes"),
                MetaTag::named("apple-mobile-web-app-status-bar-style", "black-translucent"),
                MetaTag::named("apple-mobile-web-app-title", "Number Blocks"),
                MetaTag::named("mobile-web-app-capable", "yes"),
                MetaTag::named("theme-color", "#667eea"),
            ],
        }
    }
}
