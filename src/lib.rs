//! Number Blocks platform layer.
//!
//! Makes the number-learning game behave like an installed app on iPad and
//! iPhone while staying usable in desktop browsers. Two entrypoints, called in
//! order by the page:
//!
//! - [`run_loader`]: injects the platform stylesheet/script, PWA manifest,
//!   touch icon and web-app meta tags, and locks viewport scaling.
//! - [`install_platform`]: detects the platform, publishes `window.Platform`,
//!   tags `<body>` and registers the touch/zoom/viewport/speech fixes.

use wasm_bindgen::prelude::*;

mod adapter;
pub mod config;
mod dom;
pub mod gestures;
pub mod loader;
mod log;
pub mod platform;
pub mod speech;
pub mod touch_feedback;
pub mod viewport;

#[cfg(feature = "serde_json")]
pub use adapter::install_platform_with_config;
pub use adapter::{install_platform, install_platform_config, platform_descriptor};
pub use config::{LoaderConfig, MetaTag, OverscrollPolicy, PlatformConfig};
#[cfg(feature = "serde_json")]
pub use loader::run_loader_with_config;
pub use loader::run_loader;
pub use platform::{EnvSignals, Platform};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
