//! Browser environment helpers shared by the backdrop and the loading screen.

use std::fmt;

use wasm_bindgen::JsValue;
use web_sys::{MediaQueryList, Window};

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Why a view could not be mounted. Mount failures are logged, never thrown.
#[derive(Debug)]
pub enum MountError {
    NoWindow,
    /// The canvas has no 2D context (unsupported, or already claimed by WebGL).
    NoContext,
    /// The canvas is detached and there is no document body to measure.
    NoContainer,
    /// A browser API call rejected.
    Browser(String),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::NoWindow => write!(f, "no window available"),
            MountError::NoContext => write!(f, "2D canvas context unavailable"),
            MountError::NoContainer => write!(f, "canvas has no container to measure"),
            MountError::Browser(msg) => write!(f, "browser call failed: {}", msg),
        }
    }
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        MountError::Browser(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub fn window() -> Result<Window, MountError> {
    web_sys::window().ok_or(MountError::NoWindow)
}

/// Monotonic milliseconds from `performance.now()`, falling back to `Date.now()`.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

pub fn reduced_motion_query(window: &Window) -> Option<MediaQueryList> {
    window.match_media(REDUCED_MOTION_QUERY).ok().flatten()
}

/// Fresh seed per page load so production layouts stay unpredictable.
pub fn random_seed() -> u64 {
    let noise = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64; // 2^53
    noise ^ now_ms().to_bits()
}
