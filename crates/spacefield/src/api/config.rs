use serde::{Deserialize, Serialize};

use crate::extensions::easing::Easing;

/// Which backdrop the frame loop draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackdropStyle {
    /// Layered parallax stars, nebula fog, planets and comets.
    #[default]
    Space,
    /// A single layer of slowly rising, flickering stars.
    Drift,
}

/// Configuration for the space backdrop, supplied once by the embedding page.
///
/// Every field is optional in JSON (camelCase keys). Consumers call
/// [`BackdropConfig::sanitized`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackdropConfig {
    /// Star density multiplier. 0.5 = sparse, 1 = normal, 2 = dense.
    pub density: f32,
    /// Animation speed multiplier. 0.5 = slow, 1 = normal, 2 = fast.
    pub speed: f32,
    /// Base accent hue in degrees (200 = blue, 280 = purple).
    pub accent_hue: f32,
    /// Render nebula fog.
    pub nebula: bool,
    /// Render planets.
    pub planets: bool,
    /// Render comets / shooting stars.
    pub comets: bool,
    /// Give planets a chance of a tilted ring.
    pub ringed_planets: bool,
    pub style: BackdropStyle,
    /// Fixed RNG seed. `None` lets the host pick one at mount.
    pub seed: Option<u64>,
}

impl BackdropConfig {
    pub const DENSITY_RANGE: (f32, f32) = (0.1, 4.0);
    pub const SPEED_RANGE: (f32, f32) = (0.05, 5.0);

    /// Parse from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Copy with every numeric knob clamped into its supported range.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let clamp = |v: f32, (lo, hi): (f32, f32), fallback: f32| {
            if v.is_finite() { v.clamp(lo, hi) } else { fallback }
        };
        Self {
            density: clamp(self.density, Self::DENSITY_RANGE, defaults.density),
            speed: clamp(self.speed, Self::SPEED_RANGE, defaults.speed),
            accent_hue: if self.accent_hue.is_finite() {
                self.accent_hue.rem_euclid(360.0)
            } else {
                defaults.accent_hue
            },
            ..self.clone()
        }
    }
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            speed: 1.0,
            accent_hue: 220.0,
            nebula: true,
            planets: true,
            comets: true,
            ringed_planets: false,
            style: BackdropStyle::Space,
            seed: None,
        }
    }
}

/// Status lines shown on the splash screen while loading.
pub const DEFAULT_LOADING_STEPS: [&str; 5] = [
    "Initializing virtual assistant…",
    "Connecting to the cosmos…",
    "Loading stellar portfolio…",
    "Preparing magical experience…",
    "Almost ready for launch…",
];

/// Configuration for the loading progress animator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadingConfig {
    /// The splash stays up at least this long (ms), before reduced-motion scaling.
    pub min_duration_ms: f64,
    /// Status strings; the current one is picked from eased progress.
    pub steps: Vec<String>,
    /// Delay between reaching 100% and the completion callback (ms).
    pub completion_delay_ms: f64,
    /// Progress curve.
    pub easing: Easing,
}

impl LoadingConfig {
    /// Hard floor on the minimum duration (ms).
    pub const MIN_DURATION_FLOOR_MS: f64 = 800.0;
    /// Duration multiplier under reduced motion.
    pub const REDUCED_MOTION_FACTOR: f64 = 0.7;

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Copy with non-finite or negative timings reset and an empty step list replaced.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let ms = |v: f64, fallback: f64| if v.is_finite() && v >= 0.0 { v } else { fallback };
        Self {
            min_duration_ms: ms(self.min_duration_ms, defaults.min_duration_ms),
            completion_delay_ms: ms(self.completion_delay_ms, defaults.completion_delay_ms),
            steps: if self.steps.is_empty() { defaults.steps } else { self.steps.clone() },
            easing: self.easing,
        }
    }

    /// Effective minimum duration for the given motion preference.
    pub fn effective_min_duration_ms(&self, reduced_motion: bool) -> f64 {
        let scaled = if reduced_motion {
            self.min_duration_ms * Self::REDUCED_MOTION_FACTOR
        } else {
            self.min_duration_ms
        };
        scaled.max(Self::MIN_DURATION_FLOOR_MS)
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: 2600.0,
            steps: DEFAULT_LOADING_STEPS.iter().map(|s| s.to_string()).collect(),
            completion_delay_ms: 500.0,
            easing: Easing::CubicOut,
        }
    }
}
