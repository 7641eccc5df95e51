// extensions/easing.rs
//
// Pure easing curves for progress animation.
// No dependencies on the scene, just math.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Constant velocity (no easing).
    Linear,
    /// Slow end.
    QuadOut,
    /// Stronger slow end.
    #[default]
    CubicOut,
    /// Very strong slow end.
    QuartOut,
    /// Slow start and end.
    SineInOut,
    /// Dramatic slow end.
    ExpoOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// Every curve here is monotone and maps 0 → 0 and 1 → 1.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f32.powf(-10.0 * t) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::QuadOut,
        Easing::CubicOut,
        Easing::QuartOut,
        Easing::SineInOut,
        Easing::ExpoOut,
    ];

    #[test]
    fn linear_endpoints() {
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn cubic_out_front_loads_progress() {
        let mid = Easing::CubicOut.apply(0.5);
        assert!((mid - 0.875).abs() < 1e-6, "CubicOut at 0.5 should be 0.875, got {}", mid);
    }

    #[test]
    fn every_curve_hits_endpoints() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-3, "{:?} at 0", e);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{:?} at 1", e);
        }
    }

    #[test]
    fn every_curve_is_monotone() {
        for e in ALL {
            let mut prev = e.apply(0.0);
            for i in 1..=100 {
                let v = e.apply(i as f32 / 100.0);
                assert!(v >= prev, "{:?} decreased at step {}", e, i);
                prev = v;
            }
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(2.0), 1.0);
        assert_eq!(Easing::CubicOut.apply(-1.0), 0.0);
    }
}
