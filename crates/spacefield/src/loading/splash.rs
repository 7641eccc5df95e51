//! Decorative star and particle field behind the loading progress.
//! Generated once per loading session; the host lays the elements out.

use serde::Serialize;

use crate::core::rng::Rng;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplashStar {
    /// Horizontal position, percent of the viewport.
    pub left: f32,
    /// Vertical position, percent of the viewport.
    pub top: f32,
    /// Diameter in px.
    pub size: f32,
    /// Twinkle period in seconds.
    pub duration: f32,
    pub delay: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplashParticle {
    pub left: f32,
    pub top: f32,
    /// Rise period in seconds.
    pub duration: f32,
    pub delay: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplashField {
    pub stars: Vec<SplashStar>,
    pub particles: Vec<SplashParticle>,
    /// False under reduced motion: the field is drawn static.
    pub animated: bool,
}

impl SplashField {
    pub const STARS: usize = 120;
    pub const STARS_REDUCED: usize = 60;
    pub const PARTICLES: usize = 18;
    pub const PARTICLES_REDUCED: usize = 8;

    pub fn generate(reduced_motion: bool, rng: &mut Rng) -> Self {
        let (star_count, particle_count) = if reduced_motion {
            (Self::STARS_REDUCED, Self::PARTICLES_REDUCED)
        } else {
            (Self::STARS, Self::PARTICLES)
        };
        let stars = (0..star_count)
            .map(|_| SplashStar {
                left: rng.range(0.0, 100.0),
                top: rng.range(0.0, 100.0),
                size: rng.range(1.0, 3.0),
                duration: rng.range(2.0, 5.0),
                delay: rng.range(0.0, 2.0),
            })
            .collect();
        let particles = (0..particle_count)
            .map(|_| SplashParticle {
                left: rng.range(0.0, 100.0),
                top: rng.range(0.0, 100.0),
                duration: rng.range(3.0, 7.0),
                delay: rng.range(0.0, 3.0),
            })
            .collect();
        Self {
            stars,
            particles,
            animated: !reduced_motion,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
