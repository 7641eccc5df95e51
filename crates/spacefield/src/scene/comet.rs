//! Comets and the spawner state machine that paces them.
//!
//! At most one comet is in flight. The spawner alternates between waiting
//! for a wall-clock timestamp and flying a single comet until it leaves the
//! viewport or burns out.

use glam::Vec2;

use crate::core::rng::Rng;

/// Delay before the first comet of a scene, in ms at speed 1.0.
pub const FIRST_SPAWN_DELAY_MS: (f32, f32) = (3000.0, 8000.0);
/// Delay between a comet retiring and the next spawn, in ms at speed 1.0.
pub const RESPAWN_DELAY_MS: (f32, f32) = (4000.0, 12000.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Comet {
    pub pos: Vec2,
    /// Pixels per frame.
    pub velocity: Vec2,
    /// Remaining life, 1.0 → 0.0.
    pub life: f32,
    /// Trail length in pixels.
    pub trail: f32,
    pub hue: f32,
}

impl Comet {
    pub const HUE_SPREAD: f32 = 30.0;
    pub const HEAD_RADIUS: f32 = 2.5;
    pub const TRAIL_WIDTH: f32 = 2.0;
    /// Life lost per frame at speed 1.0.
    pub const DECAY: f32 = 0.01;

    /// Spawn just outside the top edge (half the time) or the left edge.
    pub fn spawn(size: Vec2, speed: f32, accent_hue: f32, rng: &mut Rng) -> Self {
        let from_top = rng.chance(0.5);
        let pos = if from_top {
            Vec2::new(rng.range(-size.x * 0.2, size.x * 0.8), -size.y * 0.2)
        } else {
            Vec2::new(-size.x * 0.2, rng.range(-size.y * 0.2, size.y * 0.8))
        };
        let velocity = Vec2::new(rng.range(3.0, 6.0), rng.range(2.0, 4.0)) * speed;
        Self {
            pos,
            velocity,
            life: 1.0,
            trail: rng.range(80.0, 160.0),
            hue: (accent_hue + rng.range(-Self::HUE_SPREAD, Self::HUE_SPREAD)).rem_euclid(360.0),
        }
    }

    pub fn advance(&mut self, speed: f32) {
        self.pos += self.velocity;
        self.life -= Self::DECAY * speed;
    }

    /// Past the right or bottom edge by more than the trail, or burnt out.
    pub fn is_spent(&self, size: Vec2) -> bool {
        !self.pos.is_finite()
            || self.pos.x > size.x + self.trail
            || self.pos.y > size.y + self.trail
            || self.life <= 0.0
    }

    /// End of the trail: back from the head along the direction of travel.
    pub fn tail(&self) -> Vec2 {
        self.pos - self.velocity.normalize_or_zero() * self.trail
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpawnerState {
    /// Waiting until the timestamp (ms).
    Idle { next_spawn_ms: f64 },
    Active(Comet),
}

#[derive(Debug, Clone)]
pub struct CometSpawner {
    state: SpawnerState,
    speed: f32,
}

impl CometSpawner {
    /// Start idle, with the first comet a few seconds out.
    pub fn new(now_ms: f64, speed: f32, rng: &mut Rng) -> Self {
        let delay = rng.range(FIRST_SPAWN_DELAY_MS.0, FIRST_SPAWN_DELAY_MS.1) / speed;
        Self {
            state: SpawnerState::Idle { next_spawn_ms: now_ms + delay as f64 },
            speed,
        }
    }

    pub fn state(&self) -> &SpawnerState {
        &self.state
    }

    pub fn active(&self) -> Option<&Comet> {
        match &self.state {
            SpawnerState::Active(comet) => Some(comet),
            SpawnerState::Idle { .. } => None,
        }
    }

    /// Timestamp of the next spawn while idle.
    pub fn next_spawn_ms(&self) -> Option<f64> {
        match self.state {
            SpawnerState::Idle { next_spawn_ms } => Some(next_spawn_ms),
            SpawnerState::Active(_) => None,
        }
    }

    /// Idle → Active once `now_ms` reaches the scheduled timestamp.
    /// Returns true when a comet was spawned.
    pub fn poll(&mut self, now_ms: f64, size: Vec2, accent_hue: f32, rng: &mut Rng) -> bool {
        match self.state {
            SpawnerState::Idle { next_spawn_ms } if now_ms >= next_spawn_ms => {
                let comet = Comet::spawn(size, self.speed, accent_hue, rng);
                log::debug!("comet spawned at ({:.0}, {:.0})", comet.pos.x, comet.pos.y);
                self.state = SpawnerState::Active(comet);
                true
            }
            _ => false,
        }
    }

    /// Move the active comet one frame; Active → Idle when it is spent.
    /// Returns true when the comet retired this frame.
    pub fn advance(&mut self, now_ms: f64, size: Vec2, rng: &mut Rng) -> bool {
        let SpawnerState::Active(comet) = &mut self.state else {
            return false;
        };
        comet.advance(self.speed);
        if !comet.is_spent(size) {
            return false;
        }
        let delay = rng.range(RESPAWN_DELAY_MS.0, RESPAWN_DELAY_MS.1) / self.speed;
        self.state = SpawnerState::Idle { next_spawn_ms: now_ms + delay as f64 };
        log::debug!("comet retired, next in {:.0}ms", delay);
        true
    }
}
