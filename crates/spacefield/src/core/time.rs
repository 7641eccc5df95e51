/// Per-frame animation clock.
///
/// The backdrop does not use wall-clock deltas for motion: every display
/// frame advances the accumulator by a fixed step scaled by the speed knob,
/// so a dropped frame slows the animation instead of making it jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Accumulated animation time. Kept in f64: an f32 stops moving once its
    /// ULP exceeds the step, which a page left open for a few days reaches.
    elapsed: f64,
    /// Increment applied on each frame.
    step: f32,
    /// Frames advanced since construction.
    frames: u64,
}

impl FrameClock {
    /// Base increment per frame at speed 1.0.
    pub const STEP: f32 = 0.8;
    /// Base increment per frame when the user prefers reduced motion.
    pub const REDUCED_STEP: f32 = 0.2;

    pub fn new(speed: f32, reduced_motion: bool) -> Self {
        Self {
            elapsed: 0.0,
            step: Self::step_for(speed, reduced_motion),
            frames: 0,
        }
    }

    fn step_for(speed: f32, reduced_motion: bool) -> f32 {
        let base = if reduced_motion { Self::REDUCED_STEP } else { Self::STEP };
        base * speed
    }

    /// Re-derive the step after a reduced-motion change. Elapsed time is kept.
    pub fn retune(&mut self, speed: f32, reduced_motion: bool) {
        self.step = Self::step_for(speed, reduced_motion);
    }

    /// Advance by one frame. Returns the new elapsed value.
    pub fn advance(&mut self) -> f64 {
        self.elapsed += self.step as f64;
        self.frames += 1;
        self.elapsed
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// The increment applied per frame.
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_fixed_step() {
        let mut clock = FrameClock::new(1.0, false);
        clock.advance();
        clock.advance();
        assert!((clock.elapsed() - 1.6).abs() < 1e-6);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn speed_scales_step() {
        let clock = FrameClock::new(2.0, false);
        assert!((clock.step() - 1.6).abs() < 1e-6);
    }

    #[test]
    fn reduced_motion_slows_clock() {
        let normal = FrameClock::new(1.0, false);
        let reduced = FrameClock::new(1.0, true);
        assert!(reduced.step() < normal.step());
    }

    #[test]
    fn retune_keeps_elapsed() {
        let mut clock = FrameClock::new(1.0, false);
        clock.advance();
        clock.retune(1.0, true);
        assert!((clock.elapsed() - 0.8).abs() < 1e-6);
        clock.advance();
        assert!((clock.elapsed() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn keeps_advancing_after_days_of_frames() {
        for (reduced, start) in [(true, 4_200_000.0), (false, 16_800_000.0), (false, 1.0e9)] {
            let mut clock = FrameClock::new(1.0, reduced);
            clock.elapsed = start;
            for _ in 0..1000 {
                clock.advance();
            }
            let expected = start + 1000.0 * clock.step() as f64;
            assert!(
                (clock.elapsed() - expected).abs() < 1e-3,
                "reduced={} start={} elapsed={}",
                reduced,
                start,
                clock.elapsed()
            );
        }
    }
}
