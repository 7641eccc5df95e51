//! Splash-screen progress animator.
//!
//! Driven by the host's frame loop while loading is shown. Progress follows
//! an eased curve over a minimum duration with a small time-based jitter,
//! never moves backwards, and reports 100 only once the minimum duration has
//! elapsed. After that the host waits the completion delay and calls
//! [`LoadingAnimator::complete`], which fires the callback exactly once.

use crate::api::config::LoadingConfig;

/// What the splash screen should show this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingFrame {
    /// 0 - 100.
    pub percent: u8,
    /// Index into the status strings.
    pub step: usize,
    /// Latched once progress reaches 95%.
    pub portal: bool,
}

/// Result of one animator tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadingStatus {
    /// Not started, or already past 100%. The host should stop its loop.
    Idle,
    Running(LoadingFrame),
    /// First frame at 100%. Schedule `complete()` after `complete_after_ms`.
    Finished { frame: LoadingFrame, complete_after_ms: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
    Completed,
}

pub struct LoadingAnimator {
    config: LoadingConfig,
    reduced_motion: bool,
    phase: Phase,
    started_at: Option<f64>,
    frame: LoadingFrame,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl LoadingAnimator {
    /// Progress at or above this percentage opens the portal.
    pub const PORTAL_PERCENT: u8 = 95;
    /// Jitter period divisor (ms) and amplitude divisor.
    const JITTER_PERIOD: f64 = 280.0;
    const JITTER_SCALE: f64 = 200.0;

    pub fn new(config: LoadingConfig, reduced_motion: bool) -> Self {
        Self {
            config: config.sanitized(),
            reduced_motion,
            phase: Phase::Idle,
            started_at: None,
            frame: LoadingFrame { percent: 0, step: 0, portal: false },
            on_complete: None,
        }
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
    }

    pub fn min_duration_ms(&self) -> f64 {
        self.config.effective_min_duration_ms(self.reduced_motion)
    }

    pub fn config(&self) -> &LoadingConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn frame(&self) -> LoadingFrame {
        self.frame
    }

    /// Status string for the current step.
    pub fn status_text(&self) -> &str {
        &self.config.steps[self.frame.step.min(self.config.steps.len() - 1)]
    }

    /// Begin a new loading session. Any previous callback is dropped unfired.
    /// The clock starts on the first tick.
    pub fn start(&mut self, on_complete: impl FnOnce() + 'static) {
        self.phase = Phase::Running;
        self.started_at = None;
        self.frame = LoadingFrame { percent: 0, step: 0, portal: false };
        self.on_complete = Some(Box::new(on_complete));
        log::debug!("loading started (min {}ms)", self.min_duration_ms());
    }

    /// Abandon the session without firing the callback.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
        self.on_complete = None;
    }

    pub fn tick(&mut self, now_ms: f64) -> LoadingStatus {
        if self.phase != Phase::Running {
            return LoadingStatus::Idle;
        }
        let started = *self.started_at.get_or_insert(now_ms);
        let elapsed = (now_ms - started).max(0.0);
        let t = (elapsed / self.min_duration_ms()).min(1.0);

        // Under 1% wobble so the bar doesn't look mechanical.
        let jitter = ((now_ms / Self::JITTER_PERIOD).sin() + 1.0) / Self::JITTER_SCALE;
        let eased = (self.config.easing.apply(t as f32) as f64 + jitter).min(1.0);

        let mut percent = (eased * 100.0).round() as u8;
        if t < 1.0 {
            percent = percent.min(99);
        }
        let steps = self.config.steps.len();
        let step = ((eased * steps as f64).floor() as usize).min(steps - 1);

        let frame = &mut self.frame;
        frame.percent = frame.percent.max(percent);
        frame.step = frame.step.max(step);
        frame.portal |= frame.percent >= Self::PORTAL_PERCENT;

        if self.frame.percent < 100 {
            return LoadingStatus::Running(self.frame);
        }
        self.phase = Phase::Finished;
        self.frame.step = steps - 1;
        LoadingStatus::Finished {
            frame: self.frame,
            complete_after_ms: self.config.completion_delay_ms,
        }
    }

    /// Take the completion callback once progress has finished.
    /// Returns `None` before 100% and on every call after the first.
    pub fn take_completion(&mut self) -> Option<Box<dyn FnOnce()>> {
        if self.phase != Phase::Finished {
            return None;
        }
        self.phase = Phase::Completed;
        log::info!("loading complete");
        self.on_complete.take()
    }

    /// Fire the completion callback. True only on the call that fired it.
    pub fn complete(&mut self) -> bool {
        match self.take_completion() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, move || c.set(c.get() + 1))
    }

    fn run_to_finish(anim: &mut LoadingAnimator, start: f64) -> (f64, Vec<LoadingFrame>) {
        let mut frames = Vec::new();
        let mut now = start;
        loop {
            match anim.tick(now) {
                LoadingStatus::Running(f) => frames.push(f),
                LoadingStatus::Finished { frame, .. } => {
                    frames.push(frame);
                    return (now, frames);
                }
                LoadingStatus::Idle => panic!("went idle while running"),
            }
            now += 16.7;
        }
    }

    #[test]
    fn idle_until_started() {
        let mut anim = LoadingAnimator::new(LoadingConfig::default(), false);
        assert_eq!(anim.tick(0.0), LoadingStatus::Idle);
        assert!(!anim.complete());
    }

    #[test]
    fn progress_is_monotone_and_ends_at_100_after_min_duration() {
        let mut anim = LoadingAnimator::new(LoadingConfig::default(), false);
        anim.start(|| {});
        let (finished_at, frames) = run_to_finish(&mut anim, 1000.0);
        assert!(finished_at - 1000.0 >= 2600.0);
        for pair in frames.windows(2) {
            assert!(pair[1].percent >= pair[0].percent);
            assert!(pair[1].step >= pair[0].step);
        }
        assert!(frames[..frames.len() - 1].iter().all(|f| f.percent < 100));
        assert_eq!(frames.last().unwrap().percent, 100);
        assert_eq!(frames.last().unwrap().step, 4);
    }

    #[test]
    fn portal_latches_at_95() {
        let mut anim = LoadingAnimator::new(LoadingConfig::default(), false);
        anim.start(|| {});
        let (_, frames) = run_to_finish(&mut anim, 0.0);
        let first = frames.iter().position(|f| f.portal).unwrap();
        assert!(frames[first].percent >= 95);
        assert!(frames[first..].iter().all(|f| f.portal));
        assert!(frames[..first].iter().all(|f| f.percent < 95));
    }

    #[test]
    fn callback_fires_exactly_once_after_100() {
        let (count, cb) = counter();
        let mut anim = LoadingAnimator::new(LoadingConfig::default(), false);
        anim.start(cb);

        anim.tick(0.0);
        assert!(!anim.complete(), "must not complete before 100%");
        assert_eq!(count.get(), 0);

        let (now, _) = run_to_finish(&mut anim, 16.0);
        assert_eq!(anim.phase(), Phase::Finished);
        assert_eq!(anim.tick(now + 16.0), LoadingStatus::Idle);

        assert!(anim.complete());
        assert!(!anim.complete());
        assert_eq!(count.get(), 1);
        assert_eq!(anim.phase(), Phase::Completed);
    }

    #[test]
    fn finished_reports_completion_delay() {
        let mut anim = LoadingAnimator::new(
            LoadingConfig { completion_delay_ms: 250.0, ..Default::default() },
            false,
        );
        anim.start(|| {});
        let mut now = 0.0;
        loop {
            if let LoadingStatus::Finished { complete_after_ms, .. } = anim.tick(now) {
                assert_eq!(complete_after_ms, 250.0);
                break;
            }
            now += 20.0;
        }
    }

    #[test]
    fn reduced_motion_finishes_sooner() {
        let mut anim = LoadingAnimator::new(LoadingConfig::default(), true);
        assert!(anim.min_duration_ms() <= 1820.0);
        anim.start(|| {});
        let (finished_at, _) = run_to_finish(&mut anim, 0.0);
        assert!(finished_at >= anim.min_duration_ms());
        assert!(finished_at < 2600.0);
    }

    #[test]
    fn restart_begins_new_session() {
        let (first, cb1) = counter();
        let (second, cb2) = counter();
        let mut anim = LoadingAnimator::new(LoadingConfig::default(), false);
        anim.start(cb1);
        run_to_finish(&mut anim, 0.0);
        anim.start(cb2);
        assert_eq!(anim.frame().percent, 0);
        run_to_finish(&mut anim, 10_000.0);
        assert!(anim.complete());
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn cancel_drops_callback() {
        let (count, cb) = counter();
        let mut anim = LoadingAnimator::new(LoadingConfig::default(), false);
        anim.start(cb);
        anim.tick(0.0);
        anim.cancel();
        assert_eq!(anim.tick(5000.0), LoadingStatus::Idle);
        assert!(!anim.complete());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn status_text_follows_step() {
        let mut anim = LoadingAnimator::new(LoadingConfig::default(), false);
        anim.start(|| {});
        anim.tick(0.0);
        assert_eq!(anim.status_text(), "Initializing virtual assistant…");
        run_to_finish(&mut anim, 16.0);
        assert_eq!(anim.status_text(), "Almost ready for launch…");
    }
}
