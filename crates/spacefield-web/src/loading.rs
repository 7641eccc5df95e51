use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spacefield::{LoadingAnimator, LoadingConfig, LoadingFrame, LoadingStatus, Rng, SplashField};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Event;

use crate::env;
use crate::listener::Listener;
use crate::runner::FrameLoop;

// ── Session state ────────────────────────────────────────────────────

/// Animator plus the splash layout it is shown with. Both depend on the
/// reduced-motion preference, so they change together.
struct LoadingState {
    animator: LoadingAnimator,
    splash: SplashField,
    rng: Rng,
    reduced_motion: bool,
}

impl LoadingState {
    fn new(config: LoadingConfig, reduced_motion: bool, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        Self {
            animator: LoadingAnimator::new(config, reduced_motion),
            splash: SplashField::generate(reduced_motion, &mut rng),
            rng,
            reduced_motion,
        }
    }

    /// Apply a preference change. The splash is regenerated only when the
    /// preference actually flips, so its layout stays put otherwise.
    fn set_reduced_motion(&mut self, enabled: bool) {
        if enabled == self.reduced_motion {
            return;
        }
        self.reduced_motion = enabled;
        self.animator.set_reduced_motion(enabled);
        self.splash = SplashField::generate(enabled, &mut self.rng);
        log::debug!("loading screen reduced motion: {}", enabled);
    }
}

// ── Completion timer ─────────────────────────────────────────────────

/// Handle and callback of one pending timeout.
struct TimerSlot<C> {
    handle: Option<i32>,
    callback: Option<C>,
}

impl<C> Default for TimerSlot<C> {
    fn default() -> Self {
        Self { handle: None, callback: None }
    }
}

impl<C> TimerSlot<C> {
    /// Store a new timeout, returning the one it replaces.
    fn arm(&mut self, handle: i32, callback: C) -> Option<(i32, C)> {
        let previous = self.disarm();
        self.handle = Some(handle);
        self.callback = Some(callback);
        previous
    }

    /// The timeout ran: forget the handle and hand back the spent callback.
    fn fired(&mut self) -> Option<C> {
        self.handle = None;
        self.callback.take()
    }

    /// Withdraw a pending timeout.
    fn disarm(&mut self) -> Option<(i32, C)> {
        let callback = self.callback.take();
        match (self.handle.take(), callback) {
            (Some(handle), Some(callback)) => Some((handle, callback)),
            _ => None,
        }
    }

    fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

/// One pending `setTimeout`, cleared on cancel or drop.
#[derive(Default)]
struct CompletionTimer {
    slot: RefCell<TimerSlot<Closure<dyn FnMut()>>>,
    /// Bumped on every schedule so a stale firing cannot reset a newer slot.
    generation: Cell<u32>,
}

impl CompletionTimer {
    fn schedule(self: &Rc<Self>, delay_ms: f64, fire: impl FnOnce() + 'static) -> Result<(), JsValue> {
        self.clear();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let timer: Weak<Self> = Rc::downgrade(self);
        let callback: Closure<dyn FnMut()> = Closure::once(move || {
            // Drop the spent closure at the end of this call, not at the next clear().
            let _spent = timer
                .upgrade()
                .filter(|t| t.generation.get() == generation)
                .and_then(|t| t.slot.try_borrow_mut().ok().and_then(|mut slot| slot.fired()));
            fire();
        });
        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms.max(0.0).round() as i32,
        )?;
        self.slot.borrow_mut().arm(handle, callback);
        Ok(())
    }

    fn clear(&self) {
        let pending = match self.slot.try_borrow_mut() {
            Ok(mut slot) => slot.disarm(),
            Err(_) => None,
        };
        if let Some((handle, _callback)) = pending {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    fn is_pending(&self) -> bool {
        self.slot.borrow().is_pending()
    }
}

fn report(on_progress: &js_sys::Function, frame: LoadingFrame) {
    let result = on_progress.call3(
        &JsValue::NULL,
        &JsValue::from(frame.percent),
        &JsValue::from(frame.step as u32),
        &JsValue::from_bool(frame.portal),
    );
    if let Err(err) = result {
        log::warn!("loading progress callback threw: {:?}", err);
    }
}

// ── JS surface ───────────────────────────────────────────────────────

/// Loading progress driver for the splash screen.
///
/// `start` reports `(percent, stepIndex, portalOpen)` to `onProgress` every
/// frame and calls `onComplete` exactly once, shortly after 100%. The
/// reduced-motion preference is followed live.
#[wasm_bindgen]
pub struct LoadingScreen {
    state: Rc<RefCell<LoadingState>>,
    frames: Option<FrameLoop>,
    timer: Rc<CompletionTimer>,
    _motion_listener: Option<Listener>,
}

#[wasm_bindgen]
impl LoadingScreen {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> LoadingScreen {
        let config = match config_json.as_deref() {
            None => LoadingConfig::default(),
            Some(json) => LoadingConfig::from_json(json).unwrap_or_else(|err| {
                log::warn!("invalid loading config, using defaults: {}", err);
                LoadingConfig::default()
            }),
        };
        let query = web_sys::window().and_then(|w| env::reduced_motion_query(&w));
        let reduced = query.as_ref().map(|q| q.matches()).unwrap_or(false);
        let state = Rc::new(RefCell::new(LoadingState::new(config, reduced, env::random_seed())));

        let motion_listener = query.and_then(|query| {
            let watched = Rc::clone(&state);
            let target = query.clone();
            let attached = Listener::attach(query.as_ref(), "change", move |_: Event| {
                if let Ok(mut state) = watched.try_borrow_mut() {
                    state.set_reduced_motion(target.matches());
                }
            });
            attached
                .map_err(|err| log::warn!("reduced-motion changes will be ignored: {}", err))
                .ok()
        });

        LoadingScreen {
            state,
            frames: None,
            timer: Rc::new(CompletionTimer::default()),
            _motion_listener: motion_listener,
        }
    }

    pub fn start(
        &mut self,
        on_progress: js_sys::Function,
        on_complete: js_sys::Function,
    ) -> Result<(), JsValue> {
        self.cancel();
        self.state.borrow_mut().animator.start(move || {
            if let Err(err) = on_complete.call0(&JsValue::NULL) {
                log::warn!("loading completion callback threw: {:?}", err);
            }
        });

        let state = Rc::clone(&self.state);
        let timer = Rc::clone(&self.timer);
        let frames = FrameLoop::start(move |now| {
            let status = state.borrow_mut().animator.tick(now);
            match status {
                LoadingStatus::Idle => false,
                LoadingStatus::Running(frame) => {
                    report(&on_progress, frame);
                    true
                }
                LoadingStatus::Finished { frame, complete_after_ms } => {
                    report(&on_progress, frame);
                    let state = Rc::clone(&state);
                    let scheduled = timer.schedule(complete_after_ms, move || {
                        // Release the borrow before handing control to JS.
                        let completion = state.borrow_mut().animator.take_completion();
                        if let Some(complete) = completion {
                            complete();
                        }
                    });
                    if let Err(err) = scheduled {
                        log::warn!("could not schedule loading completion: {:?}", err);
                    }
                    false
                }
            }
        })?;
        self.frames = Some(frames);
        log::debug!("loading started ({} ms minimum)", self.min_duration_ms());
        Ok(())
    }

    /// Stop the loop and drop any pending completion. `onComplete` will not fire.
    pub fn cancel(&mut self) {
        self.frames.take();
        self.timer.clear();
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.animator.cancel();
        }
    }

    /// Override the detected preference (the media query is also followed live).
    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, enabled: bool) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.set_reduced_motion(enabled);
        }
    }

    #[wasm_bindgen(js_name = reducedMotion)]
    pub fn reduced_motion(&self) -> bool {
        self.state.borrow().reduced_motion
    }

    #[wasm_bindgen(js_name = minDurationMs)]
    pub fn min_duration_ms(&self) -> f64 {
        self.state.borrow().animator.min_duration_ms()
    }

    /// Current step label, or the finished message once progress hits 100%.
    #[wasm_bindgen(js_name = statusText)]
    pub fn status_text(&self) -> String {
        self.state.borrow().animator.status_text().to_string()
    }

    /// True while the post-100% completion delay is running.
    #[wasm_bindgen(js_name = completionPending)]
    pub fn completion_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Star and particle layout for the splash markup, as JSON.
    #[wasm_bindgen(js_name = splashJson)]
    pub fn splash_json(&self) -> Result<String, JsValue> {
        self.state
            .borrow()
            .splash
            .to_json()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

impl Drop for LoadingScreen {
    fn drop(&mut self) {
        self.frames.take();
        self.timer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_motion_change_updates_splash_and_duration() {
        let mut state = LoadingState::new(LoadingConfig::default(), false, 7);
        assert!(state.splash.animated);
        assert_eq!(state.splash.stars.len(), SplashField::STARS);
        assert_eq!(state.animator.min_duration_ms(), 2600.0);

        state.set_reduced_motion(true);
        assert!(!state.splash.animated);
        assert_eq!(state.splash.stars.len(), SplashField::STARS_REDUCED);
        assert_eq!(state.splash.particles.len(), SplashField::PARTICLES_REDUCED);
        assert!((state.animator.min_duration_ms() - 1820.0).abs() < 1e-6);
        let json = state.splash.to_json().unwrap();
        assert!(json.contains("\"animated\":false"));

        state.set_reduced_motion(false);
        assert!(state.splash.animated);
        assert_eq!(state.splash.particles.len(), SplashField::PARTICLES);
    }

    #[test]
    fn unchanged_preference_keeps_layout() {
        let mut state = LoadingState::new(LoadingConfig::default(), true, 7);
        let before = state.splash.clone();
        state.set_reduced_motion(true);
        assert_eq!(state.splash, before);
    }

    #[test]
    fn fired_timer_forgets_handle_and_callback() {
        let mut slot = TimerSlot::default();
        assert!(slot.arm(3, "complete").is_none());
        assert!(slot.is_pending());
        assert_eq!(slot.fired(), Some("complete"));
        assert!(!slot.is_pending());
        // Nothing left to clear after firing.
        assert_eq!(slot.disarm(), None);
    }

    #[test]
    fn rearming_replaces_pending_timer() {
        let mut slot = TimerSlot::default();
        slot.arm(1, "first");
        assert_eq!(slot.arm(2, "second"), Some((1, "first")));
        assert_eq!(slot.disarm(), Some((2, "second")));
        assert!(!slot.is_pending());
    }
}
