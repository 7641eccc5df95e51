use std::cell::RefCell;
use std::rc::Rc;

use spacefield::{Backdrop, BackdropConfig, InputEvent, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlCanvasElement, MouseEvent, ResizeObserver, TouchEvent, Window};

use crate::canvas::CanvasSurface;
use crate::env::{self, MountError};
use crate::listener::Listener;
use crate::runner::FrameLoop;

// ── Container resize ─────────────────────────────────────────────────

/// Watches the container for layout size changes the window never hears about.
struct ResizeWatch {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut()>,
}

impl ResizeWatch {
    fn observe(target: &Element, handler: impl FnMut() + 'static) -> Result<Self, MountError> {
        let callback = Closure::<dyn FnMut()>::new(handler);
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(target);
        Ok(Self { observer, _callback: callback })
    }
}

impl Drop for ResizeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

// ── Stage ────────────────────────────────────────────────────────────

/// Everything a frame needs, shared between the loop and the listeners.
struct Stage {
    backdrop: Backdrop,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    /// Element whose size the canvas fills.
    container: Element,
    sizes: SizeTracker,
}

impl Stage {
    /// Convert client coordinates to a normalized canvas position.
    fn pointer(&mut self, client_x: f64, client_y: f64) {
        let rect = self.canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let x = (client_x - rect.left()) / rect.width();
        let y = (client_y - rect.top()) / rect.height();
        self.backdrop.push_input(InputEvent::PointerMove { x: x as f32, y: y as f32 });
    }

    fn resize(&mut self, window: &Window) {
        let Some(viewport) = self.sizes.update(measure(window, &self.container)) else {
            return;
        };
        if let Err(err) = self.surface.configure(&self.canvas, &viewport) {
            log::warn!("backdrop resize failed: {}", err);
            return;
        }
        self.backdrop.push_input(InputEvent::Resize {
            width: viewport.width,
            height: viewport.height,
            dpr: viewport.dpr,
        });
    }

    fn draw(&mut self, now_ms: f64) {
        let Stage { backdrop, surface, .. } = self;
        backdrop.tick(now_ms, surface);
    }
}

/// Filters resize notifications down to real size changes. The observer
/// reports once on attach, and window `resize` and the observer often both
/// fire for the same change.
struct SizeTracker {
    last: Viewport,
}

impl SizeTracker {
    fn new(initial: Viewport) -> Self {
        Self { last: initial }
    }

    /// The new viewport if it differs from the last one seen.
    fn update(&mut self, measured: Viewport) -> Option<Viewport> {
        if measured == self.last {
            return None;
        }
        self.last = measured;
        Some(measured)
    }
}

/// Measure the container, not the canvas: the canvas's own layout size is
/// whatever `CanvasSurface::configure` last pinned.
fn measure(window: &Window, container: &Element) -> Viewport {
    Viewport::new(
        container.client_width() as f32,
        container.client_height() as f32,
        window.device_pixel_ratio() as f32,
    )
}

fn container_of(window: &Window, canvas: &HtmlCanvasElement) -> Result<Element, MountError> {
    if let Some(parent) = canvas.parent_element() {
        return Ok(parent);
    }
    window
        .document()
        .and_then(|d| d.body())
        .map(Element::from)
        .ok_or(MountError::NoContainer)
}

// ── Mounting ─────────────────────────────────────────────────────────

/// A live backdrop. Dropping it unsubscribes every listener, then cancels the loop.
struct Mounted {
    listeners: Vec<Listener>,
    /// `None` where `ResizeObserver` is unavailable; window `resize` still applies.
    resize_watch: Option<ResizeWatch>,
    frames: FrameLoop,
    stage: Rc<RefCell<Stage>>,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.listeners.clear();
        self.resize_watch.take();
        self.frames.cancel();
        log::info!("backdrop unmounted");
    }
}

fn mount(canvas: HtmlCanvasElement, config: BackdropConfig) -> Result<Mounted, MountError> {
    let window = env::window()?;
    let surface = CanvasSurface::from_canvas(&canvas)?;
    let reduced_query = env::reduced_motion_query(&window);
    let reduced = reduced_query.as_ref().map(|q| q.matches()).unwrap_or(false);

    let container = container_of(&window, &canvas)?;
    let viewport = measure(&window, &container);
    surface.configure(&canvas, &viewport)?;

    let config = BackdropConfig {
        seed: config.seed.or_else(|| Some(env::random_seed())),
        ..config
    };
    let backdrop = Backdrop::new(config, viewport, reduced, env::now_ms());
    let stage = Rc::new(RefCell::new(Stage { backdrop, surface, canvas, container, sizes: SizeTracker::new(viewport) }));

    let target: &EventTarget = window.as_ref();
    let mut listeners = Vec::with_capacity(4);

    let moved = Rc::clone(&stage);
    listeners.push(Listener::attach(target, "mousemove", move |event: Event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            moved.borrow_mut().pointer(mouse.client_x() as f64, mouse.client_y() as f64);
        }
    })?);

    let touched = Rc::clone(&stage);
    listeners.push(Listener::attach(target, "touchmove", move |event: Event| {
        let touch = event.dyn_ref::<TouchEvent>().and_then(|t| t.touches().get(0));
        if let Some(touch) = touch {
            touched.borrow_mut().pointer(touch.client_x() as f64, touch.client_y() as f64);
        }
    })?);

    let resized = Rc::clone(&stage);
    let resize_window = window.clone();
    listeners.push(Listener::attach(target, "resize", move |_: Event| {
        resized.borrow_mut().resize(&resize_window);
    })?);

    let observed = Rc::clone(&stage);
    let observe_window = window.clone();
    let container = stage.borrow().container.clone();
    let resize_watch = match ResizeWatch::observe(&container, move || {
        observed.borrow_mut().resize(&observe_window);
    }) {
        Ok(watch) => Some(watch),
        Err(err) => {
            log::warn!("container resize tracking unavailable: {}", err);
            None
        }
    };

    if let Some(query) = reduced_query {
        let toggled = Rc::clone(&stage);
        let watched = query.clone();
        listeners.push(Listener::attach(query.as_ref(), "change", move |_: Event| {
            toggled
                .borrow_mut()
                .backdrop
                .push_input(InputEvent::ReducedMotion { enabled: watched.matches() });
        })?);
    }

    let drawn = Rc::clone(&stage);
    let frames = FrameLoop::start(move |now| {
        drawn.borrow_mut().draw(now);
        true
    })?;

    Ok(Mounted { listeners, resize_watch, frames, stage })
}

fn parse_config(json: Option<&str>) -> BackdropConfig {
    match json {
        None => BackdropConfig::default(),
        Some(json) => BackdropConfig::from_json(json).unwrap_or_else(|err| {
            log::warn!("invalid backdrop config, using defaults: {}", err);
            BackdropConfig::default()
        }),
    }
}

// ── JS surface ───────────────────────────────────────────────────────

/// Animated space backdrop bound to one canvas.
///
/// Construction never throws: if the canvas cannot provide a 2D context the
/// backdrop stays inert and `isActive()` reports false.
#[wasm_bindgen]
pub struct SpaceBackdrop {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl SpaceBackdrop {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> SpaceBackdrop {
        let config = parse_config(config_json.as_deref());
        match mount(canvas, config) {
            Ok(mounted) => {
                log::info!(
                    "backdrop mounted ({} stars)",
                    mounted.stage.borrow().backdrop.scene().map(|s| s.star_count()).unwrap_or(0)
                );
                SpaceBackdrop { mounted: Some(mounted) }
            }
            Err(err) => {
                log::warn!("backdrop disabled: {}", err);
                SpaceBackdrop { mounted: None }
            }
        }
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.mounted.as_ref().map(|m| m.frames.is_running()).unwrap_or(false)
    }

    /// Stars in the current scene (0 for the drift style or when inert).
    #[wasm_bindgen(js_name = starCount)]
    pub fn star_count(&self) -> u32 {
        self.mounted
            .as_ref()
            .and_then(|m| m.stage.borrow().backdrop.scene().map(|s| s.star_count() as u32))
            .unwrap_or(0)
    }

    /// Stop the loop and remove every listener. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.mounted.take();
    }
}
