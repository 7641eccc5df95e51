//! Browser bindings for `spacefield`.
//!
//! Exposes two classes to JavaScript:
//!
//! ```ignore
//! const backdrop = new SpaceBackdrop(canvas, JSON.stringify({ density: 1.5, comets: false }));
//! // ...
//! backdrop.destroy();
//!
//! const loading = new LoadingScreen();
//! loading.start((percent, step, portal) => render(percent, step, portal), () => enterSite());
//! ```

use wasm_bindgen::prelude::*;

pub mod canvas;
pub mod env;
pub mod runner;

mod backdrop;
mod listener;
mod loading;

pub use backdrop::SpaceBackdrop;
pub use canvas::CanvasSurface;
pub use env::MountError;
pub use loading::LoadingScreen;
pub use runner::FrameLoop;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already initialised when the module is instantiated twice.
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("spacefield ready");
}
