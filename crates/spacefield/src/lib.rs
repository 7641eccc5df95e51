pub mod api;
pub mod core;
pub mod extensions;
pub mod input;
pub mod loading;
pub mod renderer;
pub mod scene;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::backdrop::{Backdrop, Content};
pub use api::config::{BackdropConfig, BackdropStyle, LoadingConfig, DEFAULT_LOADING_STEPS};
pub use crate::core::rng::Rng;
pub use crate::core::time::FrameClock;
pub use crate::core::viewport::{wrap, PointerState, Viewport};
pub use input::queue::{InputEvent, InputQueue};
pub use loading::{LoadingAnimator, LoadingFrame, LoadingStatus, SplashField};
pub use renderer::{BlendMode, Color, ColorStop, DrawCommand, DrawList, Paint, Surface};
pub use scene::{Comet, CometSpawner, DriftField, NebulaBlob, Planet, Scene, StarLayer};

pub use extensions::Easing;

pub use glam::Vec2;
