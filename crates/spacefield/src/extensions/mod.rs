// extensions/mod.rs
//
// Optional helpers decoupled from the scene.

pub mod easing;

pub use easing::Easing;
