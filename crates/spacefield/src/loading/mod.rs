pub mod animator;
pub mod splash;

pub use animator::{LoadingAnimator, LoadingFrame, LoadingStatus, Phase};
pub use splash::{SplashField, SplashParticle, SplashStar};
