//! Solar Scale - a tier-interpolated solar system scale view
//!
//! Core modules:
//! - `scene`: Deterministic scene core (tier layouts, transition/rollback
//!   controllers, per-frame placement solver, hit testing)
//! - `effects`: Time-bounded visual entities (particles, hit markers, shake)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Quality presets and preferences

pub mod effects;
pub mod renderer;
pub mod scene;
pub mod settings;

pub use settings::{QualityPreset, Settings};

/// Scene timing and layout constants
pub mod consts {
    /// Tier transition duration in milliseconds
    pub const TRANSITION_DURATION_MS: f64 = 3000.0;

    /// Fraction of the remaining target distance the rollback offset covers
    /// per frame
    pub const ROLLBACK_SMOOTHING: f32 = 0.10;
    /// Per-frame decay of the rollback offset while a tier transition is in
    /// flight
    pub const ROLLBACK_TRANSITION_DECAY: f32 = 0.85;
    /// Offsets below this are treated as "not rolled back"
    pub const ROLLBACK_EPSILON: f32 = 0.01;
    /// Rollback step per wheel notch / pinch unit
    pub const ROLLBACK_STEP: f32 = 0.25;
    /// Rollback lock applied when the committed tier advances (ms)
    pub const TIER_ADVANCE_LOCK_MS: f64 = 1400.0;
    /// Default rollback lock duration (ms)
    pub const DEFAULT_LOCK_MS: f64 = 1200.0;
    /// Offset above which the rollback hint label is shown
    pub const ROLLBACK_HINT_THRESHOLD: f32 = 0.08;

    /// Reserved top UI band in pixels (yf = 0 maps to its bottom edge)
    pub const UI_TOP: f32 = 160.0;
    /// Reserved bottom UI band in pixels
    pub const UI_BOTTOM: f32 = 80.0;

    /// Global particle ceiling; bursts are dropped whole above this
    pub const MAX_PARTICLES: usize = 100;
    /// Particle lifetime in frames
    pub const PARTICLE_LIFETIME_FRAMES: u32 = 50;
    /// Hit marker pool size (oldest evicted first)
    pub const MAX_HIT_MARKERS: usize = 40;
    /// Hit marker lifetime (ms)
    pub const HIT_MARKER_DURATION_MS: f64 = 220.0;
    /// Per-frame multiplicative decay of the shake magnitude
    pub const SHAKE_DECAY: f32 = 0.92;
}

/// Linear interpolation between `a` and `b`
///
/// Exact at both endpoints: t = 0 yields `a`, t = 1 yields `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Ease-in-out cubic, the curve used for tier transitions
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
