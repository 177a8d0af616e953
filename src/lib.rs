//! Runaway Valentine - a question with a Yes button and a No button that runs away
//!
//! Core modules:
//! - `sim`: Deterministic interaction model (evasion geometry, timers, reveal sequence)
//! - `platform`: Browser/native layout probing
//! - `tuning`: Data-driven tunables with JSON overrides
//! - `messages`: Default escape message pools

pub mod messages;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use platform::{FixedLayout, LayoutProbe};
pub use sim::{Layout, Scene, SceneEvent, SceneInput};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Interaction configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Pointer distance (px, at scale 1.0) that makes the No button flee
    pub const ESCAPE_RADIUS: f32 = 80.0;
    /// Idle time after the last escape before the button walks back home
    pub const RETURN_DELAY_MS: f64 = 3000.0;
    /// How long an escape quip stays on screen
    pub const MESSAGE_VISIBLE_MS: f64 = 1200.0;
    /// How long the broken-heart flash lasts
    pub const DISTRESS_VISIBLE_MS: f64 = 300.0;
    /// Chance that an escape flashes the broken heart
    pub const DISTRESS_CHANCE: f64 = 0.3;

    /// Keep-out margin from the viewport edges (px)
    pub const VIEWPORT_PADDING: f32 = 20.0;

    /// Retreat distance range (px)
    pub const RETREAT_MIN: f32 = 150.0;
    pub const RETREAT_MAX: f32 = 250.0;
    /// Circular hop radius range (px)
    pub const CIRCLE_RADIUS_MIN: f32 = 100.0;
    pub const CIRCLE_RADIUS_MAX: f32 = 200.0;
    /// Zigzag ranges (px); vertical is a small jitter
    pub const ZIGZAG_HORIZONTAL_MIN: f32 = 150.0;
    pub const ZIGZAG_HORIZONTAL_MAX: f32 = 250.0;
    pub const ZIGZAG_VERTICAL_MAX: f32 = 60.0;
    /// Rotation added per escape (degrees, random sign)
    pub const ROTATION_STEP_MIN: f32 = 10.0;
    pub const ROTATION_STEP_MAX: f32 = 30.0;
    /// Largest rotation step a tuning override may ask for
    pub const MAX_ROTATION_STEP: f32 = 360.0;

    /// Scale bounds shared by both buttons
    pub const MIN_SCALE: f32 = 0.3;
    pub const MAX_SCALE: f32 = 2.0;
    /// Scale change per capture of the No button
    pub const SCALE_STEP: f32 = 0.05;

    /// Escapes after which the No button switches to desperate quips
    pub const DESPERATE_THRESHOLD: u32 = 10;
    /// Escapes before the counter badge appears
    pub const COUNTER_VISIBLE_AFTER: u32 = 3;
    /// Escapes before the afterimage trail appears
    pub const TRAIL_VISIBLE_AFTER: u32 = 5;

    /// Reveal schedule, measured from the Yes click (ms)
    pub const REVEAL_DELAYS_MS: [f64; 3] = [1500.0, 5000.0, 8000.0];
    /// Letter schedule, measured from opening the envelope (ms)
    pub const LETTER_DELAYS_MS: [f64; 2] = [1500.0, 2500.0];

    /// Smallest viewport the layout is designed for
    pub const MIN_VIEWPORT_WIDTH: f32 = 320.0;
    pub const MIN_VIEWPORT_HEIGHT: f32 = 480.0;
}

/// Normalized angle in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { 180.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
