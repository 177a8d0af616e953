//! Deterministic interaction model
//!
//! All behaviour lives here. This module must stay pure and deterministic:
//! - Time is injected (milliseconds), never read from a clock
//! - Seeded RNG only
//! - Layout comes in through `LayoutProbe`, never from the DOM directly
//! - No rendering or platform dependencies

pub mod escape;
pub mod evasive;
pub mod geometry;
pub mod pose;
pub mod reveal;
pub mod scale;
pub mod scene;
pub mod timer;

pub use escape::{EscapeContext, EscapeMotion, EscapePattern, choose_pattern, compute_escape};
pub use evasive::{Activation, EscapeEvent, EvasiveController, EvasivePhase, Expression};
pub use geometry::{Layout, OffsetBounds, Rect, clamp_offset, detect_intrusion, proximity_radius};
pub use pose::ElementPose;
pub use reveal::{RevealSequencer, RevealStage};
pub use scale::{ScaleCoupler, ScalePair};
pub use scene::{Scene, SceneEvent, SceneInput, tick};
pub use timer::Timer;
