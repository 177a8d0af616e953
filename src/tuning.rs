//! Data-driven tunables
//!
//! Every number the interaction depends on lives here so it can be overridden
//! from JSON without touching the simulation. Missing fields fall back to the
//! defaults in `crate::consts`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::messages::{DESPERATE_MESSAGES, ESCAPE_MESSAGES, to_owned_pool};
use crate::sim::EscapePattern;

/// Errors from loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl TuningError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TuningError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Inclusive-exclusive range of magnitudes, sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample; a collapsed span always yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    fn validate(&self, field: &'static str, limit: f32) -> Result<(), TuningError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(TuningError::invalid(field, "bounds must be finite"));
        }
        if !(self.min >= 0.0) || !(self.max >= self.min) || self.max > limit {
            return Err(TuningError::invalid(
                field,
                format!(
                    "expected 0 <= min <= max <= {}, got [{}, {}]",
                    limit, self.min, self.max
                ),
            ));
        }
        Ok(())
    }
}

/// Relative weights for picking an escape pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternMix {
    pub retreat: u32,
    pub teleport: u32,
    pub circular: u32,
    pub zigzag: u32,
}

impl Default for PatternMix {
    fn default() -> Self {
        // Mostly a straight retreat, with the odd surprise
        Self {
            retreat: 6,
            teleport: 1,
            circular: 2,
            zigzag: 2,
        }
    }
}

impl PatternMix {
    /// Only the plain retreat (the calmest configuration)
    pub fn retreat_only() -> Self {
        Self {
            retreat: 1,
            teleport: 0,
            circular: 0,
            zigzag: 0,
        }
    }

    pub fn weight(&self, pattern: EscapePattern) -> u32 {
        match pattern {
            EscapePattern::DirectRetreat => self.retreat,
            EscapePattern::Teleport => self.teleport,
            EscapePattern::Circular => self.circular,
            EscapePattern::Zigzag => self.zigzag,
        }
    }

    pub fn total(&self) -> u32 {
        EscapePattern::ALL.iter().map(|p| self.weight(*p)).sum()
    }
}

/// All interaction tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Evasion ===
    /// Proximity radius at scale 1.0 (px)
    pub escape_radius: f32,
    /// Keep-out margin from viewport edges (px)
    pub padding: f32,
    /// Weights for the escape pattern roll
    pub patterns: PatternMix,
    pub retreat_distance: Span,
    pub circle_radius: Span,
    pub zigzag_horizontal: Span,
    pub zigzag_vertical: Span,
    /// Rotation per escape (degrees)
    pub rotation_step: Span,
    /// Probability of the broken-heart flash per escape
    pub distress_chance: f64,
    /// Whether clicking the No button counts as a capture (shrinks No, grows Yes)
    pub count_captures: bool,

    // === Timers (ms) ===
    pub return_delay_ms: f64,
    pub message_visible_ms: f64,
    pub distress_visible_ms: f64,

    // === Scale coupling ===
    pub initial_scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub scale_step: f32,

    // === Messages ===
    /// Escape count past which desperate quips are used
    pub desperate_threshold: u32,
    pub escape_messages: Vec<String>,
    pub desperate_messages: Vec<String>,

    // === Reveal ===
    /// Primary reveal deadlines, all measured from the Yes click
    pub reveal_delays_ms: [f64; 3],
    /// Letter deadlines, measured from opening the envelope
    pub letter_delays_ms: [f64; 2],
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            escape_radius: ESCAPE_RADIUS,
            padding: VIEWPORT_PADDING,
            patterns: PatternMix::default(),
            retreat_distance: Span::new(RETREAT_MIN, RETREAT_MAX),
            circle_radius: Span::new(CIRCLE_RADIUS_MIN, CIRCLE_RADIUS_MAX),
            zigzag_horizontal: Span::new(ZIGZAG_HORIZONTAL_MIN, ZIGZAG_HORIZONTAL_MAX),
            zigzag_vertical: Span::new(0.0, ZIGZAG_VERTICAL_MAX),
            rotation_step: Span::new(ROTATION_STEP_MIN, ROTATION_STEP_MAX),
            distress_chance: DISTRESS_CHANCE,
            count_captures: true,

            return_delay_ms: RETURN_DELAY_MS,
            message_visible_ms: MESSAGE_VISIBLE_MS,
            distress_visible_ms: DISTRESS_VISIBLE_MS,

            initial_scale: 1.0,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            scale_step: SCALE_STEP,

            desperate_threshold: DESPERATE_THRESHOLD,
            escape_messages: to_owned_pool(ESCAPE_MESSAGES),
            desperate_messages: to_owned_pool(DESPERATE_MESSAGES),

            reveal_delays_ms: REVEAL_DELAYS_MS,
            letter_delays_ms: LETTER_DELAYS_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Like `from_json`, but falls back to the defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Self::default()
            }
        }
    }

    /// Check ranges and orderings the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("escape_radius", self.escape_radius),
            ("padding", self.padding),
            ("initial_scale", self.initial_scale),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("scale_step", self.scale_step),
        ] {
            if !value.is_finite() {
                return Err(TuningError::invalid(field, "must be finite"));
            }
        }

        if !(self.escape_radius > 0.0) {
            return Err(TuningError::invalid("escape_radius", "must be positive"));
        }
        if !(self.padding >= 0.0) {
            return Err(TuningError::invalid("padding", "must not be negative"));
        }
        if self.patterns.total() == 0 {
            return Err(TuningError::invalid("patterns", "at least one weight must be non-zero"));
        }
        self.retreat_distance.validate("retreat_distance", f32::MAX)?;
        self.circle_radius.validate("circle_radius", f32::MAX)?;
        self.zigzag_horizontal.validate("zigzag_horizontal", f32::MAX)?;
        self.zigzag_vertical.validate("zigzag_vertical", f32::MAX)?;
        self.rotation_step.validate("rotation_step", MAX_ROTATION_STEP)?;
        if !(0.0..=1.0).contains(&self.distress_chance) {
            return Err(TuningError::invalid("distress_chance", "must be within [0, 1]"));
        }

        for (field, ms) in [
            ("return_delay_ms", self.return_delay_ms),
            ("message_visible_ms", self.message_visible_ms),
            ("distress_visible_ms", self.distress_visible_ms),
        ] {
            if !ms.is_finite() || ms < 0.0 {
                return Err(TuningError::invalid(field, "must be finite and not negative"));
            }
        }

        if !(self.min_scale > 0.0) || !(self.max_scale >= self.min_scale) {
            return Err(TuningError::invalid(
                "min_scale",
                format!(
                    "expected 0 < min_scale <= max_scale, got [{}, {}]",
                    self.min_scale, self.max_scale
                ),
            ));
        }
        if !(self.min_scale..=self.max_scale).contains(&self.initial_scale) {
            return Err(TuningError::invalid(
                "initial_scale",
                "must lie within [min_scale, max_scale]",
            ));
        }
        if !(self.scale_step >= 0.0) {
            return Err(TuningError::invalid("scale_step", "must not be negative"));
        }

        if self.escape_messages.is_empty() {
            return Err(TuningError::invalid("escape_messages", "pool is empty"));
        }
        if self.desperate_messages.is_empty() {
            return Err(TuningError::invalid("desperate_messages", "pool is empty"));
        }

        check_schedule("reveal_delays_ms", &self.reveal_delays_ms)?;
        check_schedule("letter_delays_ms", &self.letter_delays_ms)?;

        Ok(())
    }
}

/// Deadlines must be finite, non-negative and non-decreasing
fn check_schedule(field: &'static str, delays: &[f64]) -> Result<(), TuningError> {
    let mut previous = 0.0;
    for &delay in delays {
        if !delay.is_finite() || delay < previous {
            return Err(TuningError::invalid(
                field,
                format!("deadlines must be non-negative and ascending, got {:?}", delays),
            ));
        }
        previous = delay;
    }
    Ok(())
}
