//! Escape motion patterns
//!
//! Each pattern is a small pure function; `compute_escape` dispatches on the
//! pattern and adds the per-escape rotation and distress roll. The proposed
//! offset is not clamped here; the controller clamps it to the viewport.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::OffsetBounds;
use crate::polar_to_cartesian;
use crate::tuning::{PatternMix, Tuning};

/// How the button gets away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscapePattern {
    /// Straight away from the pointer
    DirectRetreat,
    /// Vanish and reappear anywhere on screen
    Teleport,
    /// Hop to a random point on a circle around the current spot
    Circular,
    /// Big sideways dash with a little vertical wobble
    Zigzag,
}

impl EscapePattern {
    pub const ALL: [EscapePattern; 4] = [
        EscapePattern::DirectRetreat,
        EscapePattern::Teleport,
        EscapePattern::Circular,
        EscapePattern::Zigzag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EscapePattern::DirectRetreat => "retreat",
            EscapePattern::Teleport => "teleport",
            EscapePattern::Circular => "circular",
            EscapePattern::Zigzag => "zigzag",
        }
    }
}

/// Inputs for one escape
#[derive(Debug, Clone, Copy)]
pub struct EscapeContext {
    /// Current offset from rest
    pub offset: Vec2,
    /// Element centre in screen space
    pub element_center: Vec2,
    /// Pointer position in screen space
    pub pointer: Vec2,
    /// Legal offsets (used by teleport)
    pub bounds: OffsetBounds,
}

/// Result of one escape (offset not yet clamped)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeMotion {
    /// Pattern actually used (differs from the requested one on fallback)
    pub pattern: EscapePattern,
    pub offset: Vec2,
    /// Degrees to add to the current rotation
    pub rotation_delta: f32,
    /// Flash the broken heart
    pub distress: bool,
}

/// Weighted pattern roll
pub fn choose_pattern<R: Rng + ?Sized>(mix: &PatternMix, rng: &mut R) -> EscapePattern {
    let total = mix.total();
    if total == 0 {
        return EscapePattern::DirectRetreat;
    }
    let mut roll = rng.random_range(0..total);
    for pattern in EscapePattern::ALL {
        let weight = mix.weight(pattern);
        if roll < weight {
            return pattern;
        }
        roll -= weight;
    }
    EscapePattern::DirectRetreat
}

/// Move `distance` along the pointer-to-element direction.
///
/// Returns `None` when the pointer sits exactly on the centre (no direction).
pub fn retreat(ctx: &EscapeContext, distance: f32) -> Option<Vec2> {
    let away = ctx.element_center - ctx.pointer;
    let len = away.length();
    if len < f32::EPSILON {
        return None;
    }
    Some(ctx.offset + away / len * distance)
}

/// Fresh random offset anywhere inside `bounds`
pub fn teleport<R: Rng + ?Sized>(bounds: &OffsetBounds, rng: &mut R) -> Vec2 {
    bounds.sample(rng)
}

/// Point at `angle` (radians) on a circle of `radius` around the current offset
pub fn circular(offset: Vec2, radius: f32, angle: f32) -> Vec2 {
    offset + polar_to_cartesian(radius, angle)
}

/// Signed sideways dash plus vertical jitter
pub fn zigzag(offset: Vec2, horizontal: f32, vertical: f32) -> Vec2 {
    offset + Vec2::new(horizontal, vertical)
}

fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

/// Compute the escape for `pattern`.
///
/// A retreat with no usable direction falls back to a teleport.
pub fn compute_escape<R: Rng + ?Sized>(
    ctx: &EscapeContext,
    pattern: EscapePattern,
    tuning: &Tuning,
    rng: &mut R,
) -> EscapeMotion {
    let (pattern, offset) = match pattern {
        EscapePattern::DirectRetreat => {
            let distance = tuning.retreat_distance.sample(rng);
            match retreat(ctx, distance) {
                Some(offset) => (EscapePattern::DirectRetreat, offset),
                None => {
                    log::debug!("Pointer on button centre, teleporting instead");
                    (EscapePattern::Teleport, teleport(&ctx.bounds, rng))
                }
            }
        }
        EscapePattern::Teleport => (EscapePattern::Teleport, teleport(&ctx.bounds, rng)),
        EscapePattern::Circular => {
            let angle = rng.random_range(0.0..TAU);
            let radius = tuning.circle_radius.sample(rng);
            (EscapePattern::Circular, circular(ctx.offset, radius, angle))
        }
        EscapePattern::Zigzag => {
            let horizontal = random_sign(rng) * tuning.zigzag_horizontal.sample(rng);
            let vertical = random_sign(rng) * tuning.zigzag_vertical.sample(rng);
            (EscapePattern::Zigzag, zigzag(ctx.offset, horizontal, vertical))
        }
    };

    let rotation_delta = random_sign(rng) * tuning.rotation_step.sample(rng);
    let distress = rng.random_bool(tuning.distress_chance);

    EscapeMotion {
        pattern,
        offset,
        rotation_delta,
        distress,
    }
}
