//! The runaway No button
//!
//! `EvasiveController` owns the button's pose, escape count, current quip and
//! three named timers (return-to-rest, quip clear, distress clear). Every
//! trigger cancels and re-arms the timers it touches, so at most one pending
//! return can exist and a stale one can never snap a newer flight back home.

use glam::Vec2;
use rand::Rng;

use super::escape::{EscapeContext, EscapePattern, choose_pattern, compute_escape};
use super::geometry::{Layout, detect_intrusion, proximity_radius};
use super::pose::ElementPose;
use super::timer::Timer;
use crate::consts::{COUNTER_VISIBLE_AFTER, TRAIL_VISIBLE_AFTER};
use crate::normalize_degrees;
use crate::tuning::Tuning;

/// Motion state of the button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvasivePhase {
    /// At (or heading back to) its rest position
    Resting,
    /// Recently escaped; return timer pending
    Fleeing,
}

/// Face shown on the button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expression {
    Calm,
    Panicked,
    BrokenHeart,
}

impl Expression {
    pub fn glyph(&self) -> &'static str {
        match self {
            Expression::Calm => "❌",
            Expression::Panicked => "😱",
            Expression::BrokenHeart => "💔",
        }
    }
}

/// Emitted on every escape
#[derive(Debug, Clone, PartialEq)]
pub struct EscapeEvent {
    /// Escape count including this one
    pub count: u32,
    pub message: String,
    pub broken_heart: bool,
    /// Pattern used; `None` when the button could not be measured
    pub pattern: Option<EscapePattern>,
    /// Pose after the escape
    pub pose: ElementPose,
}

/// Outcome of clicking/tapping the button
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    /// The click registers as a catch (before the button flees again)
    pub captured: bool,
    pub escape: EscapeEvent,
}

/// Timer-driven changes reported by `EvasiveController::tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvasiveTimerEvent {
    ReturnedToRest,
    MessageCleared,
    DistressCleared,
}

#[derive(Debug, Clone)]
pub struct EvasiveController {
    phase: EvasivePhase,
    pose: ElementPose,
    escape_count: u32,
    message: Option<String>,
    distressed: bool,
    return_timer: Timer,
    message_timer: Timer,
    distress_timer: Timer,
}

impl EvasiveController {
    pub fn new(scale: f32) -> Self {
        Self {
            phase: EvasivePhase::Resting,
            pose: ElementPose::at_rest(scale),
            escape_count: 0,
            message: None,
            distressed: false,
            return_timer: Timer::idle(),
            message_timer: Timer::idle(),
            distress_timer: Timer::idle(),
        }
    }

    pub fn phase(&self) -> EvasivePhase {
        self.phase
    }

    pub fn pose(&self) -> ElementPose {
        self.pose
    }

    pub fn escape_count(&self) -> u32 {
        self.escape_count
    }

    /// Current quip, if one is showing
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_distressed(&self) -> bool {
        self.distressed
    }

    pub fn expression(&self) -> Expression {
        if self.distressed {
            Expression::BrokenHeart
        } else if self.phase == EvasivePhase::Fleeing {
            Expression::Panicked
        } else {
            Expression::Calm
        }
    }

    /// "Escaped Nx" badge
    pub fn shows_counter(&self) -> bool {
        self.escape_count > COUNTER_VISIBLE_AFTER
    }

    /// Afterimage trail while running
    pub fn shows_trail(&self) -> bool {
        self.phase == EvasivePhase::Fleeing && self.escape_count > TRAIL_VISIBLE_AFTER
    }

    /// Deadline of the pending return, if any
    pub fn return_deadline(&self) -> Option<f64> {
        self.return_timer.deadline()
    }

    pub fn has_pending_timers(&self) -> bool {
        self.return_timer.is_pending()
            || self.message_timer.is_pending()
            || self.distress_timer.is_pending()
    }

    /// Scale is owned by the scale coupler; the scene pushes it in
    pub fn set_scale(&mut self, scale: f32) {
        self.pose.scale = scale;
    }

    /// Pointer moved somewhere on the page. Escapes if it came too close.
    pub fn pointer_moved<R: Rng + ?Sized>(
        &mut self,
        pointer: Vec2,
        layout: Option<&Layout>,
        now: f64,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<EscapeEvent> {
        let layout = layout?;
        let element = layout.element_rect(self.pose.offset, self.pose.scale);
        let radius = proximity_radius(tuning.escape_radius, self.pose.scale);
        if !detect_intrusion(Some(element), pointer, radius) {
            return None;
        }
        Some(self.trigger(pointer, Some(layout), now, tuning, rng))
    }

    /// A finger landed on the button: always an escape
    pub fn touched<R: Rng + ?Sized>(
        &mut self,
        pointer: Vec2,
        layout: Option<&Layout>,
        now: f64,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<EscapeEvent> {
        let layout = layout?;
        Some(self.trigger(pointer, Some(layout), now, tuning, rng))
    }

    /// The button was actually clicked. Reports a capture (if enabled) and
    /// flees anyway; it can never be pinned down.
    pub fn activate<R: Rng + ?Sized>(
        &mut self,
        pointer: Vec2,
        layout: Option<&Layout>,
        now: f64,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Activation {
        let captured = tuning.count_captures;
        if captured {
            log::info!("No button caught after {} escapes", self.escape_count);
        }
        let escape = self.trigger(pointer, layout, now, tuning, rng);
        Activation { captured, escape }
    }

    fn trigger<R: Rng + ?Sized>(
        &mut self,
        pointer: Vec2,
        layout: Option<&Layout>,
        now: f64,
        tuning: &Tuning,
        rng: &mut R,
    ) -> EscapeEvent {
        self.escape_count = self.escape_count.saturating_add(1);
        self.phase = EvasivePhase::Fleeing;

        let message = pick_message(self.escape_count, tuning, rng);
        self.message = Some(message.clone());
        self.message_timer.schedule(now, tuning.message_visible_ms);

        let mut pattern = None;
        let mut broken_heart = false;
        if let Some(layout) = layout {
            let bounds = layout.offset_bounds(self.pose.scale, tuning.padding);
            let ctx = EscapeContext {
                offset: self.pose.offset,
                element_center: layout.element_rect(self.pose.offset, self.pose.scale).center(),
                pointer,
                bounds,
            };
            let requested = choose_pattern(&tuning.patterns, rng);
            let motion = compute_escape(&ctx, requested, tuning, rng);

            self.pose.offset = bounds.clamp(motion.offset);
            self.pose.rotation = normalize_degrees(self.pose.rotation + motion.rotation_delta);
            broken_heart = motion.distress;
            if motion.distress {
                self.distressed = true;
                self.distress_timer.schedule(now, tuning.distress_visible_ms);
            }
            pattern = Some(motion.pattern);
        }

        self.return_timer.schedule(now, tuning.return_delay_ms);

        log::debug!(
            "Escape #{} ({}) -> ({:.0}, {:.0}) rot {:.0}",
            self.escape_count,
            pattern.map(|p| p.as_str()).unwrap_or("unmeasured"),
            self.pose.offset.x,
            self.pose.offset.y,
            self.pose.rotation
        );

        EscapeEvent {
            count: self.escape_count,
            message,
            broken_heart,
            pattern,
            pose: self.pose,
        }
    }

    /// Fire due timers
    pub fn tick(&mut self, now: f64) -> Vec<EvasiveTimerEvent> {
        let mut events = Vec::new();

        if self.distress_timer.fire(now) {
            self.distressed = false;
            events.push(EvasiveTimerEvent::DistressCleared);
        }
        if self.message_timer.fire(now) {
            self.message = None;
            events.push(EvasiveTimerEvent::MessageCleared);
        }
        if self.return_timer.fire(now) {
            self.phase = EvasivePhase::Resting;
            self.pose.offset = Vec2::ZERO;
            self.pose.rotation = 0.0;
            events.push(EvasiveTimerEvent::ReturnedToRest);
        }

        events
    }

    /// Re-apply the viewport clamp after a resize or scale change
    pub fn reclamp(&mut self, layout: Option<&Layout>, padding: f32) {
        let Some(layout) = layout else { return };
        if self.pose.offset == Vec2::ZERO {
            return;
        }
        let clamped = layout
            .offset_bounds(self.pose.scale, padding)
            .clamp(self.pose.offset);
        if clamped != self.pose.offset {
            log::debug!(
                "Re-clamped offset ({:.0}, {:.0}) -> ({:.0}, {:.0})",
                self.pose.offset.x,
                self.pose.offset.y,
                clamped.x,
                clamped.y
            );
            self.pose.offset = clamped;
        }
    }

    pub fn cancel_timers(&mut self) {
        self.return_timer.cancel();
        self.message_timer.cancel();
        self.distress_timer.cancel();
    }

    /// Back to the initial state; count, pose and timers reset together
    pub fn reset(&mut self, scale: f32) {
        *self = Self::new(scale);
    }
}

/// Pick a quip; desperate ones once the count passes the threshold
fn pick_message<R: Rng + ?Sized>(count: u32, tuning: &Tuning, rng: &mut R) -> String {
    let pool = if count > tuning.desperate_threshold {
        &tuning.desperate_messages
    } else {
        &tuning.escape_messages
    };
    if pool.is_empty() {
        return String::new();
    }
    pool[rng.random_range(0..pool.len())].clone()
}
