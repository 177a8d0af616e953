//! The interactive screen: question, both buttons and the reveal
//!
//! `Scene` owns every controller plus the seeded RNG. `tick` applies one
//! frame's worth of input and then fires due timers, returning what changed
//! as `SceneEvent`s for the presentation layer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::evasive::{EscapeEvent, EvasiveController, EvasiveTimerEvent};
use super::pose::ElementPose;
use super::reveal::{RevealSequencer, RevealStage};
use super::scale::{ScaleCoupler, ScalePair};
use crate::platform::LayoutProbe;
use crate::tuning::Tuning;

/// Input collected since the last frame
#[derive(Debug, Clone, Default)]
pub struct SceneInput {
    /// Latest pointer position (mouse move)
    pub pointer: Option<Vec2>,
    /// Touch start on the No button
    pub touch: Option<Vec2>,
    /// Click/tap that actually hit the No button
    pub evasive_click: Option<Vec2>,
    /// Yes clicked
    pub accept: bool,
    /// "Forever" clicked
    pub open_letter: bool,
    /// Letter close button
    pub dismiss_letter: bool,
    /// Start over
    pub replay: bool,
    /// Window resized or rotated
    pub resized: bool,
}

/// Changes the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Escaped(EscapeEvent),
    /// No button caught; new scales for both buttons
    Captured(ScalePair),
    ReturnedToRest,
    MessageCleared,
    StageChanged(RevealStage),
    Replayed,
}

#[derive(Debug, Clone)]
pub struct Scene {
    /// Seed for reproducibility
    pub seed: u64,
    tuning: Tuning,
    rng: Pcg32,
    evasive: EvasiveController,
    scales: ScaleCoupler,
    reveal: RevealSequencer,
    pointer: Option<Vec2>,
    question_visible: bool,
}

impl Scene {
    /// Mount the screen. Invalid tuning is replaced by the defaults.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Tuning::default()
            }
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            evasive: EvasiveController::new(tuning.initial_scale),
            scales: ScaleCoupler::new(&tuning),
            reveal: RevealSequencer::new(&tuning),
            pointer: None,
            question_visible: true,
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn evasive(&self) -> &EvasiveController {
        &self.evasive
    }

    pub fn reveal(&self) -> &RevealSequencer {
        &self.reveal
    }

    pub fn stage(&self) -> RevealStage {
        self.reveal.stage()
    }

    pub fn scales(&self) -> ScalePair {
        self.scales.pair()
    }

    /// Last known pointer sample
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn question_visible(&self) -> bool {
        self.question_visible
    }

    pub fn escape_count(&self) -> u32 {
        self.evasive.escape_count()
    }

    pub fn message(&self) -> Option<&str> {
        self.evasive.message()
    }

    /// Pose of the runaway No button
    pub fn no_pose(&self) -> ElementPose {
        self.evasive.pose()
    }

    /// Pose of the Yes button (never moves, only grows)
    pub fn yes_pose(&self) -> ElementPose {
        ElementPose::at_rest(self.scales.pair().yes_scale)
    }

    pub fn has_pending_timers(&self) -> bool {
        self.evasive.has_pending_timers() || self.reveal.has_pending()
    }

    /// Unmount: cancel every outstanding timer, keep the visible state
    pub fn teardown(&mut self) {
        self.evasive.cancel_timers();
        self.reveal.cancel_pending();
    }

    /// Start over: all timers cancelled first, then everything back to initial values
    pub fn replay(&mut self) {
        self.teardown();
        self.reveal.reset();
        self.scales.reset();
        self.evasive.reset(self.tuning.initial_scale);
        self.pointer = None;
        self.question_visible = true;
        log::info!("Replay");
    }

    fn apply_capture(&mut self, probe: &dyn LayoutProbe) -> ScalePair {
        let pair = self.scales.on_capture();
        self.evasive.set_scale(pair.no_scale);
        self.evasive.reclamp(probe.measure().as_ref(), self.tuning.padding);
        pair
    }
}

/// Advance the scene by one frame at time `now` (ms)
pub fn tick(
    scene: &mut Scene,
    input: &SceneInput,
    probe: &dyn LayoutProbe,
    now: f64,
) -> Vec<SceneEvent> {
    let mut events = Vec::new();

    // Replay cancels everything before anything new is scheduled
    if input.replay {
        scene.replay();
        events.push(SceneEvent::Replayed);
    }

    if let Some(pointer) = input.pointer {
        scene.pointer = Some(pointer);
        // The No button only exists while the question is on screen
        if scene.question_visible {
            let layout = probe.measure();
            if let Some(escape) = scene.evasive.pointer_moved(
                pointer,
                layout.as_ref(),
                now,
                &scene.tuning,
                &mut scene.rng,
            ) {
                events.push(SceneEvent::Escaped(escape));
            }
        }
    }

    if let Some(touch) = input.touch {
        scene.pointer = Some(touch);
        if scene.question_visible {
            let layout = probe.measure();
            if let Some(escape) =
                scene
                    .evasive
                    .touched(touch, layout.as_ref(), now, &scene.tuning, &mut scene.rng)
            {
                events.push(SceneEvent::Escaped(escape));
            }
        }
    }

    if let Some(click) = input.evasive_click {
        scene.pointer = Some(click);
        if scene.question_visible {
            let layout = probe.measure();
            let activation =
                scene
                    .evasive
                    .activate(click, layout.as_ref(), now, &scene.tuning, &mut scene.rng);
            if activation.captured {
                let pair = scene.apply_capture(probe);
                events.push(SceneEvent::Captured(pair));
            }
            events.push(SceneEvent::Escaped(activation.escape));
        }
    }

    if input.accept && scene.question_visible && scene.reveal.accept(now) {
        scene.question_visible = false;
        // Question screen unmounts with its timers
        scene.evasive.cancel_timers();
    }

    if input.open_letter {
        if let Some(stage) = scene.reveal.open_letter(now) {
            events.push(SceneEvent::StageChanged(stage));
        }
    }

    if input.dismiss_letter {
        if let Some(stage) = scene.reveal.dismiss_letter() {
            events.push(SceneEvent::StageChanged(stage));
        }
    }

    if input.resized && scene.question_visible {
        scene
            .evasive
            .reclamp(probe.measure().as_ref(), scene.tuning.padding);
    }

    // Timers
    for event in scene.evasive.tick(now) {
        match event {
            EvasiveTimerEvent::ReturnedToRest => events.push(SceneEvent::ReturnedToRest),
            EvasiveTimerEvent::MessageCleared => events.push(SceneEvent::MessageCleared),
            EvasiveTimerEvent::DistressCleared => {}
        }
    }
    for stage in scene.reveal.tick(now) {
        events.push(SceneEvent::StageChanged(stage));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::FixedLayout;
    use crate::sim::geometry::{Layout, Rect};
    use proptest::prelude::*;

    fn phone() -> FixedLayout {
        FixedLayout::new(Layout::new(
            Vec2::new(390.0, 844.0),
            Rect::from_center(Vec2::new(255.0, 600.0), Vec2::new(120.0, 50.0)),
        ))
    }

    fn near_no_button() -> Vec2 {
        Vec2::new(240.0, 590.0)
    }

    fn pointer_at(p: Vec2) -> SceneInput {
        SceneInput {
            pointer: Some(p),
            ..Default::default()
        }
    }

    fn click_no() -> SceneInput {
        SceneInput {
            evasive_click: Some(near_no_button()),
            ..Default::default()
        }
    }

    fn accept() -> SceneInput {
        SceneInput {
            accept: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_then_return_scenario() {
        let probe = phone();
        let mut scene = Scene::new(Tuning::default(), 12345);
        assert_eq!(scene.no_pose(), ElementPose::at_rest(1.0));
        assert_eq!(scene.escape_count(), 0);

        let events = tick(&mut scene, &pointer_at(near_no_button()), &probe, 0.0);
        assert!(matches!(events.as_slice(), [SceneEvent::Escaped(e)] if e.count == 1));
        assert_ne!(scene.no_pose().offset, Vec2::ZERO);
        assert!(!scene.message().unwrap_or("").is_empty());
        assert_eq!(scene.escape_count(), 1);

        let layout = probe.layout.unwrap();
        let rect = layout.element_rect(scene.no_pose().offset, scene.no_pose().scale);
        assert!(layout.safe_area(scene.tuning().padding).contains_rect(&rect));

        let events = tick(&mut scene, &SceneInput::default(), &probe, 3001.0);
        assert!(events.contains(&SceneEvent::ReturnedToRest));
        assert_eq!(scene.no_pose().offset, Vec2::ZERO);
        assert_eq!(scene.no_pose().rotation, 0.0);
        assert_eq!(scene.escape_count(), 1);
    }

    #[test]
    fn test_debounce_measured_from_latest_trigger() {
        let probe = phone();
        let mut scene = Scene::new(Tuning::default(), 7);
        tick(&mut scene, &pointer_at(near_no_button()), &probe, 0.0);

        // Chase it to wherever it went
        let layout = probe.layout.unwrap();
        let center = layout.element_rect(scene.no_pose().offset, scene.no_pose().scale).center();
        let events = tick(&mut scene, &pointer_at(center + Vec2::new(5.0, 5.0)), &probe, 2000.0);
        assert!(matches!(events.first(), Some(SceneEvent::Escaped(e)) if e.count == 2));

        let events = tick(&mut scene, &SceneInput::default(), &probe, 4999.0);
        assert!(!events.contains(&SceneEvent::ReturnedToRest));
        assert!(!scene.no_pose().is_at_rest());
        let events = tick(&mut scene, &SceneInput::default(), &probe, 5000.0);
        assert!(events.contains(&SceneEvent::ReturnedToRest));
    }

    #[test]
    fn test_unmeasured_layout_is_ignored() {
        let probe = FixedLayout::unmounted();
        let mut scene = Scene::new(Tuning::default(), 1);
        let events = tick(&mut scene, &pointer_at(near_no_button()), &probe, 0.0);
        assert!(events.is_empty());
        assert_eq!(scene.escape_count(), 0);
        assert_eq!(scene.pointer(), Some(near_no_button()));
    }

    #[test]
    fn test_capture_couples_scales() {
        let probe = phone();
        let mut scene = Scene::new(Tuning::default(), 3);
        let events = tick(&mut scene, &click_no(), &probe, 0.0);
        let pair = match events.first() {
            Some(SceneEvent::Captured(pair)) => *pair,
            other => panic!("expected capture first, got {other:?}"),
        };
        assert!(matches!(events.get(1), Some(SceneEvent::Escaped(_))));
        assert!(pair.no_scale < 1.0 && pair.yes_scale > 1.0);
        assert_eq!(scene.no_pose().scale, pair.no_scale);
        assert_eq!(scene.yes_pose().scale, pair.yes_scale);
        assert_eq!(scene.escape_count(), 1);
    }

    #[test]
    fn test_accept_reveal_scenario() {
        let probe = phone();
        let mut scene = Scene::new(Tuning::default(), 5);
        let t = 2500.0;
        let events = tick(&mut scene, &accept(), &probe, t);
        assert!(events.is_empty());
        assert_eq!(scene.stage(), RevealStage::Idle);
        assert!(!scene.question_visible());

        let idle = SceneInput::default();
        assert_eq!(
            tick(&mut scene, &idle, &probe, t + 1500.0),
            vec![SceneEvent::StageChanged(RevealStage::PrimaryShown)]
        );
        assert_eq!(
            tick(&mut scene, &idle, &probe, t + 5000.0),
            vec![SceneEvent::StageChanged(RevealStage::SecondaryShown)]
        );
        assert_eq!(
            tick(&mut scene, &idle, &probe, t + 8000.0),
            vec![SceneEvent::StageChanged(RevealStage::ActionsShown)]
        );
        assert!(tick(&mut scene, &idle, &probe, t + 60_000.0).is_empty());
        assert_eq!(scene.stage(), RevealStage::ActionsShown);
    }

    #[test]
    fn test_second_accept_is_ignored() {
        let probe = phone();
        let mut scene = Scene::new(Tuning::default(), 5);
        tick(&mut scene, &accept(), &probe, 0.0);
        tick(&mut scene, &accept(), &probe, 1000.0);
        let events = tick(&mut scene, &SceneInput::default(), &probe, 1500.0);
        assert_eq!(events, vec![SceneEvent::StageChanged(RevealStage::PrimaryShown)]);
    }

    #[test]
    fn test_no_button_ignored_after_accept() {
        let probe = phone();
        let mut scene = Scene::new(Tuning::default(), 5);
        tick(&mut scene, &accept(), &probe, 0.0);
        let events = tick(&mut scene, &click_no(), &probe, 10.0);
        assert!(events.is_empty());
        assert_eq!(scene.scales(), ScalePair::uniform(1.0));
    }

    #[test]
    fn test_letter_flow_through_scene() {
        let probe = phone();
        let mut scene = Scene::new(Tuning::default(), 5);
        tick(&mut scene, &accept(), &probe, 0.0);
        tick(&mut scene, &SceneInput::default(), &probe, 8000.0);

        let open = SceneInput {
            open_letter: true,
            ..Default::default()
        };
        let events = tick(&mut scene, &open, &probe, 9000.0);
        assert_eq!(events, vec![SceneEvent::StageChanged(RevealStage::LetterOpening)]);
        tick(&mut scene, &SceneInput::default(), &probe, 10_500.0);
        assert_eq!(scene.stage(), RevealStage::LetterOpen);

        let dismiss = SceneInput {
            dismiss_letter: true,
            ..Default::default()
        };
        let events = tick(&mut scene, &dismiss, &probe, 10_600.0);
        assert_eq!(events, vec![SceneEvent::StageChanged(RevealStage::ActionsShown)]);
        assert!(tick(&mut scene, &SceneInput::default(), &probe, 20_000.0).is_empty());
    }

    #[test]
    fn test_replay_restores_initial_state() {
        let probe = phone();
        let mut scene = Scene::new(Tuning::default(), 9);
        tick(&mut scene, &click_no(), &probe, 0.0);
        tick(&mut scene, &click_no(), &probe, 100.0);
        tick(&mut scene, &accept(), &probe, 200.0);
        tick(&mut scene, &SceneInput::default(), &probe, 1700.0);
        assert_eq!(scene.stage(), RevealStage::PrimaryShown);

        let replay = SceneInput {
            replay: true,
            ..Default::default()
        };
        let events = tick(&mut scene, &replay, &probe, 1800.0);
        assert_eq!(events, vec![SceneEvent::Replayed]);

        assert_eq!(scene.stage(), RevealStage::Idle);
        assert_eq!(scene.scales(), ScalePair::uniform(1.0));
        assert_eq!(scene.no_pose(), ElementPose::at_rest(1.0));
        assert_eq!(scene.yes_pose(), ElementPose::at_rest(1.0));
        assert_eq!(scene.escape_count(), 0);
        assert!(scene.message().is_none());
        assert!(scene.question_visible());
        assert!(!scene.has_pending_timers());

        // Nothing fires afterwards
        assert!(tick(&mut scene, &SceneInput::default(), &probe, 100_000.0).is_empty());

        // Replay is idempotent
        tick(&mut scene, &replay, &probe, 100_001.0);
        assert_eq!(scene.stage(), RevealStage::Idle);
        assert_eq!(scene.escape_count(), 0);
    }

    #[test]
    fn test_teardown_cancels_timers() {
        let probe = phone();
        let mut scene = Scene::new(Tuning::default(), 9);
        tick(&mut scene, &pointer_at(near_no_button()), &probe, 0.0);
        scene.teardown();
        assert!(!scene.has_pending_timers());
        assert!(tick(&mut scene, &SceneInput::default(), &probe, 100_000.0).is_empty());
    }

    #[test]
    fn test_resize_reclamps() {
        let mut probe = phone();
        let mut scene = Scene::new(Tuning::default(), 21);
        for i in 0..6 {
            tick(&mut scene, &click_no(), &probe, i as f64 * 100.0);
        }
        probe.layout = Some(Layout::new(
            Vec2::new(320.0, 480.0),
            Rect::from_center(Vec2::new(200.0, 300.0), Vec2::new(120.0, 50.0)),
        ));
        let resized = SceneInput {
            resized: true,
            ..Default::default()
        };
        tick(&mut scene, &resized, &probe, 700.0);
        let layout = probe.layout.unwrap();
        let pose = scene.no_pose();
        let rect = layout.element_rect(pose.offset, pose.scale);
        assert!(layout.safe_area(scene.tuning().padding).contains_rect(&rect));
    }

    #[test]
    fn test_invalid_tuning_falls_back() {
        let mut tuning = Tuning::default();
        tuning.escape_messages.clear();
        let scene = Scene::new(tuning, 1);
        assert_eq!(scene.tuning(), &Tuning::default());
    }

    #[derive(Debug, Clone)]
    enum Action {
        Move(f32, f32),
        Touch,
        Click,
        Wait(f64),
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0.0f32..1.0, 0.0f32..1.0).prop_map(|(x, y)| Action::Move(x, y)),
            Just(Action::Touch),
            Just(Action::Click),
            (0.0f64..4000.0).prop_map(Action::Wait),
        ]
    }

    proptest! {
        #[test]
        fn prop_no_button_always_on_screen(
            seed in any::<u64>(),
            width in 320.0f32..1920.0,
            height in 480.0f32..1200.0,
            actions in proptest::collection::vec(action(), 1..60),
        ) {
            let layout = Layout::new(
                Vec2::new(width, height),
                Rect::from_center(Vec2::new(width * 0.6, height * 0.6), Vec2::new(120.0, 50.0)),
            );
            let probe = FixedLayout::new(layout);
            let mut scene = Scene::new(Tuning::default(), seed);
            let mut now = 0.0;
            let mut escapes = 0u32;

            for action in actions {
                let before = scene.escape_count();
                let input = match action {
                    Action::Move(fx, fy) => pointer_at(Vec2::new(fx * width, fy * height)),
                    Action::Touch => SceneInput {
                        touch: Some(layout.element_rect(scene.no_pose().offset, scene.no_pose().scale).center()),
                        ..Default::default()
                    },
                    Action::Click => SceneInput {
                        evasive_click: Some(layout.element_rect(scene.no_pose().offset, scene.no_pose().scale).center()),
                        ..Default::default()
                    },
                    Action::Wait(ms) => {
                        now += ms;
                        SceneInput::default()
                    }
                };
                let events = tick(&mut scene, &input, &probe, now);
                let escaped = events.iter().filter(|e| matches!(e, SceneEvent::Escaped(_))).count() as u32;
                escapes += escaped;
                prop_assert_eq!(scene.escape_count(), before + escaped);

                let pose = scene.no_pose();
                let rect = layout.element_rect(pose.offset, pose.scale);
                prop_assert!(layout.safe_area(scene.tuning().padding).contains_rect(&rect));
                prop_assert!(scene.scales().no_scale >= 0.3);
                prop_assert!(scene.scales().yes_scale <= 2.0);
            }
            prop_assert_eq!(scene.escape_count(), escapes);
        }
    }
}
