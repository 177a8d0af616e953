//! Post-acceptance reveal sequence
//!
//! The primary stages are timed from a single reference point (the Yes click)
//! instead of being chained, so a late tick emits every missed stage in order
//! rather than skipping or drifting. The letter has its own reference point
//! and can be dismissed at any time.


use crate::tuning::Tuning;

/// Ordered disclosure stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RevealStage {
    /// Question on screen, nothing revealed
    Idle,
    /// "Thank you for accepting my proposal"
    PrimaryShown,
    /// "You just made my heart unbelievably happy"
    SecondaryShown,
    /// "Forever" button available
    ActionsShown,
    /// Envelope on screen, still sealed
    LetterOpening,
    /// Flap open, letter rising
    LetterOpen,
    /// Letter lines visible
    LetterContentShown,
}

impl RevealStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealStage::Idle => "idle",
            RevealStage::PrimaryShown => "primary",
            RevealStage::SecondaryShown => "secondary",
            RevealStage::ActionsShown => "actions",
            RevealStage::LetterOpening => "letter-opening",
            RevealStage::LetterOpen => "letter-open",
            RevealStage::LetterContentShown => "letter-content",
        }
    }

    pub fn is_letter(&self) -> bool {
        *self >= RevealStage::LetterOpening
    }

    fn next_primary(&self) -> Option<RevealStage> {
        match self {
            RevealStage::Idle => Some(RevealStage::PrimaryShown),
            RevealStage::PrimaryShown => Some(RevealStage::SecondaryShown),
            RevealStage::SecondaryShown => Some(RevealStage::ActionsShown),
            _ => None,
        }
    }

    fn next_letter(&self) -> Option<RevealStage> {
        match self {
            RevealStage::LetterOpening => Some(RevealStage::LetterOpen),
            RevealStage::LetterOpen => Some(RevealStage::LetterContentShown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LetterSequence {
    stage: RevealStage,
    /// `None` once torn down; the stage then stays put
    opened_at: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RevealSequencer {
    primary_delays: [f64; 3],
    letter_delays: [f64; 2],
    accepted_at: Option<f64>,
    primary: RevealStage,
    letter: Option<LetterSequence>,
}

impl RevealSequencer {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            primary_delays: tuning.reveal_delays_ms,
            letter_delays: tuning.letter_delays_ms,
            accepted_at: None,
            primary: RevealStage::Idle,
            letter: None,
        }
    }

    /// The single active stage (letter stages take precedence)
    pub fn stage(&self) -> RevealStage {
        self.letter.map(|l| l.stage).unwrap_or(self.primary)
    }

    /// Stage of the primary sequence, ignoring the letter
    pub fn primary_stage(&self) -> RevealStage {
        self.primary
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some() || self.primary != RevealStage::Idle
    }

    pub fn has_pending(&self) -> bool {
        self.next_deadline().is_some()
    }

    /// Absolute time of the next scheduled transition
    pub fn next_deadline(&self) -> Option<f64> {
        let primary = self.accepted_at.and_then(|t0| {
            primary_index(self.primary).map(|i| t0 + self.primary_delays[i])
        });
        let letter = self.letter.and_then(|l| {
            let t0 = l.opened_at?;
            letter_index(l.stage).map(|i| t0 + self.letter_delays[i])
        });
        match (primary, letter) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Start the sequence. A second call before `reset` is ignored.
    pub fn accept(&mut self, now: f64) -> bool {
        if self.is_accepted() {
            log::debug!("Accept ignored, reveal already running");
            return false;
        }
        log::info!("Accepted! Starting reveal");
        self.accepted_at = Some(now);
        true
    }

    /// Open the keepsake letter (only once the actions are showing)
    pub fn open_letter(&mut self, now: f64) -> Option<RevealStage> {
        if self.primary != RevealStage::ActionsShown || self.letter.is_some() {
            log::debug!("Letter can't open from stage {}", self.stage().as_str());
            return None;
        }
        self.letter = Some(LetterSequence {
            stage: RevealStage::LetterOpening,
            opened_at: Some(now),
        });
        log::info!("Letter opening");
        Some(RevealStage::LetterOpening)
    }

    /// Close the letter, dropping its pending transitions
    pub fn dismiss_letter(&mut self) -> Option<RevealStage> {
        self.letter.take()?;
        log::info!("Letter dismissed");
        Some(self.primary)
    }

    /// Advance due transitions. Returns every stage entered, in order.
    pub fn tick(&mut self, now: f64) -> Vec<RevealStage> {
        let mut entered = Vec::new();

        if let Some(t0) = self.accepted_at {
            while let (Some(i), Some(next)) = (primary_index(self.primary), self.primary.next_primary()) {
                if now - t0 < self.primary_delays[i] {
                    break;
                }
                self.primary = next;
                log::info!("Reveal stage -> {}", next.as_str());
                entered.push(next);
            }
            if self.primary == RevealStage::ActionsShown {
                self.accepted_at = None;
            }
        }

        if let Some(letter) = self.letter.as_mut() {
            if let Some(t0) = letter.opened_at {
                while let (Some(i), Some(next)) = (letter_index(letter.stage), letter.stage.next_letter()) {
                    if now - t0 < self.letter_delays[i] {
                        break;
                    }
                    letter.stage = next;
                    log::info!("Reveal stage -> {}", next.as_str());
                    entered.push(next);
                }
                if letter.stage == RevealStage::LetterContentShown {
                    letter.opened_at = None;
                }
            }
        }

        entered
    }

    /// Drop every pending transition but keep the current stages (unmount)
    pub fn cancel_pending(&mut self) {
        self.accepted_at = None;
        if let Some(letter) = self.letter.as_mut() {
            letter.opened_at = None;
        }
    }

    /// Back to `Idle` with nothing scheduled
    pub fn reset(&mut self) {
        self.accepted_at = None;
        self.primary = RevealStage::Idle;
        self.letter = None;
    }
}

/// Index into the primary delay list for the transition out of `stage`
fn primary_index(stage: RevealStage) -> Option<usize> {
    match stage {
        RevealStage::Idle => Some(0),
        RevealStage::PrimaryShown => Some(1),
        RevealStage::SecondaryShown => Some(2),
        _ => None,
    }
}

/// Index into the letter delay list for the transition out of `stage`
fn letter_index(stage: RevealStage) -> Option<usize> {
    match stage {
        RevealStage::LetterOpening => Some(0),
        RevealStage::LetterOpen => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer() -> RevealSequencer {
        RevealSequencer::new(&Tuning::default())
    }

    fn run_to_actions(seq: &mut RevealSequencer) {
        seq.accept(0.0);
        seq.tick(8000.0);
        assert_eq!(seq.stage(), RevealStage::ActionsShown);
    }

    #[test]
    fn test_schedule_from_activation() {
        let mut seq = sequencer();
        let t = 10_000.0;
        assert!(seq.accept(t));
        assert!(seq.tick(t).is_empty());
        assert_eq!(seq.stage(), RevealStage::Idle);

        assert!(seq.tick(t + 1499.0).is_empty());
        assert_eq!(seq.tick(t + 1500.0), vec![RevealStage::PrimaryShown]);
        assert!(seq.tick(t + 4999.0).is_empty());
        assert_eq!(seq.tick(t + 5000.0), vec![RevealStage::SecondaryShown]);
        assert_eq!(seq.tick(t + 8000.0), vec![RevealStage::ActionsShown]);

        assert!(seq.tick(t + 60_000.0).is_empty());
        assert_eq!(seq.stage(), RevealStage::ActionsShown);
        assert!(!seq.has_pending());
    }

    #[test]
    fn test_late_tick_emits_every_stage_in_order() {
        let mut seq = sequencer();
        seq.accept(0.0);
        assert_eq!(
            seq.tick(20_000.0),
            vec![
                RevealStage::PrimaryShown,
                RevealStage::SecondaryShown,
                RevealStage::ActionsShown
            ]
        );
    }

    #[test]
    fn test_double_accept_does_not_restart() {
        let mut seq = sequencer();
        assert!(seq.accept(0.0));
        seq.tick(1500.0);
        assert!(!seq.accept(1600.0));
        // Still timed from the first click
        assert_eq!(seq.tick(5000.0), vec![RevealStage::SecondaryShown]);
    }

    #[test]
    fn test_letter_sub_schedule() {
        let mut seq = sequencer();
        run_to_actions(&mut seq);

        assert_eq!(seq.open_letter(9000.0), Some(RevealStage::LetterOpening));
        assert_eq!(seq.stage(), RevealStage::LetterOpening);
        assert!(seq.tick(10_499.0).is_empty());
        assert_eq!(seq.tick(10_500.0), vec![RevealStage::LetterOpen]);
        assert_eq!(seq.tick(11_500.0), vec![RevealStage::LetterContentShown]);
        assert!(!seq.has_pending());
    }

    #[test]
    fn test_letter_needs_actions() {
        let mut seq = sequencer();
        seq.accept(0.0);
        seq.tick(1500.0);
        assert_eq!(seq.open_letter(1600.0), None);
        assert_eq!(seq.stage(), RevealStage::PrimaryShown);
    }

    #[test]
    fn test_dismiss_drops_pending_letter_timers() {
        let mut seq = sequencer();
        run_to_actions(&mut seq);
        seq.open_letter(9000.0);
        assert_eq!(seq.dismiss_letter(), Some(RevealStage::ActionsShown));
        assert_eq!(seq.stage(), RevealStage::ActionsShown);
        assert!(seq.tick(20_000.0).is_empty());
        assert_eq!(seq.dismiss_letter(), None);

        // Reopening restarts the sub-schedule
        seq.open_letter(30_000.0);
        assert!(seq.tick(31_000.0).is_empty());
        assert_eq!(seq.tick(31_500.0), vec![RevealStage::LetterOpen]);
    }

    #[test]
    fn test_reset_cancels_everything() {
        let mut seq = sequencer();
        seq.accept(0.0);
        seq.tick(1500.0);
        seq.reset();
        assert_eq!(seq.stage(), RevealStage::Idle);
        assert!(!seq.has_pending());
        assert!(seq.tick(100_000.0).is_empty());
        assert!(seq.accept(200_000.0));
    }

    #[test]
    fn test_cancel_pending_freezes_stage() {
        let mut seq = sequencer();
        seq.accept(0.0);
        seq.tick(1500.0);
        seq.cancel_pending();
        assert!(seq.tick(100_000.0).is_empty());
        assert_eq!(seq.stage(), RevealStage::PrimaryShown);
    }

    #[test]
    fn test_next_deadline() {
        let mut seq = sequencer();
        assert_eq!(seq.next_deadline(), None);
        seq.accept(100.0);
        assert_eq!(seq.next_deadline(), Some(1600.0));
        seq.tick(1600.0);
        assert_eq!(seq.next_deadline(), Some(5100.0));
    }

    #[test]
    fn test_stage_order() {
        assert!(RevealStage::Idle < RevealStage::PrimaryShown);
        assert!(RevealStage::ActionsShown < RevealStage::LetterOpening);
        assert!(RevealStage::LetterOpen.is_letter());
        assert!(!RevealStage::ActionsShown.is_letter());
    }
}
