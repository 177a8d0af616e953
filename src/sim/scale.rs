//! Yes/No scale coupling
//!
//! Every catch of the No button shrinks it and grows the Yes button by the
//! same step. Scales are derived from the catch count rather than accumulated,
//! so `k` catches always land on exactly `initial ± k·step` (clamped).


use crate::tuning::Tuning;

/// Current scale of both buttons
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePair {
    pub yes_scale: f32,
    pub no_scale: f32,
}

impl ScalePair {
    pub fn uniform(scale: f32) -> Self {
        Self {
            yes_scale: scale,
            no_scale: scale,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScaleCoupler {
    initial: f32,
    step: f32,
    min: f32,
    max: f32,
    captures: u32,
    pair: ScalePair,
}

impl ScaleCoupler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            initial: tuning.initial_scale,
            step: tuning.scale_step,
            min: tuning.min_scale,
            max: tuning.max_scale,
            captures: 0,
            pair: ScalePair::uniform(tuning.initial_scale),
        }
    }

    pub fn pair(&self) -> ScalePair {
        self.pair
    }

    pub fn captures(&self) -> u32 {
        self.captures
    }

    /// One discrete step: No shrinks, Yes grows
    pub fn on_capture(&mut self) -> ScalePair {
        self.captures = self.captures.saturating_add(1);
        let delta = self.step * self.captures as f32;
        self.pair = ScalePair {
            yes_scale: (self.initial + delta).min(self.max),
            no_scale: (self.initial - delta).max(self.min),
        };
        log::debug!(
            "Capture #{}: yes {:.2}, no {:.2}",
            self.captures,
            self.pair.yes_scale,
            self.pair.no_scale
        );
        self.pair
    }

    pub fn reset(&mut self) {
        self.captures = 0;
        self.pair = ScalePair::uniform(self.initial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_capture() {
        let mut coupler = ScaleCoupler::new(&Tuning::default());
        let pair = coupler.on_capture();
        assert!((pair.yes_scale - 1.05).abs() < 1e-6);
        assert!((pair.no_scale - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_no_floor_and_yes_ceiling() {
        let mut coupler = ScaleCoupler::new(&Tuning::default());
        for _ in 0..100 {
            coupler.on_capture();
        }
        let pair = coupler.pair();
        assert_eq!(pair.no_scale, 0.3);
        assert_eq!(pair.yes_scale, 2.0);
    }

    #[test]
    fn test_reset() {
        let mut coupler = ScaleCoupler::new(&Tuning::default());
        coupler.on_capture();
        coupler.on_capture();
        coupler.reset();
        assert_eq!(coupler.pair(), ScalePair::uniform(1.0));
        assert_eq!(coupler.captures(), 0);
    }

    proptest! {
        #[test]
        fn prop_scales_follow_formula(k in 0u32..200, step in 0.01f32..0.2) {
            let mut tuning = Tuning::default();
            tuning.scale_step = step;
            let mut coupler = ScaleCoupler::new(&tuning);
            for _ in 0..k {
                coupler.on_capture();
            }
            let pair = coupler.pair();
            if k > 0 {
                prop_assert_eq!(pair.yes_scale, (1.0 + step * k as f32).min(2.0));
                prop_assert_eq!(pair.no_scale, (1.0 - step * k as f32).max(0.3));
            }
            prop_assert!((0.3..=2.0).contains(&pair.yes_scale));
            prop_assert!((0.3..=2.0).contains(&pair.no_scale));
        }
    }
}
