//! Timing profiles for the staged reveal
//!
//! Delays are hints for the presentation layer. Only their order matters to
//! the engines.

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Regular play
    #[default]
    Normal,
    /// Zero delays (simulation, tests)
    Instant,
    /// Scaled from another profile
    Custom,
}

/// Delay before a reveal step, in normal and fast mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepDelay {
    pub normal_ms: f64,
    pub fast_ms: f64,
}

impl StepDelay {
    /// Same delay regardless of fast mode
    pub const fn fixed(ms: f64) -> Self {
        Self {
            normal_ms: ms,
            fast_ms: ms,
        }
    }

    pub const fn new(normal_ms: f64, fast_ms: f64) -> Self {
        Self { normal_ms, fast_ms }
    }

    pub const ZERO: StepDelay = StepDelay::fixed(0.0);

    /// Effective delay for the current mode
    pub fn resolve(&self, fast: bool) -> f64 {
        if fast { self.fast_ms } else { self.normal_ms }
    }
}

/// Reveal timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub profile: TimingProfile,

    /// Nominal reel spin time shown before the first stop (ms)
    pub spin_duration_ms: f64,

    /// Delay before each reel stop (ms)
    pub reel_stop_delay_ms: f64,

    /// Delay before each reel stop once fast-forwarded (ms)
    pub fast_reel_stop_delay_ms: f64,

    /// Pause after the last reel stop (ms)
    pub post_reels_delay_ms: f64,

    /// Delay before each expanding reel (ms)
    pub expand_step_ms: f64,

    /// Pause after the last expansion (ms)
    pub post_expand_delay_ms: f64,

    /// Wheel spin animation (ms)
    pub wheel_spin_ms: f64,

    /// Case opening base duration (ms)
    pub case_open_base_ms: f64,

    /// Extra case opening time per opened case (ms)
    pub case_open_per_case_ms: f64,

    /// Stagger between case reels (ms)
    pub case_stagger_ms: f64,

    /// Battle reveal duration (ms)
    pub battle_ms: f64,

    /// Stagger between battle reel pairs (ms)
    pub battle_stagger_ms: f64,
}

impl TimingConfig {
    /// Regular play timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_duration_ms: 2000.0,
            reel_stop_delay_ms: 350.0,
            fast_reel_stop_delay_ms: 50.0,
            post_reels_delay_ms: 100.0,
            expand_step_ms: 300.0,
            post_expand_delay_ms: 400.0,
            wheel_spin_ms: 8000.0,
            case_open_base_ms: 4000.0,
            case_open_per_case_ms: 200.0,
            case_stagger_ms: 200.0,
            battle_ms: 4500.0,
            battle_stagger_ms: 300.0,
        }
    }

    /// No delays at all
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            ..Self::normal().scaled(0.0)
        }
    }

    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale every delay by `factor` (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            spin_duration_ms: self.spin_duration_ms * factor,
            reel_stop_delay_ms: self.reel_stop_delay_ms * factor,
            fast_reel_stop_delay_ms: self.fast_reel_stop_delay_ms * factor,
            post_reels_delay_ms: self.post_reels_delay_ms * factor,
            expand_step_ms: self.expand_step_ms * factor,
            post_expand_delay_ms: self.post_expand_delay_ms * factor,
            wheel_spin_ms: self.wheel_spin_ms * factor,
            case_open_base_ms: self.case_open_base_ms * factor,
            case_open_per_case_ms: self.case_open_per_case_ms * factor,
            case_stagger_ms: self.case_stagger_ms * factor,
            battle_ms: self.battle_ms * factor,
            battle_stagger_ms: self.battle_stagger_ms * factor,
        }
    }

    /// Reel stop delay, shortened by fast-forward
    pub fn reel_stop(&self) -> StepDelay {
        StepDelay::new(self.reel_stop_delay_ms, self.fast_reel_stop_delay_ms)
    }

    pub fn post_reels(&self) -> StepDelay {
        StepDelay::fixed(self.post_reels_delay_ms)
    }

    pub fn expand_step(&self) -> StepDelay {
        StepDelay::fixed(self.expand_step_ms)
    }

    pub fn post_expand(&self) -> StepDelay {
        StepDelay::fixed(self.post_expand_delay_ms)
    }

    pub fn wheel_spin(&self) -> StepDelay {
        StepDelay::fixed(self.wheel_spin_ms)
    }

    /// Delay before case reel `index` lands
    pub fn case_reel(&self, index: usize) -> StepDelay {
        if index == 0 {
            StepDelay::fixed(self.case_stagger_ms / 2.0)
        } else {
            StepDelay::fixed(self.case_stagger_ms)
        }
    }

    /// Time until all `count` opened cases are revealed
    pub fn cases_total(&self, count: usize) -> f64 {
        self.case_open_base_ms + count as f64 * self.case_open_per_case_ms
    }

    /// Delay before battle reel pair `index` lands
    pub fn battle_reel(&self, index: usize) -> StepDelay {
        if index == 0 {
            StepDelay::fixed(self.battle_stagger_ms / 3.0)
        } else {
            StepDelay::fixed(self.battle_stagger_ms)
        }
    }

    /// Total reel phase for `reels` reels, normal or fast
    pub fn total_reel_phase(&self, reels: usize, fast: bool) -> f64 {
        reels as f64 * self.reel_stop().resolve(fast)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// Running clock used while a reveal is consumed
#[derive(Debug, Clone, Default)]
pub struct TimestampGenerator {
    current_ms: f64,
}

impl TimestampGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.current_ms = 0.0;
    }

    pub fn current(&self) -> f64 {
        self.current_ms
    }

    /// Advance by a duration and return the new timestamp
    pub fn advance(&mut self, duration_ms: f64) -> f64 {
        self.current_ms += duration_ms.max(0.0);
        self.current_ms
    }

    /// Advance by a step delay under the given mode
    pub fn step(&mut self, delay: StepDelay, fast: bool) -> f64 {
        self.advance(delay.resolve(fast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_constants() {
        let t = TimingConfig::normal();
        assert_eq!(t.reel_stop().resolve(false), 350.0);
        assert_eq!(t.reel_stop().resolve(true), 50.0);
        assert_eq!(t.cases_total(3), 4600.0);
        assert_eq!(t.total_reel_phase(6, false), 2100.0);
    }

    #[test]
    fn test_instant_is_all_zero() {
        let t = TimingConfig::instant();
        assert_eq!(t.profile, TimingProfile::Instant);
        assert_eq!(t.reel_stop().resolve(false), 0.0);
        assert_eq!(t.wheel_spin_ms, 0.0);
        assert_eq!(t.battle_ms, 0.0);
    }

    #[test]
    fn test_fixed_delay_ignores_fast() {
        let d = StepDelay::fixed(300.0);
        assert_eq!(d.resolve(true), d.resolve(false));
    }

    #[test]
    fn test_timestamp_generator() {
        let t = TimingConfig::normal();
        let mut clock = TimestampGenerator::new();

        let t1 = clock.step(t.reel_stop(), false);
        let t2 = clock.step(t.reel_stop(), true);
        assert_eq!(t1, 350.0);
        assert_eq!(t2, 400.0);

        clock.reset();
        assert_eq!(clock.current(), 0.0);
    }
}
