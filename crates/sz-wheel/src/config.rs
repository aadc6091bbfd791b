//! Wheel configuration

use serde::{Deserialize, Serialize};

use sz_core::{Credits, SzError, SzResult};
use sz_stage::TimingConfig;

use crate::pockets::MAX_POCKET;

/// Complete wheel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub initial_credit: Credits,
    /// Chip denominations, ascending
    pub chips: Vec<Credits>,
    pub default_chip: Credits,
    /// Numbers open for straight bets besides zero
    pub straight_numbers: Vec<u8>,
    /// Where an armed redirect sends the next straight bet
    pub redirect_number: u8,
    /// Results kept in history, newest first
    pub history_len: usize,
    pub timing: TimingConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            initial_credit: Credits::from_whole(1000),
            chips: [1, 5, 10, 25].into_iter().map(Credits::from_whole).collect(),
            default_chip: Credits::from_whole(5),
            straight_numbers: vec![5, 8, 10, 11, 13, 16, 23, 24, 27, 30, 33, 36],
            redirect_number: 23,
            history_len: 10,
            timing: TimingConfig::normal(),
        }
    }
}

impl WheelConfig {
    /// Defaults with zero reveal delays
    pub fn instant() -> Self {
        Self {
            timing: TimingConfig::instant(),
            ..Self::default()
        }
    }

    /// Zero is always open; other numbers must be listed
    pub fn straight_allowed(&self, n: u8) -> bool {
        n == 0 || self.straight_numbers.contains(&n)
    }

    pub fn validate(&self) -> SzResult<()> {
        if self.chips.is_empty() || self.chips.iter().any(|c| c.is_zero()) {
            return Err(SzError::InvalidConfig("chips must be positive".into()));
        }
        if !self.chips.contains(&self.default_chip) {
            return Err(SzError::InvalidConfig(format!(
                "default chip {} is not a denomination",
                self.default_chip
            )));
        }
        if let Some(n) = self.straight_numbers.iter().find(|&&n| n > MAX_POCKET) {
            return Err(SzError::InvalidConfig(format!("straight number {} off the wheel", n)));
        }
        if !self.straight_allowed(self.redirect_number) {
            return Err(SzError::InvalidConfig(format!(
                "redirect number {} is not open for straight bets",
                self.redirect_number
            )));
        }
        if self.history_len == 0 {
            return Err(SzError::InvalidConfig("history must keep at least one result".into()));
        }
        Ok(())
    }
}
