//! Slot configuration
//!
//! Defaults reproduce the live game. Money is in minor units
//! (`10` = 0.10 credits).

use serde::{Deserialize, Serialize};

use sz_core::{Credits, SzError, SzResult, WeightedSampler};
use sz_stage::TimingConfig;

use crate::paytable::{PayTable, Payline, standard_paylines};
use crate::symbols::Symbol;

/// Grid specification (reels × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub reels: u8,
    pub rows: u8,
}

impl GridSpec {
    pub const fn standard_6x3() -> Self {
        Self { reels: 6, rows: 3 }
    }

    pub fn total_positions(&self) -> usize {
        self.reels as usize * self.rows as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_6x3()
    }
}

/// Free-spin bonus rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    /// BOOKs needed to start or retrigger
    pub trigger_count: usize,
    /// Chance that a 2-BOOK spin is upgraded to a trigger
    pub free_spins_chance: f64,
    /// Spins awarded on start
    pub award: u32,
    /// Spins added on retrigger
    pub retrigger_award: u32,
    /// Reels that receive a BOOK in forced-books test mode
    pub forced_book_reels: Vec<usize>,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            trigger_count: 3,
            free_spins_chance: 0.10,
            award: 10,
            retrigger_award: 10,
            forced_book_reels: vec![0, 2, 4],
        }
    }
}

/// Complete slot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    pub grid: GridSpec,
    /// Draw weight per symbol, in [`Symbol::ALL`] order
    pub weights: Vec<f64>,
    pub paytable: PayTable,
    pub paylines: Vec<Payline>,
    /// Bet-per-line denominations, ascending
    pub bet_values: Vec<Credits>,
    pub default_bet: Credits,
    pub default_lines: usize,
    pub initial_credit: Credits,
    pub bonus: BonusConfig,
    /// Intended long-run payback. Documentation only, never enforced.
    pub target_rtp: f64,
    pub timing: TimingConfig,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::standard_6x3(),
            weights: vec![2.0, 3.0, 4.0, 6.0, 6.0, 20.0, 20.0, 25.0, 25.0, 28.0],
            paytable: PayTable::standard(),
            paylines: standard_paylines(),
            bet_values: [10, 20, 40, 50, 100, 200, 400, 500, 1000, 2000, 4000, 10000]
                .into_iter()
                .map(Credits::from_minor)
                .collect(),
            default_bet: Credits::from_minor(10),
            default_lines: 10,
            initial_credit: Credits::from_whole(1000),
            bonus: BonusConfig::default(),
            target_rtp: 0.90,
            timing: TimingConfig::normal(),
        }
    }
}

impl SlotConfig {
    /// Defaults with zero reveal delays (simulation, tests)
    pub fn instant() -> Self {
        Self {
            timing: TimingConfig::instant(),
            ..Self::default()
        }
    }

    pub fn max_lines(&self) -> usize {
        self.paylines.len()
    }

    /// Weighted sampler over the symbol set
    pub fn symbol_sampler(&self) -> SzResult<WeightedSampler<Symbol>> {
        WeightedSampler::from_parallel(&Symbol::ALL, &self.weights)
    }

    /// Check every invariant the engine relies on
    pub fn validate(&self) -> SzResult<()> {
        let reels = self.grid.reels as usize;
        let rows = self.grid.rows as usize;

        if reels == 0 || rows == 0 {
            return Err(SzError::InvalidConfig("grid must have reels and rows".into()));
        }
        if rows > Symbol::COUNT {
            return Err(SzError::InvalidConfig(format!(
                "{} rows cannot hold distinct symbols per column",
                rows
            )));
        }

        self.symbol_sampler()?;
        self.paytable.validate()?;

        if self.paylines.is_empty() {
            return Err(SzError::InvalidConfig("no paylines".into()));
        }
        for (i, line) in self.paylines.iter().enumerate() {
            if line.pattern.len() != reels {
                return Err(SzError::InvalidConfig(format!(
                    "payline {} has {} positions for {} reels",
                    i,
                    line.pattern.len(),
                    reels
                )));
            }
            if line.pattern.iter().any(|&r| r as usize >= rows) {
                return Err(SzError::InvalidConfig(format!(
                    "payline {} points outside {} rows",
                    i, rows
                )));
            }
        }

        if self.bet_values.is_empty() || self.bet_values.iter().any(|b| b.is_zero()) {
            return Err(SzError::InvalidConfig("bet values must be positive".into()));
        }
        if !self.bet_values.windows(2).all(|w| w[0] < w[1]) {
            return Err(SzError::InvalidConfig("bet values must ascend".into()));
        }
        if !self.bet_values.contains(&self.default_bet) {
            return Err(SzError::InvalidConfig(format!(
                "default bet {} is not a denomination",
                self.default_bet
            )));
        }
        if self.default_lines == 0 || self.default_lines > self.max_lines() {
            return Err(SzError::InvalidConfig(format!(
                "default lines {} outside 1..={}",
                self.default_lines,
                self.max_lines()
            )));
        }

        let chance = self.bonus.free_spins_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(SzError::InvalidConfig(format!(
                "free spins chance {} outside [0, 1]",
                chance
            )));
        }
        if self.bonus.trigger_count == 0 || self.bonus.trigger_count > self.grid.total_positions() {
            return Err(SzError::InvalidConfig("bonus trigger count out of range".into()));
        }

        Ok(())
    }
}
