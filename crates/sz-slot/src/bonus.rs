//! Free-spin bonus state
//!
//! Lifecycle: inactive → started (N spins) → consumed one spin at a time,
//! optionally extended by retriggers → ended with a summary, then reset.

use serde::{Deserialize, Serialize};

use sz_core::Credits;

use crate::symbols::Symbol;

/// Persisted free-spin state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusState {
    pub active: bool,
    pub spins_remaining: u32,
    pub spins_total: u32,
    /// Chosen once at bonus start
    pub expanding_symbol: Option<Symbol>,
    /// Wins collected during this bonus
    pub accumulated_win: Credits,
}

/// Delivered once when a bonus runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSummary {
    pub total_win: Credits,
    pub spins_played: u32,
    pub expanding_symbol: Option<Symbol>,
}

/// What a spin did to the bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BonusEvent {
    Started { spins: u32, expanding_symbol: Symbol },
    Retriggered { added: u32, spins_total: u32 },
    Ended(BonusSummary),
}

impl BonusState {
    /// Start a fresh bonus
    pub fn start(&mut self, spins: u32, expanding_symbol: Symbol) -> BonusEvent {
        *self = BonusState {
            active: true,
            spins_remaining: spins,
            spins_total: spins,
            expanding_symbol: Some(expanding_symbol),
            accumulated_win: Credits::ZERO,
        };
        BonusEvent::Started {
            spins,
            expanding_symbol,
        }
    }

    /// Extend a running bonus. Accumulated win and expanding symbol are kept.
    pub fn retrigger(&mut self, added: u32) -> BonusEvent {
        self.spins_remaining = self.spins_remaining.saturating_add(added);
        self.spins_total = self.spins_total.saturating_add(added);
        BonusEvent::Retriggered {
            added,
            spins_total: self.spins_total,
        }
    }

    /// Use up one free spin; returns its 1-based number
    pub fn consume_spin(&mut self) -> u32 {
        self.spins_remaining = self.spins_remaining.saturating_sub(1);
        self.spins_total.saturating_sub(self.spins_remaining)
    }

    pub fn add_win(&mut self, win: Credits) {
        self.accumulated_win += win;
    }

    pub fn is_exhausted(&self) -> bool {
        self.active && self.spins_remaining == 0
    }

    /// Close the bonus and reset to inactive
    pub fn finish(&mut self) -> BonusSummary {
        let summary = BonusSummary {
            total_win: self.accumulated_win,
            spins_played: self.spins_total,
            expanding_symbol: self.expanding_symbol,
        };
        *self = BonusState::default();
        summary
    }
}
