//! Wheel Engine — bets, spin and settlement
//!
//! Same reducer shape as the slot: commands take the current [`WheelState`]
//! and return the next one, or a [`Declined`].

use std::collections::{BTreeSet, VecDeque};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use sz_core::{Credits, Declined, GameRng, Outcome, SzResult};
use sz_stage::{Reveal, Stage, StepDelay};

use crate::bet::{Bet, BetKind, BoardCell};
use crate::config::WheelConfig;
use crate::pockets::{MAX_POCKET, POCKET_COUNT, PocketColor, color_of};

/// Persistent wheel state owned by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelState {
    pub credit: Credits,
    /// Selected chip
    pub chip: Credits,
    /// Pending bets keyed by cell id, in placement order
    pub bets: IndexMap<String, Bet>,
    /// Recent results, newest first
    pub history: VecDeque<u8>,
    pub last_result: Option<u8>,
    pub last_win: Credits,
    /// Test mode: the next straight bet lands on the redirect number
    pub redirect_armed: bool,
}

impl WheelState {
    /// Sum of pending stakes
    pub fn total_staked(&self) -> Credits {
        self.bets.values().map(|b| b.amount).sum()
    }

    /// Stake on one cell
    pub fn stake_on(&self, cell_id: &str) -> Credits {
        self.bets.get(cell_id).map(|b| b.amount).unwrap_or_default()
    }
}

/// One bet's result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetResult {
    pub id: String,
    pub kind: BetKind,
    pub amount: Credits,
    pub payout: Credits,
}

/// Everything a spin decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelSettlement {
    pub spin_id: u64,
    pub number: u8,
    pub color: PocketColor,
    pub total_staked: Credits,
    pub bets: Vec<BetResult>,
    pub total_payout: Credits,
}

/// Result of a spin
#[derive(Debug, Clone)]
pub struct WheelOutcome {
    pub state: WheelState,
    pub settlement: WheelSettlement,
    pub reveal: Reveal,
}

/// Running statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WheelStats {
    pub spins: u64,
    pub total_staked: Credits,
    pub total_paid: Credits,
    pub winning_spins: u64,
    pub hits: Vec<u64>,
}

impl WheelStats {
    /// Return to player, percent
    pub fn rtp(&self) -> f64 {
        if self.total_staked.is_zero() {
            0.0
        } else {
            self.total_paid.as_f64() / self.total_staked.as_f64() * 100.0
        }
    }

    fn record(&mut self, settlement: &WheelSettlement) {
        if self.hits.len() != POCKET_COUNT {
            self.hits = vec![0; POCKET_COUNT];
        }
        self.spins += 1;
        self.total_staked += settlement.total_staked;
        self.total_paid += settlement.total_payout;
        if !settlement.total_payout.is_zero() {
            self.winning_spins += 1;
        }
        self.hits[settlement.number as usize] += 1;
    }
}

/// The wheel outcome engine
pub struct WheelTable {
    config: WheelConfig,
    rng: GameRng,
    spin_count: u64,
    stats: WheelStats,
}

impl WheelTable {
    pub fn new(config: WheelConfig) -> SzResult<Self> {
        Self::with_rng(config, GameRng::from_entropy())
    }

    pub fn seeded(config: WheelConfig, seed: u64) -> SzResult<Self> {
        Self::with_rng(config, GameRng::seeded(seed))
    }

    pub fn with_rng(config: WheelConfig, rng: GameRng) -> SzResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            spin_count: 0,
            stats: WheelStats::default(),
        })
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn stats(&self) -> &WheelStats {
        &self.stats
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    pub fn initial_state(&self) -> WheelState {
        WheelState {
            credit: self.config.initial_credit,
            chip: self.config.default_chip,
            bets: IndexMap::new(),
            history: VecDeque::with_capacity(self.config.history_len),
            last_result: None,
            last_win: Credits::ZERO,
            redirect_armed: false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BETTING
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn select_chip(&self, state: &WheelState, chip: Credits) -> Outcome<WheelState> {
        if !self.config.chips.contains(&chip) {
            return Err(Declined::InvalidBet(format!("{} is not a chip", chip)));
        }
        Ok(WheelState {
            chip,
            ..state.clone()
        })
    }

    /// Flip redirect test mode
    pub fn toggle_redirect(&self, state: &WheelState) -> WheelState {
        WheelState {
            redirect_armed: !state.redirect_armed,
            ..state.clone()
        }
    }

    /// Place the selected chip on a board cell
    pub fn place_on(&self, state: &WheelState, cell: &BoardCell) -> Outcome<WheelState> {
        let numbers: Vec<u8> = cell.numbers.iter().copied().collect();
        self.place_bet(state, cell.kind, &numbers, &cell.id)
    }

    /// Place the selected chip on `numbers` under `cell_id`.
    ///
    /// Straight bets must target zero or an open number. Repeated bets on
    /// the same cell add to the existing stake.
    pub fn place_bet(
        &self,
        state: &WheelState,
        kind: BetKind,
        numbers: &[u8],
        cell_id: &str,
    ) -> Outcome<WheelState> {
        let mut next = state.clone();
        let mut numbers: BTreeSet<u8> = numbers.iter().copied().collect();
        let mut cell_id = cell_id.to_string();

        if numbers.is_empty() || numbers.iter().any(|&n| n > MAX_POCKET) {
            return Err(Declined::InvalidBet(format!("{} covers no valid pocket", cell_id)));
        }

        if kind == BetKind::Straight {
            if next.redirect_armed {
                let target = self.config.redirect_number;
                numbers = BTreeSet::from([target]);
                cell_id = format!("s-{}", target);
                next.redirect_armed = false;
                log::debug!("[WheelTable] Straight bet redirected to {}", target);
            }
            if numbers.len() != 1 {
                return Err(Declined::InvalidBet(format!(
                    "straight bet {} covers {} numbers",
                    cell_id,
                    numbers.len()
                )));
            }
            if let Some(&n) = numbers.first() {
                if !self.config.straight_allowed(n) {
                    return Err(Declined::RestrictedNumber(n));
                }
            }
        }

        let chip = next.chip;
        next.credit = next.credit.checked_sub(chip).ok_or(Declined::InsufficientFunds {
            required: chip,
            available: next.credit,
        })?;

        next.bets
            .entry(cell_id.clone())
            .and_modify(|b| b.amount += chip)
            .or_insert_with(|| Bet {
                id: cell_id,
                kind,
                numbers,
                amount: chip,
            });
        Ok(next)
    }

    /// Refund every pending bet
    pub fn clear_bets(&self, state: &WheelState) -> WheelState {
        let refund = state.total_staked();
        WheelState {
            credit: state.credit + refund,
            bets: IndexMap::new(),
            last_result: None,
            last_win: Credits::ZERO,
            ..state.clone()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn spin(&mut self, state: &WheelState) -> Outcome<WheelOutcome> {
        if state.bets.is_empty() {
            return Err(Declined::NoBets);
        }
        let number = self.rng.index(POCKET_COUNT) as u8;
        Ok(self.settle(state, number))
    }

    /// Settle the pending bets on a given pocket (audit replay, tests)
    pub fn spin_with_number(&mut self, state: &WheelState, number: u8) -> Outcome<WheelOutcome> {
        if state.bets.is_empty() {
            return Err(Declined::NoBets);
        }
        if number > MAX_POCKET {
            return Err(Declined::OutOfRange(format!("pocket {}", number)));
        }
        Ok(self.settle(state, number))
    }

    fn settle(&mut self, state: &WheelState, number: u8) -> WheelOutcome {
        self.spin_count += 1;
        let mut next = state.clone();

        let bets: Vec<BetResult> = next
            .bets
            .drain(..)
            .map(|(id, bet)| BetResult {
                payout: bet.payout(number),
                id,
                kind: bet.kind,
                amount: bet.amount,
            })
            .collect();
        let total_staked: Credits = bets.iter().map(|b| b.amount).sum();
        let total_payout: Credits = bets.iter().map(|b| b.payout).sum();

        next.credit += total_payout;
        next.last_win = total_payout;
        next.last_result = Some(number);
        next.history.push_front(number);
        next.history.truncate(self.config.history_len);

        let settlement = WheelSettlement {
            spin_id: self.spin_count,
            number,
            color: color_of(number),
            total_staked,
            bets,
            total_payout,
        };
        self.stats.record(&settlement);
        log::debug!(
            "[WheelTable] Spin #{} landed {} ({:?}): staked {} paid {}",
            settlement.spin_id,
            number,
            settlement.color,
            total_staked,
            total_payout
        );

        let reveal = Reveal::new()
            .then(Stage::WheelSpinStart { total_staked }, StepDelay::ZERO)
            .then(
                Stage::WheelSettle {
                    number,
                    payout: total_payout,
                },
                self.config.timing.wheel_spin(),
            );

        WheelOutcome {
            state: next,
            settlement,
            reveal,
        }
    }
}
