//! Wheel session — one player's table and the in-flight wheel spin
//!
//! The result is committed when the spin starts. Balance, result and history
//! shown to the player only change once the reveal reaches the settle step.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use sz_core::{Credits, Declined, Outcome};
use sz_stage::{Reveal, Stage, StageEvent, StageTrace};

use crate::bet::{BetKind, BoardCell};
use crate::engine::{WheelSettlement, WheelState, WheelTable};
use crate::pockets::{PocketColor, color_of};

/// What the player currently sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelView {
    pub credit: Credits,
    pub result: Option<u8>,
    pub color: Option<PocketColor>,
    pub history: VecDeque<u8>,
    pub last_win: Credits,
}

/// A wheel table bound to one player's state
pub struct WheelSession {
    table: WheelTable,
    state: WheelState,
    view: WheelView,
    message: String,
    reveal: Option<Reveal>,
    pending: Option<WheelSettlement>,
    trace: Option<StageTrace>,
    last_trace: Option<StageTrace>,
}

impl WheelSession {
    pub fn new(table: WheelTable) -> Self {
        let state = table.initial_state();
        Self::with_state(table, state)
    }

    pub fn with_state(table: WheelTable, state: WheelState) -> Self {
        let view = WheelView {
            credit: state.credit,
            result: state.last_result,
            color: state.last_result.map(color_of),
            history: state.history.clone(),
            last_win: state.last_win,
        };
        Self {
            table,
            state,
            view,
            message: String::new(),
            reveal: None,
            pending: None,
            trace: None,
            last_trace: None,
        }
    }

    pub fn state(&self) -> &WheelState {
        &self.state
    }

    pub fn view(&self) -> &WheelView {
        &self.view
    }

    pub fn table(&self) -> &WheelTable {
        &self.table
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_busy(&self) -> bool {
        self.reveal.is_some()
    }

    pub fn last_trace(&self) -> Option<&StageTrace> {
        self.last_trace.as_ref()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BETTING
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn select_chip(&mut self, chip: Credits) -> Outcome<()> {
        self.ensure_idle()?;
        let next = self
            .table
            .select_chip(&self.state, chip)
            .inspect_err(|d| self.note_decline(d))?;
        self.commit(next);
        Ok(())
    }

    pub fn toggle_redirect(&mut self) -> Outcome<bool> {
        self.ensure_idle()?;
        let next = self.table.toggle_redirect(&self.state);
        self.commit(next);
        Ok(self.state.redirect_armed)
    }

    pub fn place_bet(&mut self, kind: BetKind, numbers: &[u8], cell_id: &str) -> Outcome<Credits> {
        self.ensure_idle()?;
        let next = self
            .table
            .place_bet(&self.state, kind, numbers, cell_id)
            .inspect_err(|d| self.note_decline(d))?;
        self.commit(next);
        self.message.clear();
        Ok(self.state.total_staked())
    }

    /// Place the selected chip on a board cell by id (`s-23`, `c-1`, `red`, …)
    pub fn place_on(&mut self, cell_id: &str) -> Outcome<Credits> {
        let cell = BoardCell::by_id(cell_id)
            .ok_or_else(|| Declined::InvalidBet(format!("unknown cell {}", cell_id)))
            .inspect_err(|d| self.note_decline(d))?;
        let numbers: Vec<u8> = cell.numbers.iter().copied().collect();
        self.place_bet(cell.kind, &numbers, &cell.id)
    }

    pub fn clear_bets(&mut self) -> Outcome<Credits> {
        self.ensure_idle()?;
        let refund = self.state.total_staked();
        let next = self.table.clear_bets(&self.state);
        self.commit(next);
        self.view.result = None;
        self.view.color = None;
        Ok(refund)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN / REVEAL
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn spin(&mut self) -> Outcome<u64> {
        self.ensure_idle()?;
        let outcome = self
            .table
            .spin(&self.state)
            .inspect_err(|d| self.note_decline(d))?;

        let settlement = outcome.settlement;
        self.state = outcome.state;
        self.view.credit = self.state.credit.saturating_sub(settlement.total_payout);
        self.view.result = None;
        self.view.color = None;
        self.view.last_win = Credits::ZERO;
        self.message = "No more bets".to_string();

        let spin_id = settlement.spin_id;
        self.trace = Some(
            StageTrace::new(format!("wheel-{}", spin_id), "wheel").with_seed(self.table.rng_seed()),
        );
        self.pending = Some(settlement);
        self.reveal = Some(outcome.reveal);
        Ok(spin_id)
    }

    pub fn advance(&mut self) -> Option<StageEvent> {
        let reveal = self.reveal.as_mut()?;
        let event = reveal.next_event();
        let finished = reveal.is_finished();

        if let Some(event) = &event {
            if let Some(trace) = self.trace.as_mut() {
                trace.push(event.clone());
            }
            if let Stage::WheelSettle { number, payout } = event.stage {
                self.message = if payout.is_zero() {
                    format!("{}: no win", number)
                } else {
                    format!("{}: WIN {}", number, payout)
                };
            }
        }
        if finished {
            self.settle_view();
        }
        event
    }

    pub fn finish_reveal(&mut self) -> Vec<StageEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.advance() {
            events.push(event);
        }
        events
    }

    fn settle_view(&mut self) {
        self.reveal = None;
        if let Some(trace) = self.trace.take() {
            self.last_trace = Some(trace);
        }
        if let Some(settlement) = self.pending.take() {
            self.view.credit = self.state.credit;
            self.view.result = Some(settlement.number);
            self.view.color = Some(settlement.color);
            self.view.history = self.state.history.clone();
            self.view.last_win = settlement.total_payout;
        }
    }

    fn commit(&mut self, state: WheelState) {
        self.state = state;
        self.view.credit = self.state.credit;
        self.view.last_win = self.state.last_win;
    }

    fn ensure_idle(&mut self) -> Outcome<()> {
        if self.is_busy() {
            let declined = Declined::Busy;
            self.note_decline(&declined);
            return Err(declined);
        }
        Ok(())
    }

    fn note_decline(&mut self, declined: &Declined) {
        log::warn!("[WheelSession] Declined: {}", declined);
        self.message = declined.to_string();
    }
}
