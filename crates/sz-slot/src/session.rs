//! Slot session — one player's machine, committed state and in-flight reveal
//!
//! The session commits each spin immediately but keeps what the player sees
//! (reels, win lines, balance) behind the reveal. While a reveal runs the
//! session is busy: another spin request fast-forwards it, everything else is
//! declined.

use serde::{Deserialize, Serialize};

use sz_core::{Credits, Declined, Outcome};
use sz_stage::{Reveal, Stage, StageEvent, StageTrace};

use crate::bonus::{BonusEvent, BonusSummary};
use crate::engine::{SlotMachine, SlotState, SpinSettlement};
use crate::gamble::{CardColor, GambleRound};
use crate::grid::{Cell, Grid};
use crate::paytable::LineWin;
use crate::symbols::Symbol;

/// What a spin request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinResponse {
    /// A new round was settled and its reveal started
    Started { spin_id: u64 },
    /// A reveal was running; it now runs in fast mode
    FastForwarded,
    /// Nothing happened
    Declined(Declined),
}

/// What the player currently sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub credit: Credits,
    pub grid: Grid,
    pub win_lines: Vec<LineWin>,
    pub winning_cells: Vec<Cell>,
    pub last_win: Credits,
}

/// A slot machine bound to one player's state
pub struct SlotSession {
    machine: SlotMachine,
    state: SlotState,
    view: SlotView,
    message: String,
    reveal: Option<Reveal>,
    pending: Option<SpinSettlement>,
    trace: Option<StageTrace>,
    last_trace: Option<StageTrace>,
    bonus_summary: Option<BonusSummary>,
}

impl SlotSession {
    pub fn new(mut machine: SlotMachine) -> Self {
        let state = machine.initial_state();
        Self::with_state(machine, state)
    }

    /// Resume from a saved state
    pub fn with_state(machine: SlotMachine, state: SlotState) -> Self {
        let view = SlotView {
            credit: state.credit,
            grid: state.grid.clone(),
            win_lines: Vec::new(),
            winning_cells: Vec::new(),
            last_win: state.last_win,
        };
        Self {
            machine,
            state,
            view,
            message: String::new(),
            reveal: None,
            pending: None,
            trace: None,
            last_trace: None,
            bonus_summary: None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Committed state (already includes the round being revealed)
    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn view(&self) -> &SlotView {
        &self.view
    }

    pub fn machine(&self) -> &SlotMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut SlotMachine {
        &mut self.machine
    }

    /// Last status line shown to the player
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_busy(&self) -> bool {
        self.reveal.is_some()
    }

    pub fn is_fast(&self) -> bool {
        self.reveal.as_ref().is_some_and(|r| r.is_fast())
    }

    /// Trace of the last completed round
    pub fn last_trace(&self) -> Option<&StageTrace> {
        self.last_trace.as_ref()
    }

    /// Bonus summary, handed out once after the bonus ends
    pub fn take_bonus_summary(&mut self) -> Option<BonusSummary> {
        self.bonus_summary.take()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN / REVEAL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Spin, or fast-forward the running reveal
    pub fn spin(&mut self) -> SpinResponse {
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.fast_forward();
            return SpinResponse::FastForwarded;
        }

        match self.machine.spin(&self.state) {
            Ok(outcome) => {
                let spin_id = outcome.settlement.spin_id;
                self.begin_reveal(outcome.state, outcome.settlement, outcome.reveal);
                SpinResponse::Started { spin_id }
            }
            Err(declined) => {
                self.note_decline(&declined);
                SpinResponse::Declined(declined)
            }
        }
    }

    /// Settle a given grid through the session (replay)
    pub fn spin_with_grid(&mut self, grid: Grid) -> Outcome<u64> {
        self.ensure_idle()?;
        let outcome = self
            .machine
            .spin_with_grid(&self.state, grid)
            .inspect_err(|d| self.note_decline(d))?;
        let spin_id = outcome.settlement.spin_id;
        self.begin_reveal(outcome.state, outcome.settlement, outcome.reveal);
        Ok(spin_id)
    }

    fn begin_reveal(&mut self, state: SlotState, settlement: SpinSettlement, reveal: Reveal) {
        self.state = state;
        self.view.credit = self.state.credit.saturating_sub(settlement.total_win);
        self.view.win_lines.clear();
        self.view.winning_cells.clear();
        self.view.last_win = Credits::ZERO;
        self.message = match settlement.free_spin {
            Some(n) => format!("Free spin {} of {}", n, self.state.bonus.spins_total.max(n)),
            None => "Good luck!".to_string(),
        };

        let trace = StageTrace::new(format!("spin-{}", settlement.spin_id), "slot")
            .with_seed(self.machine.rng_seed());
        self.trace = Some(trace);
        self.pending = Some(settlement);
        self.reveal = Some(reveal);
    }

    /// Emit the next reveal step and apply it to the view
    pub fn advance(&mut self) -> Option<StageEvent> {
        let reveal = self.reveal.as_mut()?;
        let event = reveal.next_event();
        let finished = reveal.is_finished();

        if let Some(event) = &event {
            self.apply(&event.stage);
            if let Some(trace) = self.trace.as_mut() {
                trace.push(event.clone());
            }
        }
        if finished {
            self.settle_view();
        }
        event
    }

    /// Run the reveal to the end
    pub fn finish_reveal(&mut self) -> Vec<StageEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.advance() {
            events.push(event);
        }
        events
    }

    fn apply(&mut self, stage: &Stage) {
        match stage {
            Stage::ReelStop {
                reel_index,
                symbols,
            } => {
                let column = symbols
                    .iter()
                    .filter_map(|&i| Symbol::from_index(i as usize))
                    .collect();
                self.view.grid.set_column(*reel_index as usize, column);
            }
            Stage::ReelExpand { reel_index, symbol } => {
                if let Some(symbol) = Symbol::from_index(*symbol as usize) {
                    let rows = self.view.grid.row_count();
                    self.view.grid.set_column(*reel_index as usize, vec![symbol; rows]);
                }
            }
            Stage::FeatureEnter {
                spins,
                expanding_symbol,
            } => {
                let symbol = Symbol::from_index(*expanding_symbol as usize)
                    .map(|s| s.display_name())
                    .unwrap_or("?");
                self.message = format!("FREE SPINS! {} spins, expanding {}", spins, symbol);
            }
            Stage::FeatureRetrigger { added, total } => {
                self.message = format!("+{} free spins ({} total)", added, total);
            }
            Stage::FeatureExit {
                total_win,
                spins_played,
            } => {
                self.message = format!("Bonus over: {} won in {} spins", total_win, spins_played);
            }
            _ => {}
        }
    }

    /// Reveal done: publish the win data
    fn settle_view(&mut self) {
        self.reveal = None;
        if let Some(trace) = self.trace.take() {
            self.last_trace = Some(trace);
        }
        let Some(settlement) = self.pending.take() else {
            return;
        };

        self.view.credit = self.state.credit;
        self.view.grid = settlement.grid.clone();
        self.view.win_lines = settlement.win_lines;
        self.view.winning_cells = settlement.winning_cells;
        self.view.last_win = settlement.total_win;

        match settlement.bonus_event {
            Some(BonusEvent::Ended(summary)) => self.bonus_summary = Some(summary),
            Some(_) => {}
            None if !settlement.total_win.is_zero() => {
                self.message = format!("WIN {}", settlement.total_win);
            }
            None => {}
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // IDLE-ONLY COMMANDS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn adjust_lines(&mut self, delta: i32) -> Outcome<usize> {
        self.ensure_idle()?;
        let next = self
            .machine
            .adjust_lines(&self.state, delta)
            .inspect_err(|d| self.note_decline(d))?;
        self.commit(next);
        Ok(self.state.lines)
    }

    pub fn adjust_bet(&mut self, delta: i32) -> Outcome<Credits> {
        self.ensure_idle()?;
        let next = self
            .machine
            .adjust_bet(&self.state, delta)
            .inspect_err(|d| self.note_decline(d))?;
        self.commit(next);
        Ok(self.state.bet)
    }

    pub fn toggle_force_books(&mut self) -> Outcome<bool> {
        self.ensure_idle()?;
        let next = self.machine.toggle_force_books(&self.state);
        self.commit(next);
        log::info!("[SlotSession] Forced books: {}", self.state.force_books);
        Ok(self.state.force_books)
    }

    pub fn start_gamble(&mut self) -> Outcome<Credits> {
        self.ensure_idle()?;
        let next = self
            .machine
            .start_gamble(&self.state)
            .inspect_err(|d| self.note_decline(d))?;
        self.commit(next);
        let amount = self.state.gamble.amount;
        self.record_instant(Stage::GambleStart { amount });
        self.message = format!("Gamble {}: red or black?", amount);
        Ok(amount)
    }

    pub fn gamble(&mut self, choice: CardColor) -> Outcome<GambleRound> {
        self.ensure_idle()?;
        let (next, round) = self
            .machine
            .gamble(&self.state, choice)
            .inspect_err(|d| self.note_decline(d))?;
        self.commit(next);

        let (won, amount) = match round {
            GambleRound::Won { amount, .. } => (true, amount),
            GambleRound::Lost { forfeited, .. } => (false, forfeited),
        };
        self.record_instant(Stage::GambleResult { won, amount });
        self.message = if won {
            format!("Doubled to {}", amount)
        } else {
            "Lost the gamble".to_string()
        };
        Ok(round)
    }

    pub fn collect_gamble(&mut self) -> Outcome<Credits> {
        self.ensure_idle()?;
        let (next, collected) = self
            .machine
            .collect_gamble(&self.state)
            .inspect_err(|d| self.note_decline(d))?;
        self.commit(next);
        self.record_instant(Stage::GambleEnd { collected });
        self.message = format!("Collected {}", collected);
        Ok(collected)
    }

    fn commit(&mut self, state: SlotState) {
        self.state = state;
        self.view.credit = self.state.credit;
        self.view.last_win = self.state.last_win;
    }

    fn record_instant(&mut self, stage: Stage) {
        let trace = self
            .last_trace
            .get_or_insert_with(|| StageTrace::new("gamble", "slot"));
        let at = trace.duration_ms();
        trace.push(StageEvent::new(stage, at));
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
        log::warn!("[SlotSession] Declined: {}", declined);
        self.message = declined.to_string();
    }
}
