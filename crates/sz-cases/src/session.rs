//! Case session — one player's credit, inventory and the in-flight reveal
//!
//! Opens and battles are settled immediately. Won items only show up in the
//! visible inventory once the reveal has finished.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sz_core::{Credits, Declined, Outcome};
use sz_stage::{Reveal, Stage, StageEvent, StageTrace};

use crate::engine::{BattleResult, BattleSettlement, CaseEngine, CaseState, OpenSettlement};
use crate::inventory::Inventory;

/// What the player currently sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseView {
    pub credit: Credits,
    pub inventory: Inventory,
    /// Item ids landed so far by the current or last reveal, by reel slot
    pub reels: Vec<(u8, String)>,
    pub battle_result: Option<BattleResult>,
}

enum Pending {
    Open(OpenSettlement),
    Battle(BattleSettlement),
}

/// A case engine bound to one player's state
pub struct CaseSession {
    engine: CaseEngine,
    state: CaseState,
    view: CaseView,
    message: String,
    reveal: Option<Reveal>,
    pending: Option<Pending>,
    trace: Option<StageTrace>,
    last_trace: Option<StageTrace>,
}

impl CaseSession {
    pub fn new(engine: CaseEngine) -> Self {
        let state = engine.initial_state();
        Self::with_state(engine, state)
    }

    pub fn with_state(engine: CaseEngine, state: CaseState) -> Self {
        let view = CaseView {
            credit: state.credit,
            inventory: state.inventory.clone(),
            reels: Vec::new(),
            battle_result: None,
        };
        Self {
            engine,
            state,
            view,
            message: String::new(),
            reveal: None,
            pending: None,
            trace: None,
            last_trace: None,
        }
    }

    pub fn state(&self) -> &CaseState {
        &self.state
    }

    pub fn view(&self) -> &CaseView {
        &self.view
    }

    pub fn engine(&self) -> &CaseEngine {
        &self.engine
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
    // OPEN / BATTLE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn open_cases(&mut self, box_id: &str, count: usize) -> Outcome<u64> {
        self.ensure_idle()?;
        let outcome = self
            .engine
            .open(&self.state, box_id, count)
            .inspect_err(|d| self.note_decline(d))?;

        let open_id = outcome.settlement.open_id;
        self.begin(outcome.state, outcome.reveal, format!("cases-{}", open_id));
        self.message = format!("Opening {}×{}", count, box_id);
        self.pending = Some(Pending::Open(outcome.settlement));
        Ok(open_id)
    }

    pub fn start_battle(&mut self, box_id: &str) -> Outcome<u64> {
        self.ensure_idle()?;
        let outcome = self
            .engine
            .battle(&self.state, box_id)
            .inspect_err(|d| self.note_decline(d))?;

        let battle_id = outcome.settlement.battle_id;
        self.begin(outcome.state, outcome.reveal, format!("battle-{}", battle_id));
        self.message = format!("Battle on {}", box_id);
        self.pending = Some(Pending::Battle(outcome.settlement));
        Ok(battle_id)
    }

    fn begin(&mut self, state: CaseState, reveal: Reveal, trace_id: String) {
        self.state = state;
        self.view.credit = self.state.credit;
        self.view.reels.clear();
        self.view.battle_result = None;
        self.trace = Some(StageTrace::new(trace_id, "cases").with_seed(self.engine.rng_seed()));
        self.reveal = Some(reveal);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REVEAL
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn advance(&mut self) -> Option<StageEvent> {
        let reveal = self.reveal.as_mut()?;
        let event = reveal.next_event();
        let finished = reveal.is_finished();

        if let Some(event) = &event {
            if let Some(trace) = self.trace.as_mut() {
                trace.push(event.clone());
            }
            if let Stage::CaseReelStop { slot, item_id, .. } = &event.stage {
                self.view.reels.push((*slot, item_id.clone()));
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
        match self.pending.take() {
            Some(Pending::Open(s)) => {
                self.message = format!("Won {} from {} box(es)", s.total_value, s.items.len());
            }
            Some(Pending::Battle(s)) => {
                self.view.battle_result = Some(s.result);
                self.message = match s.result {
                    BattleResult::Won => format!(
                        "Battle won {} vs {}: took {}",
                        s.player_total,
                        s.bot_total,
                        s.awarded_value()
                    ),
                    BattleResult::Lost => {
                        format!("Battle lost {} vs {}", s.player_total, s.bot_total)
                    }
                    BattleResult::Tie => {
                        format!("Battle tied at {}: kept your items", s.player_total)
                    }
                };
            }
            None => {}
        }
        self.sync_view();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SELL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Sell one item; selling an absent id credits nothing
    pub fn sell_item(&mut self, instance_id: Uuid) -> Outcome<Credits> {
        self.ensure_idle()?;
        let (next, value) = self.engine.sell(&self.state, instance_id);
        self.commit(next);
        Ok(value)
    }

    pub fn sell_all(&mut self) -> Outcome<Credits> {
        self.ensure_idle()?;
        let (next, value) = self.engine.sell_all(&self.state);
        self.commit(next);
        self.message = format!("Sold everything for {}", value);
        Ok(value)
    }

    pub fn sell_last_opened(&mut self) -> Outcome<Credits> {
        self.ensure_idle()?;
        let (next, value) = self.engine.sell_last_opened(&self.state);
        self.commit(next);
        self.message = format!("Sold last opening for {}", value);
        Ok(value)
    }

    fn commit(&mut self, state: CaseState) {
        self.state = state;
        self.sync_view();
    }

    fn sync_view(&mut self) {
        self.view.credit = self.state.credit;
        self.view.inventory = self.state.inventory.clone();
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
        log::warn!("[CaseSession] Declined: {}", declined);
        self.message = declined.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CasesConfig;

    fn session(seed: u64) -> CaseSession {
        CaseSession::new(CaseEngine::seeded(CasesConfig::default(), seed).unwrap())
    }

    #[test]
    fn test_items_hidden_until_revealed() {
        let mut s = session(1);
        s.open_cases("grossadmiral", 2).unwrap();

        assert!(s.is_busy());
        assert_eq!(s.view().credit, Credits::from_whole(990));
        assert!(s.view().inventory.is_empty());
        assert_eq!(s.state().inventory.len(), 2);

        let first = s.advance().unwrap();
        assert_eq!(first.type_name(), "case_reel_stop");
        assert_eq!(s.view().reels.len(), 1);
        assert!(s.view().inventory.is_empty());

        let rest = s.finish_reveal();
        assert_eq!(rest.last().unwrap().type_name(), "cases_revealed");
        assert!(!s.is_busy());
        assert_eq!(s.view().inventory, s.state().inventory);
        assert_eq!(s.view().reels.len(), 2);
        assert!(s.message().starts_with("Won "));
    }

    #[test]
    fn test_busy_declines_everything() {
        let mut s = session(2);
        s.start_battle("kezro").unwrap();

        assert_eq!(s.open_cases("kezro", 1), Err(Declined::Busy));
        assert_eq!(s.start_battle("kezro"), Err(Declined::Busy));
        assert_eq!(s.sell_all(), Err(Declined::Busy));
        assert_eq!(s.message(), Declined::Busy.to_string());

        s.finish_reveal();
        assert!(s.view().battle_result.is_some());
        assert!(s.open_cases("kezro", 1).is_ok());
    }

    #[test]
    fn test_decline_message_and_untouched_state() {
        let mut s = session(3);
        let before = s.state().clone();
        assert_eq!(s.open_cases("missing", 1), Err(Declined::UnknownBox("missing".into())));
        assert!(matches!(s.open_cases("koba", 9), Err(Declined::OutOfRange(_))));
        assert_eq!(s.state(), &before);
        assert!(!s.is_busy());
        assert!(s.message().starts_with("open count 9"));
    }

    #[test]
    fn test_sell_flow() {
        let mut s = session(4);
        s.open_cases("flegma", 3).unwrap();
        s.finish_reveal();

        let id = s.view().inventory.items()[0].instance_id;
        let value = s.view().inventory.items()[0].value();
        assert_eq!(s.sell_item(id), Ok(value));
        assert_eq!(s.sell_item(id), Ok(Credits::ZERO));

        let held = s.view().inventory.total_value();
        assert_eq!(s.sell_last_opened(), Ok(held));
        assert!(s.view().inventory.is_empty());
        assert_eq!(s.sell_all(), Ok(Credits::ZERO));
        assert_eq!(s.view().credit, s.state().credit);
    }

    #[test]
    fn test_trace_recorded() {
        let mut s = session(5);
        s.open_cases("koba", 4).unwrap();
        s.finish_reveal();

        let trace = s.last_trace().unwrap();
        assert_eq!(trace.len(), 5);
        assert!(trace.is_ordered());
        assert!(trace.has_stage("cases_revealed"));
        assert_eq!(trace.duration_ms(), 4800.0 - 100.0);
    }
}
