//! Reel Engine — spin, settle, bonus and gamble transitions
//!
//! Every command is a reducer: it takes the current [`SlotState`] by
//! reference and returns the next one. Nothing about the round lives in the
//! machine except the RNG stream and running statistics.

use serde::{Deserialize, Serialize};

use sz_core::{Credits, Declined, GameRng, Outcome, SzResult, WeightedSampler};
use sz_stage::{Reveal, Stage, StepDelay};

use crate::bonus::{BonusEvent, BonusState};
use crate::config::SlotConfig;
use crate::gamble::{CardColor, GambleRound, GambleState};
use crate::grid::{self, Cell, Grid};
use crate::paytable::{LineWin, evaluate};
use crate::symbols::Symbol;

/// Persistent slot state owned by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotState {
    pub credit: Credits,
    /// Bet per line
    pub bet: Credits,
    /// Active paylines
    pub lines: usize,
    /// Last settled grid
    pub grid: Grid,
    /// Win of the last settled spin (gamble eligibility)
    pub last_win: Credits,
    pub bonus: BonusState,
    pub gamble: GambleState,
    /// Test mode: next spin lands BOOKs on the configured reels
    pub force_books: bool,
}

impl SlotState {
    /// Stake for one paid spin
    pub fn total_bet(&self) -> Credits {
        self.bet.times(self.lines as u64)
    }

    pub fn in_free_spins(&self) -> bool {
        self.bonus.active
    }
}

/// Everything a spin decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinSettlement {
    pub spin_id: u64,
    /// Credit taken (zero on free spins)
    pub stake: Credits,
    /// 1-based free spin number, if this was one
    pub free_spin: Option<u32>,
    /// Grid the reels stop on
    pub drawn_grid: Grid,
    /// Grid after expansion, used for evaluation
    pub grid: Grid,
    /// BOOKs added by the bonus-chance upgrade
    pub injected_books: Vec<Cell>,
    /// Reels overwritten by the expanding symbol, in reveal order
    pub expanded_reels: Vec<u8>,
    pub win_lines: Vec<LineWin>,
    pub winning_cells: Vec<Cell>,
    pub total_win: Credits,
    pub bonus_event: Option<BonusEvent>,
}

impl SpinSettlement {
    pub fn is_win(&self) -> bool {
        !self.total_win.is_zero()
    }
}

/// Result of a spin: committed state, settlement, and the reveal to replay
#[derive(Debug, Clone)]
pub struct SpinOutcome {
    pub state: SlotState,
    pub settlement: SpinSettlement,
    pub reveal: Reveal,
}

/// Session statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub free_spins: u64,
    pub total_bet: Credits,
    pub total_win: Credits,
    pub wins: u64,
    pub bonuses_started: u64,
    pub retriggers: u64,
    pub bonus_win: Credits,
    pub max_win: Credits,
}

impl SessionStats {
    /// Return to player, percent
    pub fn rtp(&self) -> f64 {
        if self.total_bet.is_zero() {
            0.0
        } else {
            self.total_win.as_f64() / self.total_bet.as_f64() * 100.0
        }
    }

    /// Winning spins, percent
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_spins as f64 * 100.0
        }
    }

    /// Paid spins per bonus start
    pub fn bonus_frequency(&self) -> Option<f64> {
        if self.bonuses_started == 0 {
            None
        } else {
            Some((self.total_spins - self.free_spins) as f64 / self.bonuses_started as f64)
        }
    }

    fn record(&mut self, settlement: &SpinSettlement) {
        self.total_spins += 1;
        if settlement.free_spin.is_some() {
            self.free_spins += 1;
            self.bonus_win += settlement.total_win;
        }
        self.total_bet += settlement.stake;
        self.total_win += settlement.total_win;
        if settlement.is_win() {
            self.wins += 1;
        }
        self.max_win = self.max_win.max(settlement.total_win);
        match settlement.bonus_event {
            Some(BonusEvent::Started { .. }) => self.bonuses_started += 1,
            Some(BonusEvent::Retriggered { .. }) => self.retriggers += 1,
            _ => {}
        }
    }
}

/// The slot outcome engine
pub struct SlotMachine {
    config: SlotConfig,
    sampler: WeightedSampler<Symbol>,
    rng: GameRng,
    spin_count: u64,
    stats: SessionStats,
}

impl SlotMachine {
    /// Validated engine with an OS-seeded RNG
    pub fn new(config: SlotConfig) -> SzResult<Self> {
        Self::with_rng(config, GameRng::from_entropy())
    }

    /// Validated engine with a reproducible RNG
    pub fn seeded(config: SlotConfig, seed: u64) -> SzResult<Self> {
        Self::with_rng(config, GameRng::seeded(seed))
    }

    pub fn with_rng(config: SlotConfig, rng: GameRng) -> SzResult<Self> {
        config.validate()?;
        let sampler = config.symbol_sampler()?;
        Ok(Self {
            config,
            sampler,
            rng,
            spin_count: 0,
            stats: SessionStats::default(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    /// Reseed for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = GameRng::seeded(seed);
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    /// Fresh state with the configured defaults and a random display grid
    pub fn initial_state(&mut self) -> SlotState {
        SlotState {
            credit: self.config.initial_credit,
            bet: self.config.default_bet,
            lines: self.config.default_lines,
            grid: self.draw_grid(),
            last_win: Credits::ZERO,
            bonus: BonusState::default(),
            gamble: GambleState::default(),
            force_books: false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Draw and settle a spin
    pub fn spin(&mut self, state: &SlotState) -> Outcome<SpinOutcome> {
        self.spin_internal(state, None)
    }

    /// Settle a spin on a given grid (audit replay, tests).
    ///
    /// The grid is taken as drawn: no forced books and no bonus-chance upgrade.
    pub fn spin_with_grid(&mut self, state: &SlotState, grid: Grid) -> Outcome<SpinOutcome> {
        let spec = self.config.grid;
        if !grid.has_shape(spec.reels as usize, spec.rows as usize) {
            return Err(Declined::OutOfRange(format!(
                "grid shape (expected {}x{})",
                spec.reels, spec.rows
            )));
        }
        self.spin_internal(state, Some(grid))
    }

    fn spin_internal(&mut self, state: &SlotState, supplied: Option<Grid>) -> Outcome<SpinOutcome> {
        if state.gamble.active {
            return Err(Declined::GambleOpen);
        }

        let mut next = state.clone();
        let in_free = next.bonus.active;

        let (stake, free_spin) = if in_free {
            (Credits::ZERO, Some(next.bonus.consume_spin()))
        } else {
            let stake = next.total_bet();
            next.credit = next.credit.checked_sub(stake).ok_or(Declined::InsufficientFunds {
                required: stake,
                available: next.credit,
            })?;
            (stake, None)
        };

        self.spin_count += 1;
        next.last_win = Credits::ZERO;

        let mut injected_books = Vec::new();
        let drawn_grid = match supplied {
            Some(grid) => grid,
            None => {
                let mut grid = self.draw_grid();
                if next.force_books {
                    grid::force_books(&mut grid, &self.config.bonus.forced_book_reels, &mut self.rng);
                    next.force_books = false;
                }
                if !in_free {
                    injected_books = self.maybe_upgrade_to_bonus(&mut grid);
                }
                grid
            }
        };

        // Expanding symbol only applies inside a running bonus
        let mut final_grid = drawn_grid.clone();
        let expanded_reels = match (in_free, next.bonus.expanding_symbol) {
            (true, Some(symbol)) => grid::expand(&mut final_grid, symbol),
            _ => Vec::new(),
        };

        let evaluation = evaluate(
            &final_grid,
            &self.config.paytable,
            &self.config.paylines,
            next.lines,
            next.bet,
        );
        let total_win = evaluation.total_win;

        next.credit += total_win;
        next.last_win = total_win;
        if in_free {
            next.bonus.add_win(total_win);
        }

        let bonus_event = self.settle_bonus(&mut next.bonus, &final_grid, in_free);
        next.grid = final_grid.clone();

        let settlement = SpinSettlement {
            spin_id: self.spin_count,
            stake,
            free_spin,
            drawn_grid,
            grid: final_grid,
            injected_books,
            expanded_reels,
            win_lines: evaluation.win_lines,
            winning_cells: evaluation.winning_cells.into_iter().collect(),
            total_win,
            bonus_event,
        };

        self.stats.record(&settlement);
        log::debug!(
            "[SlotMachine] Spin #{} stake {} win {} ({} line(s), free spin {:?})",
            settlement.spin_id,
            stake,
            total_win,
            settlement.win_lines.len(),
            free_spin
        );

        let reveal = self.build_reveal(&settlement);
        Ok(SpinOutcome {
            state: next,
            settlement,
            reveal,
        })
    }

    fn draw_grid(&mut self) -> Grid {
        let spec = self.config.grid;
        grid::generate(&self.sampler, spec.reels as usize, spec.rows as usize, &mut self.rng)
    }

    /// Two BOOKs plus a lucky draw become a trigger; three or more already are.
    fn maybe_upgrade_to_bonus(&mut self, grid: &mut Grid) -> Vec<Cell> {
        let target = self.config.bonus.trigger_count;
        let books = grid.count(Symbol::Book);
        if books >= target {
            return Vec::new();
        }

        let roll = self.rng.unit();
        if roll < self.config.bonus.free_spins_chance && books + 1 >= target {
            log::debug!("[SlotMachine] Bonus chance hit with {} BOOK(s), upgrading", books);
            grid::inject_books(grid, target, &mut self.rng)
        } else {
            Vec::new()
        }
    }

    fn settle_bonus(&mut self, bonus: &mut BonusState, grid: &Grid, in_free: bool) -> Option<BonusEvent> {
        let triggered = grid.count(Symbol::Book) >= self.config.bonus.trigger_count;

        if triggered && !in_free {
            let symbol = Symbol::NON_WILD[self.rng.index(Symbol::NON_WILD.len())];
            let event = bonus.start(self.config.bonus.award, symbol);
            log::info!(
                "[SlotMachine] Bonus started: {} free spins, expanding {}",
                self.config.bonus.award,
                symbol
            );
            return Some(event);
        }

        // Expansion overwrites BOOK columns before the count, so this only
        // fires for states whose expanding symbol is unset.
        if triggered && in_free {
            let event = bonus.retrigger(self.config.bonus.retrigger_award);
            log::info!(
                "[SlotMachine] Bonus retriggered: {} spins total",
                bonus.spins_total
            );
            return Some(event);
        }

        if in_free && bonus.is_exhausted() {
            let summary = bonus.finish();
            log::info!(
                "[SlotMachine] Bonus ended after {} spins, won {}",
                summary.spins_played,
                summary.total_win
            );
            return Some(BonusEvent::Ended(summary));
        }

        None
    }

    fn build_reveal(&self, s: &SpinSettlement) -> Reveal {
        let timing = &self.config.timing;
        let mut reveal = Reveal::new();

        reveal.push(Stage::SpinStart { free_spin: s.free_spin }, StepDelay::ZERO);
        for reel in 0..s.drawn_grid.reel_count() {
            reveal.push(
                Stage::ReelStop {
                    reel_index: reel as u8,
                    symbols: s.drawn_grid.column_indices(reel),
                },
                timing.reel_stop(),
            );
        }

        if s.expanded_reels.is_empty() {
            reveal.push(Stage::EvaluateWins, timing.post_reels());
        } else {
            for (i, &reel) in s.expanded_reels.iter().enumerate() {
                let symbol = s
                    .grid
                    .column(reel as usize)
                    .first()
                    .map(|sym| sym.index() as u8)
                    .unwrap_or(0);
                let delay = if i == 0 {
                    StepDelay::fixed(timing.post_reels_delay_ms + timing.expand_step_ms)
                } else {
                    timing.expand_step()
                };
                reveal.push(Stage::ReelExpand { reel_index: reel, symbol }, delay);
            }
            reveal.push(Stage::EvaluateWins, timing.post_expand());
        }

        for win in &s.win_lines {
            reveal.push(
                Stage::WinLineShow {
                    line_index: win.line_index,
                    symbol: win.symbol.index() as u8,
                    count: win.count,
                    win: win.win,
                },
                StepDelay::ZERO,
            );
        }

        match s.bonus_event {
            Some(BonusEvent::Started {
                spins,
                expanding_symbol,
            }) => reveal.push(
                Stage::FeatureEnter {
                    spins,
                    expanding_symbol: expanding_symbol.index() as u8,
                },
                StepDelay::ZERO,
            ),
            Some(BonusEvent::Retriggered { added, spins_total }) => reveal.push(
                Stage::FeatureRetrigger {
                    added,
                    total: spins_total,
                },
                StepDelay::ZERO,
            ),
            Some(BonusEvent::Ended(summary)) => reveal.push(
                Stage::FeatureExit {
                    total_win: summary.total_win,
                    spins_played: summary.spins_played,
                },
                StepDelay::ZERO,
            ),
            None => {}
        }

        reveal.push(Stage::SpinEnd { total_win: s.total_win }, StepDelay::ZERO);
        reveal
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BET / LINES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Move the active line count by `delta` within `1..=max_lines`
    pub fn adjust_lines(&self, state: &SlotState, delta: i32) -> Outcome<SlotState> {
        let lines = state.lines as i64 + delta as i64;
        if lines < 1 || lines > self.config.max_lines() as i64 {
            return Err(Declined::OutOfRange(format!(
                "lines {} (1..={})",
                lines,
                self.config.max_lines()
            )));
        }
        Ok(SlotState {
            lines: lines as usize,
            ..state.clone()
        })
    }

    /// Step the bet along the denomination list
    pub fn adjust_bet(&self, state: &SlotState, delta: i32) -> Outcome<SlotState> {
        let values = &self.config.bet_values;
        let current = values
            .iter()
            .position(|&b| b == state.bet)
            .ok_or_else(|| Declined::InvalidBet(format!("{} is not a denomination", state.bet)))?;

        let index = current as i64 + delta as i64;
        let bet = usize::try_from(index)
            .ok()
            .and_then(|i| values.get(i))
            .copied()
            .ok_or_else(|| Declined::OutOfRange(format!("bet step {}", index)))?;

        Ok(SlotState {
            bet,
            ..state.clone()
        })
    }

    /// Flip forced-books test mode
    pub fn toggle_force_books(&self, state: &SlotState) -> SlotState {
        SlotState {
            force_books: !state.force_books,
            ..state.clone()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // GAMBLE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Open a pot worth the last win. The balance is untouched; the win was
    /// already credited at settlement.
    pub fn start_gamble(&self, state: &SlotState) -> Outcome<SlotState> {
        if state.gamble.active {
            return Err(Declined::GambleOpen);
        }
        if state.bonus.active {
            return Err(Declined::InFreeSpins);
        }
        if state.last_win.is_zero() {
            return Err(Declined::NothingToGamble);
        }

        let amount = state.last_win;
        log::debug!("[SlotMachine] Gamble opened with {}", amount);
        Ok(SlotState {
            gamble: GambleState::open(amount),
            ..state.clone()
        })
    }

    /// One red/black round
    pub fn gamble(&mut self, state: &SlotState, choice: CardColor) -> Outcome<(SlotState, GambleRound)> {
        if !state.gamble.active {
            return Err(Declined::GambleClosed);
        }

        let mut next = state.clone();
        let card = CardColor::draw(&mut self.rng);
        let round = next.gamble.play(choice, card);
        if !round.is_win() {
            next.last_win = Credits::ZERO;
        }

        log::debug!("[SlotMachine] Gamble {:?} vs {:?}: {:?}", choice, card, round);
        Ok((next, round))
    }

    /// Close the gamble and credit the pot
    pub fn collect_gamble(&self, state: &SlotState) -> Outcome<(SlotState, Credits)> {
        if !state.gamble.active {
            return Err(Declined::GambleClosed);
        }

        let mut next = state.clone();
        let amount = next.gamble.collect();
        next.credit += amount;
        next.last_win = Credits::ZERO;
        Ok((next, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    fn machine(seed: u64) -> SlotMachine {
        SlotMachine::seeded(SlotConfig::instant(), seed).unwrap()
    }

    /// No BOOKs, nothing pays
    fn dead_grid() -> Grid {
        Grid::from_rows(&[
            vec![A, J, A, J, A, J],
            vec![K, Ten, K, Ten, K, Ten],
            vec![Q, Explorer1, Q, Explorer1, Q, Explorer1],
        ])
    }

    /// BOOK at (0,1), (2,0), (4,2) only
    fn three_books() -> Grid {
        Grid::from_rows(&[
            vec![A, J, Book, J, A, J],
            vec![Book, Ten, K, Ten, K, Ten],
            vec![Q, Explorer1, Q, Explorer1, Book, Explorer1],
        ])
    }

    #[test]
    fn test_initial_state() {
        let mut m = machine(1);
        let state = m.initial_state();
        assert_eq!(state.credit, Credits::from_whole(1000));
        assert_eq!(state.bet, Credits::from_minor(10));
        assert_eq!(state.lines, 10);
        assert!(state.grid.has_shape(6, 3));
        assert_eq!(state.total_bet(), Credits::from_whole(1));
    }

    #[test]
    fn test_paid_spin_deducts_stake() {
        let mut m = machine(2);
        let state = m.initial_state();
        let out = m.spin_with_grid(&state, dead_grid()).unwrap();

        assert_eq!(out.settlement.stake, Credits::from_whole(1));
        assert_eq!(out.state.credit, Credits::from_whole(999));
        assert_eq!(out.state.last_win, Credits::ZERO);
        assert!(out.settlement.bonus_event.is_none());
    }

    #[test]
    fn test_insufficient_funds_declines_without_mutation() {
        let mut m = machine(3);
        let mut state = m.initial_state();
        state.credit = Credits::from_minor(99);

        let err = m.spin(&state).unwrap_err();
        assert_eq!(
            err,
            Declined::InsufficientFunds {
                required: Credits::from_whole(1),
                available: Credits::from_minor(99)
            }
        );
        assert_eq!(m.stats().total_spins, 0);
    }

    #[test]
    fn test_three_books_start_bonus() {
        let mut m = machine(4);
        let state = m.initial_state();
        let out = m.spin_with_grid(&state, three_books()).unwrap();

        let bonus = &out.state.bonus;
        assert!(bonus.active);
        assert_eq!(bonus.spins_remaining, 10);
        assert_eq!(bonus.spins_total, 10);
        let symbol = bonus.expanding_symbol.unwrap();
        assert!(Symbol::NON_WILD.contains(&symbol));
        assert!(matches!(
            out.settlement.bonus_event,
            Some(BonusEvent::Started { spins: 10, .. })
        ));
    }

    #[test]
    fn test_free_spin_consumes_spin_not_credit() {
        let mut m = machine(5);
        let state = m.initial_state();
        let started = m.spin_with_grid(&state, three_books()).unwrap().state;

        let out = m.spin_with_grid(&started, dead_grid()).unwrap();
        assert_eq!(out.settlement.stake, Credits::ZERO);
        assert_eq!(out.settlement.free_spin, Some(1));
        assert_eq!(out.state.bonus.spins_remaining, 9);
        assert!(out.state.credit >= started.credit);
    }

    #[test]
    fn test_expansion_during_free_spins() {
        let mut m = machine(6);
        let mut state = m.initial_state();
        state.bonus.start(10, Hat);

        let grid = Grid::from_rows(&[
            vec![Hat, J, A, J, A, J],
            vec![K, Ten, Book, Ten, K, Ten],
            vec![Q, Hat, Q, Explorer1, Q, Explorer1],
        ]);
        let out = m.spin_with_grid(&state, grid).unwrap();

        assert_eq!(out.settlement.expanded_reels, vec![0, 1, 2]);
        for reel in 0..3 {
            assert_eq!(out.settlement.grid.column(reel), &[Hat, Hat, Hat]);
        }
        // HAT x3 on every line: 10 lines at 100x, 0.10 per line
        assert_eq!(out.settlement.win_lines.len(), 10);
        assert_eq!(out.settlement.total_win, Credits::from_whole(100));
        assert_eq!(out.state.bonus.accumulated_win, Credits::from_whole(100));
    }

    #[test]
    fn test_bonus_ends_with_summary() {
        let mut m = machine(7);
        let mut state = m.initial_state();
        state.bonus.start(1, Q);
        state.bonus.add_win(Credits::from_whole(3));

        let out = m.spin_with_grid(&state, dead_grid()).unwrap();
        match out.settlement.bonus_event {
            Some(BonusEvent::Ended(summary)) => {
                assert_eq!(summary.spins_played, 1);
                assert!(summary.total_win >= Credits::from_whole(3));
            }
            other => panic!("expected bonus end, got {:?}", other),
        }
        assert_eq!(out.state.bonus, BonusState::default());
    }

    #[test]
    fn test_upgrade_always_converges_to_three_books() {
        let config = SlotConfig {
            bonus: crate::config::BonusConfig {
                free_spins_chance: 1.0,
                ..Default::default()
            },
            ..SlotConfig::instant()
        };
        let mut m = SlotMachine::seeded(config, 8).unwrap();

        for _ in 0..300 {
            let mut grid = dead_grid();
            grid.set(Cell::new(1, 0), Book);
            grid.set(Cell::new(5, 2), Book);
            let injected = m.maybe_upgrade_to_bonus(&mut grid);
            assert_eq!(injected.len(), 1);
            assert_eq!(grid.count(Book), 3);
        }
    }

    #[test]
    fn test_upgrade_needs_two_books() {
        let config = SlotConfig {
            bonus: crate::config::BonusConfig {
                free_spins_chance: 1.0,
                ..Default::default()
            },
            ..SlotConfig::instant()
        };
        let mut m = SlotMachine::seeded(config, 9).unwrap();
        let mut grid = dead_grid();
        grid.set(Cell::new(0, 0), Book);

        assert!(m.maybe_upgrade_to_bonus(&mut grid).is_empty());
        assert_eq!(grid.count(Book), 1);
    }

    #[test]
    fn test_force_books_triggers_and_clears() {
        let mut m = machine(10);
        let initial = m.initial_state();
        let state = m.toggle_force_books(&initial);
        assert!(state.force_books);

        let out = m.spin(&state).unwrap();
        assert!(!out.state.force_books);
        assert!(out.settlement.drawn_grid.count(Book) >= 3);
        assert!(out.state.bonus.active);
    }

    #[test]
    fn test_adjust_lines_and_bet() {
        let mut m = machine(11);
        let state = m.initial_state();

        assert!(m.adjust_lines(&state, 1).is_err());
        let fewer = m.adjust_lines(&state, -9).unwrap();
        assert_eq!(fewer.lines, 1);
        assert!(m.adjust_lines(&fewer, -1).is_err());

        assert!(m.adjust_bet(&state, -1).is_err());
        let up = m.adjust_bet(&state, 3).unwrap();
        assert_eq!(up.bet, Credits::from_minor(50));
        let top = m.adjust_bet(&state, 11).unwrap();
        assert_eq!(top.bet, Credits::from_whole(100));
        assert!(m.adjust_bet(&top, 1).is_err());
    }

    #[test]
    fn test_gamble_lifecycle() {
        let mut m = machine(12);
        let mut state = m.initial_state();
        state.last_win = Credits::from_whole(5);

        let opened = m.start_gamble(&state).unwrap();
        assert_eq!(opened.credit, Credits::from_whole(1000));
        assert_eq!(opened.gamble.amount, Credits::from_whole(5));
        assert_eq!(m.start_gamble(&opened), Err(Declined::GambleOpen));
        assert!(matches!(m.spin(&opened), Err(Declined::GambleOpen)));

        let (collected, amount) = m.collect_gamble(&opened).unwrap();
        assert_eq!(amount, Credits::from_whole(5));
        assert_eq!(collected.credit, Credits::from_whole(1005));
        assert_eq!(collected.last_win, Credits::ZERO);
        assert!(!collected.gamble.active);
    }

    #[test]
    fn test_collect_pays_on_top_of_settled_win() {
        let mut m = machine(16);
        let mut state = m.initial_state();
        state.credit = Credits::from_whole(1005);
        state.last_win = Credits::from_whole(5);

        let opened = m.start_gamble(&state).unwrap();
        assert_eq!(opened.credit, Credits::from_whole(1005));
        let (collected, _) = m.collect_gamble(&opened).unwrap();
        assert_eq!(collected.credit, Credits::from_whole(1010));
    }

    #[test]
    fn test_gamble_opens_on_empty_balance() {
        let mut m = machine(17);
        let mut state = m.initial_state();
        state.credit = Credits::ZERO;
        state.last_win = Credits::from_whole(3);

        let opened = m.start_gamble(&state).unwrap();
        assert_eq!(opened.credit, Credits::ZERO);
        assert_eq!(opened.gamble.amount, Credits::from_whole(3));
    }

    #[test]
    fn test_gamble_loss_forfeits() {
        let mut m = machine(13);
        let mut state = m.initial_state();
        state.last_win = Credits::from_whole(2);
        let mut state = m.start_gamble(&state).unwrap();

        loop {
            let (next, round) = m.gamble(&state, CardColor::Red).unwrap();
            state = next;
            if !round.is_win() {
                break;
            }
        }
        assert!(!state.gamble.active);
        assert_eq!(state.last_win, Credits::ZERO);
        assert_eq!(state.credit, Credits::from_whole(1000));
        assert_eq!(m.gamble(&state, CardColor::Red).unwrap_err(), Declined::GambleClosed);
    }

    #[test]
    fn test_gamble_preconditions() {
        let mut m = machine(14);
        let state = m.initial_state();
        assert_eq!(m.start_gamble(&state), Err(Declined::NothingToGamble));

        let mut in_bonus = state.clone();
        in_bonus.last_win = Credits::from_whole(1);
        in_bonus.bonus.start(10, A);
        assert_eq!(m.start_gamble(&in_bonus), Err(Declined::InFreeSpins));
    }

    #[test]
    fn test_reveal_order() {
        let mut m = machine(15);
        let state = m.initial_state();
        let out = m.spin_with_grid(&state, three_books()).unwrap();
        let names: Vec<&str> = out.reveal.clone().map(|e| e.type_name()).collect();

        assert_eq!(names[0], "spin_start");
        assert!(names[1..7].iter().all(|n| *n == "reel_stop"));
        assert_eq!(names[7], "evaluate_wins");
        assert!(names.contains(&"feature_enter"));
        assert_eq!(*names.last().unwrap(), "spin_end");
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let mut a = machine(99);
        let mut b = machine(99);
        let mut sa = a.initial_state();
        let mut sb = b.initial_state();

        for _ in 0..200 {
            let oa = a.spin(&sa).unwrap();
            let ob = b.spin(&sb).unwrap();
            assert_eq!(oa.settlement, ob.settlement);
            sa = oa.state;
            sb = ob.state;
        }
        assert_eq!(sa, sb);
    }
}
