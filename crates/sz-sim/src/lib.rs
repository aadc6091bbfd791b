//! # sz-sim — Batch simulation and audits
//!
//! Runs the engines headless with a fixed seed and summarises the long-run
//! numbers. The same seed always produces the same report.

use serde::Serialize;

use sz_cases::{CaseEngine, Catalog, CasesConfig, Rarity};
use sz_core::{Credits, Declined, SzError, SzResult};
use sz_slot::{SlotConfig, SlotMachine};
use sz_wheel::{BoardCell, WheelConfig, WheelTable};

/// Credit given to simulated players so they never run dry
const BANKROLL: Credits = Credits::from_whole(1_000_000_000);

/// Long-run slot numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotReport {
    pub seed: u64,
    pub paid_spins: u64,
    pub free_spins: u64,
    pub lines: usize,
    pub total_bet: Credits,
    pub total_win: Credits,
    pub rtp: f64,
    pub hit_rate: f64,
    pub bonuses: u64,
    pub retriggers: u64,
    /// Paid spins per bonus start
    pub bonus_frequency: Option<f64>,
    pub bonus_win: Credits,
    pub max_win: Credits,
    /// Configured target, for comparison only
    pub target_rtp: f64,
}

/// Long-run wheel numbers for one repeated bet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelReport {
    pub seed: u64,
    pub cell: String,
    pub spins: u64,
    pub total_staked: Credits,
    pub total_paid: Credits,
    pub rtp: f64,
    pub winning_spins: u64,
    /// Hits per pocket, index = number
    pub hits: Vec<u64>,
}

/// Long-run case numbers for one box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CasesReport {
    pub seed: u64,
    pub box_id: String,
    pub opens: u64,
    pub boxes_opened: u64,
    pub total_spent: Credits,
    pub total_value: Credits,
    pub rtp: f64,
    /// Theoretical value per box against price, percent
    pub expected_rtp: f64,
    /// Items drawn per rarity, in [`Rarity::ALL`] order
    pub rarity_counts: Vec<(Rarity, u64)>,
}

/// Static audit of one box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxAudit {
    pub box_id: String,
    pub price: Credits,
    pub items: usize,
    pub tiles: bool,
    pub problem: Option<String>,
    pub expected_value: f64,
    pub expected_rtp: f64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SLOT
// ═══════════════════════════════════════════════════════════════════════════════

/// Play `spins` paid spins (plus any free spins they trigger)
pub fn simulate_slot(
    config: SlotConfig,
    seed: u64,
    spins: u64,
    lines: Option<usize>,
) -> SzResult<SlotReport> {
    let target_rtp = config.target_rtp;
    let mut machine = SlotMachine::seeded(config, seed)?;
    let mut state = machine.initial_state();
    state.credit = BANKROLL;
    if let Some(lines) = lines {
        if lines == 0 || lines > machine.config().max_lines() {
            return Err(SzError::InvalidConfig(format!(
                "lines must be 1..={}",
                machine.config().max_lines()
            )));
        }
        state.lines = lines;
    }

    let mut paid = 0;
    while paid < spins || state.in_free_spins() {
        let free = state.in_free_spins();
        state = match machine.spin(&state) {
            Ok(outcome) => outcome.state,
            Err(declined) => return Err(exhausted(declined)),
        };
        if !free {
            paid += 1;
        }
    }

    let stats = machine.stats();
    log::info!(
        "[Sim] Slot seed {}: {} paid spins, RTP {:.2}%",
        seed,
        paid,
        stats.rtp()
    );
    Ok(SlotReport {
        seed,
        paid_spins: paid,
        free_spins: stats.free_spins,
        lines: state.lines,
        total_bet: stats.total_bet,
        total_win: stats.total_win,
        rtp: stats.rtp(),
        hit_rate: stats.hit_rate(),
        bonuses: stats.bonuses_started,
        retriggers: stats.retriggers,
        bonus_frequency: stats.bonus_frequency(),
        bonus_win: stats.bonus_win,
        max_win: stats.max_win,
        target_rtp,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// WHEEL
// ═══════════════════════════════════════════════════════════════════════════════

/// Put the default chip on `cell_id` and spin, `spins` times
pub fn simulate_wheel(
    config: WheelConfig,
    seed: u64,
    spins: u64,
    cell_id: &str,
) -> SzResult<WheelReport> {
    let cell = BoardCell::by_id(cell_id)
        .ok_or_else(|| SzError::InvalidConfig(format!("unknown board cell {}", cell_id)))?;
    let mut table = WheelTable::seeded(config, seed)?;
    let mut state = table.initial_state();
    state.credit = BANKROLL;

    for _ in 0..spins {
        let placed = table.place_on(&state, &cell).map_err(exhausted)?;
        state = table.spin(&placed).map_err(exhausted)?.state;
    }

    let stats = table.stats();
    log::info!(
        "[Sim] Wheel seed {} on {}: RTP {:.2}%",
        seed,
        cell_id,
        stats.rtp()
    );
    Ok(WheelReport {
        seed,
        cell: cell.id,
        spins: stats.spins,
        total_staked: stats.total_staked,
        total_paid: stats.total_paid,
        rtp: stats.rtp(),
        winning_spins: stats.winning_spins,
        hits: stats.hits.clone(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// CASES
// ═══════════════════════════════════════════════════════════════════════════════

/// Open `box_id` `opens` times, `count` boxes each, selling as we go
pub fn simulate_cases(
    config: CasesConfig,
    seed: u64,
    box_id: &str,
    opens: u64,
    count: usize,
) -> SzResult<CasesReport> {
    let expected_rtp = config
        .catalog
        .get(box_id)
        .map(|b| b.expected_value() / b.price.as_f64() * 100.0)
        .ok_or_else(|| SzError::InvalidConfig(format!("unknown box {}", box_id)))?;
    let mut engine = CaseEngine::seeded(config, seed)?;
    let mut state = engine.initial_state();
    state.credit = BANKROLL;

    let mut rarity_counts: Vec<(Rarity, u64)> = Rarity::ALL.iter().map(|&r| (r, 0)).collect();
    for _ in 0..opens {
        let outcome = engine.open(&state, box_id, count).map_err(exhausted)?;
        for item in &outcome.settlement.items {
            if let Some(slot) = rarity_counts.iter_mut().find(|(r, _)| *r == item.item.rarity) {
                slot.1 += 1;
            }
        }
        state = engine.sell_all(&outcome.state).0;
    }

    let stats = engine.stats();
    log::info!(
        "[Sim] Cases seed {} on {}: RTP {:.2}% (expected {:.2}%)",
        seed,
        box_id,
        stats.rtp(),
        expected_rtp
    );
    Ok(CasesReport {
        seed,
        box_id: box_id.to_string(),
        opens: stats.opens,
        boxes_opened: stats.boxes_opened,
        total_spent: stats.total_spent,
        total_value: stats.total_awarded,
        rtp: stats.rtp(),
        expected_rtp,
        rarity_counts,
    })
}

/// Check every box in the catalogue without drawing anything
pub fn verify_boxes(catalog: &Catalog) -> Vec<BoxAudit> {
    catalog
        .boxes()
        .iter()
        .map(|b| {
            let problem = b.validate().err().map(|e| e.to_string());
            let expected_value = b.expected_value();
            BoxAudit {
                box_id: b.id.clone(),
                price: b.price,
                items: b.items.len(),
                tiles: problem.is_none(),
                problem,
                expected_value,
                expected_rtp: if b.price.is_zero() {
                    0.0
                } else {
                    expected_value / b.price.as_f64() * 100.0
                },
            }
        })
        .collect()
}

fn exhausted(declined: Declined) -> SzError {
    SzError::InvalidConfig(format!("simulation stopped: {}", declined))
}
