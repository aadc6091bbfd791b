//! Wheel rounds end to end

use std::io::Write;

use sz_core::{Credits, Declined, load_config};
use sz_wheel::{BetKind, BoardCell, WheelConfig, WheelSession, WheelTable, standard_board};

// ═══════════════════════════════════════════════════════════════════════════════
// PAYOUTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_every_cell_pays_by_coverage() {
    let config = WheelConfig::instant();
    for cell in standard_board() {
        let restricted = cell.kind == BetKind::Straight
            && !cell.numbers.iter().all(|&n| config.straight_allowed(n));
        if restricted {
            continue;
        }
        for number in 0..=36u8 {
            let mut table = WheelTable::seeded(config.clone(), 1).unwrap();
            let state = table.place_on(&table.initial_state(), &cell).unwrap();
            let out = table.spin_with_number(&state, number).unwrap();

            let expected = if cell.numbers.contains(&number) {
                Credits::from_whole(5).times(cell.kind.multiplier() + 1)
            } else {
                Credits::ZERO
            };
            assert_eq!(out.settlement.total_payout, expected, "{} on {}", cell.id, number);
        }
    }
}

#[test]
fn test_mixed_bets_settle_independently() {
    let mut table = WheelTable::seeded(WheelConfig::instant(), 2).unwrap();
    let mut state = table.initial_state();
    for id in ["s-23", "red", "c-2", "d-2", "high"] {
        state = table.place_on(&state, &BoardCell::by_id(id).unwrap()).unwrap();
    }
    assert_eq!(state.credit, Credits::from_whole(975));

    // 23: red, column 2, dozen 2, high
    let out = table.spin_with_number(&state, 23).unwrap();
    let paid: Vec<(String, Credits)> = out
        .settlement
        .bets
        .iter()
        .map(|b| (b.id.clone(), b.payout))
        .collect();
    assert_eq!(
        paid,
        vec![
            ("s-23".to_string(), Credits::from_whole(180)),
            ("red".to_string(), Credits::from_whole(10)),
            ("c-2".to_string(), Credits::from_whole(15)),
            ("d-2".to_string(), Credits::from_whole(15)),
            ("high".to_string(), Credits::from_whole(10)),
        ]
    );
    assert_eq!(out.state.credit, Credits::from_whole(975 + 230));
}

// ═══════════════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_session_rounds_and_history() {
    let mut s = WheelSession::new(WheelTable::seeded(WheelConfig::instant(), 3).unwrap());

    for round in 1..=12usize {
        s.place_on("black").unwrap();
        s.spin().unwrap();
        s.finish_reveal();
        assert_eq!(s.view().history.len(), round.min(10));
        assert_eq!(s.view().history.front().copied(), s.view().result);
    }

    let trace = s.last_trace().unwrap();
    assert!(trace.has_stage("wheel_settle"));
}

#[test]
fn test_same_seed_same_results() {
    let run = |seed| {
        let mut table = WheelTable::seeded(WheelConfig::instant(), seed).unwrap();
        let mut state = table.initial_state();
        let mut results = Vec::new();
        for _ in 0..50 {
            state = table.place_on(&state, &BoardCell::even()).unwrap();
            let out = table.spin(&state).unwrap();
            results.push(out.settlement.number);
            state = out.state;
        }
        results
    };
    assert_eq!(run(77), run(77));
    assert_ne!(run(77), run(78));
}

#[test]
fn test_even_money_rtp_near_theory() {
    let mut table = WheelTable::seeded(WheelConfig::instant(), 4).unwrap();
    let mut state = table.initial_state();
    state.credit = Credits::from_whole(100_000_000);

    for _ in 0..100_000 {
        state = table.place_on(&state, &BoardCell::red()).unwrap();
        state = table.spin(&state).unwrap().state;
    }
    // 36/37 = 97.3%
    let rtp = table.stats().rtp();
    assert!((rtp - 97.3).abs() < 1.5, "rtp {}", rtp);
}

#[test]
fn test_declines_leave_state_untouched() {
    let mut s = WheelSession::new(WheelTable::seeded(WheelConfig::instant(), 5).unwrap());
    let before = s.state().clone();

    assert_eq!(s.spin(), Err(Declined::NoBets));
    assert_eq!(s.place_on("s-1"), Err(Declined::RestrictedNumber(1)));
    assert!(s.select_chip(Credits::from_whole(7)).is_err());
    assert_eq!(s.state(), &before);
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG FILES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_custom_straight_list_from_json() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{ "initial_credit": 20000, "straight_numbers": [17], "redirect_number": 17 }}"#
    )
    .unwrap();

    let config: WheelConfig = load_config(file.path()).unwrap();
    assert!(config.straight_allowed(17));
    assert!(!config.straight_allowed(23));

    let mut table = WheelTable::seeded(config, 6).unwrap();
    let state = table.initial_state();
    assert_eq!(state.credit, Credits::from_whole(200));

    let seventeen = BoardCell::by_id("s-17").unwrap();
    let placed = table.place_on(&state, &seventeen).unwrap();
    assert_eq!(placed.credit, Credits::from_whole(195));
    assert_eq!(
        table.place_on(&placed, &BoardCell::by_id("s-23").unwrap()),
        Err(Declined::RestrictedNumber(23))
    );

    let out = table.spin_with_number(&placed, 17).unwrap();
    assert_eq!(out.settlement.total_payout, Credits::from_whole(180));
    assert_eq!(out.state.credit, Credits::from_whole(375));
}

#[test]
fn test_bad_chip_list_rejected() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{ "chips": [100, 500], "default_chip": 2500 }}"#).unwrap();

    let config: WheelConfig = load_config(file.path()).unwrap();
    assert!(WheelTable::new(config).is_err());
}
