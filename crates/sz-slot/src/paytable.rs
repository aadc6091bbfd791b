//! Paytable, paylines and win evaluation
//!
//! Evaluation is a pure function of `(grid, paylines, lines, bet)`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use sz_core::{Credits, SzError, SzResult};

use crate::grid::{Cell, Grid};
use crate::symbols::Symbol;

/// Match counts a multiplier row covers: 2, 3, 4, 5, 6
pub const PAY_COUNTS: std::ops::RangeInclusive<usize> = 2..=6;

/// A payline: one row index per reel plus its display colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Row for each reel, left to right
    pub pattern: Vec<u8>,
    /// Display colour (CSS hex)
    pub color: String,
}

impl Payline {
    pub fn new(pattern: &[u8], color: &str) -> Self {
        Self {
            pattern: pattern.to_vec(),
            color: color.to_string(),
        }
    }

    /// Cells this line covers
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.pattern
            .iter()
            .enumerate()
            .map(|(reel, &row)| Cell::new(reel as u8, row))
    }
}

/// The ten fixed lines of the 6×3 game
pub fn standard_paylines() -> Vec<Payline> {
    vec![
        Payline::new(&[1, 1, 1, 1, 1, 1], "#ff3b30"), // Middle
        Payline::new(&[0, 0, 0, 0, 0, 0], "#ffcc00"), // Top
        Payline::new(&[2, 2, 2, 2, 2, 2], "#34c759"), // Bottom
        Payline::new(&[0, 1, 2, 2, 1, 0], "#007aff"), // V
        Payline::new(&[2, 1, 0, 0, 1, 2], "#af52de"), // Inverted V
        Payline::new(&[0, 0, 1, 1, 2, 2], "#ff9500"), // Step down
        Payline::new(&[2, 2, 1, 1, 0, 0], "#5ac8fa"), // Step up
        Payline::new(&[1, 0, 0, 0, 0, 1], "#ff2d55"), // Top valley
        Payline::new(&[1, 2, 2, 2, 2, 1], "#a2845e"), // Bottom valley
        Payline::new(&[0, 1, 1, 1, 1, 0], "#30d158"), // Middle bump
    ]
}

/// Symbol → line multipliers for 2..=6 of a kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayTable {
    pays: BTreeMap<Symbol, [u32; 5]>,
}

impl PayTable {
    pub fn standard() -> Self {
        let pays = BTreeMap::from([
            (Symbol::Book, [0, 180, 1800, 18000, 50000]),
            (Symbol::Hat, [10, 100, 1000, 5000, 15000]),
            (Symbol::Pharaoh, [5, 30, 400, 2000, 6000]),
            (Symbol::Explorer1, [0, 30, 100, 750, 2500]),
            (Symbol::Explorer2, [0, 30, 100, 750, 2500]),
            (Symbol::A, [0, 10, 40, 150, 500]),
            (Symbol::K, [0, 10, 40, 150, 500]),
            (Symbol::Q, [0, 5, 25, 100, 300]),
            (Symbol::J, [0, 5, 25, 100, 300]),
            (Symbol::Ten, [0, 5, 25, 100, 300]),
        ]);
        Self { pays }
    }

    /// Multiplier for `count` of `symbol`; zero outside 2..=6 or below the minimum match
    pub fn multiplier(&self, symbol: Symbol, count: usize) -> u32 {
        if !PAY_COUNTS.contains(&count) || count < symbol.min_match() {
            return 0;
        }
        self.pays
            .get(&symbol)
            .map(|row| row[count - 2])
            .unwrap_or(0)
    }

    /// Every symbol has a row and nothing pays below its minimum match
    pub fn validate(&self) -> SzResult<()> {
        for symbol in Symbol::ALL {
            let row = self.pays.get(&symbol).ok_or_else(|| {
                SzError::InvalidConfig(format!("paytable has no row for {}", symbol))
            })?;
            for count in 2..symbol.min_match() {
                if row[count - 2] != 0 {
                    return Err(SzError::InvalidConfig(format!(
                        "{} pays {}x for {} of a kind, below its minimum of {}",
                        symbol,
                        row[count - 2],
                        count,
                        symbol.min_match()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// A paying line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    /// Payline index (0-based)
    pub line_index: u8,
    pub color: String,
    /// Anchor symbol
    pub symbol: Symbol,
    /// Run length from reel 0
    pub count: u8,
    /// Paytable multiplier
    pub multiplier: u32,
    /// multiplier × bet per line
    pub win: Credits,
    /// Cells in the run
    pub positions: Vec<Cell>,
}

/// Result of evaluating one grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub win_lines: Vec<LineWin>,
    pub winning_cells: BTreeSet<Cell>,
    pub total_win: Credits,
}

impl Evaluation {
    pub fn is_win(&self) -> bool {
        !self.total_win.is_zero()
    }
}

/// Evaluate the first `lines` paylines at `bet` per line
pub fn evaluate(
    grid: &Grid,
    paytable: &PayTable,
    paylines: &[Payline],
    lines: usize,
    bet: Credits,
) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for (index, payline) in paylines.iter().take(lines).enumerate() {
        if let Some(win) = evaluate_line(grid, paytable, payline, index, bet) {
            evaluation.winning_cells.extend(win.positions.iter().copied());
            evaluation.total_win += win.win;
            evaluation.win_lines.push(win);
        }
    }

    evaluation
}

fn evaluate_line(
    grid: &Grid,
    paytable: &PayTable,
    payline: &Payline,
    index: usize,
    bet: Credits,
) -> Option<LineWin> {
    let symbols: Vec<Symbol> = payline
        .cells()
        .map(|cell| grid.get(cell))
        .collect::<Option<Vec<_>>>()?;

    // Anchor: first non-wild, or BOOK when the whole line is BOOK
    let anchor = symbols
        .iter()
        .copied()
        .find(|s| !s.is_wild())
        .unwrap_or(Symbol::Book);

    let count = symbols
        .iter()
        .take_while(|&&s| s == anchor || s.is_wild())
        .count();

    if count < anchor.min_match() {
        return None;
    }

    let multiplier = paytable.multiplier(anchor, count);
    if multiplier == 0 {
        return None;
    }

    Some(LineWin {
        line_index: index as u8,
        color: payline.color.clone(),
        symbol: anchor,
        count: count as u8,
        multiplier,
        win: bet.times(multiplier as u64),
        positions: payline.cells().take(count).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    fn bet() -> Credits {
        Credits::from_minor(10)
    }

    /// Grid from rows (top, middle, bottom), 6 symbols each
    fn rows(top: [Symbol; 6], mid: [Symbol; 6], bot: [Symbol; 6]) -> Grid {
        Grid::from_rows(&[top.to_vec(), mid.to_vec(), bot.to_vec()])
    }

    /// Neighbouring reels share no symbol, so nothing can pay
    fn filler() -> Grid {
        rows(
            [A, J, A, J, A, J],
            [K, Ten, K, Ten, K, Ten],
            [Q, Explorer1, Q, Explorer1, Q, Explorer1],
        )
    }

    #[test]
    fn test_standard_table_is_valid() {
        PayTable::standard().validate().unwrap();
    }

    #[test]
    fn test_multiplier_below_minimum_is_zero() {
        let pt = PayTable::standard();
        assert_eq!(pt.multiplier(Hat, 2), 10);
        assert_eq!(pt.multiplier(A, 2), 0);
        assert_eq!(pt.multiplier(Book, 2), 0);
        assert_eq!(pt.multiplier(Book, 6), 50000);
        assert_eq!(pt.multiplier(Q, 1), 0);
        assert_eq!(pt.multiplier(Q, 7), 0);
    }

    #[test]
    fn test_validate_rejects_low_count_pay() {
        let mut pt = PayTable::standard();
        pt.pays.insert(A, [3, 10, 40, 150, 500]);
        assert!(pt.validate().is_err());
    }

    #[test]
    fn test_no_win_on_filler() {
        let eval = evaluate(&filler(), &PayTable::standard(), &standard_paylines(), 10, bet());
        assert!(!eval.is_win());
        assert!(eval.winning_cells.is_empty());
    }

    #[test]
    fn test_middle_line_three_of_a_kind() {
        let grid = rows(
            [A, K, Q, J, Ten, A],
            [Q, Q, Q, K, A, K],
            [K, J, Ten, A, K, Q],
        );
        let eval = evaluate(&grid, &PayTable::standard(), &standard_paylines(), 1, bet());

        assert_eq!(eval.win_lines.len(), 1);
        let win = &eval.win_lines[0];
        assert_eq!(win.line_index, 0);
        assert_eq!(win.symbol, Q);
        assert_eq!(win.count, 3);
        assert_eq!(win.multiplier, 5);
        assert_eq!(win.win, Credits::from_minor(50));
        assert_eq!(
            win.positions,
            vec![Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)]
        );
    }

    #[test]
    fn test_wild_leading_run_uses_first_non_wild_anchor() {
        let grid = rows(
            [A, K, Q, J, Ten, A],
            [Book, Book, Hat, Book, K, K],
            [K, J, Ten, A, K, Q],
        );
        let eval = evaluate(&grid, &PayTable::standard(), &standard_paylines(), 1, bet());

        let win = &eval.win_lines[0];
        assert_eq!(win.symbol, Hat);
        assert_eq!(win.count, 4);
        assert_eq!(win.multiplier, 1000);
    }

    #[test]
    fn test_premium_pays_from_two() {
        let grid = rows(
            [A, K, Q, J, Ten, A],
            [Pharaoh, Pharaoh, A, K, Q, J],
            [K, J, Ten, A, K, Q],
        );
        let eval = evaluate(&grid, &PayTable::standard(), &standard_paylines(), 1, bet());
        assert_eq!(eval.win_lines[0].count, 2);
        assert_eq!(eval.win_lines[0].multiplier, 5);
    }

    #[test]
    fn test_all_books_pays_as_book() {
        let grid = rows(
            [A, K, Q, J, Ten, A],
            [Book; 6],
            [K, J, Ten, A, K, Q],
        );
        let eval = evaluate(&grid, &PayTable::standard(), &standard_paylines(), 1, bet());
        assert_eq!(eval.win_lines[0].symbol, Book);
        assert_eq!(eval.win_lines[0].count, 6);
        assert_eq!(eval.total_win, bet().times(50000));
    }

    #[test]
    fn test_inactive_lines_ignored() {
        let grid = rows(
            [J, J, J, K, A, K],
            [A, K, Q, J, Ten, A],
            [K, J, Ten, A, K, Q],
        );
        let pt = PayTable::standard();
        let lines = standard_paylines();

        // Top row is line index 1
        assert!(!evaluate(&grid, &pt, &lines, 1, bet()).is_win());
        assert!(evaluate(&grid, &pt, &lines, 2, bet()).is_win());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let grid = rows(
            [Hat, Hat, Book, K, A, K],
            [Q, Q, Q, Q, A, K],
            [Book, J, Ten, A, K, Q],
        );
        let pt = PayTable::standard();
        let lines = standard_paylines();

        let first = evaluate(&grid, &pt, &lines, 10, bet());
        for _ in 0..10 {
            assert_eq!(evaluate(&grid, &pt, &lines, 10, bet()), first);
        }
    }
}
