//! Reel grid and grid generation
//!
//! Grids are column-major: `reels[reel][row]`, row 0 at the top.

use std::fmt;

use serde::{Deserialize, Serialize};

use sz_core::{GameRng, WeightedSampler};

use crate::symbols::Symbol;

/// A (reel, row) coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub reel: u8,
    pub row: u8,
}

impl Cell {
    pub const fn new(reel: u8, row: u8) -> Self {
        Self { reel, row }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.reel, self.row)
    }
}

/// The visible reel window
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    reels: Vec<Vec<Symbol>>,
}

impl Grid {
    /// From columns (reel-major)
    pub fn new(reels: Vec<Vec<Symbol>>) -> Self {
        Self { reels }
    }

    /// From rows (top row first); handy for writing fixtures
    pub fn from_rows(rows: &[Vec<Symbol>]) -> Self {
        let reel_count = rows.first().map(|r| r.len()).unwrap_or(0);
        let reels = (0..reel_count)
            .map(|reel| rows.iter().filter_map(|row| row.get(reel).copied()).collect())
            .collect();
        Self { reels }
    }

    /// Every cell set to one symbol
    pub fn filled(reels: usize, rows: usize, symbol: Symbol) -> Self {
        Self {
            reels: vec![vec![symbol; rows]; reels],
        }
    }

    pub fn reel_count(&self) -> usize {
        self.reels.len()
    }

    pub fn row_count(&self) -> usize {
        self.reels.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Exactly `reels` columns of `rows` cells each
    pub fn has_shape(&self, reels: usize, rows: usize) -> bool {
        self.reels.len() == reels && self.reels.iter().all(|c| c.len() == rows)
    }

    pub fn get(&self, cell: Cell) -> Option<Symbol> {
        self.reels
            .get(cell.reel as usize)
            .and_then(|c| c.get(cell.row as usize))
            .copied()
    }

    pub fn set(&mut self, cell: Cell, symbol: Symbol) {
        if let Some(slot) = self
            .reels
            .get_mut(cell.reel as usize)
            .and_then(|c| c.get_mut(cell.row as usize))
        {
            *slot = symbol;
        }
    }

    pub fn column(&self, reel: usize) -> &[Symbol] {
        self.reels.get(reel).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn columns(&self) -> &[Vec<Symbol>] {
        &self.reels
    }

    /// Replace a whole column
    pub fn set_column(&mut self, reel: usize, symbols: Vec<Symbol>) {
        if let Some(col) = self.reels.get_mut(reel) {
            *col = symbols;
        }
    }

    /// Occurrences of `symbol` anywhere on the grid
    pub fn count(&self, symbol: Symbol) -> usize {
        self.reels
            .iter()
            .flatten()
            .filter(|&&s| s == symbol)
            .count()
    }

    pub fn cells(&self) -> impl Iterator<Item = (Cell, Symbol)> + '_ {
        self.reels.iter().enumerate().flat_map(|(reel, col)| {
            col.iter()
                .enumerate()
                .map(move |(row, &s)| (Cell::new(reel as u8, row as u8), s))
        })
    }

    /// Column as symbol indices (stage payloads)
    pub fn column_indices(&self, reel: usize) -> Vec<u8> {
        self.column(reel).iter().map(|s| s.index() as u8).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.row_count() {
            let line: Vec<String> = self
                .reels
                .iter()
                .map(|col| format!("{:>9}", col.get(row).map(|s| s.code()).unwrap_or("-")))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// GENERATION
// ═══════════════════════════════════════════════════════════════════════════

/// Draw a fresh grid.
///
/// Each cell excludes the symbols already placed above it in the same column,
/// so a column never repeats a symbol. This is not weighted sampling without
/// replacement; the resulting bias is part of the game's math.
pub fn generate(
    sampler: &WeightedSampler<Symbol>,
    reels: usize,
    rows: usize,
    rng: &mut GameRng,
) -> Grid {
    let columns = (0..reels)
        .map(|_| {
            let mut column: Vec<Symbol> = Vec::with_capacity(rows);
            for _ in 0..rows {
                let symbol = sampler
                    .sample_excluding(&column, rng)
                    .unwrap_or_else(|| sampler.sample(rng));
                column.push(symbol);
            }
            column
        })
        .collect();
    Grid::new(columns)
}

/// Test mode: BOOK on a random row of each listed reel
pub fn force_books(grid: &mut Grid, reels: &[usize], rng: &mut GameRng) -> Vec<Cell> {
    let rows = grid.row_count();
    let mut placed = Vec::with_capacity(reels.len());
    for &reel in reels {
        if reel >= grid.reel_count() {
            continue;
        }
        let cell = Cell::new(reel as u8, rng.index(rows) as u8);
        grid.set(cell, Symbol::Book);
        placed.push(cell);
    }
    placed
}

/// Top the grid up to `target` BOOKs.
///
/// Walks reels left to right, one random row per reel, converting non-BOOK
/// cells. If the walk falls short, the first remaining non-BOOK cells are
/// converted so the grid always ends with exactly `target` BOOKs.
pub fn inject_books(grid: &mut Grid, target: usize, rng: &mut GameRng) -> Vec<Cell> {
    let rows = grid.row_count();
    let mut placed = Vec::new();

    for reel in 0..grid.reel_count() {
        if grid.count(Symbol::Book) >= target {
            break;
        }
        let cell = Cell::new(reel as u8, rng.index(rows) as u8);
        if grid.get(cell) != Some(Symbol::Book) {
            grid.set(cell, Symbol::Book);
            placed.push(cell);
        }
    }

    if grid.count(Symbol::Book) < target {
        let open: Vec<Cell> = grid
            .cells()
            .filter(|(_, s)| !s.is_wild())
            .map(|(c, _)| c)
            .collect();
        for cell in open {
            if grid.count(Symbol::Book) >= target {
                break;
            }
            grid.set(cell, Symbol::Book);
            placed.push(cell);
        }
    }

    placed
}

/// Overwrite every column holding `symbol` or BOOK with `symbol`.
///
/// Returns the expanded reels in left-to-right order.
pub fn expand(grid: &mut Grid, symbol: Symbol) -> Vec<u8> {
    let rows = grid.row_count();
    let targets: Vec<usize> = (0..grid.reel_count())
        .filter(|&reel| grid.column(reel).iter().any(|&s| s == symbol || s.is_wild()))
        .collect();

    for &reel in &targets {
        grid.set_column(reel, vec![symbol; rows]);
    }
    targets.into_iter().map(|r| r as u8).collect()
}
