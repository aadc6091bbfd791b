//! Bet kinds and the betting board
//!
//! Every bet covers a fixed set of numbers. A bet wins iff the drawn pocket
//! is in that set, and pays `stake × (multiplier + 1)` (stake returned).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use sz_core::Credits;

use crate::pockets::{BLACK_NUMBERS, MAX_POCKET, RED_NUMBERS};

/// Bet family, which fixes the payout multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetKind {
    /// Single number, 35:1
    Straight,
    /// Board column, 2:1
    Column,
    /// 1-12 / 13-24 / 25-36, 2:1
    Dozen,
    /// Red, black, even, odd, low, high, 1:1
    EvenMoney,
}

impl BetKind {
    /// Winnings per unit staked, excluding the stake
    pub const fn multiplier(self) -> u64 {
        match self {
            BetKind::Straight => 35,
            BetKind::Column | BetKind::Dozen => 2,
            BetKind::EvenMoney => 1,
        }
    }
}

/// A placed bet. Bets on the same cell accumulate into one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    /// Board cell id (`s-17`, `c-2`, `red`, …)
    pub id: String,
    pub kind: BetKind,
    pub numbers: BTreeSet<u8>,
    pub amount: Credits,
}

impl Bet {
    pub fn covers(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }

    /// Total returned for `number`; zero when the bet loses
    pub fn payout(&self, number: u8) -> Credits {
        if self.covers(number) {
            self.amount.times(self.kind.multiplier() + 1)
        } else {
            Credits::ZERO
        }
    }
}

/// A cell of the betting board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCell {
    pub id: String,
    pub kind: BetKind,
    pub numbers: BTreeSet<u8>,
}

impl BoardCell {
    fn new(id: impl Into<String>, kind: BetKind, numbers: impl IntoIterator<Item = u8>) -> Self {
        Self {
            id: id.into(),
            kind,
            numbers: numbers.into_iter().collect(),
        }
    }

    /// Single number `n`
    pub fn straight(n: u8) -> Option<Self> {
        (n <= MAX_POCKET).then(|| Self::new(format!("s-{}", n), BetKind::Straight, [n]))
    }

    /// Column 1..=3; column 1 is 1, 4, ..., 34
    pub fn column(c: u8) -> Option<Self> {
        (1..=3).contains(&c).then(|| {
            Self::new(
                format!("c-{}", c),
                BetKind::Column,
                (0..12).map(move |i| c + 3 * i),
            )
        })
    }

    /// Dozen 1..=3; dozen 1 is 1..=12
    pub fn dozen(d: u8) -> Option<Self> {
        (1..=3).contains(&d).then(|| {
            let start = (d - 1) * 12 + 1;
            Self::new(format!("d-{}", d), BetKind::Dozen, start..start + 12)
        })
    }

    pub fn low() -> Self {
        Self::new("low", BetKind::EvenMoney, 1..=18)
    }

    pub fn high() -> Self {
        Self::new("high", BetKind::EvenMoney, 19..=36)
    }

    pub fn even() -> Self {
        Self::new("even", BetKind::EvenMoney, (1..=MAX_POCKET).filter(|n| n % 2 == 0))
    }

    pub fn odd() -> Self {
        Self::new("odd", BetKind::EvenMoney, (1..=MAX_POCKET).filter(|n| n % 2 == 1))
    }

    pub fn red() -> Self {
        Self::new("red", BetKind::EvenMoney, RED_NUMBERS)
    }

    pub fn black() -> Self {
        Self::new("black", BetKind::EvenMoney, BLACK_NUMBERS)
    }

    /// Look a cell up by id
    pub fn by_id(id: &str) -> Option<Self> {
        match id {
            "low" => Some(Self::low()),
            "high" => Some(Self::high()),
            "even" => Some(Self::even()),
            "odd" => Some(Self::odd()),
            "red" => Some(Self::red()),
            "black" => Some(Self::black()),
            _ => {
                let (prefix, value) = id.split_once('-')?;
                let value: u8 = value.parse().ok()?;
                match prefix {
                    "s" => Self::straight(value),
                    "c" => Self::column(value),
                    "d" => Self::dozen(value),
                    _ => None,
                }
            }
        }
    }
}

/// Every cell on the board: 37 straights, 3 columns, 3 dozens, 6 even-money
pub fn standard_board() -> Vec<BoardCell> {
    let mut cells: Vec<BoardCell> = (0..=MAX_POCKET).filter_map(BoardCell::straight).collect();
    cells.extend((1..=3).filter_map(BoardCell::column));
    cells.extend((1..=3).filter_map(BoardCell::dozen));
    cells.extend([
        BoardCell::low(),
        BoardCell::high(),
        BoardCell::even(),
        BoardCell::odd(),
        BoardCell::red(),
        BoardCell::black(),
    ]);
    cells
}
