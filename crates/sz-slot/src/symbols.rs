//! Symbol set

use std::fmt;

use serde::{Deserialize, Serialize};

/// The ten reel symbols, in weight-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Symbol {
    /// Wild and bonus trigger
    Book = 0,
    Hat = 1,
    Pharaoh = 2,
    Explorer1 = 3,
    Explorer2 = 4,
    A = 5,
    K = 6,
    Q = 7,
    J = 8,
    #[serde(rename = "10")]
    Ten = 9,
}

impl Symbol {
    pub const COUNT: usize = 10;

    /// Weight-table order
    pub const ALL: [Symbol; Symbol::COUNT] = [
        Symbol::Book,
        Symbol::Hat,
        Symbol::Pharaoh,
        Symbol::Explorer1,
        Symbol::Explorer2,
        Symbol::A,
        Symbol::K,
        Symbol::Q,
        Symbol::J,
        Symbol::Ten,
    ];

    /// Everything except BOOK (expanding symbol candidates)
    pub const NON_WILD: [Symbol; Symbol::COUNT - 1] = [
        Symbol::Hat,
        Symbol::Pharaoh,
        Symbol::Explorer1,
        Symbol::Explorer2,
        Symbol::A,
        Symbol::K,
        Symbol::Q,
        Symbol::J,
        Symbol::Ten,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Symbol> {
        Symbol::ALL.get(index).copied()
    }

    pub const fn is_wild(self) -> bool {
        matches!(self, Symbol::Book)
    }

    /// HAT and PHARAOH pay from two of a kind
    pub const fn is_premium(self) -> bool {
        matches!(self, Symbol::Hat | Symbol::Pharaoh)
    }

    /// Shortest run that can pay
    pub const fn min_match(self) -> usize {
        if self.is_premium() { 2 } else { 3 }
    }

    /// Short code used in configs and logs
    pub const fn code(self) -> &'static str {
        match self {
            Symbol::Book => "BOOK",
            Symbol::Hat => "HAT",
            Symbol::Pharaoh => "PHARAOH",
            Symbol::Explorer1 => "EXPLORER1",
            Symbol::Explorer2 => "EXPLORER2",
            Symbol::A => "A",
            Symbol::K => "K",
            Symbol::Q => "Q",
            Symbol::J => "J",
            Symbol::Ten => "10",
        }
    }

    /// Display name shown in the paytable
    pub const fn display_name(self) -> &'static str {
        match self {
            Symbol::Book => "Book of Stožer",
            Symbol::Hat => "Koba the Explorer",
            Symbol::Pharaoh => "Flegma",
            Symbol::Explorer1 => "Kezro",
            Symbol::Explorer2 => "Grossadmiral",
            Symbol::A => "Kec",
            Symbol::K => "Kralj",
            Symbol::Q => "Renata",
            Symbol::J => "Dečko",
            Symbol::Ten => "Ceki",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
