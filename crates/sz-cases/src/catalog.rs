//! Box catalogue
//!
//! Every box splits tickets `1..=100000` between its items. The built-in
//! boxes share the same rarity bands:
//!
//! ```text
//! Grey    1 - 45,000       45%
//! Blue    45,001 - 75,000  30%
//! Purple  75,001 - 92,000  17%
//! Gold    92,001 - 99,000   7%
//! Red     99,001 - 100,000  1%
//! ```

use serde::{Deserialize, Serialize};

use sz_core::{Credits, SzError, SzResult};

use crate::item::{Item, Rarity};

/// Lowest ticket
pub const TICKET_MIN: u32 = 1;

/// Highest ticket
pub const TICKET_MAX: u32 = 100_000;

/// A purchasable box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseBox {
    pub id: String,
    pub name: String,
    pub price: Credits,
    /// Display risk label
    pub risk: String,
    pub items: Vec<Item>,
}

impl CaseBox {
    /// Items must tile `TICKET_MIN..=TICKET_MAX`: ordered, no gap, no overlap
    pub fn validate(&self) -> SzResult<()> {
        let first = self
            .items
            .first()
            .ok_or_else(|| SzError::InvalidConfig(format!("box {} has no items", self.id)))?;
        if first.ticket_min != TICKET_MIN {
            return Err(SzError::InvalidConfig(format!(
                "box {} starts at ticket {}",
                self.id, first.ticket_min
            )));
        }

        for item in &self.items {
            if item.ticket_min > item.ticket_max {
                return Err(SzError::InvalidConfig(format!(
                    "box {} item {} has an empty range",
                    self.id, item.id
                )));
            }
        }
        for pair in self.items.windows(2) {
            let next = pair[0].ticket_max.checked_add(1).ok_or_else(|| {
                SzError::InvalidConfig(format!(
                    "box {}: {} ends at {} but {} follows it",
                    self.id, pair[0].id, pair[0].ticket_max, pair[1].id
                ))
            })?;
            if pair[1].ticket_min != next {
                return Err(SzError::InvalidConfig(format!(
                    "box {}: {} ends at {} but {} starts at {}",
                    self.id, pair[0].id, pair[0].ticket_max, pair[1].id, pair[1].ticket_min
                )));
            }
        }

        let last = self.items.last().map(|i| i.ticket_max).unwrap_or(0);
        if last != TICKET_MAX {
            return Err(SzError::InvalidConfig(format!(
                "box {} ends at ticket {}",
                self.id, last
            )));
        }

        let covered: u64 = self.items.iter().map(Item::width).sum();
        if covered != u64::from(TICKET_MAX) {
            return Err(SzError::InvalidConfig(format!(
                "box {} covers {} tickets",
                self.id, covered
            )));
        }
        Ok(())
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Expected item value of one opening
    pub fn expected_value(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.value.as_f64() * i.width() as f64 / TICKET_MAX as f64)
            .sum()
    }

    /// Share of tickets per rarity
    pub fn rarity_share(&self, rarity: Rarity) -> f64 {
        let tickets: u64 = self
            .items
            .iter()
            .filter(|i| i.rarity == rarity)
            .map(Item::width)
            .sum();
        tickets as f64 / TICKET_MAX as f64
    }
}

/// All boxes on offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    boxes: Vec<CaseBox>,
}

impl Catalog {
    pub fn new(boxes: Vec<CaseBox>) -> Self {
        Self { boxes }
    }

    /// The four live boxes
    pub fn builtin() -> Self {
        Self::new(vec![grossadmiral(), kezro(), flegma(), koba()])
    }

    pub fn get(&self, box_id: &str) -> Option<&CaseBox> {
        self.boxes.iter().find(|b| b.id == box_id)
    }

    pub fn boxes(&self) -> &[CaseBox] {
        &self.boxes
    }

    /// Validate every box and reject duplicate ids
    pub fn validate(&self) -> SzResult<()> {
        if self.boxes.is_empty() {
            return Err(SzError::InvalidConfig("catalogue is empty".into()));
        }
        for (i, b) in self.boxes.iter().enumerate() {
            b.validate()?;
            if self.boxes[..i].iter().any(|other| other.id == b.id) {
                return Err(SzError::InvalidConfig(format!("duplicate box id {}", b.id)));
            }
            if b.price.is_zero() {
                return Err(SzError::InvalidConfig(format!("box {} is free", b.id)));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BUILT-IN BOXES
// ═══════════════════════════════════════════════════════════════════════════

/// (id, name, value in hundredths, rarity, first ticket, last ticket)
type Row = (&'static str, &'static str, u64, Rarity, u32, u32);

fn build(id: &str, name: &str, price: u64, risk: &str, rows: &[Row]) -> CaseBox {
    CaseBox {
        id: id.to_string(),
        name: name.to_string(),
        price: Credits::from_whole(price),
        risk: risk.to_string(),
        items: rows
            .iter()
            .map(|&(id, name, value, rarity, min, max)| {
                Item::new(id, name, Credits::from_minor(value), rarity, min, max)
            })
            .collect(),
    }
}

use Rarity::{Blue, Gold, Grey, Purple, Red};

fn grossadmiral() -> CaseBox {
    build(
        "grossadmiral",
        "Grossadmiral's Box of Admirals",
        5,
        "LOW RISK",
        &[
            ("g1", "Stari konop", 50, Grey, 1, 15000),
            ("g2", "Morska sol", 100, Grey, 15001, 28000),
            ("g3", "Riblja kost", 150, Grey, 28001, 38000),
            ("g4", "Školjka", 200, Grey, 38001, 45000),
            ("g5", "Brodski kompas", 400, Blue, 45001, 55000),
            ("g6", "Dalekozor", 600, Blue, 55001, 65000),
            ("g7", "Sidro privjesak", 800, Blue, 65001, 75000),
            ("g8", "Kapetanska kapa", 1200, Purple, 75001, 83000),
            ("g9", "Brodski zvon", 1800, Purple, 83001, 92000),
            ("g10", "Zlatna medalja", 3000, Gold, 92001, 96000),
            ("g11", "Neptunov trozubac", 4500, Gold, 96001, 99000),
            ("g12", "Admiralski mač", 10000, Red, 99001, 100000),
        ],
    )
}

fn kezro() -> CaseBox {
    build(
        "kezro",
        "Kezro Palettes & Forklifts",
        15,
        "MEDIUM RISK",
        &[
            ("k1", "Kartonska kutija", 100, Grey, 1, 14000),
            ("k2", "Ljepljiva traka", 200, Grey, 14001, 26000),
            ("k3", "Radne rukavice", 300, Grey, 26001, 36000),
            ("k4", "Kaciga", 500, Grey, 36001, 45000),
            ("k5", "Paleta drva", 1000, Blue, 45001, 55000),
            ("k6", "Alat set", 1500, Blue, 55001, 65000),
            ("k7", "Viličar ključ", 2200, Blue, 65001, 75000),
            ("k8", "Električni alat", 4000, Purple, 75001, 84000),
            ("k9", "Zlatna paleta", 6500, Purple, 84001, 92000),
            ("k10", "Mini viličar", 12000, Gold, 92001, 96500),
            ("k11", "Skladište ključ", 20000, Gold, 96501, 99000),
            ("k12", "Dijamantni viličar", 50000, Red, 99001, 100000),
        ],
    )
}

fn flegma() -> CaseBox {
    build(
        "flegma",
        "Flegma's Gym The Win",
        30,
        "HIGH RISK",
        &[
            ("f1", "Protein bar", 200, Grey, 1, 13000),
            ("f2", "Shaker", 400, Grey, 13001, 25000),
            ("f3", "Gym ručnik", 600, Grey, 25001, 35000),
            ("f4", "Rukavice", 1000, Grey, 35001, 45000),
            ("f5", "Kettlebell 8kg", 2000, Blue, 45001, 55000),
            ("f6", "Yoga mat", 3000, Blue, 55001, 65000),
            ("f7", "Traka za trčanje", 4500, Blue, 65001, 75000),
            ("f8", "Zlatne bučice", 8000, Purple, 75001, 85000),
            ("f9", "Premium članarina", 13000, Purple, 85001, 92000),
            ("f10", "Home gym set", 25000, Gold, 92001, 96000),
            ("f11", "Lifetime VIP", 40000, Gold, 96001, 99000),
            ("f12", "Gym imperija", 100000, Red, 99001, 100000),
        ],
    )
}

fn koba() -> CaseBox {
    build(
        "koba",
        "Koba's Ride or Fry",
        50,
        "EXTREME RISK",
        &[
            ("ko1", "Prženi krumpirić", 100, Grey, 1, 12000),
            ("ko2", "Ketchup", 200, Grey, 12001, 23000),
            ("ko3", "Majoneza", 400, Grey, 23001, 33000),
            ("ko4", "Burger", 800, Grey, 33001, 45000),
            ("ko5", "Pizza slice", 2000, Blue, 45001, 54000),
            ("ko6", "Hot dog deluxe", 3500, Blue, 54001, 64000),
            ("ko7", "Taco fiesta", 5500, Blue, 64001, 75000),
            ("ko8", "Food truck ključ", 10000, Purple, 75001, 84000),
            ("ko9", "Zlatna friteza", 18000, Purple, 84001, 92000),
            ("ko10", "Michelin zvijezda", 35000, Gold, 92001, 96000),
            ("ko11", "Restoran franšiza", 60000, Gold, 96001, 99000),
            ("ko12", "Fast food carstvo", 200000, Red, 99001, 100000),
        ],
    )
}
