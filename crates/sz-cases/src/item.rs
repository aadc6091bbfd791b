//! Items, rarity and owned inventory entries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sz_core::Credits;

/// Display tier. Never affects resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Grey,
    Blue,
    Purple,
    Gold,
    Red,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Grey,
        Rarity::Blue,
        Rarity::Purple,
        Rarity::Gold,
        Rarity::Red,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Rarity::Grey => "Common",
            Rarity::Blue => "Uncommon",
            Rarity::Purple => "Rare",
            Rarity::Gold => "Epic",
            Rarity::Red => "Legendary",
        }
    }
}

/// A box item with its inclusive ticket range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Sell value
    pub value: Credits,
    pub rarity: Rarity,
    pub ticket_min: u32,
    pub ticket_max: u32,
}

impl Item {
    pub fn new(
        id: &str,
        name: &str,
        value: Credits,
        rarity: Rarity,
        ticket_min: u32,
        ticket_max: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            value,
            rarity,
            ticket_min,
            ticket_max,
        }
    }

    pub fn contains(&self, ticket: u32) -> bool {
        (self.ticket_min..=self.ticket_max).contains(&ticket)
    }

    /// Tickets this item owns
    pub fn width(&self) -> u64 {
        u64::from(self.ticket_max.saturating_sub(self.ticket_min)) + 1
    }
}

/// An item in the player's inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedItem {
    pub instance_id: Uuid,
    pub box_id: String,
    pub item: Item,
    /// Ticket that produced it
    pub ticket: u32,
}

impl OwnedItem {
    pub fn value(&self) -> Credits {
        self.item.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let item = Item::new("g5", "Brodski kompas", Credits::from_whole(4), Rarity::Blue, 45001, 55000);
        assert!(item.contains(45001));
        assert!(item.contains(55000));
        assert!(!item.contains(45000));
        assert!(!item.contains(55001));
        assert_eq!(item.width(), 10000);
    }

    #[test]
    fn test_width_of_full_range() {
        let item = Item::new("all", "Everything", Credits::ZERO, Rarity::Grey, 0, u32::MAX);
        assert_eq!(item.width(), 1 << 32);
    }

    #[test]
    fn test_rarity_order() {
        assert!(Rarity::Grey < Rarity::Red);
        assert_eq!(Rarity::Gold.label(), "Epic");
    }
}
