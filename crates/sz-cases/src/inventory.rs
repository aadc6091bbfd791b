//! Player inventory

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sz_core::Credits;

use crate::item::OwnedItem;

/// Won items in acquisition order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<OwnedItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: OwnedItem) {
        self.items.push(item);
    }

    pub fn get(&self, instance_id: Uuid) -> Option<&OwnedItem> {
        self.items.iter().find(|i| i.instance_id == instance_id)
    }

    pub fn contains(&self, instance_id: Uuid) -> bool {
        self.get(instance_id).is_some()
    }

    /// Remove one item, returning it. Absent ids yield `None`.
    pub fn remove(&mut self, instance_id: Uuid) -> Option<OwnedItem> {
        let pos = self.items.iter().position(|i| i.instance_id == instance_id)?;
        Some(self.items.remove(pos))
    }

    /// Empty the inventory, returning what it held
    pub fn take_all(&mut self) -> Vec<OwnedItem> {
        std::mem::take(&mut self.items)
    }

    pub fn total_value(&self) -> Credits {
        self.items.iter().map(OwnedItem::value).sum()
    }

    pub fn items(&self) -> &[OwnedItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &OwnedItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
