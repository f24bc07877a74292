use crate::config::InventoryConfig;
use crate::errors::{InventoryError, InventoryResult};
use crate::item_data::get_item_data;
use schema::{ItemCategory, ItemDefinition, ItemRarity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::EnumString;

/// One held item: a catalog reference plus a positive quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerEntry {
    pub item: &'static ItemDefinition,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InventorySort {
    Name,
    Category,
    Rarity,
}

/// Serializable form of the ledger: item ids and counts only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub items: BTreeMap<String, u32>,
    pub money: u64,
    pub max_slots: usize,
}

/// Owned items and money.
///
/// Entries never hold a zero quantity; removing the last unit deletes the row.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryLedger {
    entries: BTreeMap<String, LedgerEntry>,
    money: u64,
    max_slots: usize,
}

impl InventoryLedger {
    pub fn new(money: u64, max_slots: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            money,
            max_slots,
        }
    }

    /// A fresh ledger with the configured starting money and items.
    pub fn from_config(config: &InventoryConfig) -> Self {
        let mut ledger = Self::new(config.starting_money, config.max_slots);
        for (id, quantity) in &config.starting_items {
            if let Err(e) = ledger.add_item(id, *quantity) {
                tracing::warn!(item = %id, error = %e, "skipping starting item");
            }
        }
        ledger
    }

    /// Adds to an existing row or opens a new one. Returns the new quantity.
    pub fn add_item(&mut self, id: &str, quantity: u32) -> InventoryResult<u32> {
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity);
        }
        let item = get_item_data(id).map_err(|_| InventoryError::UnknownItem(id.to_string()))?;

        if let Some(entry) = self.entries.get_mut(id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            return Ok(entry.quantity);
        }
        if self.is_full() {
            return Err(InventoryError::InventoryFull {
                capacity: self.max_slots,
            });
        }
        self.entries
            .insert(id.to_string(), LedgerEntry { item, quantity });
        tracing::debug!(item = id, quantity, "new inventory entry");
        Ok(quantity)
    }

    /// Removes `quantity` units. Fails without change if fewer are held.
    /// Returns the remaining quantity.
    pub fn remove_item(&mut self, id: &str, quantity: u32) -> InventoryResult<u32> {
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity);
        }
        let held = self.quantity_of(id);
        if held < quantity {
            return Err(InventoryError::InsufficientQuantity {
                item: id.to_string(),
                held,
                requested: quantity,
            });
        }
        let remaining = held - quantity;
        if remaining == 0 {
            self.entries.remove(id);
        } else if let Some(entry) = self.entries.get_mut(id) {
            entry.quantity = remaining;
        }
        Ok(remaining)
    }

    pub fn quantity_of(&self, id: &str) -> u32 {
        self.entries.get(id).map(|e| e.quantity).unwrap_or(0)
    }

    pub fn has_item(&self, id: &str, quantity: u32) -> bool {
        self.quantity_of(id) >= quantity
    }

    pub fn get(&self, id: &str) -> Option<&LedgerEntry> {
        self.entries.get(id)
    }

    pub fn money(&self) -> u64 {
        self.money
    }

    pub fn add_money(&mut self, amount: u64) -> u64 {
        self.money = self.money.saturating_add(amount);
        self.money
    }

    pub fn spend_money(&mut self, amount: u64) -> InventoryResult<u64> {
        if self.money < amount {
            return Err(InventoryError::InsufficientFunds {
                held: self.money,
                requested: amount,
            });
        }
        self.money -= amount;
        Ok(self.money)
    }

    /// Buys `quantity` units at catalog price. Nothing changes on failure.
    pub fn purchase(&mut self, id: &str, quantity: u32) -> InventoryResult<u32> {
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity);
        }
        let item = get_item_data(id).map_err(|_| InventoryError::UnknownItem(id.to_string()))?;
        let price = item
            .price
            .ok_or_else(|| InventoryError::NotForSale(id.to_string()))?;
        let total = price as u64 * quantity as u64;
        if self.money < total {
            return Err(InventoryError::InsufficientFunds {
                held: self.money,
                requested: total,
            });
        }
        let new_quantity = self.add_item(id, quantity)?;
        self.money -= total;
        Ok(new_quantity)
    }

    pub fn used_slots(&self) -> usize {
        self.entries.len()
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn free_slots(&self) -> usize {
        self.max_slots.saturating_sub(self.entries.len())
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_slots
    }

    pub fn expand_capacity(&mut self, extra_slots: usize) {
        self.max_slots += extra_slots;
    }

    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.values()
    }

    pub fn entries_sorted(&self, sort: InventorySort) -> Vec<&LedgerEntry> {
        let mut entries: Vec<&LedgerEntry> = self.entries.values().collect();
        match sort {
            InventorySort::Name => entries.sort_by(|a, b| a.item.name.cmp(&b.item.name)),
            InventorySort::Category => entries.sort_by(|a, b| {
                a.item
                    .category
                    .cmp(&b.item.category)
                    .then_with(|| a.item.name.cmp(&b.item.name))
            }),
            InventorySort::Rarity => entries.sort_by(|a, b| {
                b.item
                    .rarity
                    .cmp(&a.item.rarity)
                    .then_with(|| a.item.name.cmp(&b.item.name))
            }),
        }
        entries
    }

    pub fn items_by_category(&self, category: ItemCategory) -> Vec<&LedgerEntry> {
        self.entries
            .values()
            .filter(|e| e.item.category == category)
            .collect()
    }

    pub fn items_by_rarity(&self, rarity: ItemRarity) -> Vec<&LedgerEntry> {
        self.entries
            .values()
            .filter(|e| e.item.rarity == rarity)
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            items: self
                .entries
                .iter()
                .map(|(id, e)| (id.clone(), e.quantity))
                .collect(),
            money: self.money,
            max_slots: self.max_slots,
        }
    }

    /// Rebuilds a ledger from a snapshot, dropping rows that no longer resolve.
    pub fn from_snapshot(snapshot: &InventorySnapshot) -> Self {
        let max_slots = snapshot.max_slots.max(snapshot.items.len());
        let mut ledger = Self::new(snapshot.money, max_slots);
        for (id, quantity) in &snapshot.items {
            if *quantity == 0 {
                continue;
            }
            if let Err(e) = ledger.add_item(id, *quantity) {
                tracing::warn!(item = %id, error = %e, "dropping saved inventory row");
            }
        }
        ledger
    }
}

impl fmt::Display for InventoryLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Money: {}  Slots: {}/{}",
            self.money,
            self.used_slots(),
            self.max_slots
        )?;
        for entry in self.entries_sorted(InventorySort::Category) {
            write!(
                f,
                "\n  {:<16} x{:<3} [{}] {}",
                entry.item.name, entry.quantity, entry.item.category, entry.item.description
            )?;
        }
        Ok(())
    }
}
