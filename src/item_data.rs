use crate::errors::{ItemError, ItemResult};
use crate::generated::{ITEM_DATA, ITEM_ORDER};
use schema::{ItemCategory, ItemDefinition, ItemEffect, ItemRarity};
use std::collections::HashMap;
use std::sync::LazyLock;

static ITEM_CATALOG: LazyLock<HashMap<&'static str, ItemDefinition>> = LazyLock::new(|| {
    let mut catalog = HashMap::with_capacity(ITEM_DATA.len());
    for (id, bytes) in ITEM_DATA.entries() {
        match schema::decode::<ItemDefinition>(*bytes) {
            Ok(definition) => {
                catalog.insert(*id, definition);
            }
            Err(e) => tracing::error!(item = *id, error = %e, "corrupt item catalog entry"),
        }
    }
    tracing::debug!(count = catalog.len(), "item catalog loaded");
    catalog
});

pub fn get_item_data(id: &str) -> ItemResult<&'static ItemDefinition> {
    ITEM_CATALOG
        .get(id)
        .ok_or_else(|| ItemError::UnknownItem(id.to_string()))
}

/// Every item, in catalog file order.
pub fn all_items() -> impl Iterator<Item = &'static ItemDefinition> {
    ITEM_ORDER.iter().filter_map(|id| ITEM_CATALOG.get(id))
}

pub fn items_in_category(category: ItemCategory) -> Vec<&'static ItemDefinition> {
    all_items().filter(|i| i.category == category).collect()
}

pub fn items_of_rarity(rarity: ItemRarity) -> Vec<&'static ItemDefinition> {
    all_items().filter(|i| i.rarity == rarity).collect()
}

/// Case-insensitive lookup by id or display name.
pub fn find_item(name: &str) -> Option<&'static ItemDefinition> {
    let wanted = name.trim().to_lowercase();
    let as_id = wanted.replace(' ', "_");
    all_items().find(|i| i.id == as_id || i.name.to_lowercase() == wanted)
}

/// Ball strength of a capture item, or `None` for anything else.
pub fn ball_multiplier(item: &ItemDefinition) -> Option<f32> {
    match (item.category, item.effect) {
        (ItemCategory::Capture, ItemEffect::Capture(multiplier)) => Some(multiplier),
        _ => None,
    }
}
