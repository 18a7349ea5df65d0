//! Shop identifiers and the item lists each shop sells.

use serde::Serialize;

/// One item on a shop shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopItem {
    pub name: &'static str,
    pub cost: u32,
    /// Equippable items are bought faster (no "are you sure" prompt).
    pub equippable: bool,
}

impl ShopItem {
    const fn new(name: &'static str, cost: u32, equippable: bool) -> Self {
        Self {
            name,
            cost,
            equippable,
        }
    }

    /// Seconds spent at the counter buying one copy.
    pub fn purchase_time(&self) -> f64 {
        if self.equippable {
            super::constants::TIME_PURCHASE_EQUIPPABLE
        } else {
            super::constants::TIME_PURCHASE_NOT_EQUIPPABLE
        }
    }

    pub fn is_abacus(&self) -> bool {
        self.name.to_ascii_lowercase().contains("abacus")
    }
}

const NEAR_SHOP_ITEMS: [ShopItem; 5] = [
    ShopItem::new("Chain Sickle", 550, true),
    ShopItem::new("Venomous Dagger", 750, true),
    ShopItem::new("Iron Spear", 880, true),
    ShopItem::new("Morning Star", 1250, true),
    ShopItem::new("Abacus of Virtue", 1600, true),
];

const FAR_SHOP_ITEMS: [ShopItem; 6] = [
    ShopItem::new("Divine Dagger", 350, true),
    ShopItem::new("Morning Star", 700, true),
    ShopItem::new("Iron Shield", 1200, false),
    ShopItem::new("Battle Axe", 1500, true),
    ShopItem::new("Clothes H", 180, true),
    ShopItem::new("Leather Armor", 650, true),
];

/// The two shops reachable on a purchase trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopId {
    /// The shop next to Neta's stall.
    Near,
    /// The shop across town, only visited when enabled.
    Far,
}

impl ShopId {
    /// All shops in visiting order.
    pub const ALL: [ShopId; 2] = [ShopId::Near, ShopId::Far];

    pub fn name(&self) -> &'static str {
        match self {
            ShopId::Near => "Near shop",
            ShopId::Far => "Far shop",
        }
    }

    /// Shelf contents in declaration order.
    pub fn items(&self) -> &'static [ShopItem] {
        match self {
            ShopId::Near => &NEAR_SHOP_ITEMS,
            ShopId::Far => &FAR_SHOP_ITEMS,
        }
    }

    pub fn cheapest_cost(&self) -> u32 {
        self.items().iter().map(|item| item.cost).min().unwrap_or(0)
    }
}
