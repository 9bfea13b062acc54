use crate::items::Item;
use serde::{Deserialize, Serialize};

/// One stocked item with its price fixed for the merchant's lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub item: Item,
    pub price: u64,
    pub quantity: u32,
}

impl Listing {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Shop of a single dungeon. Stock never refills.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Merchant {
    pub tier: u8,
    pub listings: Vec<Listing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseResult {
    pub item: Item,
    pub price: u64,
    pub remaining_money: u64,
    pub remaining_stock: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleResult {
    pub item: Item,
    pub price: u64,
    pub remaining_money: u64,
}
