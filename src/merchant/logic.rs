//! Stock generation and trading.

use super::types::{Listing, Merchant, PurchaseResult, SaleResult};
use crate::catalog::CatalogProvider;
use crate::character::Character;
use crate::core::config::EngineConfig;
use crate::core::constants::{
    MERCHANT_ARMOR_LISTINGS, MERCHANT_CONSUMABLE_LISTINGS, MERCHANT_CONSUMABLE_QUANTITY,
    MERCHANT_GEAR_QUANTITY, MERCHANT_SHIELD_LISTINGS, MERCHANT_TIER_REACH, MERCHANT_TOOL_LISTINGS,
    MERCHANT_WEAPON_LISTINGS, MAX_TIER,
};
use crate::core::error::{EngineError, Result};
use crate::core::rng::RandomSource;
use crate::items::ItemSlot;
use tracing::{debug, info};

/// Price for a base value after a variation `u` (e.g. -0.2..=0.2). Never 0.
pub fn listed_price(base_value: u64, variation: f64) -> u64 {
    ((base_value as f64 * (1.0 + variation)).round() as u64).max(1)
}

/// Copper paid for an item sold back.
pub fn sell_price(base_value: u64, config: &EngineConfig) -> u64 {
    (base_value as f64 * config.merchant_sell_ratio).round() as u64
}

const RESTOCK: [(ItemSlot, usize); 5] = [
    (ItemSlot::Weapon, MERCHANT_WEAPON_LISTINGS),
    (ItemSlot::Armor, MERCHANT_ARMOR_LISTINGS),
    (ItemSlot::Shield, MERCHANT_SHIELD_LISTINGS),
    (ItemSlot::Consumable, MERCHANT_CONSUMABLE_LISTINGS),
    (ItemSlot::Tool, MERCHANT_TOOL_LISTINGS),
];

impl Merchant {
    /// Stocks a merchant from catalog items up to one tier above `tier`.
    ///
    /// Each listing draws its price variation once; it never changes afterwards.
    pub fn generate<R: RandomSource>(
        tier: u8,
        catalog: &dyn CatalogProvider,
        config: &EngineConfig,
        rng: &mut R,
    ) -> Self {
        let max_tier = tier.saturating_add(MERCHANT_TIER_REACH).min(MAX_TIER);
        let pool = catalog.items_up_to_tier(max_tier);
        let spread = config.merchant_price_variation;
        let mut listings = Vec::new();

        for (slot, count) in RESTOCK {
            let mut candidates: Vec<_> = pool.iter().filter(|item| item.slot == slot).collect();
            rng.shuffle(&mut candidates);
            let quantity = if slot == ItemSlot::Consumable {
                MERCHANT_CONSUMABLE_QUANTITY
            } else {
                MERCHANT_GEAR_QUANTITY
            };

            for item in candidates.into_iter().take(count) {
                let variation = rng.uniform(-spread, spread);
                listings.push(Listing {
                    item: (*item).clone(),
                    price: listed_price(item.base_value, variation),
                    quantity,
                });
            }
        }

        debug!(tier, listings = listings.len(), "merchant stocked");
        Self { tier, listings }
    }

    pub fn listing(&self, key: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.item.key == key)
    }

    pub fn price_of(&self, key: &str) -> Option<u64> {
        self.listing(key).map(|l| l.price)
    }

    /// Buys one unit of `item_key`.
    ///
    /// Unknown or sold-out items fail with `OutOfStock`; a short purse fails
    /// with `InsufficientFunds`. A failed purchase changes nothing.
    pub fn buy_item(&mut self, player: &mut Character, item_key: &str) -> Result<PurchaseResult> {
        let listing = self
            .listings
            .iter_mut()
            .find(|l| l.item.key == item_key)
            .filter(|l| l.in_stock())
            .ok_or_else(|| EngineError::OutOfStock {
                item: item_key.to_string(),
            })?;

        if !player.can_afford(listing.price) {
            return Err(EngineError::InsufficientFunds {
                price: listing.price,
                available: player.money,
            });
        }

        player.money -= listing.price;
        listing.quantity -= 1;
        player.inventory.push(listing.item.clone());

        info!(
            item = %listing.item.name,
            price = listing.price,
            remaining_stock = listing.quantity,
            "item purchased"
        );

        Ok(PurchaseResult {
            item: listing.item.clone(),
            price: listing.price,
            remaining_money: player.money,
            remaining_stock: listing.quantity,
        })
    }

    /// Sells the first inventory item with this key for half its base value.
    ///
    /// Equipped gear is not for sale; unequip it first.
    pub fn sell_item(
        &self,
        player: &mut Character,
        item_key: &str,
        config: &EngineConfig,
    ) -> Result<SaleResult> {
        let index = player.find_item(item_key).ok_or_else(|| EngineError::NotOwned {
            item: item_key.to_string(),
        })?;

        let item = player.inventory.remove(index);
        let price = sell_price(item.base_value, config);
        player.money += price;

        info!(item = %item.name, price, "item sold");

        Ok(SaleResult {
            item,
            price,
            remaining_money: player.money,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, CatalogProvider};
    use crate::core::rng::ScriptedRolls;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_listed_price_bounds() {
        assert_eq!(listed_price(50, 0.0), 50);
        assert_eq!(listed_price(50, 0.2), 60);
        assert_eq!(listed_price(50, -0.2), 40);
        assert_eq!(listed_price(0, 0.0), 1);
    }

    #[test]
    fn test_generated_stock_respects_tier_and_counts() {
        let catalog = default_catalog();
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let merchant = Merchant::generate(1, &catalog, &config, &mut rng);

        assert!(merchant.listings.iter().all(|l| l.item.tier <= 2));
        for (slot, count) in RESTOCK {
            let stocked = merchant
                .listings
                .iter()
                .filter(|l| l.item.slot == slot)
                .count();
            assert!(stocked <= count);
        }
        for listing in &merchant.listings {
            let base = listing.item.base_value as f64;
            assert!(listing.price as f64 >= (base * 0.8).floor().max(1.0));
            assert!(listing.price as f64 <= (base * 1.2).ceil().max(1.0));
            let expected = if listing.item.slot == ItemSlot::Consumable { 3 } else { 1 };
            assert_eq!(listing.quantity, expected);
        }
    }

    #[test]
    fn test_listings_are_distinct() {
        let catalog = default_catalog();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let merchant = Merchant::generate(6, &catalog, &EngineConfig::default(), &mut rng);
        let mut keys: Vec<_> = merchant.listings.iter().map(|l| &l.item.key).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn test_price_fixed_across_purchases() {
        let catalog = default_catalog();
        let mut rng = ScriptedRolls::new(1);
        let mut merchant = Merchant::generate(1, &catalog, &EngineConfig::default(), &mut rng);
        let mut player = Character::new("Ayla", 19, &catalog).unwrap();
        player.money = 10_000;

        let key = merchant
            .listings
            .iter()
            .find(|l| l.item.slot == ItemSlot::Consumable)
            .map(|l| l.item.key.clone())
            .unwrap();
        let first = merchant.buy_item(&mut player, &key).unwrap();
        let second = merchant.buy_item(&mut player, &key).unwrap();
        assert_eq!(first.price, second.price);
        assert_eq!(second.remaining_stock, 1);
    }

    #[test]
    fn test_buy_rejections_leave_state_untouched() {
        let catalog = default_catalog();
        let item = catalog.get_item("iron_shortsword").unwrap().clone();
        let mut merchant = Merchant {
            tier: 1,
            listings: vec![Listing {
                item,
                price: 40,
                quantity: 1,
            }],
        };
        let mut player = Character::new("Ayla", 19, &catalog).unwrap();
        player.money = 39;
        let before = (merchant.clone(), player.clone());

        assert_eq!(
            merchant.buy_item(&mut player, "iron_shortsword"),
            Err(EngineError::InsufficientFunds {
                price: 40,
                available: 39
            })
        );
        assert!(matches!(
            merchant.buy_item(&mut player, "dragonfang"),
            Err(EngineError::OutOfStock { .. })
        ));
        assert_eq!((merchant.clone(), player.clone()), before);

        player.money = 100;
        merchant.buy_item(&mut player, "iron_shortsword").unwrap();
        assert!(matches!(
            merchant.buy_item(&mut player, "iron_shortsword"),
            Err(EngineError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_sell_requires_ownership() {
        let catalog = default_catalog();
        let merchant = Merchant::default();
        let mut player = Character::new("Ayla", 19, &catalog).unwrap();
        let config = EngineConfig::default();

        assert!(matches!(
            merchant.sell_item(&mut player, "dragonfang", &config),
            Err(EngineError::NotOwned { .. })
        ));
        // Equipped gear is not in the inventory
        assert!(merchant
            .sell_item(&mut player, "rusty_dagger", &config)
            .is_err());

        let sale = merchant
            .sell_item(&mut player, "lesser_health_potion", &config)
            .unwrap();
        assert_eq!(sale.price, 5);
        assert_eq!(player.money, 105);
    }
}
