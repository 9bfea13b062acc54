//! Built-in game content: tiers 1-6, their gear, shop goods and enemies.

use super::provider::StaticCatalog;
use super::types::{DropEntry, EnemyDef, ItemDef, TierDef};
use crate::items::{ItemEffect, ItemSlot, Rarity};

fn item(
    key: &str,
    name: &str,
    slot: ItemSlot,
    effect: ItemEffect,
    rarity: Rarity,
    tier: u8,
    base_value: u64,
) -> ItemDef {
    ItemDef {
        key: key.to_string(),
        name: name.to_string(),
        slot,
        effect,
        rarity,
        tier,
        base_value,
    }
}

fn weapon(key: &str, name: &str, tier: u8, dmg: (u32, u32), value: u64, rarity: Rarity) -> ItemDef {
    let effect = ItemEffect::Damage {
        min: dmg.0,
        max: dmg.1,
    };
    item(key, name, ItemSlot::Weapon, effect, rarity, tier, value)
}

fn armor(key: &str, name: &str, tier: u8, def: u32, hp: u32, value: u64, rarity: Rarity) -> ItemDef {
    let effect = ItemEffect::Protection {
        defense: def,
        max_health: hp,
    };
    item(key, name, ItemSlot::Armor, effect, rarity, tier, value)
}

fn shield(key: &str, name: &str, tier: u8, def: u32, hp: u32, value: u64, rarity: Rarity) -> ItemDef {
    let effect = ItemEffect::Protection {
        defense: def,
        max_health: hp,
    };
    item(key, name, ItemSlot::Shield, effect, rarity, tier, value)
}

fn potion(key: &str, name: &str, tier: u8, heal: u32, value: u64, rarity: Rarity) -> ItemDef {
    let effect = ItemEffect::Heal { amount: heal };
    item(key, name, ItemSlot::Consumable, effect, rarity, tier, value)
}

fn tool(key: &str, name: &str, tier: u8, value: u64, rarity: Rarity) -> ItemDef {
    item(key, name, ItemSlot::Tool, ItemEffect::Utility, rarity, tier, value)
}

#[rustfmt::skip]
fn default_items() -> Vec<ItemDef> {
    use Rarity::*;
    vec![
        // Weapons
        weapon("rusty_dagger", "Rusty Dagger", 1, (1, 3), 10, Common),
        weapon("iron_shortsword", "Iron Shortsword", 2, (2, 5), 40, Common),
        weapon("hunting_bow", "Hunting Bow", 2, (1, 6), 45, Common),
        weapon("steel_longsword", "Steel Longsword", 3, (3, 7), 90, Common),
        weapon("venom_kris", "Venom Kris", 3, (3, 8), 150, Rare),
        weapon("war_axe", "War Axe", 4, (4, 10), 160, Common),
        weapon("runed_blade", "Runed Blade", 5, (6, 12), 280, Rare),
        weapon("sunforged_greatsword", "Sunforged Greatsword", 5, (10, 18), 900, Legendary),
        weapon("dragonfang", "Dragonfang", 6, (8, 16), 480, Rare),
        weapon("stormcaller_spear", "Stormcaller Spear", 6, (12, 20), 1200, Legendary),
        // Armor
        armor("cloth_tunic", "Cloth Tunic", 1, 1, 0, 8, Common),
        armor("leather_vest", "Leather Vest", 2, 2, 5, 35, Common),
        armor("chainmail", "Chainmail", 3, 3, 10, 85, Common),
        armor("scale_mail", "Scale Mail", 4, 5, 15, 150, Common),
        armor("plate_armor", "Plate Armor", 5, 7, 20, 260, Rare),
        armor("dragonscale_armor", "Dragonscale Armor", 6, 9, 30, 450, Rare),
        armor("aegis_of_dawn", "Aegis of Dawn", 6, 12, 40, 1100, Legendary),
        // Shields
        shield("wooden_buckler", "Wooden Buckler", 1, 1, 0, 12, Common),
        shield("iron_kite_shield", "Iron Kite Shield", 3, 2, 0, 60, Common),
        shield("tower_shield", "Tower Shield", 5, 4, 0, 200, Rare),
        shield("mirror_shield", "Mirror Shield", 6, 6, 10, 900, Legendary),
        // Consumables
        potion("bandage", "Bandage", 1, 8, 4, Common),
        potion("lesser_health_potion", "Lesser Health Potion", 1, 15, 10, Common),
        potion("health_potion", "Health Potion", 2, 30, 25, Common),
        potion("greater_health_potion", "Greater Health Potion", 4, 60, 60, Common),
        potion("superior_health_potion", "Superior Health Potion", 5, 100, 110, Rare),
        potion("elixir_of_life", "Elixir of Life", 6, 250, 400, Legendary),
        // Tools
        tool("torch", "Torch", 1, 3, Common),
        tool("rope", "Rope", 1, 5, Common),
        tool("lockpick_set", "Lockpick Set", 2, 20, Common),
        tool("miners_pick", "Miner's Pick", 3, 35, Common),
        tool("spyglass", "Spyglass", 4, 70, Rare),
    ]
}

fn drop_table(entries: &[(&str, u32)]) -> Vec<DropEntry> {
    entries
        .iter()
        .map(|&(item, weight)| DropEntry::new(item, weight))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn enemy(
    key: &str,
    name: &str,
    tier: u8,
    (attack, defense, health): (u32, u32, u32),
    xp_value: u64,
    (min_copper, max_copper): (u32, u32),
    spawn_weight: u32,
    common: &[(&str, u32)],
    rare: &[(&str, u32)],
) -> EnemyDef {
    EnemyDef {
        key: key.to_string(),
        name: name.to_string(),
        tier,
        attack,
        defense,
        health,
        xp_value,
        min_copper,
        max_copper,
        common_drops: drop_table(common),
        rare_drops: drop_table(rare),
        spawn_weight,
    }
}

#[rustfmt::skip]
fn default_enemies() -> Vec<EnemyDef> {
    vec![
        // Tier 1
        enemy("giant_rat", "Giant Rat", 1, (5, 1, 8), 10, (1, 5), 4,
            &[("bandage", 2), ("torch", 1)], &[("lesser_health_potion", 1)]),
        enemy("goblin_scout", "Goblin Scout", 1, (6, 2, 12), 15, (3, 10), 3,
            &[("lesser_health_potion", 2), ("rusty_dagger", 1)], &[("wooden_buckler", 1)]),
        enemy("cave_spider", "Cave Spider", 1, (6, 1, 10), 12, (2, 6), 3,
            &[("bandage", 1)], &[("rope", 1)]),
        // Tier 2
        enemy("bandit", "Bandit", 2, (9, 4, 20), 30, (8, 20), 3,
            &[("health_potion", 2), ("iron_shortsword", 1)], &[("leather_vest", 1)]),
        enemy("skeleton", "Skeleton", 2, (8, 5, 22), 28, (5, 15), 3,
            &[("lesser_health_potion", 1)], &[("hunting_bow", 1)]),
        enemy("dire_wolf", "Dire Wolf", 2, (9, 3, 18), 25, (4, 12), 3,
            &[("bandage", 1)], &[("lockpick_set", 1)]),
        // Tier 3
        enemy("orc_warrior", "Orc Warrior", 3, (12, 8, 35), 50, (15, 35), 3,
            &[("health_potion", 2), ("steel_longsword", 1)], &[("chainmail", 2), ("venom_kris", 1)]),
        enemy("ghoul", "Ghoul", 3, (11, 9, 32), 45, (10, 30), 3,
            &[("health_potion", 1)], &[("iron_kite_shield", 1)]),
        enemy("dark_acolyte", "Dark Acolyte", 3, (13, 7, 28), 55, (20, 40), 2,
            &[("health_potion", 1)], &[("miners_pick", 1)]),
        // Tier 4
        enemy("troll", "Troll", 4, (16, 12, 60), 90, (30, 60), 3,
            &[("greater_health_potion", 1)], &[("scale_mail", 1)]),
        enemy("wraith", "Wraith", 4, (16, 13, 50), 95, (35, 70), 2,
            &[("health_potion", 1)], &[("war_axe", 1)]),
        enemy("ogre_brute", "Ogre Brute", 4, (17, 11, 70), 100, (40, 80), 2,
            &[("greater_health_potion", 1)], &[("spyglass", 1)]),
        // Tier 5
        enemy("wyvern", "Wyvern", 5, (22, 17, 85), 150, (60, 120), 2,
            &[("greater_health_potion", 1)], &[("plate_armor", 1), ("runed_blade", 1)]),
        enemy("death_knight", "Death Knight", 5, (22, 18, 90), 170, (70, 140), 2,
            &[("greater_health_potion", 1)], &[("tower_shield", 1)]),
        enemy("stone_golem", "Stone Golem", 5, (21, 19, 110), 160, (50, 110), 2,
            &[("superior_health_potion", 1)], &[("tower_shield", 1)]),
        // Tier 6
        enemy("elder_dragon", "Elder Dragon", 6, (28, 24, 150), 300, (150, 300), 1,
            &[("superior_health_potion", 1)], &[("dragonscale_armor", 1), ("dragonfang", 1)]),
        enemy("lich", "Lich", 6, (27, 22, 120), 280, (120, 260), 2,
            &[("superior_health_potion", 1)], &[("dragonfang", 1)]),
        enemy("abyssal_horror", "Abyssal Horror", 6, (28, 23, 140), 290, (130, 280), 2,
            &[("superior_health_potion", 1)], &[("elixir_of_life", 1)]),
    ]
}

fn tier(
    tier: u8,
    title: &str,
    (attack, defense, health): (u32, u32, u32),
    attack_bonus: u32,
    min_xp: u64,
    (weapon, armor): (&str, &str),
    special_ability: Option<&str>,
) -> TierDef {
    TierDef {
        tier,
        title: title.to_string(),
        attack,
        defense,
        health,
        attack_bonus,
        min_xp,
        starting_weapon: Some(weapon.to_string()),
        starting_armor: Some(armor.to_string()),
        special_ability: special_ability.map(str::to_string),
    }
}

#[rustfmt::skip]
fn default_tiers() -> Vec<TierDef> {
    vec![
        tier(1, "Novice", (3, 3, 25), 0, 0, ("rusty_dagger", "cloth_tunic"), None),
        tier(2, "Apprentice", (5, 4, 35), 0, 100, ("iron_shortsword", "leather_vest"), None),
        tier(3, "Journeyman", (7, 6, 50), 1, 300, ("steel_longsword", "chainmail"), Some("Keen Eye")),
        tier(4, "Veteran", (10, 8, 70), 1, 700, ("war_axe", "scale_mail"), None),
        tier(5, "Champion", (13, 11, 95), 2, 1500, ("runed_blade", "plate_armor"), Some("Battle Fury")),
        tier(6, "Legend", (17, 14, 125), 3, 3000, ("dragonfang", "dragonscale_armor"), Some("Mythic Resolve")),
    ]
}

/// The standard content set.
pub fn default_catalog() -> StaticCatalog {
    let catalog = default_items()
        .into_iter()
        .fold(StaticCatalog::new(), StaticCatalog::with_item);
    let catalog = default_enemies()
        .into_iter()
        .fold(catalog, StaticCatalog::with_enemy);
    default_tiers()
        .into_iter()
        .fold(catalog, StaticCatalog::with_tier)
}
