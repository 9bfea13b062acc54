// Tiers
pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 6;

// Dice
pub const D20_SIDES: u32 = 20;
pub const CRITICAL_ROLL: u32 = 20;
pub const FUMBLE_ROLL: u32 = 1;
pub const CRITICAL_HIT_MULTIPLIER: u32 = 2;
pub const MIN_CRITICAL_DAMAGE: u32 = 1;

// Character creation
pub const STARTING_MONEY: u64 = 100;
pub const STARTING_POTION_KEY: &str = "lesser_health_potion";
pub const STARTING_POTION_COUNT: usize = 5;

// Dungeon layout
pub const MIN_DUNGEON_SIZE: usize = 5;
pub const MAX_DUNGEON_SIZE: usize = 15;
/// Grid side grows by this many rooms per tier above 1
pub const DUNGEON_SIZE_PER_TIER: usize = 1;

/// Radius (in rooms) revealed around the player after each move
pub const DEFAULT_VIEW_RANGE: u32 = 4;
/// Fraction of rooms that must be visible before a dungeon can be completed
pub const DEFAULT_REQUIRED_EXPLORATION: f64 = 0.75;

// Treasure
pub const TREASURE_COPPER_PER_TIER: u64 = 100;
pub const TREASURE_MIN_ITEMS: usize = 2;
/// Treasure may draw items up to this many tiers above the dungeon
pub const TREASURE_TIER_REACH: u8 = 2;
/// Rarity weights for treasure item sampling: (common, rare, legendary)
pub const TREASURE_RARITY_WEIGHTS: (f64, f64, f64) = (70.0, 25.0, 5.0);

// Merchant restock: distinct listings per slot
pub const MERCHANT_WEAPON_LISTINGS: usize = 3;
pub const MERCHANT_ARMOR_LISTINGS: usize = 3;
pub const MERCHANT_SHIELD_LISTINGS: usize = 2;
pub const MERCHANT_CONSUMABLE_LISTINGS: usize = 5;
pub const MERCHANT_TOOL_LISTINGS: usize = 3;
pub const MERCHANT_CONSUMABLE_QUANTITY: u32 = 3;
pub const MERCHANT_GEAR_QUANTITY: u32 = 1;
/// Merchant stock may include items one tier above the dungeon
pub const MERCHANT_TIER_REACH: u8 = 1;

// Dungeon completion bonus
pub const COMPLETION_XP_PER_TIER: u64 = 100;
pub const COMPLETION_COPPER_PER_TIER: u64 = 50;
