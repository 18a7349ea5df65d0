// Iron plate (commodity) restocking
pub const IRON_PLATE_COST: i64 = 1500;
pub const IRON_PLATE_RESTOCK_COUNT: u32 = 7;
pub const IRON_PLATE_RESTOCK_TIME: f64 = 94.0;
pub const IRON_PLATE_WING_COST: i64 = 25; // paid going out and again coming back

// Selling to the merchant
pub const OFFER_TIME_ACCEPT: f64 = 4.9;
pub const OFFER_TIME_REJECT: f64 = 4.8;

/// Every appraisal the merchant can offer for one plate, ascending.
pub const ARMOR_BUY_PRICES: [u32; 27] = [
    1265, 1289, 1312, 1335, 1358, 1382, 1406, 1429, 1453, 1476, 1500, 1523, 1546, 1570, 1593,
    1617, 1640, 1664, 1687, 1710, 1734, 1757, 1781, 1804, 1828, 1851, 1875,
];
pub const MIN_ARMOR_PRICE: u32 = ARMOR_BUY_PRICES[0];
pub const MAX_ARMOR_PRICE: u32 = ARMOR_BUY_PRICES[ARMOR_BUY_PRICES.len() - 1];

pub const CRITICAL_SALE_CHANCE: f64 = 1.0 / 32.0;
pub const CRITICAL_SALE_MIN: u32 = 2250;
pub const CRITICAL_SALE_MAX: u32 = 3000;

// Shop ownership
pub const SHOP_PURCHASE_COST: i64 = 35_000;
pub const INVENTORY_CAPACITY: usize = 8;

// Trip timings (seconds)
pub const TIME_INITIAL_SHOP_PURCHASE_AND_TRAVEL: f64 = 50.0;
pub const TIME_CLAIM_PROFITS_AND_TO_NEAR_SHOP: f64 = 20.3;
pub const TIME_TRAVEL_EXTRA_TO_FAR_SHOP: f64 = 3.87;
pub const TIME_PURCHASE_EQUIPPABLE: f64 = 4.1;
pub const TIME_PURCHASE_NOT_EQUIPPABLE: f64 = 5.2;
pub const TIME_RETURN_TO_NETA_FROM_NEAR: f64 = 7.4;
pub const TIME_RETURN_EXTRA_FROM_FAR: f64 = 3.87;
pub const TIME_GIVE_ITEM_TO_NETA: f64 = 5.0;
pub const TIME_EAT_LUNCH: f64 = 3.0;

// Sleeping while Neta sells
pub const TIME_RETURN_FOR_SLEEP: f64 = 8.7;
pub const TIME_SLEEP_ONE_NIGHT: f64 = 7.35;
pub const SALE_PROBABILITY_PER_NIGHT: f64 = 0.75;
pub const SALE_MULTIPLIER_MIN: f64 = 1.5;
pub const SALE_MULTIPLIER_MAX: f64 = 2.0;

// Reporting
pub const DEFAULT_TIME_BUCKET_SECONDS: u32 = 30;

// Run defaults
pub const DEFAULT_START_GOLD: i64 = 29_500;
pub const DEFAULT_FINAL_TARGET: i64 = 26_000;
pub const DEFAULT_MIN_SHOP_GOLD: i64 = 35_550;
pub const DEFAULT_SIMULATION_RUNS: u32 = 1000;
pub const DEFAULT_SLEEP_NIGHTS: u32 = 3;
pub const DEFAULT_ARMOR_THRESHOLDS: [u32; 7] = [1617, 1640, 1664, 1687, 1710, 1734, 1757];
