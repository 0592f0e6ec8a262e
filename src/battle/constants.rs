//! Battle and search constants - all tunable values in one place

// Status execution chances
pub const PARALYSIS_ACT_CHANCE: f64 = 0.75;
pub const PARALYSIS_SPEED_PENALTY: f64 = 0.75;
pub const CONFUSION_SELF_HIT_CHANCE: f64 = 0.5;
pub const CONFUSION_SELF_HIT_POWER: u32 = 40;

// Switching resolves before any attack, regardless of the move's priority
pub const SWITCH_PRIORITY: i8 = 6;

// Search shape
pub const DEFAULT_MAX_BRANCH: usize = 5;
pub const MIN_SEARCH_DEPTH: u32 = 3;
pub const MAX_SEARCH_DEPTH: u32 = 5;

// Decision deadline, six minutes per move
pub const DEFAULT_DEADLINE_MS: u64 = 360_000;

// Tolerance when checking that outcome probabilities sum to 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

// Simulator damage model
pub const DAMAGE_SCALE: f64 = 0.44;
pub const STAB_MULTIPLIER: f64 = 1.5;
pub const BURN_ATTACK_PENALTY: f64 = 0.5;
pub const BURN_CHIP_DIVISOR: u32 = 16;
pub const POISON_CHIP_DIVISOR: u32 = 8;
