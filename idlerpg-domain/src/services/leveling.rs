// Progression curves

/// Seconds needed to clear level 1.
pub const BASE_LEVEL_SECONDS: f64 = 300.0;
pub const LEVEL_GROWTH: f64 = 1.16;
pub const PENALTY_GROWTH: f64 = 1.14;

// Absorbs float error so exact products such as 300 * 1.16 floor to 348.
const FLOOR_EPSILON: f64 = 1e-9;

/// Level-up cost in seconds: `floor(300 * 1.16^(level - 1))`.
pub fn time_to_level(level: u32) -> i64 {
    let exponent = level.saturating_sub(1) as i32;
    (BASE_LEVEL_SECONDS * LEVEL_GROWTH.powi(exponent) + FLOOR_EPSILON).floor() as i64
}

/// Scales a base penalty modifier by the player's level:
/// `floor(modifier * 1.14^level)`.
pub fn penalty_seconds(modifier: u64, level: u32) -> i64 {
    let scale = PENALTY_GROWTH.powi(level as i32);
    (modifier as f64 * scale + FLOOR_EPSILON).floor() as i64
}
