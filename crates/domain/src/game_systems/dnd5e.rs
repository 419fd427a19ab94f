//! D&D 5th Edition derivation rules.
//!
//! Pure functions over base attributes. Records never cache these results;
//! every accessor recomputes from the stored scores and class levels.

/// XP thresholds for each level in D&D 5e.
/// Index is level - 1 (so level 1 = index 0).
const XP_THRESHOLDS: [u32; 20] = [
    0,      // Level 1
    300,    // Level 2
    900,    // Level 3
    2700,   // Level 4
    6500,   // Level 5
    14000,  // Level 6
    23000,  // Level 7
    34000,  // Level 8
    48000,  // Level 9
    64000,  // Level 10
    85000,  // Level 11
    100000, // Level 12
    120000, // Level 13
    140000, // Level 14
    165000, // Level 15
    195000, // Level 16
    225000, // Level 17
    265000, // Level 18
    305000, // Level 19
    355000, // Level 20
];

pub const MAX_LEVEL: u32 = 20;

/// Ability modifier: `floor((score - 10) / 2)`. Total over every `i32` score.
pub fn ability_modifier(score: i32) -> i32 {
    // Rust's / rounds toward zero; the i64 result always fits back in i32
    (i64::from(score) - 10).div_euclid(2) as i32
}

/// Proficiency bonus for a total character level (clamped to 1..=20).
pub fn proficiency_bonus(level: u32) -> i32 {
    let level = level.clamp(1, MAX_LEVEL) as i32;
    (level - 1) / 4 + 2
}

/// XP required to reach a given level.
pub fn xp_for_level(level: u32) -> u32 {
    if level == 0 || level > MAX_LEVEL {
        return 0;
    }
    XP_THRESHOLDS[(level - 1) as usize]
}

/// Calculate level from current XP.
pub fn level_from_xp(xp: u32) -> u32 {
    for (i, &threshold) in XP_THRESHOLDS.iter().enumerate().rev() {
        if xp >= threshold {
            return (i + 1) as u32;
        }
    }
    1
}

/// Format a modifier the way sheets print it (`+2`, `-1`, `+0`).
pub fn format_modifier(modifier: i32) -> String {
    if modifier >= 0 {
        format!("+{}", modifier)
    } else {
        modifier.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_modifier_floors_negative() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(20), 5);
        assert_eq!(ability_modifier(30), 10);
    }

    #[test]
    fn ability_modifier_at_integer_extremes() {
        assert_eq!(ability_modifier(i32::MIN), -1_073_741_829);
        assert_eq!(ability_modifier(i32::MAX), 1_073_741_818);
    }

    #[test]
    fn proficiency_bonus_by_level() {
        assert_eq!(proficiency_bonus(0), 2);
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(25), 6);
    }

    #[test]
    fn xp_levels() {
        assert_eq!(level_from_xp(0), 1);
        assert_eq!(level_from_xp(299), 1);
        assert_eq!(level_from_xp(300), 2);
        assert_eq!(level_from_xp(400_000), 20);
        assert_eq!(xp_for_level(5), 6500);
        assert_eq!(xp_for_level(21), 0);
    }

    #[test]
    fn modifier_formatting() {
        assert_eq!(format_modifier(2), "+2");
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(-1), "-1");
    }
}
