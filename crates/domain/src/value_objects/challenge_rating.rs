//! Monster challenge rating.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// XP awarded per challenge rating, indexed by whole CR (0..=30).
const XP_BY_CR: [u32; 31] = [
    10, 200, 450, 700, 1100, 1800, 2300, 2900, 3900, 5000, 5900, 7200, 8400, 10000, 11500, 13000,
    15000, 18000, 20000, 22000, 25000, 33000, 41000, 50000, 62000, 75000, 90000, 105000, 120000,
    135000, 155000,
];

/// Challenge rating stored in eighths so `1/8`, `1/4` and `1/2` stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChallengeRating(u16);

impl ChallengeRating {
    pub const MAX: u16 = 30;

    pub fn whole(cr: u16) -> Result<Self, DomainError> {
        if cr > Self::MAX {
            return Err(DomainError::validation(format!(
                "Challenge rating cannot exceed {}",
                Self::MAX
            )));
        }
        Ok(Self(cr * 8))
    }

    /// Accepts 0, 1/8, 1/4, 1/2 and whole numbers up to 30.
    pub fn from_f64(value: f64) -> Result<Self, DomainError> {
        let eighths = value * 8.0;
        let valid = value >= 0.0
            && value <= Self::MAX as f64
            && eighths.fract() == 0.0
            && ((value >= 1.0 && value.fract() == 0.0) || matches!(eighths as u16, 0 | 1 | 2 | 4));
        if !valid {
            return Err(DomainError::validation(format!(
                "Invalid challenge rating: {}",
                value
            )));
        }
        Ok(Self(eighths as u16))
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 8.0
    }

    /// Experience awarded for defeating a creature of this rating.
    pub fn experience(self) -> u32 {
        match self.0 {
            0 => XP_BY_CR[0],
            1 => 25,
            2 => 50,
            4 => 100,
            eighths => XP_BY_CR[(eighths / 8) as usize],
        }
    }

    /// Proficiency bonus for a creature of this rating.
    pub fn proficiency_bonus(self) -> i32 {
        let whole = (self.0 / 8).max(1) as i32;
        ((whole - 1) / 4 + 2).min(9)
    }
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => f.write_str("1/8"),
            2 => f.write_str("1/4"),
            4 => f.write_str("1/2"),
            eighths => write!(f, "{}", eighths / 8),
        }
    }
}

impl FromStr for ChallengeRating {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((num, den)) = s.split_once('/') {
            let num: f64 = num
                .trim()
                .parse()
                .map_err(|_| DomainError::parse(format!("Invalid challenge rating: {}", s)))?;
            let den: f64 = den
                .trim()
                .parse()
                .map_err(|_| DomainError::parse(format!("Invalid challenge rating: {}", s)))?;
            if den == 0.0 {
                return Err(DomainError::parse(format!("Invalid challenge rating: {}", s)));
            }
            return Self::from_f64(num / den);
        }
        let value: f64 = s
            .replace(',', ".")
            .parse()
            .map_err(|_| DomainError::parse(format!("Invalid challenge rating: {}", s)))?;
        Self::from_f64(value)
    }
}

impl TryFrom<String> for ChallengeRating {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ChallengeRating> for String {
    fn from(cr: ChallengeRating) -> String {
        cr.to_string()
    }
}
