use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Rental-duration buckets offered across the fleet. Each vehicle prices a
/// subset of these; the map key type guarantees no vehicle can carry a tier
/// outside the enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DurationTier {
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[serde(rename = "short_weekend")]
    ShortWeekend,
    #[serde(rename = "long_weekend")]
    LongWeekend,
    #[serde(rename = "short_week")]
    ShortWeek,
    #[serde(rename = "full_week")]
    FullWeek,
    #[serde(rename = "month")]
    Month,
}

impl DurationTier {
    pub const ALL: [DurationTier; 6] = [
        Self::TwentyFourHours,
        Self::ShortWeekend,
        Self::LongWeekend,
        Self::ShortWeek,
        Self::FullWeek,
        Self::Month,
    ];

    pub fn days(self) -> u32 {
        match self {
            Self::TwentyFourHours => 1,
            Self::ShortWeekend => 2,
            Self::LongWeekend => 3,
            Self::ShortWeek => 5,
            Self::FullWeek => 7,
            Self::Month => 30,
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::TwentyFourHours => "24h",
            Self::ShortWeekend => "short_weekend",
            Self::LongWeekend => "long_weekend",
            Self::ShortWeek => "short_week",
            Self::FullWeek => "full_week",
            Self::Month => "month",
        }
    }

    pub fn label_fr(self) -> &'static str {
        match self {
            Self::TwentyFourHours => "24 heures",
            Self::ShortWeekend => "Week-end court",
            Self::LongWeekend => "Week-end prolongé",
            Self::ShortWeek => "Semaine courte",
            Self::FullWeek => "Semaine complète",
            Self::Month => "Mois",
        }
    }
}

impl fmt::Display for DurationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl std::str::FromStr for DurationTier {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "24h" => Ok(Self::TwentyFourHours),
            "short_weekend" => Ok(Self::ShortWeekend),
            "long_weekend" => Ok(Self::LongWeekend),
            "short_week" => Ok(Self::ShortWeek),
            "full_week" => Ok(Self::FullWeek),
            "month" => Ok(Self::Month),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown duration tier `{other}` (expected 24h|short_weekend|long_weekend|short_week|full_week|month)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    Manual,
    Automatic,
}

/// Price and mileage allowance for one duration tier of one vehicle.
/// Tier prices are tabulated per tier, not derived from a day rate, so the
/// operator can apply weekend/week discounting freely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPricing {
    pub price_chf: i64,
    pub included_km: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub slug: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub power_hp: u32,
    pub transmission: Transmission,
    pub category: String,
    pub pricing: BTreeMap<DurationTier, TierPricing>,
    /// CHF per extra kilometre; `None` falls back to the system default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_km_rate: Option<Decimal>,
    pub deposit_chf: i64,
    pub location: String,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_url: Option<String>,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }

    pub fn offers_tier(&self, tier: DurationTier) -> bool {
        self.pricing.contains_key(&tier)
    }

    pub fn tier_pricing(&self, tier: DurationTier) -> Option<TierPricing> {
        self.pricing.get(&tier).copied()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.slug.trim().is_empty() {
            return Err(DomainError::InvariantViolation(format!(
                "vehicle `{}` has an empty slug",
                self.display_name()
            )));
        }
        if self.pricing.is_empty() {
            return Err(DomainError::InvariantViolation(format!(
                "vehicle `{}` offers no duration tier",
                self.slug
            )));
        }
        Ok(())
    }
}

/// Derive the catalogue identifier from brand and model: lowercase, runs of
/// non-alphanumerics collapsed to a single dash, no leading/trailing dash.
pub fn slugify(brand: &str, model: &str) -> String {
    let raw = format!("{brand} {model}").to_lowercase();
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for character in raw.chars() {
        if character.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(character);
        } else {
            pending_dash = true;
        }
    }

    slug
}
