use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::vehicle::{DurationTier, Vehicle};

/// System-wide rates applied on top of each vehicle's tier table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingPolicy {
    /// CHF per transport kilometre, applied to the distance as given; a
    /// round-trip caller doubles the one-way distance before quoting.
    pub transport_rate: Decimal,
    /// CHF per extra kilometre for vehicles without their own rate.
    pub default_extra_km_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            transport_rate: Decimal::from(2),
            default_extra_km_rate: Decimal::new(5, 1),
        }
    }
}

/// A computed rental quote. Never persisted; recomputed from the current
/// vehicle table on every call.
///
/// `total_chf == location_price_chf + extra_km_price_chf + transport_price_chf`
/// holds exactly, with each sub-component rounded to whole CHF on its own so
/// the total matches the displayed line items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub vehicle_name: String,
    pub tier: DurationTier,
    pub location_price_chf: i64,
    pub included_km: u32,
    pub extra_km: u32,
    pub extra_km_price_chf: i64,
    pub transport_km: u32,
    pub transport_price_chf: i64,
    pub total_chf: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLine {
    pub label: String,
    pub amount_chf: i64,
}

impl PriceBreakdown {
    /// Display projection: the zero-amount extra-km and transport lines are
    /// omitted entirely instead of rendered as "0 CHF". The raw fields keep
    /// their zeros.
    pub fn line_items(&self) -> Vec<PriceLine> {
        let mut lines = vec![PriceLine {
            label: format!("Location ({})", self.tier.label_fr()),
            amount_chf: self.location_price_chf,
        }];

        if self.extra_km > 0 && self.extra_km_price_chf > 0 {
            lines.push(PriceLine {
                label: format!("Kilomètres supplémentaires ({} km)", self.extra_km),
                amount_chf: self.extra_km_price_chf,
            });
        }
        if self.transport_km > 0 && self.transport_price_chf > 0 {
            lines.push(PriceLine {
                label: format!("Transport ({} km)", self.transport_km),
                amount_chf: self.transport_price_chf,
            });
        }

        lines
    }
}

pub trait RentalPricer: Send + Sync {
    fn quote(
        &self,
        vehicle_slug: &str,
        tier: DurationTier,
        extra_km: u32,
        transport_km: u32,
    ) -> Option<PriceBreakdown>;
}

/// Pricer over a catalogue snapshot. An unknown slug or an un-offered tier
/// yields `None`; callers fall back to "consult the vehicle page" messaging
/// rather than treating it as a failure.
#[derive(Clone, Debug)]
pub struct TariffPricer {
    catalogue: Vec<Vehicle>,
    policy: PricingPolicy,
}

impl TariffPricer {
    pub fn new(catalogue: Vec<Vehicle>, policy: PricingPolicy) -> Self {
        Self { catalogue, policy }
    }
}

impl RentalPricer for TariffPricer {
    fn quote(
        &self,
        vehicle_slug: &str,
        tier: DurationTier,
        extra_km: u32,
        transport_km: u32,
    ) -> Option<PriceBreakdown> {
        let vehicle = self.catalogue.iter().find(|vehicle| vehicle.slug == vehicle_slug)?;
        quote_for_vehicle(vehicle, tier, extra_km, transport_km, &self.policy)
    }
}

pub fn quote_for_vehicle(
    vehicle: &Vehicle,
    tier: DurationTier,
    extra_km: u32,
    transport_km: u32,
    policy: &PricingPolicy,
) -> Option<PriceBreakdown> {
    let tier_pricing = vehicle.tier_pricing(tier)?;

    let extra_km_rate = vehicle.extra_km_rate.unwrap_or(policy.default_extra_km_rate);
    let extra_km_price_chf = round_chf(Decimal::from(extra_km) * extra_km_rate);
    let transport_price_chf = round_chf(Decimal::from(transport_km) * policy.transport_rate);
    let total_chf = tier_pricing.price_chf + extra_km_price_chf + transport_price_chf;

    Some(PriceBreakdown {
        vehicle_name: vehicle.display_name(),
        tier,
        location_price_chf: tier_pricing.price_chf,
        included_km: tier_pricing.included_km,
        extra_km,
        extra_km_price_chf,
        transport_km,
        transport_price_chf,
        total_chf,
    })
}

/// Round to whole CHF, half away from zero, matching the displayed amounts.
fn round_chf(amount: Decimal) -> i64 {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;

    use crate::domain::vehicle::{DurationTier, TierPricing, Transmission, Vehicle};

    use super::{quote_for_vehicle, PricingPolicy, RentalPricer, TariffPricer};

    fn audi_r8() -> Vehicle {
        let mut pricing = BTreeMap::new();
        pricing.insert(
            DurationTier::TwentyFourHours,
            TierPricing { price_chf: 470, included_km: 200 },
        );
        pricing.insert(DurationTier::ShortWeekend, TierPricing { price_chf: 870, included_km: 400 });

        Vehicle {
            slug: "audi-r8-v8".to_string(),
            brand: "Audi".to_string(),
            model: "R8 V8".to_string(),
            year: 2014,
            power_hp: 430,
            transmission: Transmission::Automatic,
            category: "Supercar".to_string(),
            pricing,
            extra_km_rate: Some(Decimal::from(5)),
            deposit_chf: 5000,
            location: "Genève".to_string(),
            media: Vec::new(),
            calendar_url: None,
        }
    }

    fn city_car() -> Vehicle {
        let mut pricing = BTreeMap::new();
        pricing.insert(
            DurationTier::TwentyFourHours,
            TierPricing { price_chf: 120, included_km: 150 },
        );

        Vehicle {
            slug: "fiat-500".to_string(),
            brand: "Fiat".to_string(),
            model: "500".to_string(),
            year: 2021,
            power_hp: 70,
            transmission: Transmission::Manual,
            category: "Citadine".to_string(),
            pricing,
            extra_km_rate: None,
            deposit_chf: 800,
            location: "Genève".to_string(),
            media: Vec::new(),
            calendar_url: None,
        }
    }

    #[test]
    fn audi_24h_with_overage_and_transport() {
        let pricer = TariffPricer::new(vec![audi_r8()], PricingPolicy::default());
        let breakdown = pricer
            .quote("audi-r8-v8", DurationTier::TwentyFourHours, 50, 20)
            .expect("known vehicle and tier");

        assert_eq!(breakdown.location_price_chf, 470);
        assert_eq!(breakdown.extra_km_price_chf, 250);
        assert_eq!(breakdown.transport_price_chf, 40);
        assert_eq!(breakdown.total_chf, 760);
        assert_eq!(breakdown.vehicle_name, "Audi R8 V8");
        assert_eq!(breakdown.included_km, 200);
    }

    #[test]
    fn total_is_exactly_the_sum_of_components() {
        let policy = PricingPolicy::default();
        let vehicles = [audi_r8(), city_car()];
        let km_cases = [(0u32, 0u32), (1, 0), (0, 1), (25, 0), (50, 20), (999, 333)];

        for vehicle in &vehicles {
            for tier in vehicle.pricing.keys().copied() {
                for (extra_km, transport_km) in km_cases {
                    let breakdown =
                        quote_for_vehicle(vehicle, tier, extra_km, transport_km, &policy)
                            .expect("offered tier");
                    assert_eq!(
                        breakdown.total_chf,
                        breakdown.location_price_chf
                            + breakdown.extra_km_price_chf
                            + breakdown.transport_price_chf,
                        "additivity for {} {tier} {extra_km}/{transport_km}",
                        vehicle.slug
                    );
                }
            }
        }
    }

    #[test]
    fn default_extra_km_rate_applies_and_rounds_half_up() {
        let policy = PricingPolicy::default();
        let vehicle = city_car();

        // 30 km at the 0.5 default is exact.
        let exact = quote_for_vehicle(&vehicle, DurationTier::TwentyFourHours, 30, 0, &policy)
            .expect("offered tier");
        assert_eq!(exact.extra_km_price_chf, 15);

        // 25 km * 0.5 = 12.5 rounds up to 13 at the sub-component, and the
        // total uses the rounded line, not the raw product.
        let midpoint = quote_for_vehicle(&vehicle, DurationTier::TwentyFourHours, 25, 0, &policy)
            .expect("offered tier");
        assert_eq!(midpoint.extra_km_price_chf, 13);
        assert_eq!(midpoint.total_chf, 120 + 13);
    }

    #[test]
    fn zero_kilometres_keep_zero_amounts_but_drop_display_lines() {
        let policy = PricingPolicy::default();
        let breakdown = quote_for_vehicle(&audi_r8(), DurationTier::ShortWeekend, 0, 0, &policy)
            .expect("offered tier");

        assert_eq!(breakdown.extra_km_price_chf, 0);
        assert_eq!(breakdown.transport_price_chf, 0);
        assert_eq!(breakdown.total_chf, breakdown.location_price_chf);

        let lines = breakdown.line_items();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].label.starts_with("Location"));
    }

    #[test]
    fn each_zero_input_suppresses_only_its_own_line() {
        let policy = PricingPolicy::default();

        let no_transport = quote_for_vehicle(&audi_r8(), DurationTier::ShortWeekend, 10, 0, &policy)
            .expect("offered tier");
        let labels: Vec<_> =
            no_transport.line_items().iter().map(|line| line.label.clone()).collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[1].starts_with("Kilomètres"));

        let no_extra = quote_for_vehicle(&audi_r8(), DurationTier::ShortWeekend, 0, 10, &policy)
            .expect("offered tier");
        let labels: Vec<_> = no_extra.line_items().iter().map(|line| line.label.clone()).collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[1].starts_with("Transport"));
    }

    #[test]
    fn unknown_vehicle_and_unoffered_tier_yield_none() {
        let pricer = TariffPricer::new(vec![audi_r8()], PricingPolicy::default());
        assert!(pricer.quote("mclaren-570s", DurationTier::TwentyFourHours, 0, 0).is_none());
        assert!(pricer.quote("audi-r8-v8", DurationTier::Month, 0, 0).is_none());
    }
}
