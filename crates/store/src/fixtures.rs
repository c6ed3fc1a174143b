use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use rentora_core::domain::reservation::ReservationInterval;
use rentora_core::domain::vehicle::{
    slugify, DurationTier, TierPricing, Transmission, Vehicle,
};

fn tiers(entries: &[(DurationTier, i64, u32)]) -> BTreeMap<DurationTier, TierPricing> {
    entries
        .iter()
        .map(|&(tier, price_chf, included_km)| (tier, TierPricing { price_chf, included_km }))
        .collect()
}

fn vehicle(
    brand: &str,
    model: &str,
    year: u16,
    power_hp: u32,
    transmission: Transmission,
    category: &str,
    pricing: BTreeMap<DurationTier, TierPricing>,
    extra_km_rate: Option<Decimal>,
    deposit_chf: i64,
) -> Vehicle {
    Vehicle {
        slug: slugify(brand, model),
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        power_hp,
        transmission,
        category: category.to_string(),
        pricing,
        extra_km_rate,
        deposit_chf,
        location: "Genève".to_string(),
        media: vec![format!("{}.jpg", slugify(brand, model))],
        calendar_url: None,
    }
}

/// The built-in fleet the public catalogue starts from. Operators override
/// entries (by slug) or add to them through the admin surface; this table is
/// the baseline a fresh deployment ships with.
pub fn base_fleet() -> Vec<Vehicle> {
    use DurationTier::{FullWeek, LongWeekend, Month, ShortWeek, ShortWeekend, TwentyFourHours};

    let mut fleet = vec![
        vehicle(
            "Audi",
            "R8 V8",
            2014,
            430,
            Transmission::Automatic,
            "Supercar",
            tiers(&[
                (TwentyFourHours, 470, 200),
                (ShortWeekend, 870, 400),
                (LongWeekend, 1250, 600),
                (ShortWeek, 1950, 1000),
                (FullWeek, 2650, 1400),
            ]),
            Some(Decimal::from(5)),
            5000,
        ),
        vehicle(
            "McLaren",
            "570S",
            2017,
            570,
            Transmission::Automatic,
            "Supercar",
            tiers(&[
                (TwentyFourHours, 890, 150),
                (ShortWeekend, 1650, 300),
                (LongWeekend, 2350, 450),
                (FullWeek, 4900, 1000),
            ]),
            Some(Decimal::from(8)),
            10000,
        ),
        vehicle(
            "BMW",
            "M4 Competition",
            2021,
            510,
            Transmission::Automatic,
            "Sportive",
            tiers(&[
                (TwentyFourHours, 320, 250),
                (ShortWeekend, 590, 500),
                (LongWeekend, 840, 750),
                (ShortWeek, 1300, 1200),
                (FullWeek, 1750, 1700),
                (Month, 5900, 4000),
            ]),
            Some(Decimal::new(25, 1)),
            3000,
        ),
        vehicle(
            "Mercedes-AMG",
            "C63 S",
            2020,
            510,
            Transmission::Automatic,
            "Sportive",
            tiers(&[
                (TwentyFourHours, 340, 250),
                (ShortWeekend, 620, 500),
                (LongWeekend, 880, 750),
                (FullWeek, 1850, 1700),
                (Month, 6200, 4000),
            ]),
            None,
            3000,
        ),
        vehicle(
            "Porsche",
            "Cayenne",
            2022,
            462,
            Transmission::Automatic,
            "SUV",
            tiers(&[
                (TwentyFourHours, 280, 300),
                (ShortWeekend, 520, 600),
                (ShortWeek, 1150, 1400),
                (FullWeek, 1550, 2000),
                (Month, 5200, 5000),
            ]),
            None,
            2500,
        ),
    ];

    // The McLaren keeps an externally-hosted booking calendar.
    if let Some(mclaren) = fleet.iter_mut().find(|vehicle| vehicle.slug == "mclaren-570s") {
        mclaren.calendar_url =
            Some("https://calendar.google.com/calendar/embed?src=rentora-570s".to_string());
    }

    fleet
}

/// Deterministic demo reservations used by `rentora seed` so a fresh install
/// has something to show on the availability calendar.
pub fn demo_reservations() -> Vec<ReservationInterval> {
    let date = |y: i32, m: u32, d: u32| {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
    };

    vec![
        ReservationInterval {
            id: "seed-res-0001".to_string(),
            vehicle_slug: "audi-r8-v8".to_string(),
            start_date: date(2026, 8, 14),
            end_date: date(2026, 8, 16),
            customer: None,
        },
        ReservationInterval {
            id: "seed-res-0002".to_string(),
            vehicle_slug: "mclaren-570s".to_string(),
            start_date: date(2026, 8, 21),
            end_date: date(2026, 8, 24),
            customer: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use rentora_core::domain::vehicle::DurationTier;

    use super::{base_fleet, demo_reservations};

    #[test]
    fn every_fleet_vehicle_satisfies_the_tier_invariant() {
        let fleet = base_fleet();
        assert!(!fleet.is_empty());

        for vehicle in &fleet {
            vehicle.validate().expect("fixture vehicle is valid");
            for tier in vehicle.pricing.keys() {
                assert!(DurationTier::ALL.contains(tier));
            }
        }
    }

    #[test]
    fn fleet_slugs_are_unique() {
        let fleet = base_fleet();
        let mut slugs: Vec<_> = fleet.iter().map(|vehicle| vehicle.slug.clone()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), fleet.len());
    }

    #[test]
    fn audi_fixture_matches_the_published_tariff() {
        let fleet = base_fleet();
        let audi = fleet.iter().find(|vehicle| vehicle.slug == "audi-r8-v8").expect("audi");
        let day = audi.tier_pricing(DurationTier::TwentyFourHours).expect("24h tier");
        assert_eq!(day.price_chf, 470);
        assert_eq!(audi.extra_km_rate, Some(rust_decimal::Decimal::from(5)));
    }

    #[test]
    fn demo_reservations_reference_fleet_vehicles() {
        let fleet = base_fleet();
        for reservation in demo_reservations() {
            assert!(fleet.iter().any(|vehicle| vehicle.slug == reservation.vehicle_slug));
        }
    }
}
