use std::fs;
use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use rentora_core::availability::blocked_dates;
use rentora_core::domain::request::{Depositor, VehicleDescription};
use rentora_core::domain::reservation::ReservationInterval;
use rentora_core::domain::vehicle::Transmission;
use rentora_core::workflow::{RequestStore, RequestWorkflow};
use rentora_store::{
    Collection, JsonStore, RequestRepository, ReservationRepository, TrafficLog,
    VehicleRepository,
};

fn store() -> (tempfile::TempDir, Arc<JsonStore>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(JsonStore::new(dir.path()));
    (dir, store)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn reservation_add_then_remove_is_idempotent_for_availability() {
    let (_dir, store) = store();
    let repository = ReservationRepository::new(store);
    let today = date(2026, 4, 1);

    let baseline = ReservationInterval::new("audi-r8-v8", date(2026, 4, 10), date(2026, 4, 12));
    assert!(repository.add(baseline.clone()));
    let before = blocked_dates(&repository.list(), Some("audi-r8-v8"), today);

    let extra = ReservationInterval::new("audi-r8-v8", date(2026, 5, 1), date(2026, 5, 2));
    let extra_id = extra.id.clone();
    assert!(repository.add(extra));
    assert!(repository.remove(&extra_id));
    assert!(!repository.remove(&extra_id), "already removed");

    let after = blocked_dates(&repository.list(), Some("audi-r8-v8"), today);
    assert_eq!(before, after);
}

#[test]
fn workflow_persists_decisions_across_repository_instances() {
    let (_dir, store) = store();
    let workflow = RequestWorkflow::new(RequestRepository::new(store.clone()));
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).single().expect("timestamp");

    let submitted = workflow
        .submit(
            Depositor {
                name: "Luca Moretti".to_string(),
                email: "luca@example.ch".to_string(),
                phone: Some("+41 79 555 33 44".to_string()),
            },
            VehicleDescription {
                brand: "Porsche".to_string(),
                model: "911 Carrera".to_string(),
                year: 2019,
                power_hp: 450,
                transmission: Transmission::Automatic,
                category: "Sportive".to_string(),
                location: "Lausanne".to_string(),
            },
            vec!["p911.jpg".to_string()],
            now,
        )
        .expect("submit");

    let mut pricing = std::collections::BTreeMap::new();
    pricing.insert(
        rentora_core::DurationTier::TwentyFourHours,
        rentora_core::TierPricing { price_chf: 390, included_km: 250 },
    );
    let accepted = workflow.accept(&submitted.id, pricing.clone(), now).expect("accept");
    assert_eq!(accepted.pricing, Some(pricing.clone()));

    // A fresh repository over the same files sees the decided request.
    let reread = RequestRepository::new(store);
    let stored = reread.list();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, submitted.id);
    assert_eq!(stored[0].status, rentora_core::RequestStatus::Accepted);
    assert_eq!(stored[0].pricing, Some(pricing));
}

#[test]
fn corrupted_request_file_degrades_to_no_requests() {
    let (dir, store) = store();
    store.ensure_data_dir().expect("data dir");
    fs::write(dir.path().join(Collection::Requests.file_name()), "{\"oops\": true}")
        .expect("write corruption");

    let repository = RequestRepository::new(store);
    assert!(repository.list().is_empty());

    // The workflow on top of it keeps working: a submit replaces the
    // corrupted file with a healthy one-element array.
    let workflow = RequestWorkflow::new(repository);
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).single().expect("timestamp");
    workflow
        .submit(
            Depositor {
                name: "Ana Keller".to_string(),
                email: "ana@example.ch".to_string(),
                phone: None,
            },
            VehicleDescription {
                brand: "BMW".to_string(),
                model: "M2".to_string(),
                year: 2022,
                power_hp: 460,
                transmission: Transmission::Manual,
                category: "Sportive".to_string(),
                location: "Genève".to_string(),
            },
            Vec::new(),
            now,
        )
        .expect("submit over corrupted state");
    assert_eq!(workflow.list().len(), 1);
}

#[test]
fn vehicle_sync_replaces_the_list_wholesale() {
    let (_dir, store) = store();
    let repository = VehicleRepository::new(store);
    let fleet = rentora_store::fixtures::base_fleet();

    assert!(repository.replace_all(&fleet));
    assert_eq!(repository.list().len(), fleet.len());

    assert!(repository.replace_all(&fleet[..2]));
    assert_eq!(repository.list().len(), 2, "POST replaces, never merges");

    assert!(repository.overrides().is_empty());
}

#[test]
fn traffic_logs_append_and_list() {
    let (_dir, store) = store();
    let log = TrafficLog::new(store);
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).single().expect("timestamp");

    assert!(log.record_visitor(Some("Luca".to_string()), None, None, now));
    assert!(log.record_lead(
        "Luca Moretti".to_string(),
        Some("luca@example.ch".to_string()),
        None,
        Some("audi-r8-v8".to_string()),
        Some("Intéressé pour le week-end".to_string()),
        now,
    ));
    assert!(log.record_visit("/vehicules/audi-r8-v8".to_string(), None, now));

    assert_eq!(log.visitors().len(), 1);
    assert_eq!(log.leads().len(), 1);
    assert_eq!(log.visits().len(), 1);
    assert_eq!(log.leads()[0].vehicle_slug.as_deref(), Some("audi-r8-v8"));
}
