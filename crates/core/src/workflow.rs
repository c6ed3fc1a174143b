use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::request::{
    Depositor, DisplaySpecs, RentalRequest, RequestStatus, VehicleDescription,
};
use crate::domain::vehicle::{DurationTier, TierPricing};

/// Submissions accepted per depositor email per calendar day.
pub const DAILY_SUBMISSION_QUOTA: usize = 3;

/// Storage seam for rental requests, injected into the workflow engine.
///
/// Implementations degrade rather than fail: a corrupted backing collection
/// reads as empty, and mutations against missing ids report `false` instead
/// of erroring.
pub trait RequestStore {
    fn list(&self) -> Vec<RentalRequest>;
    fn append(&self, request: &RentalRequest) -> bool;
    fn replace(&self, request: &RentalRequest) -> bool;
    fn delete(&self, request_id: &str) -> bool;
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("daily submission quota reached for `{email}`")]
    QuotaExceeded { email: String },
}

/// Drives the pending → accepted | rejected lifecycle of rental requests
/// over an injected store.
pub struct RequestWorkflow<S> {
    store: S,
}

impl<S> RequestWorkflow<S>
where
    S: RequestStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<RentalRequest> {
        self.store.list()
    }

    pub fn find(&self, request_id: &str) -> Option<RentalRequest> {
        self.store.list().into_iter().find(|request| request.id == request_id)
    }

    /// Create a pending request, unless the depositor email already has
    /// `DAILY_SUBMISSION_QUOTA` submissions on the same calendar day — then
    /// the submission is refused outright and nothing is stored.
    pub fn submit(
        &self,
        depositor: Depositor,
        vehicle: VehicleDescription,
        photos: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<RentalRequest, WorkflowError> {
        let email_key = depositor.email.trim().to_ascii_lowercase();
        let submitted_today = self
            .store
            .list()
            .iter()
            .filter(|request| request.depositor.email.trim().to_ascii_lowercase() == email_key)
            .filter(|request| request.submitted_at.date_naive() == now.date_naive())
            .count();

        if submitted_today >= DAILY_SUBMISSION_QUOTA {
            return Err(WorkflowError::QuotaExceeded { email: depositor.email });
        }

        let request = RentalRequest::new(depositor, vehicle, photos, now);
        self.store.append(&request);
        Ok(request)
    }

    /// Accept a pending request: stamps the decision time and attaches the
    /// operator's pricing tiers, which makes the request project into the
    /// public catalogue. Terminal; anything but a pending request is a no-op.
    pub fn accept(
        &self,
        request_id: &str,
        pricing: BTreeMap<DurationTier, TierPricing>,
        now: DateTime<Utc>,
    ) -> Option<RentalRequest> {
        let mut request = self.find(request_id)?;
        request.transition_to(RequestStatus::Accepted).ok()?;
        request.decided_at = Some(now);
        request.pricing = Some(pricing);
        self.store.replace(&request).then_some(request)
    }

    /// Reject a pending request. Terminal; no catalogue visibility ever.
    pub fn reject(&self, request_id: &str, now: DateTime<Utc>) -> Option<RentalRequest> {
        let mut request = self.find(request_id)?;
        request.transition_to(RequestStatus::Rejected).ok()?;
        request.decided_at = Some(now);
        self.store.replace(&request).then_some(request)
    }

    /// Replace the operator pricing of an accepted request in place; the
    /// catalogue projection reflects the change on its next read.
    pub fn edit_pricing(
        &self,
        request_id: &str,
        pricing: BTreeMap<DurationTier, TierPricing>,
    ) -> Option<RentalRequest> {
        let mut request = self.find(request_id)?;
        if request.status != RequestStatus::Accepted {
            return None;
        }
        request.pricing = Some(pricing);
        self.store.replace(&request).then_some(request)
    }

    /// Replace the display-spec overrides of an accepted request in place.
    pub fn edit_display_specs(
        &self,
        request_id: &str,
        specs: DisplaySpecs,
    ) -> Option<RentalRequest> {
        let mut request = self.find(request_id)?;
        if request.status != RequestStatus::Accepted {
            return None;
        }
        request.display_specs = Some(specs);
        self.store.replace(&request).then_some(request)
    }

    /// Remove a request at any status. A previously accepted request's
    /// catalogue projection disappears on the next read; the submitter is
    /// not notified.
    pub fn delete(&self, request_id: &str) -> bool {
        self.store.delete(request_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::{DateTime, TimeZone, Utc};

    use crate::catalogue::request_to_vehicle;
    use crate::domain::request::{Depositor, DisplaySpecs, RentalRequest, VehicleDescription};
    use crate::domain::vehicle::{DurationTier, TierPricing, Transmission};

    use super::{RequestStore, RequestWorkflow, WorkflowError, DAILY_SUBMISSION_QUOTA};

    #[derive(Default)]
    struct MemoryStore {
        requests: Mutex<Vec<RentalRequest>>,
    }

    impl MemoryStore {
        fn len(&self) -> usize {
            self.requests.lock().expect("store lock").len()
        }
    }

    impl RequestStore for &MemoryStore {
        fn list(&self) -> Vec<RentalRequest> {
            self.requests.lock().expect("store lock").clone()
        }

        fn append(&self, request: &RentalRequest) -> bool {
            self.requests.lock().expect("store lock").push(request.clone());
            true
        }

        fn replace(&self, request: &RentalRequest) -> bool {
            let mut requests = self.requests.lock().expect("store lock");
            match requests.iter_mut().find(|stored| stored.id == request.id) {
                Some(stored) => {
                    *stored = request.clone();
                    true
                }
                None => false,
            }
        }

        fn delete(&self, request_id: &str) -> bool {
            let mut requests = self.requests.lock().expect("store lock");
            let before = requests.len();
            requests.retain(|stored| stored.id != request_id);
            requests.len() != before
        }
    }

    fn depositor(email: &str) -> Depositor {
        Depositor { name: "Luca Moretti".to_string(), email: email.to_string(), phone: None }
    }

    fn description() -> VehicleDescription {
        VehicleDescription {
            brand: "Porsche".to_string(),
            model: "911 Carrera".to_string(),
            year: 2019,
            power_hp: 450,
            transmission: Transmission::Automatic,
            category: "Sportive".to_string(),
            location: "Lausanne".to_string(),
        }
    }

    fn pricing(price_24h: i64) -> BTreeMap<DurationTier, TierPricing> {
        let mut tiers = BTreeMap::new();
        tiers.insert(
            DurationTier::TwentyFourHours,
            TierPricing { price_chf: price_24h, included_km: 250 },
        );
        tiers
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("valid timestamp")
    }

    #[test]
    fn fourth_same_day_submission_is_refused_without_side_effect() {
        let store = MemoryStore::default();
        let workflow = RequestWorkflow::new(&store);
        let day = at(2026, 4, 1, 9);

        for hour in 0..DAILY_SUBMISSION_QUOTA as u32 {
            workflow
                .submit(depositor("luca@example.ch"), description(), Vec::new(), day + chrono::Duration::hours(i64::from(hour)))
                .expect("within quota");
        }
        assert_eq!(store.len(), 3);

        let refused = workflow
            .submit(depositor("Luca@Example.CH"), description(), Vec::new(), at(2026, 4, 1, 23))
            .expect_err("quota reached, case-insensitive email");
        assert!(matches!(refused, WorkflowError::QuotaExceeded { .. }));
        assert_eq!(store.len(), 3, "refused submission stores nothing");
    }

    #[test]
    fn quota_resets_on_the_next_calendar_day_and_is_per_email() {
        let store = MemoryStore::default();
        let workflow = RequestWorkflow::new(&store);

        for _ in 0..DAILY_SUBMISSION_QUOTA {
            workflow
                .submit(depositor("luca@example.ch"), description(), Vec::new(), at(2026, 4, 1, 9))
                .expect("within quota");
        }

        workflow
            .submit(depositor("ana@example.ch"), description(), Vec::new(), at(2026, 4, 1, 10))
            .expect("another depositor is unaffected");
        workflow
            .submit(depositor("luca@example.ch"), description(), Vec::new(), at(2026, 4, 2, 0))
            .expect("next calendar day resets the quota");
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn accept_stamps_decision_and_projects_into_the_catalogue() {
        let store = MemoryStore::default();
        let workflow = RequestWorkflow::new(&store);
        let submitted = workflow
            .submit(depositor("luca@example.ch"), description(), Vec::new(), at(2026, 4, 1, 9))
            .expect("submit");

        let decided_at = at(2026, 4, 2, 14);
        let accepted = workflow
            .accept(&submitted.id, pricing(390), decided_at)
            .expect("pending request accepts");

        assert_eq!(accepted.decided_at, Some(decided_at));
        let projection = request_to_vehicle(&accepted).expect("accepted request projects");
        assert_eq!(projection.pricing, pricing(390));

        // Terminal: a second decision of either kind is a no-op.
        assert!(workflow.accept(&submitted.id, pricing(100), decided_at).is_none());
        assert!(workflow.reject(&submitted.id, decided_at).is_none());
    }

    #[test]
    fn rejected_requests_never_project() {
        let store = MemoryStore::default();
        let workflow = RequestWorkflow::new(&store);
        let submitted = workflow
            .submit(depositor("luca@example.ch"), description(), Vec::new(), at(2026, 4, 1, 9))
            .expect("submit");

        let rejected = workflow.reject(&submitted.id, at(2026, 4, 2, 14)).expect("reject");
        assert!(rejected.decided_at.is_some());
        assert!(request_to_vehicle(&rejected).is_none());
    }

    #[test]
    fn edits_apply_only_after_acceptance_and_mutate_in_place() {
        let store = MemoryStore::default();
        let workflow = RequestWorkflow::new(&store);
        let submitted = workflow
            .submit(depositor("luca@example.ch"), description(), Vec::new(), at(2026, 4, 1, 9))
            .expect("submit");

        assert!(workflow.edit_pricing(&submitted.id, pricing(390)).is_none());
        assert!(
            workflow.edit_display_specs(&submitted.id, DisplaySpecs::default()).is_none(),
            "display specs are meaningless before acceptance"
        );

        workflow.accept(&submitted.id, pricing(390), at(2026, 4, 2, 14)).expect("accept");
        workflow.edit_pricing(&submitted.id, pricing(420)).expect("edit accepted pricing");

        let stored = workflow.find(&submitted.id).expect("stored request");
        assert_eq!(stored.pricing, Some(pricing(420)));
        let projection = request_to_vehicle(&stored).expect("projection follows the edit");
        assert_eq!(projection.pricing[&DurationTier::TwentyFourHours].price_chf, 420);
    }

    #[test]
    fn delete_works_at_any_status_and_reports_missing_ids() {
        let store = MemoryStore::default();
        let workflow = RequestWorkflow::new(&store);
        let submitted = workflow
            .submit(depositor("luca@example.ch"), description(), Vec::new(), at(2026, 4, 1, 9))
            .expect("submit");

        assert!(workflow.delete(&submitted.id));
        assert!(!workflow.delete(&submitted.id), "second delete finds nothing");
        assert!(workflow.accept(&submitted.id, pricing(390), at(2026, 4, 2, 0)).is_none());
        assert_eq!(store.len(), 0);
    }
}
