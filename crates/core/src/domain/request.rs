use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::vehicle::{DurationTier, TierPricing, Transmission};
use crate::errors::DomainError;

/// Contact details of the person offering their vehicle for sub-rental.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depositor {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The vehicle as described by the depositor at submission time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDescription {
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub power_hp: u32,
    pub transmission: Transmission,
    pub category: String,
    pub location: String,
}

/// Operator-edited display overrides for an accepted request. Unset fields
/// fall through to the submitted description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<Transmission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A "rent out your own vehicle" submission moving through the operator
/// approval workflow. Accepted requests surface in the public catalogue via a
/// derived projection, so post-acceptance edits are visible immediately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RentalRequest {
    pub id: String,
    pub depositor: Depositor,
    pub vehicle: VehicleDescription,
    #[serde(default)]
    pub photos: Vec<String>,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<BTreeMap<DurationTier, TierPricing>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_specs: Option<DisplaySpecs>,
}

impl RentalRequest {
    pub fn new(
        depositor: Depositor,
        vehicle: VehicleDescription,
        photos: Vec<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            depositor,
            vehicle,
            photos,
            status: RequestStatus::Pending,
            submitted_at,
            decided_at: None,
            pricing: None,
            display_specs: None,
        }
    }

    /// Pending is the only non-terminal status: a request can be accepted or
    /// rejected exactly once and never reopened.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self.status, next),
            (RequestStatus::Pending, RequestStatus::Accepted)
                | (RequestStatus::Pending, RequestStatus::Rejected)
        )
    }

    pub fn transition_to(&mut self, next: RequestStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidRequestTransition { from: self.status, to: next })
    }
}
