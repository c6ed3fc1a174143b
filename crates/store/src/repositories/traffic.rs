use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Collection, JsonStore};

/// A visitor who identified themselves through the contact widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// A concrete rental lead (vehicle interest plus contact details).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// One page view, for the back-office analytics panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitEntry {
    pub id: String,
    pub page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only intake for the visitor, lead, and analytics logs. Clients
/// fire-and-forget these; a failed write is logged and swallowed.
#[derive(Clone)]
pub struct TrafficLog {
    store: Arc<JsonStore>,
}

impl TrafficLog {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    pub fn record_visitor(
        &self,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        now: DateTime<Utc>,
    ) -> bool {
        let entry = VisitorEntry {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            recorded_at: now,
        };
        self.append(Collection::Visitors, entry, "visitor")
    }

    pub fn record_lead(
        &self,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        vehicle_slug: Option<String>,
        message: Option<String>,
        now: DateTime<Utc>,
    ) -> bool {
        let entry = LeadEntry {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            vehicle_slug,
            message,
            recorded_at: now,
        };
        self.append(Collection::Leads, entry, "lead")
    }

    pub fn record_visit(&self, page: String, referrer: Option<String>, now: DateTime<Utc>) -> bool {
        let entry =
            VisitEntry { id: Uuid::new_v4().to_string(), page, referrer, recorded_at: now };
        self.append(Collection::Visits, entry, "visit")
    }

    pub fn visitors(&self) -> Vec<VisitorEntry> {
        self.store.read(Collection::Visitors)
    }

    pub fn leads(&self) -> Vec<LeadEntry> {
        self.store.read(Collection::Leads)
    }

    pub fn visits(&self) -> Vec<VisitEntry> {
        self.store.read(Collection::Visits)
    }

    fn append<T>(&self, collection: Collection, entry: T, kind: &'static str) -> bool
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        match self.store.update::<T, ()>(collection, |entries| entries.push(entry)) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    event_name = "store.traffic_append_failed",
                    kind,
                    error = %error,
                    "could not persist traffic entry"
                );
                false
            }
        }
    }
}
