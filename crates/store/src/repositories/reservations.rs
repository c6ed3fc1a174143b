use std::sync::Arc;

use rentora_core::domain::reservation::ReservationInterval;

use crate::store::{Collection, JsonStore};

/// Operator-only mutations over the booked-interval ledger. No overlap
/// validation: overlapping bookings are allowed and collapse harmlessly in
/// the availability date set.
#[derive(Clone)]
pub struct ReservationRepository {
    store: Arc<JsonStore>,
}

impl ReservationRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<ReservationInterval> {
        self.store.read(Collection::Reservations)
    }

    pub fn add(&self, interval: ReservationInterval) -> bool {
        let result = self.store.update::<ReservationInterval, ()>(
            Collection::Reservations,
            |intervals| intervals.push(interval),
        );

        match result {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    event_name = "store.reservation_add_failed",
                    error = %error,
                    "could not persist reservation interval"
                );
                false
            }
        }
    }

    pub fn remove(&self, interval_id: &str) -> bool {
        let result = self.store.update::<ReservationInterval, bool>(
            Collection::Reservations,
            |intervals| {
                let before = intervals.len();
                intervals.retain(|interval| interval.id != interval_id);
                intervals.len() != before
            },
        );

        match result {
            Ok(removed) => removed,
            Err(error) => {
                tracing::warn!(
                    event_name = "store.reservation_remove_failed",
                    error = %error,
                    "could not persist reservation removal"
                );
                false
            }
        }
    }
}
