use std::sync::Arc;

use rentora_core::domain::request::RentalRequest;
use rentora_core::workflow::RequestStore;

use crate::store::{Collection, JsonStore};

/// Persistence behind the request/approval workflow. Implements the core
/// `RequestStore` seam so the workflow engine stays storage-agnostic.
#[derive(Clone)]
pub struct RequestRepository {
    store: Arc<JsonStore>,
}

impl RequestRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }
}

impl RequestStore for RequestRepository {
    fn list(&self) -> Vec<RentalRequest> {
        self.store.read(Collection::Requests)
    }

    fn append(&self, request: &RentalRequest) -> bool {
        let appended = self.store.update::<RentalRequest, ()>(Collection::Requests, |requests| {
            requests.push(request.clone());
        });

        match appended {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    event_name = "store.request_append_failed",
                    request_id = %request.id,
                    error = %error,
                    "could not persist rental request"
                );
                false
            }
        }
    }

    fn replace(&self, request: &RentalRequest) -> bool {
        let replaced = self.store.update::<RentalRequest, bool>(Collection::Requests, |requests| {
            match requests.iter_mut().find(|stored| stored.id == request.id) {
                Some(stored) => {
                    *stored = request.clone();
                    true
                }
                None => false,
            }
        });

        match replaced {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(
                    event_name = "store.request_replace_failed",
                    request_id = %request.id,
                    error = %error,
                    "could not persist rental request update"
                );
                false
            }
        }
    }

    fn delete(&self, request_id: &str) -> bool {
        let deleted = self.store.update::<RentalRequest, bool>(Collection::Requests, |requests| {
            let before = requests.len();
            requests.retain(|stored| stored.id != request_id);
            requests.len() != before
        });

        match deleted {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(
                    event_name = "store.request_delete_failed",
                    request_id,
                    error = %error,
                    "could not persist rental request deletion"
                );
                false
            }
        }
    }
}
