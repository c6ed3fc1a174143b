use std::sync::Arc;

use rentora_core::domain::vehicle::Vehicle;

use crate::store::{Collection, JsonStore};

/// Admin-curated vehicles and base-fleet overrides. The vehicle list is the
/// one collection with a cross-session surface: the sync endpoint reads it
/// wholesale and replaces it wholesale, last write wins.
#[derive(Clone)]
pub struct VehicleRepository {
    store: Arc<JsonStore>,
}

impl VehicleRepository {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Vehicle> {
        self.store.read(Collection::Vehicles)
    }

    pub fn replace_all(&self, vehicles: &[Vehicle]) -> bool {
        match self.store.write(Collection::Vehicles, vehicles) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    event_name = "store.vehicles_replace_failed",
                    error = %error,
                    "could not persist vehicle list"
                );
                false
            }
        }
    }

    pub fn overrides(&self) -> Vec<Vehicle> {
        self.store.read(Collection::FleetOverrides)
    }

    pub fn replace_overrides(&self, overrides: &[Vehicle]) -> bool {
        match self.store.write(Collection::FleetOverrides, overrides) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    event_name = "store.overrides_replace_failed",
                    error = %error,
                    "could not persist fleet overrides"
                );
                false
            }
        }
    }
}
