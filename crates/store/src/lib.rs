pub mod fixtures;
pub mod repositories;
pub mod store;

pub use repositories::{
    LeadEntry, RequestRepository, ReservationRepository, TrafficLog, VehicleRepository,
    VisitEntry, VisitorEntry,
};
pub use store::{Collection, JsonStore, StoreError};
