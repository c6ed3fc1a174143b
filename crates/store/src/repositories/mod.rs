pub mod requests;
pub mod reservations;
pub mod traffic;
pub mod vehicles;

pub use requests::RequestRepository;
pub use reservations::ReservationRepository;
pub use traffic::{LeadEntry, TrafficLog, VisitEntry, VisitorEntry};
pub use vehicles::VehicleRepository;
