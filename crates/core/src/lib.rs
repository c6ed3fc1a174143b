pub mod auth;
pub mod availability;
pub mod catalogue;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod workflow;

pub use auth::{IssuedTokens, TokenService};
pub use availability::{blocked_dates, blocked_until, is_blocked};
pub use catalogue::{assemble_catalogue, request_to_vehicle};
pub use domain::request::{
    Depositor, DisplaySpecs, RentalRequest, RequestStatus, VehicleDescription,
};
pub use domain::reservation::{CustomerRef, ReservationInterval};
pub use domain::vehicle::{slugify, DurationTier, TierPricing, Transmission, Vehicle};
pub use errors::DomainError;
pub use pricing::{
    quote_for_vehicle, PriceBreakdown, PriceLine, PricingPolicy, RentalPricer, TariffPricer,
};
pub use workflow::{RequestStore, RequestWorkflow, WorkflowError, DAILY_SUBMISSION_QUOTA};
