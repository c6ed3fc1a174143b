use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use rentora_core::domain::request::{DisplaySpecs, RentalRequest};
use rentora_core::domain::reservation::{CustomerRef, ReservationInterval};
use rentora_core::domain::vehicle::{DurationTier, TierPricing, Vehicle};
use rentora_core::workflow::RequestStore;
use rentora_store::{LeadEntry, VisitorEntry};

use crate::auth::OperatorIdentity;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VehicleSyncBody {
    pub vehicles: Vec<Vehicle>,
}

/// The sync POST: replace the admin-curated vehicle array wholesale.
/// Last write wins; there is deliberately no merge and no conflict check.
pub async fn replace_vehicles(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
    Json(body): Json<VehicleSyncBody>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    for vehicle in &body.vehicles {
        vehicle
            .validate()
            .map_err(|error| ApiError::BadRequest(error.to_string()))?;
    }

    state.vehicles.replace_all(&body.vehicles);
    tracing::info!(
        event_name = "catalogue.vehicles_replaced",
        count = body.vehicles.len(),
        "admin vehicle list replaced"
    );
    Ok(Json(state.vehicles.list()))
}

pub async fn list_reservations(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
) -> Json<Vec<ReservationInterval>> {
    Json(state.reservations.list())
}

#[derive(Debug, Deserialize)]
pub struct CreateReservationBody {
    pub vehicle_slug: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub customer: Option<CustomerRef>,
}

pub async fn create_reservation(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateReservationBody>,
) -> Result<(StatusCode, Json<ReservationInterval>), ApiError> {
    if body.end_date < body.start_date {
        return Err(ApiError::BadRequest("end_date must not precede start_date".to_string()));
    }

    let mut interval =
        ReservationInterval::new(body.vehicle_slug, body.start_date, body.end_date);
    if let Some(customer) = body.customer {
        interval = interval.with_customer(customer);
    }

    state.reservations.add(interval.clone());
    tracing::info!(
        event_name = "availability.interval_added",
        vehicle_slug = %interval.vehicle_slug,
        "reservation interval added"
    );
    Ok((StatusCode::CREATED, Json(interval)))
}

pub async fn delete_reservation(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
    Path(interval_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.reservations.remove(&interval_id) {
        tracing::info!(
            event_name = "availability.interval_removed",
            interval_id = %interval_id,
            "reservation interval removed"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("no reservation interval with that id".to_string()))
    }
}

pub async fn list_requests(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
) -> Json<Vec<RentalRequest>> {
    Json(state.requests.list())
}

#[derive(Debug, Deserialize)]
pub struct AcceptRequestBody {
    pub pricing: BTreeMap<DurationTier, TierPricing>,
}

pub async fn accept_request(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Json(body): Json<AcceptRequestBody>,
) -> Result<Json<RentalRequest>, ApiError> {
    if body.pricing.is_empty() {
        return Err(ApiError::BadRequest(
            "accepting a request needs at least one pricing tier".to_string(),
        ));
    }

    state
        .workflow()
        .accept(&request_id, body.pricing, Utc::now())
        .map(|request| {
            tracing::info!(
                event_name = "workflow.request_accepted",
                request_id = %request.id,
                "rental request accepted"
            );
            Json(request)
        })
        .ok_or_else(|| ApiError::NotFound("no pending request with that id".to_string()))
}

pub async fn reject_request(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<RentalRequest>, ApiError> {
    state
        .workflow()
        .reject(&request_id, Utc::now())
        .map(|request| {
            tracing::info!(
                event_name = "workflow.request_rejected",
                request_id = %request.id,
                "rental request rejected"
            );
            Json(request)
        })
        .ok_or_else(|| ApiError::NotFound("no pending request with that id".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct EditPricingBody {
    pub pricing: BTreeMap<DurationTier, TierPricing>,
}

pub async fn edit_request_pricing(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Json(body): Json<EditPricingBody>,
) -> Result<Json<RentalRequest>, ApiError> {
    state
        .workflow()
        .edit_pricing(&request_id, body.pricing)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no accepted request with that id".to_string()))
}

pub async fn edit_request_specs(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Json(specs): Json<DisplaySpecs>,
) -> Result<Json<RentalRequest>, ApiError> {
    state
        .workflow()
        .edit_display_specs(&request_id, specs)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no accepted request with that id".to_string()))
}

pub async fn delete_request(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.workflow().delete(&request_id) {
        tracing::info!(
            event_name = "workflow.request_deleted",
            request_id = %request_id,
            "rental request deleted"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("no request with that id".to_string()))
    }
}

pub async fn list_leads(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
) -> Json<Vec<LeadEntry>> {
    Json(state.traffic.leads())
}

pub async fn list_visitors(
    _operator: OperatorIdentity,
    State(state): State<AppState>,
) -> Json<Vec<VisitorEntry>> {
    Json(state.traffic.visitors())
}
