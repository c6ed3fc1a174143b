use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use rentora_assistant::{AssistantReply, ChatMessage, Responder};
use rentora_core::availability::{blocked_dates, blocked_until};
use rentora_core::domain::request::{Depositor, VehicleDescription};
use rentora_core::domain::vehicle::{DurationTier, Transmission, Vehicle};
use rentora_core::pricing::{PriceBreakdown, PriceLine, RentalPricer, TariffPricer};
use rentora_core::workflow::WorkflowError;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn catalogue(State(state): State<AppState>) -> Json<Vec<Vehicle>> {
    Json(state.catalogue())
}

/// The sync GET: the admin-curated vehicle array exactly as stored, polled by
/// page loads to merge into the locally rendered catalogue.
pub async fn vehicles(State(state): State<AppState>) -> Json<Vec<Vehicle>> {
    Json(state.vehicles.list())
}

#[derive(Debug, Deserialize)]
pub struct QuoteBody {
    pub vehicle: String,
    pub tier: DurationTier,
    #[serde(default)]
    pub extra_km: u32,
    #[serde(default)]
    pub transport_km: u32,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub breakdown: PriceBreakdown,
    /// Display lines with zero-amount items already omitted.
    pub lines: Vec<PriceLine>,
}

pub async fn quote(
    State(state): State<AppState>,
    Json(body): Json<QuoteBody>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let pricer = TariffPricer::new(state.catalogue(), state.config.pricing.policy());

    match pricer.quote(&body.vehicle, body.tier, body.extra_km, body.transport_km) {
        Some(breakdown) => {
            tracing::debug!(
                event_name = "pricing.quote_computed",
                vehicle_slug = %body.vehicle,
                total_chf = breakdown.total_chf,
                "quote computed"
            );
            let lines = breakdown.line_items();
            Ok(Json(QuoteResponse { breakdown, lines }))
        }
        None => Err(ApiError::NotFound(
            "Ce véhicule ou cette formule n'est pas disponible au calcul — consultez la page du \
             véhicule pour les tarifs proposés."
                .to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub vehicle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub blocked_dates: Vec<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_until: Option<NaiveDate>,
}

pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Json<AvailabilityResponse> {
    let intervals = state.reservations.list();
    let today = Utc::now().date_naive();

    let dates = blocked_dates(&intervals, query.vehicle.as_deref(), today);
    let until = query
        .vehicle
        .as_deref()
        .and_then(|slug| blocked_until(&intervals, slug, today));

    Json(AvailabilityResponse { blocked_dates: dates.into_iter().collect(), blocked_until: until })
}

#[derive(Debug, Deserialize)]
pub struct AssistantBody {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Slug of the vehicle page the visitor is on, if any.
    #[serde(default)]
    pub vehicle: Option<String>,
}

/// Scripted assistant endpoint. The configured thinking delay is pure
/// presentation pacing — the reply is computed the same with or without it,
/// and the widget disables its send button while a reply is in flight, so
/// ordering is preserved by construction.
pub async fn assistant(
    State(state): State<AppState>,
    Json(body): Json<AssistantBody>,
) -> Json<AssistantReply> {
    let catalogue = state.catalogue();
    let vehicle_context = body
        .vehicle
        .as_deref()
        .and_then(|slug| catalogue.iter().find(|vehicle| vehicle.slug == slug))
        .cloned();

    let responder = Responder::new(
        catalogue,
        state.reservations.list(),
        (*state.knowledge).clone(),
    );
    let reply =
        responder.respond(&body.messages, vehicle_context.as_ref(), Utc::now().date_naive());

    let delay = state.config.assistant.thinking_delay_ms;
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    tracing::debug!(event_name = "assistant.reply", "assistant reply rendered");
    Json(reply)
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequestBody {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub power_hp: u32,
    pub transmission: Transmission,
    pub category: String,
    pub location: String,
    #[serde(default)]
    pub photos: Vec<String>,
}

pub async fn submit_request(
    State(state): State<AppState>,
    Json(body): Json<SubmitRequestBody>,
) -> Result<(StatusCode, Json<rentora_core::RentalRequest>), ApiError> {
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(ApiError::BadRequest("a valid email address is required".to_string()));
    }

    let depositor =
        Depositor { name: body.name, email: body.email, phone: body.phone };
    let vehicle = VehicleDescription {
        brand: body.brand,
        model: body.model,
        year: body.year,
        power_hp: body.power_hp,
        transmission: body.transmission,
        category: body.category,
        location: body.location,
    };

    match state.workflow().submit(depositor, vehicle, body.photos, Utc::now()) {
        Ok(request) => {
            tracing::info!(
                event_name = "workflow.request_submitted",
                request_id = %request.id,
                "rental request submitted"
            );
            Ok((StatusCode::CREATED, Json(request)))
        }
        Err(WorkflowError::QuotaExceeded { .. }) => Err(ApiError::QuotaExceeded(
            "Vous avez atteint la limite de 3 demandes par jour — réessayez demain.".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct LeadBody {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

pub async fn record_lead(
    State(state): State<AppState>,
    Json(body): Json<LeadBody>,
) -> StatusCode {
    state.traffic.record_lead(
        body.name,
        body.email,
        body.phone,
        body.vehicle,
        body.message,
        Utc::now(),
    );
    StatusCode::ACCEPTED
}

#[derive(Debug, Deserialize)]
pub struct VisitorBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

pub async fn record_visitor(
    State(state): State<AppState>,
    Json(body): Json<VisitorBody>,
) -> StatusCode {
    state.traffic.record_visitor(body.name, body.email, body.phone, Utc::now());
    StatusCode::ACCEPTED
}

#[derive(Debug, Deserialize)]
pub struct VisitBody {
    pub page: String,
    #[serde(default)]
    pub referrer: Option<String>,
}

pub async fn record_visit(
    State(state): State<AppState>,
    Json(body): Json<VisitBody>,
) -> StatusCode {
    state.traffic.record_visit(body.page, body.referrer, Utc::now());
    StatusCode::ACCEPTED
}
