pub mod admin;
pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod health;
pub mod public;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full API surface. Public routes serve the site; `/api/admin/*` and
/// the token endpoints make up the operator back office.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/catalogue", get(public::catalogue))
        .route("/api/vehicles", get(public::vehicles))
        .route("/api/quote", post(public::quote))
        .route("/api/availability", get(public::availability))
        .route("/api/assistant", post(public::assistant))
        .route("/api/requests", post(public::submit_request))
        .route("/api/leads", post(public::record_lead))
        .route("/api/visitors", post(public::record_visitor))
        .route("/api/visits", post(public::record_visit))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/admin/vehicles", post(admin::replace_vehicles))
        .route(
            "/api/admin/reservations",
            get(admin::list_reservations).post(admin::create_reservation),
        )
        .route("/api/admin/reservations/{id}", delete(admin::delete_reservation))
        .route("/api/admin/requests", get(admin::list_requests))
        .route("/api/admin/requests/{id}/accept", post(admin::accept_request))
        .route("/api/admin/requests/{id}/reject", post(admin::reject_request))
        .route("/api/admin/requests/{id}/pricing", put(admin::edit_request_pricing))
        .route("/api/admin/requests/{id}/specs", put(admin::edit_request_specs))
        .route("/api/admin/requests/{id}", delete(admin::delete_request))
        .route("/api/admin/leads", get(admin::list_leads))
        .route("/api/admin/visitors", get(admin::list_visitors))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
