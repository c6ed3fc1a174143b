use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

const REFRESH_COOKIE: &str = "rentora_refresh";

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Extractor guarding the admin surface: a valid Bearer access token or 401.
pub struct OperatorIdentity(pub String);

impl FromRequestParts<AppState> for OperatorIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        state
            .tokens
            .verify_access(token, Utc::now())
            .map(OperatorIdentity)
            .ok_or_else(|| ApiError::Unauthorized("invalid or expired token".to_string()))
    }
}

/// Verify the operator credentials, hand back a short-lived access token and
/// set the rotating HTTP-only refresh cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let auth = &state.config.auth;
    let email_matches = body.email.trim().eq_ignore_ascii_case(&auth.operator_email);
    let password_matches = body.password == auth.operator_password.expose_secret();

    if !email_matches || !password_matches {
        tracing::info!(
            event_name = "auth.login_refused",
            "operator login refused for bad credentials"
        );
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }

    let now = Utc::now();
    state.tokens.prune_sessions(now, chrono::Duration::days(30));
    let issued = state.tokens.issue(&auth.operator_email, now);
    tracing::info!(event_name = "auth.login_succeeded", "operator logged in");

    Ok((
        jar.add(refresh_cookie(issued.refresh_token.clone())),
        Json(TokenResponse {
            access_token: issued.access_token,
            expires_at: issued.access_expires_at,
        }),
    ))
}

/// Rotate the refresh token: the presented cookie value is consumed, a new
/// one is set, and a fresh access token is returned.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let presented = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("missing refresh cookie".to_string()))?;

    let issued = state
        .tokens
        .refresh(&presented, Utc::now())
        .ok_or_else(|| ApiError::Unauthorized("refresh token is no longer valid".to_string()))?;

    Ok((
        jar.add(refresh_cookie(issued.refresh_token.clone())),
        Json(TokenResponse {
            access_token: issued.access_token,
            expires_at: issued.access_expires_at,
        }),
    ))
}

/// Revoke the refresh token and clear its cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        state.tokens.revoke(cookie.value());
    }
    tracing::info!(event_name = "auth.logout", "operator logged out");

    let removal = Cookie::build((REFRESH_COOKIE, "")).path("/api/auth").build();
    (jar.remove(removal), Json(serde_json::json!({ "status": "logged_out" })))
}

fn refresh_cookie(value: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, value))
        .path("/api/auth")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}
