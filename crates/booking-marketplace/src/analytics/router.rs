use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::calendar::parse_reference_time;
use super::service::{Actor, AdminDashboardService, DashboardError};
use crate::marketplace::domain::{UserId, UserRole};
use crate::marketplace::store::MarketplaceStore;

/// Role of the authenticated caller, set by the gateway after token checks.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Router builder exposing the admin dashboard endpoints.
pub fn dashboard_router<S>(service: Arc<AdminDashboardService<S>>) -> Router
where
    S: MarketplaceStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/admin/dashboard/advanced",
            get(advanced_handler::<S>),
        )
        .route("/api/v1/admin/ping", get(ping_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    /// Reference instant for every window; defaults to the current time.
    #[serde(default)]
    pub(crate) now: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActorError {
    #[error("missing x-actor-role header")]
    MissingRole,
    #[error("unrecognized caller role '{0}'")]
    InvalidRole(String),
    #[error("invalid caller id '{0}'")]
    InvalidId(String),
}

pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ActorError> {
    let raw_role = headers
        .get(ACTOR_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(ActorError::MissingRole)?;
    let role =
        UserRole::parse(raw_role).ok_or_else(|| ActorError::InvalidRole(raw_role.to_string()))?;

    let user_id = match headers.get(ACTOR_ID_HEADER) {
        Some(value) => {
            let raw = value.to_str().unwrap_or_default();
            let id = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ActorError::InvalidId(raw.to_string()))?;
            Some(UserId(id))
        }
        None => None,
    };

    Ok(Actor { user_id, role })
}

pub(crate) async fn advanced_handler<S>(
    State(service): State<Arc<AdminDashboardService<S>>>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(error) => return error_response(StatusCode::UNAUTHORIZED, error.to_string()),
    };

    let now = match query.now.as_deref() {
        Some(raw) => match parse_reference_time(raw) {
            Ok(now) => now,
            Err(reason) => {
                return error_response(StatusCode::BAD_REQUEST, format!("invalid 'now': {reason}"))
            }
        },
        None => Utc::now(),
    };

    match service.advanced(&actor, now) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => dashboard_error_response(error),
    }
}

pub(crate) async fn ping_handler<S>(
    State(service): State<Arc<AdminDashboardService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(error) => return error_response(StatusCode::UNAUTHORIZED, error.to_string()),
    };

    match service.admin_check(&actor) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => dashboard_error_response(error),
    }
}

fn dashboard_error_response(error: DashboardError) -> Response {
    let status = match error {
        DashboardError::Forbidden { .. } => StatusCode::FORBIDDEN,
        DashboardError::Store(_) | DashboardError::Shape(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
