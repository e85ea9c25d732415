//! HTTP route handlers for the API
//!
//! Every handler converts failures into a `{ "error": ... }` body. Store
//! failures are logged and reported with a generic per-endpoint message.

use super::AppState;
use crate::error::CoreError;
use crate::handlers::{ListParams, ListRequest};
use crate::models::NewCompany;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Map a handler error onto a status code; `context` is the generic 500 message
fn failure(error: CoreError, context: &'static str) -> Response {
    match error {
        CoreError::NotFound(..) => error_response(StatusCode::NOT_FOUND, "Company not found"),
        CoreError::Validation(message) => error_response(StatusCode::BAD_REQUEST, &message),
        other => {
            tracing::error!("{}: {}", context, other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

/// Unwrap a JSON body, answering malformed or mistyped input with a 400
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            Err(error_response(
                StatusCode::BAD_REQUEST,
                "Invalid request body",
            ))
        }
    }
}

// ============================================================================
// Health Check
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ============================================================================
// Company Queries
// ============================================================================

pub async fn get_count(State(state): State<AppState>) -> impl IntoResponse {
    match state.companies.count().await {
        Ok(count) => Json(serde_json::json!({ "count": count })).into_response(),
        Err(e) => failure(e, "Failed to fetch count"),
    }
}

#[derive(Debug, Deserialize)]
pub struct PlacementQuery {
    pub i: Option<String>,
}

pub async fn get_placement(
    State(state): State<AppState>,
    Query(query): Query<PlacementQuery>,
) -> impl IntoResponse {
    let raw_id = query.i.unwrap_or_default();
    match state.companies.get(&raw_id).await {
        Ok(company) => Json(company).into_response(),
        Err(e) => failure(e, "Failed to fetch company data"),
    }
}

pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let request = ListRequest::from_params(params);
    match state.companies.list(request).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => failure(e, "Failed to fetch companies"),
    }
}

// ============================================================================
// Company Mutations
// ============================================================================

pub async fn create_company(
    State(state): State<AppState>,
    payload: Result<Json<NewCompany>, JsonRejection>,
) -> impl IntoResponse {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    match state.companies.create(req).await {
        Ok(company) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "Company created successfully",
                "company": company
            })),
        )
            .into_response(),
        Err(e) => failure(e, "Failed to create company"),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCoordinatorRequest {
    pub coordinator: Option<String>,
}

pub async fn update_coordinator(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCoordinatorRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    match state.companies.update_coordinator(&id, req.coordinator).await {
        Ok(company) => Json(serde_json::json!({
            "message": "Coordinator updated",
            "company": company
        }))
        .into_response(),
        Err(e) => failure(e, "Failed to update coordinator"),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub field: Option<String>,
    pub value: Option<bool>,
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(response) => return response,
    };
    match state.companies.update_status(&id, req.field, req.value).await {
        Ok(company) => Json(serde_json::json!({
            "message": "Status updated",
            "company": company
        }))
        .into_response(),
        Err(e) => failure(e, "Failed to update status"),
    }
}

// ============================================================================
// Coordinator Stats
// ============================================================================

pub async fn get_coordinator_stats(State(state): State<AppState>) -> impl IntoResponse {
    match state.companies.coordinator_stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => failure(e, "Failed to fetch coordinator stats"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_status_codes() {
        let not_found = failure(CoreError::NotFound("Company", "4".to_string()), "ctx");
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid = failure(CoreError::Validation("bad".to_string()), "ctx");
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let store = failure(
            CoreError::Database(rusqlite::Error::InvalidQuery),
            "Failed to fetch count",
        );
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
