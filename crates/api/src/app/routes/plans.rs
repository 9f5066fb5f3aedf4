//! Read-only plan catalog for billing and upgrade screens.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use tenantry_core::PlanId;

use crate::app::{errors, services::AppServices};

/// GET /plans - All plans in display order
pub async fn list(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "plans": services.catalog.all() })),
    )
        .into_response()
}

/// GET /plans/:id - One plan for a comparison or checkout screen
pub async fn get(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let not_found = || errors::json_error(StatusCode::NOT_FOUND, "unknown_plan", format!("no plan named '{id}'"));

    let Ok(plan_id) = PlanId::new(id.as_str()) else {
        return not_found();
    };
    match services.catalog.get(&plan_id) {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(_) => not_found(),
    }
}
