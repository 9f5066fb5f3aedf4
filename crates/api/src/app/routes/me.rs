//! The signed-in caller's session, entitlement, and plan-gated queries.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;

use crate::app::{errors, services::AppServices};
use crate::context::PrincipalContext;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub usage: u64,
}

/// GET /me/session - Idle-timeout status and warning countdown
pub async fn session_state(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.sessions.state(ctx.token()) {
        Some(state) => (StatusCode::OK, Json(state)).into_response(),
        None => errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "session has ended"),
    }
}

/// POST /me/activity - User activity; dismisses a pending logout warning
pub async fn activity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> StatusCode {
    if services.sessions.touch(ctx.token()) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::UNAUTHORIZED
    }
}

/// POST /logout - Tear down credentials and cancel the session timer
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> axum::response::Response {
    services.sessions.close(ctx.token());
    tracing::info!(user_id = %ctx.principal().id, "logged out");
    (
        StatusCode::OK,
        Json(serde_json::json!({ "redirectTo": services.access.entry_route() })),
    )
        .into_response()
}

/// GET /me/entitlements - Effective plan, degraded when the subscription expired
pub async fn entitlements(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.resolver.resolve_for(ctx.principal(), Utc::now()) {
        Ok(entitlement) => (StatusCode::OK, Json(entitlement)).into_response(),
        Err(e) => errors::entitlement_error_response(e),
    }
}

/// GET /me/features/:name - Whether the caller's plan includes a feature
pub async fn feature(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.resolver.resolve_for(ctx.principal(), Utc::now()) {
        Ok(entitlement) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "feature": name,
                "enabled": entitlement.has_feature(&name),
            })),
        )
            .into_response(),
        Err(e) => errors::entitlement_error_response(e),
    }
}

/// GET /me/limits/:name?usage=N - Whether one more unit fits under the plan limit
pub async fn limit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(name): Path<String>,
    Query(query): Query<LimitQuery>,
) -> axum::response::Response {
    match services.resolver.resolve_for(ctx.principal(), Utc::now()) {
        Ok(entitlement) => {
            let check = entitlement.check_limit(&name, query.usage);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "limit": name,
                    "usage": query.usage,
                    "allowed": check.allowed,
                    "remaining": check.remaining,
                })),
            )
                .into_response()
        }
        Err(e) => errors::entitlement_error_response(e),
    }
}
