use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::services::AppServices;

/// GET /admin/overview - Live sessions and plan catalog summary
pub async fn overview(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let plans: Vec<_> = services
        .catalog
        .all()
        .iter()
        .map(|p| p.id().as_str())
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "activeSessions": services.sessions.len(),
            "plans": plans,
            "expiredProfile": services.resolver.expired_profile().id(),
        })),
    )
        .into_response()
}
