use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use tenantry_auth::permissions::known;

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

const FINANCIAL_REPORTS: &str = "rapportsFinanciers";

/// GET /reports/financial - Role-restricted, permission-checked, and plan-gated
pub async fn financial(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> axum::response::Response {
    let entitlement = match services.resolver.resolve_for(ctx.principal(), Utc::now()) {
        Ok(e) => e,
        Err(e) => return errors::entitlement_error_response(e),
    };

    if let Err(denial) = authz::authorize_gated(
        ctx.principal(),
        &known::REPORTS_READ,
        &entitlement,
        FINANCIAL_REPORTS,
    ) {
        return errors::gate_denial_response(denial);
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "report": "financial",
            "plan": entitlement.plan.id(),
            "generatedAt": Utc::now(),
        })),
    )
        .into_response()
}
