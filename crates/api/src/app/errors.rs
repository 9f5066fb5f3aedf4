use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tenantry_auth::{Denial, DenialCode};
use tenantry_billing::{EntitlementDenied, EntitlementError, Rejection};

use crate::authz::GateDenial;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Access-controller denial; the body tells the client where to navigate.
pub fn denial_response(denial: Denial) -> axum::response::Response {
    let (status, code) = match denial.code {
        DenialCode::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
        DenialCode::Unauthorized => (StatusCode::FORBIDDEN, "unauthorized"),
    };
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": denial.message,
            "redirectTo": denial.redirect_to,
        })),
    )
        .into_response()
}

pub fn rejection_response(rejection: Rejection) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, rejection.code.as_str(), rejection.message)
}

pub fn entitlement_error_response(err: EntitlementError) -> axum::response::Response {
    match err {
        EntitlementError::MissingSubscription => {
            json_error(StatusCode::FORBIDDEN, "subscription_missing", err.to_string())
        }
        // Corrupt billing state: surface it as a server fault, never as a
        // plan the user did not pay for.
        EntitlementError::UnknownPlan(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "unknown_plan", err.to_string())
        }
    }
}

pub fn entitlement_denied_response(err: EntitlementDenied) -> axum::response::Response {
    let code = match err {
        EntitlementDenied::FeatureNotInPlan { .. } => "feature_not_in_plan",
        EntitlementDenied::LimitReached { .. } => "limit_reached",
    };
    json_error(StatusCode::FORBIDDEN, code, err.to_string())
}

pub fn gate_denial_response(denial: GateDenial) -> axum::response::Response {
    match denial {
        GateDenial::Permission(e) => json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()),
        GateDenial::Entitlement(e) => entitlement_denied_response(e),
    }
}
