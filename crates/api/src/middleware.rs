use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use tenantry_auth::{AccessDecision, Surface};
use tenantry_billing::GuardDecision;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Per-route-group state for [`access_middleware`].
#[derive(Clone)]
pub struct AccessState {
    pub services: Arc<AppServices>,
    pub surface: Arc<Surface>,
}

impl AccessState {
    pub fn new(services: Arc<AppServices>, surface: Surface) -> Self {
        Self {
            services,
            surface: Arc::new(surface),
        }
    }
}

/// Resolve the session behind the bearer token and apply the surface's role
/// policy before the handler runs.
pub async fn access_middleware(
    State(state): State<AccessState>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = extract_bearer(req.headers()).and_then(|token| {
        state
            .services
            .sessions
            .principal(token)
            .map(|principal| PrincipalContext::new(token, principal))
    });

    let decision = state
        .services
        .access
        .evaluate(context.as_ref().map(PrincipalContext::principal), &state.surface);

    match (decision, context) {
        (AccessDecision::Allow(_), Some(context)) => {
            req.extensions_mut().insert(context);
            next.run(req).await
        }
        (AccessDecision::Deny { denial, .. }, _) => errors::denial_response(denial),
        // An allow without a principal cannot come out of the controller.
        (AccessDecision::Allow(_), None) => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Reject requests whose principal has no usable subscription. Must run
/// after [`access_middleware`].
pub async fn subscription_guard(
    State(services): State<Arc<AppServices>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(context) = req.extensions().get::<PrincipalContext>() else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    match services.guard.authorize(context.principal(), Utc::now()) {
        GuardDecision::Continue => next.run(req).await,
        GuardDecision::Reject(rejection) => errors::rejection_response(rejection),
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer  abc "));
        assert_eq!(extract_bearer(&headers), Some("abc"));

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);
    }
}
