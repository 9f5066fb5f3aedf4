//! HTTP API application wiring (Axum router + policy layers).
//!
//! - `services.rs`: catalog, resolver, guard, access controller, sessions
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};

use tenantry_auth::{Role, Surface};
use tower::ServiceBuilder;

use crate::middleware::{self, AccessState};
use services::AppServices;

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let access = |surface: Surface| {
        axum::middleware::from_fn_with_state(
            AccessState::new(Arc::clone(&services), surface),
            middleware::access_middleware,
        )
    };
    let guard = || {
        axum::middleware::from_fn_with_state(Arc::clone(&services), middleware::subscription_guard)
    };

    // Signed-in account surfaces; still reachable with an expired
    // subscription so the UI can show the degraded profile and renewal prompts.
    let account = Router::new()
        .route("/me/session", get(routes::me::session_state))
        .route("/me/activity", post(routes::me::activity))
        .route("/me/entitlements", get(routes::me::entitlements))
        .route("/logout", post(routes::me::logout))
        .route_layer(access(Surface::open("account")));

    // Plan-gated queries: subscription must be present and unexpired.
    // Access runs first so the guard always sees a principal.
    let workspace = Router::new()
        .route("/me/features/:name", get(routes::me::feature))
        .route("/me/limits/:name", get(routes::me::limit))
        .route_layer(
            ServiceBuilder::new()
                .layer(access(Surface::open("workspace")))
                .layer(guard()),
        );

    let reports = Router::new()
        .route("/reports/financial", get(routes::reports::financial))
        .route_layer(
            ServiceBuilder::new()
                .layer(access(Surface::restricted_to(
                    "reports",
                    [Role::OWNER, Role::MANAGER],
                )))
                .layer(guard()),
        );

    let admin = Router::new()
        .route("/admin/overview", get(routes::admin::overview))
        .route_layer(access(Surface::restricted_to("admin", [Role::ADMIN])));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/plans", get(routes::plans::list))
        .route("/plans/:id", get(routes::plans::get))
        .merge(account)
        .merge(workspace)
        .merge(reports)
        .merge(admin)
        .layer(Extension(services))
}
