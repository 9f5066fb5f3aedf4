//! Policy wiring shared by every request.

use std::sync::Arc;

use thiserror::Error;

use tenantry_auth::AccessController;
use tenantry_billing::{
    CatalogError, EntitlementResolver, PlanCatalog, SubscriptionGuard, UnknownPlan,
};

use crate::config::AppConfig;
use crate::sessions::SessionRegistry;

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("plan catalog failed to load: {0}")]
    Catalog(#[from] CatalogError),

    #[error("expired-subscription profile: {0}")]
    ExpiryPlan(#[from] UnknownPlan),
}

pub struct AppServices {
    pub catalog: Arc<PlanCatalog>,
    pub resolver: EntitlementResolver,
    pub guard: SubscriptionGuard,
    pub access: AccessController,
    pub sessions: SessionRegistry,
}

impl AppServices {
    pub fn from_config(config: &AppConfig) -> Result<Self, ServicesError> {
        let catalog = Arc::new(PlanCatalog::builtin()?);
        let resolver = EntitlementResolver::new(Arc::clone(&catalog), config.expiry_policy.clone())?;

        tracing::info!(
            plans = catalog.all().len(),
            expired_profile = %resolver.expired_profile().id(),
            "policy services ready"
        );

        Ok(Self {
            catalog,
            resolver,
            guard: SubscriptionGuard::new(),
            access: AccessController::new(
                config.entry_route.clone(),
                config.unauthorized_route.clone(),
            ),
            sessions: SessionRegistry::new(config.session_policy),
        })
    }
}
