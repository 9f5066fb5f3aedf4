//! Role-based access to guarded surfaces (routes, screens, privileged actions).
//!
//! Every surface evaluation runs through one ordered policy:
//!
//! 1. no authenticated principal → deny, redirect to the entry point
//! 2. a required-role set is declared and the role is not a member:
//!    admin → allow (override), anyone else → deny, redirect to the
//!    unauthorized surface
//! 3. admin with no declared restriction → allow
//! 4. no declared restriction → allow
//!
//! This is independent of plan/feature gating; callers protecting an action
//! that is both role-restricted and feature-gated must require both to allow.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::{Principal, Role};

/// A guarded surface and its declared role restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    name: Cow<'static, str>,
    required_roles: Option<BTreeSet<Role>>,
}

impl Surface {
    /// A surface that declares no role restriction.
    pub fn open(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            required_roles: None,
        }
    }

    /// A surface reachable only by the given roles (admins always pass).
    pub fn restricted_to(
        name: impl Into<Cow<'static, str>>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            name: name.into(),
            required_roles: Some(roles.into_iter().collect()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_roles(&self) -> Option<&BTreeSet<Role>> {
        self.required_roles.as_ref()
    }
}

/// Where the evaluation landed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    Unauthenticated,
    AuthenticatedAdmin,
    AuthenticatedDenied,
    Authenticated,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialCode {
    Unauthenticated,
    Unauthorized,
}

/// Structured, human-readable denial handed back to the routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Denial {
    pub code: DenialCode,
    pub message: String,
    pub redirect_to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(AccessState),
    Deny { state: AccessState, denial: Denial },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow(_))
    }

    pub fn state(&self) -> AccessState {
        match self {
            AccessDecision::Allow(state) => *state,
            AccessDecision::Deny { state, .. } => *state,
        }
    }

    pub fn into_result(self) -> Result<AccessState, Denial> {
        match self {
            AccessDecision::Allow(state) => Ok(state),
            AccessDecision::Deny { denial, .. } => Err(denial),
        }
    }
}

/// Ordered role policy for guarded surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessController {
    entry_route: String,
    unauthorized_route: String,
}

impl Default for AccessController {
    fn default() -> Self {
        Self::new("/login", "/unauthorized")
    }
}

impl AccessController {
    pub fn new(entry_route: impl Into<String>, unauthorized_route: impl Into<String>) -> Self {
        Self {
            entry_route: entry_route.into(),
            unauthorized_route: unauthorized_route.into(),
        }
    }

    pub fn entry_route(&self) -> &str {
        &self.entry_route
    }

    /// Evaluate access to `surface` for the (possibly absent) principal.
    pub fn evaluate(&self, principal: Option<&Principal>, surface: &Surface) -> AccessDecision {
        let Some(principal) = principal else {
            tracing::info!(surface = surface.name(), "unauthenticated access attempt");
            return AccessDecision::Deny {
                state: AccessState::Unauthenticated,
                denial: Denial {
                    code: DenialCode::Unauthenticated,
                    message: "You must sign in to access this page.".to_string(),
                    redirect_to: self.entry_route.clone(),
                },
            };
        };

        if let Some(required) = surface.required_roles() {
            if !required.contains(&principal.role) {
                if principal.is_admin() {
                    return AccessDecision::Allow(AccessState::AuthenticatedAdmin);
                }

                tracing::info!(
                    user_id = %principal.id,
                    role = %principal.role,
                    surface = surface.name(),
                    "role not permitted on surface"
                );
                return AccessDecision::Deny {
                    state: AccessState::AuthenticatedDenied,
                    denial: Denial {
                        code: DenialCode::Unauthorized,
                        message: format!(
                            "Your role '{}' does not allow access to '{}'. Contact an administrator to request access.",
                            principal.role,
                            surface.name()
                        ),
                        redirect_to: self.unauthorized_route.clone(),
                    },
                };
            }
        }

        if principal.is_admin() {
            AccessDecision::Allow(AccessState::AuthenticatedAdmin)
        } else {
            AccessDecision::Allow(AccessState::Authenticated)
        }
    }
}
