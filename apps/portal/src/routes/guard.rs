//! Route Authorization Guard: one decision per navigation, computed from readiness alone.

use crate::routes::{Route, RouteRequirement};
use crate::session::Readiness;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No session; the view needs one.
    NotAuthenticated,
    /// Authenticated, but the role is not permitted.
    WrongRole,
    /// The view is an auth form and a session already exists.
    AlreadyAuthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not initialised yet; show a placeholder and decide later.
    Pending,
    Allow,
    Redirect { to: Route, reason: DenyReason },
}

/// Decides whether `route` may render. Holds no state between calls.
pub fn guard(readiness: &Readiness, route: &Route) -> GuardDecision {
    let identity = match readiness {
        Readiness::Loading => return GuardDecision::Pending,
        Readiness::Anonymous => None,
        Readiness::Authenticated(identity) => Some(identity),
    };

    match (route.requirement(), identity) {
        (RouteRequirement::Protected | RouteRequirement::ProtectedByRole(_), None) => {
            GuardDecision::Redirect {
                to: Route::LOGIN,
                reason: DenyReason::NotAuthenticated,
            }
        }
        (RouteRequirement::ProtectedByRole(roles), Some(identity)) if !roles.contains(&identity.role) => {
            GuardDecision::Redirect {
                to: Route::DEFAULT,
                reason: DenyReason::WrongRole,
            }
        }
        (RouteRequirement::PublicOnly, Some(_)) => GuardDecision::Redirect {
            to: Route::DEFAULT,
            reason: DenyReason::AlreadyAuthenticated,
        },
        _ => GuardDecision::Allow,
    }
}
