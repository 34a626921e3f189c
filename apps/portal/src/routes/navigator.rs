//! Navigator: the client's location, moved only through guard decisions and session events.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::routes::{guard, DenyReason, GuardDecision, Route};
use crate::session::{SessionEvent, SessionManager};

// A redirect target is always Public or PublicOnly, so real chains stop after one hop.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub from: Route,
    pub to: Route,
    pub reason: DenyReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The session is still loading; nothing was committed.
    Pending,
    /// `route` may render. `redirects` lists the hops taken to get there.
    Render { route: Route, redirects: Vec<Redirect> },
}

pub struct Navigator {
    session: Arc<SessionManager>,
    events: broadcast::Receiver<SessionEvent>,
    location: Route,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(session: Arc<SessionManager>) -> Self {
        let events = session.subscribe();
        Self {
            session,
            events,
            location: Route::DEFAULT,
            history: Vec::new(),
        }
    }

    pub fn location(&self) -> &Route {
        &self.location
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Applies pending session events. An invalidated session replaces the location with login.
    /// Returns the new location when an event moved it.
    pub fn sync(&mut self) -> Option<Route> {
        let mut moved = None;
        loop {
            match self.events.try_recv() {
                Ok(SessionEvent::Invalidated { status }) => {
                    info!("Session ended by backend ({status}); redirecting to {}", Route::LOGIN);
                    self.replace(Route::LOGIN);
                    moved = Some(Route::LOGIN);
                }
                Ok(event) => debug!("Session event: {event:?}"),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Navigator missed {skipped} session events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        moved
    }

    /// Navigates to `location`, following guard redirects. Unknown locations fall back to the default view.
    pub fn navigate(&mut self, location: &str) -> Navigation {
        self.sync();

        let mut redirects = Vec::new();
        let mut route = match Route::parse(location) {
            Some(route) => route,
            None => {
                debug!("No view at {location}; falling back to {}", Route::DEFAULT);
                Route::DEFAULT
            }
        };

        for _ in 0..=MAX_REDIRECTS {
            match guard(&self.session.readiness(), &route) {
                GuardDecision::Pending => return Navigation::Pending,
                GuardDecision::Allow => {
                    if redirects.is_empty() {
                        self.push(route.clone());
                    } else {
                        self.replace(route.clone());
                    }
                    return Navigation::Render { route, redirects };
                }
                GuardDecision::Redirect { to, reason } => {
                    debug!("Guard denied {route} ({reason:?}); redirecting to {to}");
                    redirects.push(Redirect {
                        from: route,
                        to: to.clone(),
                        reason,
                    });
                    route = to;
                }
            }
        }

        warn!("Redirect limit reached at {route}; staying on {}", self.location);
        Navigation::Render {
            route: self.location.clone(),
            redirects,
        }
    }

    fn push(&mut self, route: Route) {
        let previous = std::mem::replace(&mut self.location, route);
        self.history.push(previous);
    }

    fn replace(&mut self, route: Route) {
        self.location = route;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;
    use crate::models::user::AuthResponse;
    use crate::session::{Identity, MemorySessionStore, Role};
    use uuid::Uuid;

    fn session_with(store: MemorySessionStore) -> Arc<SessionManager> {
        let manager = Arc::new(SessionManager::new(Arc::new(store)));
        manager.init().unwrap();
        manager
    }

    fn cached(role: Role) -> MemorySessionStore {
        MemorySessionStore::with_session(
            "jwt",
            Identity {
                user_id: Uuid::new_v4(),
                email: "someone@example.com".to_string(),
                role,
            },
        )
    }

    #[test]
    fn test_pending_before_init() {
        let manager = Arc::new(SessionManager::new(Arc::new(MemorySessionStore::new())));
        let mut nav = Navigator::new(manager);
        assert_eq!(nav.navigate("/jobs"), Navigation::Pending);
        assert_eq!(nav.location(), &Route::Home);
    }

    #[test]
    fn test_job_seeker_denied_recruiter_view() {
        let mut nav = Navigator::new(session_with(cached(Role::JobSeeker)));
        let outcome = nav.navigate("/recruiter/jobs");
        assert_eq!(
            outcome,
            Navigation::Render {
                route: Route::Home,
                redirects: vec![Redirect {
                    from: Route::RecruiterJobs,
                    to: Route::Home,
                    reason: DenyReason::WrongRole,
                }],
            }
        );
        assert_eq!(nav.location(), &Route::Home);
    }

    #[test]
    fn test_cached_recruiter_renders_without_network() {
        let mut nav = Navigator::new(session_with(cached(Role::Recruiter)));
        assert!(matches!(
            nav.navigate("/recruiter/dashboard"),
            Navigation::Render { route: Route::RecruiterDashboard, ref redirects } if redirects.is_empty()
        ));
        assert_eq!(nav.history(), &[Route::Home]);
    }

    #[test]
    fn test_anonymous_protected_lands_on_login() {
        let mut nav = Navigator::new(session_with(MemorySessionStore::new()));
        let Navigation::Render { route, redirects } = nav.navigate("/jobs") else {
            panic!("expected a render");
        };
        assert_eq!(route, Route::Login);
        assert_eq!(redirects[0].reason, DenyReason::NotAuthenticated);
    }

    #[test]
    fn test_login_form_skipped_when_signed_in() {
        let mut nav = Navigator::new(session_with(cached(Role::JobSeeker)));
        let Navigation::Render { route, redirects } = nav.navigate("/login") else {
            panic!("expected a render");
        };
        assert_eq!(route, Route::Home);
        assert_eq!(redirects[0].reason, DenyReason::AlreadyAuthenticated);
    }

    #[test]
    fn test_unknown_path_falls_back_home() {
        let mut nav = Navigator::new(session_with(MemorySessionStore::new()));
        assert!(matches!(
            nav.navigate("/nowhere"),
            Navigation::Render { route: Route::Home, .. }
        ));
    }

    #[test]
    fn test_invalidation_event_moves_to_login() {
        let manager = session_with(cached(Role::Recruiter));
        let mut nav = Navigator::new(Arc::clone(&manager));
        nav.navigate("/recruiter/jobs");

        // What the gateway does on a 401.
        manager.store().clear().unwrap();
        manager
            .event_sender()
            .send(SessionEvent::Invalidated { status: 401 })
            .unwrap();

        assert_eq!(nav.sync(), Some(Route::Login));
        assert_eq!(nav.location(), &Route::Login);
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_login_then_dashboard() -> Result<(), ClientError> {
        let manager = session_with(MemorySessionStore::new());
        let mut nav = Navigator::new(Arc::clone(&manager));
        assert!(matches!(nav.navigate("/login"), Navigation::Render { route: Route::Login, .. }));

        manager.establish(&AuthResponse {
            token: "jwt".to_string(),
            token_type: "Bearer".to_string(),
            user_id: Uuid::new_v4(),
            email: "new@example.com".to_string(),
            role: Role::JobSeeker,
        })?;

        assert!(matches!(
            nav.navigate("/jobseeker/dashboard"),
            Navigation::Render { route: Route::JobSeekerDashboard, .. }
        ));
        assert_eq!(nav.sync(), None);
        Ok(())
    }
}
