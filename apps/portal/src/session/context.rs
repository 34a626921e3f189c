//! Session Context: the in-memory session the rest of the client reads.
//!
//! `SessionManager` is constructed once in `main` and shared by `Arc`; nothing here is global.
//! Memory and store are two copies of the same session. Every mutator writes both, and every
//! read re-checks the store so a session dropped elsewhere (the gateway, another process)
//! is reflected before the answer is returned.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::errors::ClientError;
use crate::models::user::AuthResponse;
use crate::session::{Identity, Readiness, Role, SessionEvent, SessionStore};

const EVENT_CHANNEL_CAPACITY: usize = 32;

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    state: RwLock<Readiness>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            state: RwLock::new(Readiness::Loading),
            events,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// Sender shared with the gateway so invalidations reach the same subscribers.
    pub fn event_sender(&self) -> broadcast::Sender<SessionEvent> {
        self.events.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Reads the store once and leaves `Loading`. Later calls return the current state untouched.
    /// Never touches the network: a cached identity is trusted until the backend says otherwise.
    pub fn init(&self) -> Result<Readiness, ClientError> {
        let mut state = self.state.write();
        if *state != Readiness::Loading {
            return Ok(state.clone());
        }

        *state = match self.store.get_token()? {
            Some(_) => match self.store.get_user()? {
                Some(identity) => {
                    info!("Restored session for {} ({})", identity.email, identity.role);
                    Readiness::Authenticated(identity)
                }
                None => {
                    warn!("Stored token has no cached identity; discarding it");
                    self.store.clear()?;
                    Readiness::Anonymous
                }
            },
            None => {
                debug!("No stored session");
                Readiness::Anonymous
            }
        };

        Ok(state.clone())
    }

    /// Current readiness, reconciled against the store first.
    pub fn readiness(&self) -> Readiness {
        let mut state = self.state.write();
        if let Readiness::Authenticated(current) = &*state {
            match self.stored_identity() {
                Ok(None) => {
                    debug!("Store no longer holds a session; dropping in-memory identity");
                    *state = Readiness::Anonymous;
                }
                Ok(Some(stored)) if stored != *current => {
                    debug!("Store holds a different identity ({}); adopting it", stored.email);
                    *state = Readiness::Authenticated(stored);
                }
                Ok(Some(_)) => {}
                Err(e) => warn!("Could not reconcile session with store: {e}"),
            }
        }
        state.clone()
    }

    /// Token and identity only count when both are stored.
    fn stored_identity(&self) -> Result<Option<Identity>, ClientError> {
        if self.store.get_token()?.is_none() {
            return Ok(None);
        }
        self.store.get_user()
    }

    /// Records the identity for a token the calling flow has already persisted.
    pub fn login(&self, identity: Identity) -> Result<(), ClientError> {
        if self.store.get_token()?.is_none() {
            return Err(ClientError::MissingToken);
        }
        self.store.set_user(&identity)?;
        *self.state.write() = Readiness::Authenticated(identity.clone());

        info!("Logged in as {} ({})", identity.email, identity.role);
        let _ = self.events.send(SessionEvent::LoggedIn(identity));
        Ok(())
    }

    /// Persists the token from a credential exchange, then logs the identity in.
    pub fn establish(&self, auth: &AuthResponse) -> Result<Identity, ClientError> {
        if auth.token.trim().is_empty() {
            return Err(ClientError::MissingToken);
        }
        let identity = auth.identity();
        self.store.set_token(&auth.token)?;
        // A new token must never sit next to a previous session's identity.
        if let Err(e) = self.login(identity.clone()) {
            warn!("Could not record identity for new token, clearing session: {e}");
            if let Err(clear_err) = self.store.clear() {
                warn!("Failed to clear half-written session: {clear_err}");
            }
            *self.state.write() = Readiness::Anonymous;
            return Err(e);
        }
        Ok(identity)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        *self.state.write() = Readiness::Anonymous;

        info!("Logged out");
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.readiness().identity().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.current_user().is_some_and(|identity| identity.role == role)
    }

    pub fn is_job_seeker(&self) -> bool {
        self.has_role(Role::JobSeeker)
    }

    pub fn is_recruiter(&self) -> bool {
        self.has_role(Role::Recruiter)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: format!("{}@example.com", role.as_str().to_lowercase()),
            role,
        }
    }

    fn auth_response(role: Role) -> AuthResponse {
        let id = identity(role);
        AuthResponse {
            token: "jwt-abc".to_string(),
            token_type: "Bearer".to_string(),
            user_id: id.user_id,
            email: id.email,
            role: id.role,
        }
    }

    /// Counts store reads so tests can prove `init` reads exactly once.
    #[derive(Default)]
    struct CountingStore {
        inner: MemorySessionStore,
        token_reads: AtomicUsize,
        reject_user_writes: bool,
    }

    impl SessionStore for CountingStore {
        fn get_token(&self) -> Result<Option<String>, ClientError> {
            self.token_reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_token()
        }
        fn set_token(&self, token: &str) -> Result<(), ClientError> {
            self.inner.set_token(token)
        }
        fn get_user(&self) -> Result<Option<Identity>, ClientError> {
            self.inner.get_user()
        }
        fn set_user(&self, identity: &Identity) -> Result<(), ClientError> {
            if self.reject_user_writes {
                return Err(ClientError::Storage(std::io::Error::other("disk full")));
            }
            self.inner.set_user(identity)
        }
        fn clear(&self) -> Result<bool, ClientError> {
            self.inner.clear()
        }
    }

    #[test]
    fn test_failed_identity_write_leaves_no_mixed_session() {
        let previous = identity(Role::Recruiter);
        let inner = MemorySessionStore::new();
        inner.set_token("old-jwt").unwrap();
        inner.set_user(&previous).unwrap();
        let store = Arc::new(CountingStore {
            inner,
            reject_user_writes: true,
            ..Default::default()
        });
        let manager = SessionManager::new(store.clone());
        manager.init().unwrap();

        let err = manager.establish(&auth_response(Role::JobSeeker)).unwrap_err();
        assert!(matches!(err, ClientError::Storage(_)));
        assert_eq!(store.get_token().unwrap(), None);
        assert_eq!(store.get_user().unwrap(), None);
        assert_eq!(manager.readiness(), Readiness::Anonymous);
    }

    #[test]
    fn test_readiness_starts_loading() {
        let manager = SessionManager::new(Arc::new(MemorySessionStore::new()));
        assert_eq!(manager.readiness(), Readiness::Loading);
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_boot_without_token_is_anonymous() {
        let manager = SessionManager::new(Arc::new(MemorySessionStore::new()));
        assert_eq!(manager.init().unwrap(), Readiness::Anonymous);
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_boot_with_cached_recruiter_is_authenticated() {
        let cached = identity(Role::Recruiter);
        let store = MemorySessionStore::with_session("jwt", cached.clone());
        let manager = SessionManager::new(Arc::new(store));

        assert_eq!(manager.init().unwrap(), Readiness::Authenticated(cached));
        assert!(manager.is_recruiter());
        assert!(!manager.is_job_seeker());
    }

    #[test]
    fn test_init_reads_store_once() {
        let store = Arc::new(CountingStore::default());
        let manager = SessionManager::new(store.clone());
        manager.init().unwrap();
        manager.init().unwrap();
        assert_eq!(store.token_reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_token_without_identity_is_discarded_at_boot() {
        let store = Arc::new(MemorySessionStore::new());
        store.set_token("orphan").unwrap();
        let manager = SessionManager::new(store.clone());

        assert_eq!(manager.init().unwrap(), Readiness::Anonymous);
        assert!(store.get_token().unwrap().is_none());
    }

    #[test]
    fn test_establish_writes_store_and_memory() {
        let store = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(store.clone());
        manager.init().unwrap();

        let auth = auth_response(Role::JobSeeker);
        let identity = manager.establish(&auth).unwrap();

        assert_eq!(store.get_token().unwrap().as_deref(), Some("jwt-abc"));
        assert_eq!(store.get_user().unwrap(), Some(identity.clone()));
        assert_eq!(manager.current_user(), Some(identity));
        assert!(manager.is_authenticated());
        assert!(manager.is_job_seeker());
    }

    #[test]
    fn test_login_requires_persisted_token() {
        let manager = SessionManager::new(Arc::new(MemorySessionStore::new()));
        manager.init().unwrap();
        let err = manager.login(identity(Role::Recruiter)).unwrap_err();
        assert!(matches!(err, ClientError::MissingToken));
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_establish_rejects_blank_token() {
        let manager = SessionManager::new(Arc::new(MemorySessionStore::new()));
        let mut auth = auth_response(Role::Recruiter);
        auth.token = "  ".to_string();
        assert!(matches!(
            manager.establish(&auth),
            Err(ClientError::MissingToken)
        ));
    }

    #[test]
    fn test_logout_clears_store_and_memory() {
        let store = Arc::new(MemorySessionStore::with_session("jwt", identity(Role::Recruiter)));
        let manager = SessionManager::new(store.clone());
        manager.init().unwrap();

        manager.logout().unwrap();

        assert!(store.get_token().unwrap().is_none());
        assert!(store.get_user().unwrap().is_none());
        assert!(!manager.is_authenticated());
        assert_eq!(manager.readiness(), Readiness::Anonymous);
    }

    #[test]
    fn test_external_clear_is_reconciled_on_next_read() {
        let store = Arc::new(MemorySessionStore::with_session("jwt", identity(Role::JobSeeker)));
        let manager = SessionManager::new(store.clone());
        manager.init().unwrap();
        assert!(manager.is_authenticated());

        store.clear().unwrap();

        assert!(!manager.is_authenticated());
        assert_eq!(manager.readiness(), Readiness::Anonymous);
    }

    #[test]
    fn test_identity_replaced_elsewhere_is_adopted() {
        let store = Arc::new(MemorySessionStore::with_session("jwt", identity(Role::JobSeeker)));
        let manager = SessionManager::new(store.clone());
        manager.init().unwrap();

        let other = identity(Role::Recruiter);
        store.set_token("jwt-2").unwrap();
        store.set_user(&other).unwrap();

        assert_eq!(manager.current_user(), Some(other));
        assert!(manager.is_recruiter());
    }

    #[test]
    fn test_events_follow_login_and_logout() {
        let manager = SessionManager::new(Arc::new(MemorySessionStore::new()));
        let mut rx = manager.subscribe();
        manager.init().unwrap();

        let identity = manager.establish(&auth_response(Role::Admin)).unwrap();
        manager.logout().unwrap();

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::LoggedIn(identity));
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::LoggedOut);
        assert!(!manager.is_admin());
    }
}
