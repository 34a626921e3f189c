//! Stub backend helpers shared by the in-file test modules.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::gateway::{AuthGateway, InvalidationPolicy};
use crate::session::{MemorySessionStore, SessionManager, SessionStore};

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Session manager + gateway wired the way `main` wires them, over an in-memory store.
pub fn client_for(base_url: &str, store: Arc<MemorySessionStore>) -> (Arc<SessionManager>, AuthGateway) {
    let store: Arc<dyn SessionStore> = store;
    let session = Arc::new(SessionManager::new(Arc::clone(&store)));
    session.init().unwrap();
    let gateway = AuthGateway::new(
        base_url,
        Duration::from_secs(5),
        store,
        session.event_sender(),
        InvalidationPolicy::default(),
    )
    .unwrap();
    (session, gateway)
}
