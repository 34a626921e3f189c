use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::gateway::AuthGateway;
use crate::session::{FileSessionStore, MemorySessionStore, Readiness, SessionManager, SessionStore};

/// Shared client state handed to every command.
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub gateway: AuthGateway,
}

impl AppState {
    /// Wires store → session → gateway and runs the one-time session read.
    /// `ephemeral` keeps the session in memory for this run only.
    pub fn build(config: Config, ephemeral: bool) -> Result<Self> {
        let store: Arc<dyn SessionStore> = if ephemeral {
            info!("Using an in-memory session store");
            Arc::new(MemorySessionStore::new())
        } else {
            info!("Session file: {}", config.session_file.display());
            Arc::new(FileSessionStore::new(&config.session_file))
        };

        let session = Arc::new(SessionManager::new(Arc::clone(&store)));
        let gateway = AuthGateway::new(
            &config.api_base_url,
            Duration::from_secs(config.http_timeout_secs),
            store,
            session.event_sender(),
            config.invalidation_policy,
        )
        .context("Failed to build HTTP client")?;

        match session.init().context("Failed to read stored session")? {
            Readiness::Authenticated(identity) => {
                info!("Signed in as {} ({})", identity.email, identity.role)
            }
            _ => info!("No active session"),
        }

        Ok(Self {
            config,
            session,
            gateway,
        })
    }
}
