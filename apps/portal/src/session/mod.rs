//! Session model: identity, role and the session lifecycle events.
//!
//! `store` persists the token + identity pair across runs.
//! `context` holds the in-memory view of it (`SessionManager`) and publishes changes.

pub mod context;
pub mod store;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use context::SessionManager;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

/// Platform role carried by an identity. Wire form is SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    JobSeeker,
    Recruiter,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "JOB_SEEKER",
            Role::Recruiter => "RECRUITER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "JOB_SEEKER" | "JOBSEEKER" => Ok(Role::JobSeeker),
            "RECRUITER" => Ok(Role::Recruiter),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// The authenticated user as cached alongside the token.
/// Replaced wholesale on the next login, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Session readiness as seen by the route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// The store has not been read yet.
    Loading,
    Anonymous,
    Authenticated(Identity),
}

impl Readiness {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Readiness::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Published on every session transition. The navigator and the CLI shell subscribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(Identity),
    LoggedOut,
    /// The backend rejected a request with this status and the stored session was dropped.
    Invalidated { status: u16 },
}
