//! Credential exchange. A successful response is persisted and logged in before returning.

use std::str::FromStr;

use reqwest::Method;
use tracing::info;

use crate::errors::ClientError;
use crate::gateway::AuthGateway;
use crate::helpers::{is_valid_email, is_valid_password, MIN_PASSWORD_LEN};
use crate::models::user::{AuthResponse, LoginRequest, RegisterRequest};
use crate::session::{Identity, Role, SessionManager};

/// Which login endpoint to use. The role-specific ones reject accounts of the other role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginPortal {
    #[default]
    General,
    Recruiter,
    JobSeeker,
}

impl LoginPortal {
    fn path(&self) -> &'static str {
        match self {
            LoginPortal::General => "/auth/login",
            LoginPortal::Recruiter => "/auth/recruiter/login",
            LoginPortal::JobSeeker => "/auth/jobseeker/login",
        }
    }
}

impl FromStr for LoginPortal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "any" | "general" => Ok(LoginPortal::General),
            "recruiter" => Ok(LoginPortal::Recruiter),
            "jobseeker" | "seeker" => Ok(LoginPortal::JobSeeker),
            other => Err(format!("unknown login portal '{other}'")),
        }
    }
}

pub async fn login(
    gateway: &AuthGateway,
    session: &SessionManager,
    portal: LoginPortal,
    request: &LoginRequest,
) -> Result<Identity, ClientError> {
    if !is_valid_email(&request.email) {
        return Err(ClientError::Validation("Please enter a valid email address".to_string()));
    }
    if request.password.is_empty() {
        return Err(ClientError::Validation("Password is required".to_string()));
    }

    let response: AuthResponse = gateway
        .execute_public(gateway.request(Method::POST, portal.path()).json(request))
        .await?;

    info!("Credential exchange succeeded for {}", response.email);
    session.establish(&response)
}

pub async fn register(
    gateway: &AuthGateway,
    session: &SessionManager,
    request: &RegisterRequest,
) -> Result<Identity, ClientError> {
    validate_registration(request)?;

    let response: AuthResponse = gateway
        .execute_public(gateway.request(Method::POST, "/auth/register").json(request))
        .await?;

    info!("Registered {} as {}", response.email, response.role);
    session.establish(&response)
}

pub fn logout(session: &SessionManager) -> Result<(), ClientError> {
    session.logout()
}

fn validate_registration(request: &RegisterRequest) -> Result<(), ClientError> {
    let invalid = |msg: &str| -> Result<(), ClientError> {
        Err(ClientError::Validation(msg.to_string()))
    };

    if !is_valid_email(&request.email) {
        return invalid("Please enter a valid email address");
    }
    if !is_valid_password(&request.password) {
        return Err(ClientError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let filled = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
    match request.role {
        None => invalid("Please choose a role"),
        Some(Role::JobSeeker) if !filled(&request.first_name) || !filled(&request.last_name) => {
            invalid("First and last name are required")
        }
        Some(Role::Recruiter) if !filled(&request.company_name) => invalid("Company name is required"),
        Some(Role::Admin) => invalid("Admin accounts cannot be self-registered"),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, SessionStore};
    use crate::test_support::{client_for, spawn_backend, unused_base_url};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use uuid::Uuid;

    const USER_ID: &str = "6f1c2a52-0d5e-4c55-9d53-3b0c3f3b7a10";

    fn backend() -> Router {
        Router::new()
            .route(
                "/auth/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "correct-horse" {
                        Ok(Json(json!({
                            "token": "jwt-login",
                            "type": "Bearer",
                            "userId": USER_ID,
                            "email": body["email"],
                            "role": "JOB_SEEKER"
                        })))
                    } else {
                        Err(StatusCode::UNAUTHORIZED)
                    }
                }),
            )
            .route(
                "/auth/recruiter/login",
                post(|| async {
                    Json(json!({
                        "token": "jwt-recruiter",
                        "userId": USER_ID,
                        "email": "rita@acme.test",
                        "role": "RECRUITER"
                    }))
                }),
            )
            .route(
                "/auth/register",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "token": "jwt-new",
                        "userId": USER_ID,
                        "email": body["email"],
                        "role": body["role"]
                    }))
                }),
            )
    }

    fn credentials(password: &str) -> LoginRequest {
        LoginRequest {
            email: "sam@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_session_and_logs_in() {
        let base = spawn_backend(backend()).await;
        let store = Arc::new(MemorySessionStore::new());
        let (session, gateway) = client_for(&base, store.clone());

        let identity = login(&gateway, &session, LoginPortal::General, &credentials("correct-horse"))
            .await
            .unwrap();

        assert_eq!(identity.user_id, Uuid::parse_str(USER_ID).unwrap());
        assert_eq!(store.get_token().unwrap().as_deref(), Some("jwt-login"));
        assert_eq!(store.get_user().unwrap(), Some(identity));
        assert!(session.is_authenticated());
        assert!(session.is_job_seeker());
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let base = spawn_backend(backend()).await;
        let store = Arc::new(MemorySessionStore::new());
        let (session, gateway) = client_for(&base, store.clone());

        let err = login(&gateway, &session, LoginPortal::General, &credentials("nope"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidCredentials));
        assert!(store.get_token().unwrap().is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_recruiter_portal_uses_its_endpoint() {
        let base = spawn_backend(backend()).await;
        let (session, gateway) = client_for(&base, Arc::new(MemorySessionStore::new()));

        login(&gateway, &session, LoginPortal::Recruiter, &credentials("whatever"))
            .await
            .unwrap();
        assert!(session.is_recruiter());
    }

    #[tokio::test]
    async fn test_register_then_logout() {
        let base = spawn_backend(backend()).await;
        let store = Arc::new(MemorySessionStore::new());
        let (session, gateway) = client_for(&base, store.clone());

        let request = RegisterRequest {
            email: "new@acme.test".to_string(),
            password: "s3cret!".to_string(),
            role: Some(Role::Recruiter),
            company_name: Some("Acme".to_string()),
            ..Default::default()
        };
        let identity = register(&gateway, &session, &request).await.unwrap();
        assert_eq!(identity.role, Role::Recruiter);
        assert_eq!(store.get_token().unwrap().as_deref(), Some("jwt-new"));

        logout(&session).unwrap();
        assert!(store.get_token().unwrap().is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_backend() {
        // Nothing listens here; a request would surface as ClientError::Http.
        let base = unused_base_url().await;
        let (session, gateway) = client_for(&base, Arc::new(MemorySessionStore::new()));

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        };
        assert!(matches!(
            login(&gateway, &session, LoginPortal::General, &bad_email).await,
            Err(ClientError::Validation(_))
        ));

        let short_password = RegisterRequest {
            email: "a@b.co".to_string(),
            password: "12345".to_string(),
            role: Some(Role::JobSeeker),
            ..Default::default()
        };
        assert!(matches!(
            register(&gateway, &session, &short_password).await,
            Err(ClientError::Validation(msg)) if msg.contains("at least 6")
        ));
    }

    #[test]
    fn test_registration_requires_role_specific_fields() {
        let mut request = RegisterRequest {
            email: "a@b.co".to_string(),
            password: "123456".to_string(),
            role: Some(Role::JobSeeker),
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert!(validate_registration(&request).is_err());

        request.last_name = Some("Lovelace".to_string());
        assert!(validate_registration(&request).is_ok());

        request.role = Some(Role::Recruiter);
        assert!(validate_registration(&request).is_err());

        request.role = None;
        assert!(validate_registration(&request).is_err());

        request.role = Some(Role::Admin);
        assert!(validate_registration(&request).is_err());
    }

    #[test]
    fn test_login_portal_from_str() {
        assert_eq!("recruiter".parse::<LoginPortal>(), Ok(LoginPortal::Recruiter));
        assert_eq!("job-seeker".parse::<LoginPortal>(), Ok(LoginPortal::JobSeeker));
        assert_eq!("any".parse::<LoginPortal>(), Ok(LoginPortal::General));
        assert!("admin".parse::<LoginPortal>().is_err());
    }
}
