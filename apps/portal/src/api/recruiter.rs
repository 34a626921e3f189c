//! Recruiter endpoints: company profile, job postings and the applicants to them.

use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::ClientError;
use crate::gateway::AuthGateway;
use crate::models::application::{ApplicationStatus, JobApplication};
use crate::models::insights::CandidateSearch;
use crate::models::job::{Job, JobPostRequest};
use crate::models::user::RecruiterProfile;

pub async fn get_profile(gateway: &AuthGateway) -> Result<RecruiterProfile, ClientError> {
    gateway.get("/recruiter/profile").await
}

pub async fn update_profile(
    gateway: &AuthGateway,
    profile: &RecruiterProfile,
) -> Result<RecruiterProfile, ClientError> {
    gateway.put_json("/recruiter/profile", profile).await
}

pub async fn create_job(gateway: &AuthGateway, request: &JobPostRequest) -> Result<Job, ClientError> {
    validate_job_post(request)?;
    let job: Job = gateway.post_json("/recruiter/jobs", request).await?;
    info!("Posted job {} ({})", job.title, job.id);
    Ok(job)
}

pub async fn list_jobs(gateway: &AuthGateway) -> Result<Vec<Job>, ClientError> {
    gateway.get("/recruiter/jobs").await
}

pub async fn update_job(
    gateway: &AuthGateway,
    job_id: Uuid,
    request: &JobPostRequest,
) -> Result<Job, ClientError> {
    validate_job_post(request)?;
    gateway.put_json(&format!("/recruiter/jobs/{job_id}"), request).await
}

pub async fn delete_job(gateway: &AuthGateway, job_id: Uuid) -> Result<Value, ClientError> {
    gateway.delete(&format!("/recruiter/jobs/{job_id}")).await
}

pub async fn job_applications(
    gateway: &AuthGateway,
    job_id: Uuid,
) -> Result<Vec<JobApplication>, ClientError> {
    gateway
        .get(&format!("/recruiter/jobs/{job_id}/applications"))
        .await
}

/// Status travels as a query parameter, not a body.
pub async fn update_application_status(
    gateway: &AuthGateway,
    application_id: Uuid,
    status: ApplicationStatus,
) -> Result<JobApplication, ClientError> {
    gateway
        .put_query(
            &format!("/recruiter/applications/{application_id}/status"),
            &[("status", status.as_str())],
        )
        .await
}

/// Free-text search over the whole candidate pool, ranked by the AI service.
pub async fn search_candidates(gateway: &AuthGateway, query: &str) -> Result<CandidateSearch, ClientError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ClientError::Validation("Describe the candidate you are looking for".to_string()));
    }
    gateway
        .post_json("/recruiter/search-candidates", &json!({ "query": query }))
        .await
}

fn validate_job_post(request: &JobPostRequest) -> Result<(), ClientError> {
    if request.title.trim().is_empty() {
        return Err(ClientError::Validation("Job title is required".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(ClientError::Validation("Job description is required".to_string()));
    }
    if let (Some(min), Some(max)) = (request.salary_min, request.salary_max) {
        if min > max {
            return Err(ClientError::Validation(
                "Minimum salary cannot exceed maximum salary".to_string(),
            ));
        }
    }
    if request.salary_min.is_some_and(|s| s < 0.0) || request.salary_max.is_some_and(|s| s < 0.0) {
        return Err(ClientError::Validation("Salary cannot be negative".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Identity, MemorySessionStore, Role, SessionStore};
    use crate::test_support::{client_for, spawn_backend};
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::{get, post, put};
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn recruiter_store() -> Arc<MemorySessionStore> {
        Arc::new(MemorySessionStore::with_session(
            "jwt-r",
            Identity {
                user_id: Uuid::new_v4(),
                email: "rita@acme.test".to_string(),
                role: Role::Recruiter,
            },
        ))
    }

    fn backend() -> Router {
        Router::new()
            .route(
                "/recruiter/jobs",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({ "id": Uuid::new_v4(), "title": body["title"], "jobType": body["jobType"] }))
                })
                .get(|| async { StatusCode::UNAUTHORIZED }),
            )
            .route(
                "/recruiter/applications/:id/status",
                put(
                    |Path(id): Path<Uuid>, Query(q): Query<HashMap<String, String>>| async move {
                        Json(json!({ "id": id, "status": q.get("status") }))
                    },
                ),
            )
            .route(
                "/recruiter/search-candidates",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "results": [{ "query": body["query"] }],
                        "total_pool_size": 42,
                        "status": "success"
                    }))
                }),
            )
            .route("/recruiter/profile", get(|| async { Json(json!({ "companyName": "Acme" })) }))
    }

    fn post_request() -> JobPostRequest {
        JobPostRequest {
            title: "Platform Engineer".to_string(),
            description: "Own the platform".to_string(),
            job_type: Some(crate::models::job::JobType::FullTime),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_job_round_trip() {
        let base = spawn_backend(backend()).await;
        let (_session, gateway) = client_for(&base, recruiter_store());

        let job = create_job(&gateway, &post_request()).await.unwrap();
        assert_eq!(job.title, "Platform Engineer");
        assert_eq!(job.job_type.as_deref(), Some("FULL_TIME"));
    }

    #[tokio::test]
    async fn test_status_update_uses_query_param() {
        let base = spawn_backend(backend()).await;
        let (_session, gateway) = client_for(&base, recruiter_store());
        let id = Uuid::new_v4();

        let app = update_application_status(&gateway, id, ApplicationStatus::Shortlisted)
            .await
            .unwrap();
        assert_eq!(app.id, id);
        assert_eq!(app.parsed_status(), Some(ApplicationStatus::Shortlisted));
    }

    #[tokio::test]
    async fn test_candidate_search() {
        let base = spawn_backend(backend()).await;
        let (_session, gateway) = client_for(&base, recruiter_store());

        let found = search_candidates(&gateway, " rust + kafka ").await.unwrap();
        assert_eq!(found.total_pool_size, Some(42));
        assert_eq!(found.results[0]["query"], "rust + kafka");
    }

    #[tokio::test]
    async fn test_expired_token_ends_session_for_whole_client() {
        let base = spawn_backend(backend()).await;
        let store = recruiter_store();
        let (session, gateway) = client_for(&base, store.clone());
        assert!(session.is_recruiter());

        let err = list_jobs(&gateway).await.unwrap_err();

        assert!(err.ends_session());
        assert!(store.get_token().unwrap().is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_profile_is_lenient() {
        let base = spawn_backend(backend()).await;
        let (_session, gateway) = client_for(&base, recruiter_store());
        let profile = get_profile(&gateway).await.unwrap();
        assert_eq!(profile.company_name.as_deref(), Some("Acme"));
        assert!(profile.industry.is_none());
    }

    #[test]
    fn test_job_post_validation() {
        let mut request = post_request();
        assert!(validate_job_post(&request).is_ok());

        request.salary_min = Some(120_000.0);
        request.salary_max = Some(90_000.0);
        assert!(validate_job_post(&request).is_err());

        request.salary_max = None;
        assert!(validate_job_post(&request).is_ok());

        request.title = "  ".to_string();
        assert!(validate_job_post(&request).is_err());
    }
}
