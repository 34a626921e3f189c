//! Job board endpoints. Listed under `/jobs` but still sent with the session token.

use serde::Serialize;
use uuid::Uuid;

use crate::errors::ClientError;
use crate::gateway::AuthGateway;
use crate::models::job::{Job, JobType};

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_type: Option<&'static str>,
}

pub async fn list_all(gateway: &AuthGateway) -> Result<Vec<Job>, ClientError> {
    gateway.get("/jobs/all").await
}

pub async fn get_job(gateway: &AuthGateway, job_id: Uuid) -> Result<Job, ClientError> {
    gateway.get(&format!("/jobs/{job_id}")).await
}

pub async fn search(gateway: &AuthGateway, keyword: &str) -> Result<Vec<Job>, ClientError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(ClientError::Validation("Search keyword cannot be empty".to_string()));
    }
    gateway.get_query("/jobs/search", &[("keyword", keyword)]).await
}

/// Filters by location and/or job type. With neither set this is the full listing.
pub async fn filter(
    gateway: &AuthGateway,
    location: Option<&str>,
    job_type: Option<JobType>,
) -> Result<Vec<Job>, ClientError> {
    let query = FilterQuery {
        location: location.map(str::trim).filter(|l| !l.is_empty()),
        job_type: job_type.map(|t| t.as_str()),
    };
    if query.location.is_none() && query.job_type.is_none() {
        return list_all(gateway).await;
    }
    gateway.get_query("/jobs/filter", &query).await
}
