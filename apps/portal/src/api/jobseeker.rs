//! Job seeker endpoints: profile, resumes and applications.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::ClientError;
use crate::gateway::AuthGateway;
use crate::helpers::{is_valid_resume_file, resume_mime_type, MAX_RESUME_BYTES};
use crate::models::application::{JobApplication, JobApplicationRequest};
use crate::models::insights::{Recommendation, SkillGap};
use crate::models::resume::Resume;
use crate::models::user::JobSeekerProfile;

pub async fn get_profile(gateway: &AuthGateway) -> Result<JobSeekerProfile, ClientError> {
    gateway.get("/jobseeker/profile").await
}

pub async fn update_profile(
    gateway: &AuthGateway,
    profile: &JobSeekerProfile,
) -> Result<JobSeekerProfile, ClientError> {
    gateway.put_json("/jobseeker/profile", profile).await
}

/// Checks type and size locally, then uploads the file as multipart field `file`.
pub async fn upload_resume(gateway: &AuthGateway, path: &Path) -> Result<Value, ClientError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ClientError::Validation(format!("Not a file: {}", path.display())))?
        .to_string();

    if !is_valid_resume_file(&file_name) {
        return Err(ClientError::Validation(
            "Please upload a PDF, DOC, or DOCX file".to_string(),
        ));
    }

    let size = tokio::fs::metadata(path).await?.len();
    if size > MAX_RESUME_BYTES {
        return Err(ClientError::Validation(
            "File size must be less than 10MB".to_string(),
        ));
    }

    let bytes = tokio::fs::read(path).await?;
    let part = Part::bytes(bytes)
        .file_name(file_name.clone())
        .mime_str(resume_mime_type(&file_name))?;

    info!("Uploading resume {file_name} ({size} bytes)");
    gateway
        .post_multipart("/jobseeker/resume/upload", Form::new().part("file", part))
        .await
}

pub async fn list_resumes(gateway: &AuthGateway) -> Result<Vec<Resume>, ClientError> {
    gateway.get("/jobseeker/resumes").await
}

pub async fn delete_resume(gateway: &AuthGateway, resume_id: Uuid) -> Result<Value, ClientError> {
    gateway.delete(&format!("/jobseeker/resumes/{resume_id}")).await
}

pub async fn set_primary_resume(gateway: &AuthGateway, resume_id: Uuid) -> Result<Resume, ClientError> {
    gateway
        .put(&format!("/jobseeker/resumes/{resume_id}/set-primary"))
        .await
}

pub async fn apply(
    gateway: &AuthGateway,
    request: &JobApplicationRequest,
) -> Result<JobApplication, ClientError> {
    gateway.post_json("/jobseeker/apply", request).await
}

pub async fn list_applications(gateway: &AuthGateway) -> Result<Vec<JobApplication>, ClientError> {
    gateway.get("/jobseeker/applications").await
}

pub async fn recommendations(gateway: &AuthGateway) -> Result<Vec<Recommendation>, ClientError> {
    gateway.get("/jobseeker/recommendations").await
}

pub async fn skill_gap(gateway: &AuthGateway, job_id: Uuid) -> Result<SkillGap, ClientError> {
    gateway.get(&format!("/jobseeker/skill-gap/{job_id}")).await
}
